//! Data models for the Housing Advisor.
//!
//! The `models` module defines the serialisable structs used by the
//! income estimator: the user's payroll scenario, the surcharge rate
//! table and the breakdown projected from them.  They derive
//! `Serialize` and `Deserialize` so that they can be transmitted over
//! the HTTP API unchanged.  Field names are `camelCase` on the wire.

use serde::{Deserialize, Serialize};

/// Representative monthly minimum wage used to preset the estimator.
pub const DEFAULT_BASE_SALARY: f64 = 1_300_000.0;

/// Standard monthly-hours basis used to derive an hourly rate.
pub const MONTHLY_HOURS_DIVISOR: f64 = 240.0;

/// Display color of the base-salary bar.
pub const BASE_COLOR: &str = "#0ea5e9";

/// Display color of the extras bar.
pub const EXTRAS_COLOR: &str = "#10b981";

/// One payroll scenario for a given month.
///
/// All fields are finite and non-negative once they have gone through
/// [`crate::input`]; the estimator relies on that and does not check
/// again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    /// Monthly base salary in currency units.
    pub base_salary: f64,
    /// Hours worked in the night window (9pm - 6am).
    pub night_hours: f64,
    /// Hours of daytime overtime.
    pub day_overtime: f64,
    /// Hours of nighttime overtime.
    pub night_overtime: f64,
    /// Hours worked on Sundays or holidays.
    pub sunday_hours: f64,
}

impl Default for CalculationInput {
    fn default() -> Self {
        Self {
            base_salary: DEFAULT_BASE_SALARY,
            night_hours: 0.0,
            day_overtime: 0.0,
            night_overtime: 0.0,
            sunday_hours: 0.0,
        }
    }
}

impl CalculationInput {
    /// Number of hours entered for `category`.
    pub fn hours(&self, category: HourCategory) -> f64 {
        match category {
            HourCategory::Night => self.night_hours,
            HourCategory::DayOvertime => self.day_overtime,
            HourCategory::NightOvertime => self.night_overtime,
            HourCategory::Sunday => self.sunday_hours,
        }
    }
}

/// The four kinds of surcharged hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HourCategory {
    Night,
    DayOvertime,
    NightOvertime,
    Sunday,
}

impl HourCategory {
    /// Every category, in the order contributions are summed.
    pub const ALL: [HourCategory; 4] = [
        HourCategory::Night,
        HourCategory::DayOvertime,
        HourCategory::NightOvertime,
        HourCategory::Sunday,
    ];
}

/// Surcharge multipliers keyed by hour category.
///
/// `night` is a premium fraction while the other three are total pay
/// factors.  The estimator applies each one as the sole multiplier, so
/// a night hour is worth 35% of the hourly rate and a daytime overtime
/// hour 125% of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SurchargeRateTable {
    pub night: f64,
    pub day_overtime: f64,
    pub night_overtime: f64,
    pub sunday: f64,
}

impl Default for SurchargeRateTable {
    fn default() -> Self {
        Self {
            night: 0.35,
            day_overtime: 1.25,
            night_overtime: 1.75,
            sunday: 1.75,
        }
    }
}

impl SurchargeRateTable {
    /// Multiplier applied to hours of `category`.
    pub fn multiplier(&self, category: HourCategory) -> f64 {
        match category {
            HourCategory::Night => self.night,
            HourCategory::DayOvertime => self.day_overtime,
            HourCategory::NightOvertime => self.night_overtime,
            HourCategory::Sunday => self.sunday,
        }
    }
}

/// Immutable configuration handed to the estimator on every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatorConfig {
    /// Surcharge multipliers.
    #[serde(default)]
    pub rates: SurchargeRateTable,
    /// Monthly hours used to turn a salary into an hourly rate.
    #[serde(default = "default_divisor")]
    pub monthly_divisor: f64,
    /// Salary preset shown before the user types anything.
    #[serde(default = "default_base_salary")]
    pub default_base_salary: f64,
}

fn default_divisor() -> f64 {
    MONTHLY_HOURS_DIVISOR
}

fn default_base_salary() -> f64 {
    DEFAULT_BASE_SALARY
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            rates: SurchargeRateTable::default(),
            monthly_divisor: MONTHLY_HOURS_DIVISOR,
            default_base_salary: DEFAULT_BASE_SALARY,
        }
    }
}

impl EstimatorConfig {
    /// Scenario the estimator starts from: the preset salary, no extra hours.
    pub fn initial_input(&self) -> CalculationInput {
        CalculationInput {
            base_salary: self.default_base_salary,
            ..CalculationInput::default()
        }
    }
}

/// Surcharge amount earned in each hour category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributions {
    pub night: f64,
    pub day_overtime: f64,
    pub night_overtime: f64,
    pub sunday: f64,
}

impl Contributions {
    pub fn set(&mut self, category: HourCategory, amount: f64) {
        match category {
            HourCategory::Night => self.night = amount,
            HourCategory::DayOvertime => self.day_overtime = amount,
            HourCategory::NightOvertime => self.night_overtime = amount,
            HourCategory::Sunday => self.sunday = amount,
        }
    }

    /// Sum of the four contributions, added in [`HourCategory::ALL`] order.
    pub fn sum(&self) -> f64 {
        self.night + self.day_overtime + self.night_overtime + self.sunday
    }
}

/// One labeled bar of the income chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownComponent {
    pub name: String,
    pub value: f64,
    pub color: String,
}

impl BreakdownComponent {
    fn new(name: &str, value: f64, color: &str) -> Self {
        Self {
            name: name.to_string(),
            value,
            color: color.to_string(),
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Result of an estimate.  Recomputed from scratch on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeBreakdown {
    /// Base salary plus every surcharge contribution.
    pub total: f64,
    /// Base salary the estimate started from.
    pub base_income: f64,
    /// Sum of the four contributions.
    pub extra_income: f64,
    pub contributions: Contributions,
    /// Exactly two entries: `Base` then `Extras`.
    pub components: Vec<BreakdownComponent>,
}

impl IncomeBreakdown {
    /// Figures that overflow `f64` are reported as 0 rather than as
    /// infinities, which JSON cannot represent.
    pub fn new(base_income: f64, contributions: Contributions) -> Self {
        let extra_income = finite_or_zero(contributions.sum());
        Self {
            total: finite_or_zero(base_income + extra_income),
            base_income,
            extra_income,
            contributions,
            components: vec![
                BreakdownComponent::new("Base", base_income, BASE_COLOR),
                BreakdownComponent::new("Extras", extra_income, EXTRAS_COLOR),
            ],
        }
    }
}
