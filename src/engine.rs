//! Income estimation engine.
//!
//! The `engine` module turns a [`CalculationInput`] into an
//! [`IncomeBreakdown`].  Estimation is a pure function of the input and
//! an [`EstimatorConfig`]; it never fails and keeps no state, so the
//! caller may rerun it after every field change.  Batches of scenarios
//! are evaluated across CPU cores with [`rayon`].

use crate::models::{CalculationInput, Contributions, EstimatorConfig, HourCategory, IncomeBreakdown};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Hourly rate derived from a monthly salary.
///
/// A zero, negative or non-finite divisor yields 0 rather than a
/// division fault.
pub fn hourly_rate(base_salary: f64, monthly_divisor: f64) -> f64 {
    if base_salary == 0.0 || !monthly_divisor.is_finite() || monthly_divisor <= 0.0 {
        return 0.0;
    }
    base_salary / monthly_divisor
}

/// Pay earned by `hours` at `multiplier` times the hourly rate.
pub fn contribution(hours: f64, hourly_rate: f64, multiplier: f64) -> f64 {
    hours * hourly_rate * multiplier
}

/// Estimate the bankable monthly income for one scenario.
///
/// Every multiplier in the rate table is applied as the only factor
/// for its category.  With the default table that means night hours
/// earn just the 35% premium while overtime and Sunday hours earn the
/// full 125%/175% of the hourly rate.
pub fn estimate(input: &CalculationInput, config: &EstimatorConfig) -> IncomeBreakdown {
    let rate = hourly_rate(input.base_salary, config.monthly_divisor);
    let mut contributions = Contributions::default();
    for category in HourCategory::ALL {
        let amount = contribution(input.hours(category), rate, config.rates.multiplier(category));
        trace!(?category, amount, "surcharge contribution");
        contributions.set(category, amount);
    }
    IncomeBreakdown::new(input.base_salary, contributions)
}

/// Estimate several scenarios at once.  Output order matches input order.
pub fn estimate_batch(inputs: &[CalculationInput], config: &EstimatorConfig) -> Vec<IncomeBreakdown> {
    debug!(scenarios = inputs.len(), "estimating batch");
    inputs
        .par_iter()
        .map(|input| estimate(input, config))
        .collect()
}

/// Income above the base salary, or 0 when there is none.
pub fn variable_income(breakdown: &IncomeBreakdown) -> f64 {
    (breakdown.total - breakdown.base_income).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawCalculationInput;
    use crate::models::SurchargeRateTable;
    use pretty_assertions::assert_eq;

    fn salary(base_salary: f64) -> CalculationInput {
        CalculationInput {
            base_salary,
            ..CalculationInput::default()
        }
    }

    #[test]
    fn base_salary_only() {
        let result = estimate(&salary(1_300_000.0), &EstimatorConfig::default());
        assert_eq!(result.total, 1_300_000.0);
        assert_eq!(result.components[0].name, "Base");
        assert_eq!(result.components[0].value, 1_300_000.0);
        assert_eq!(result.components[1].name, "Extras");
        assert_eq!(result.components[1].value, 0.0);
    }

    #[test]
    fn night_hours_earn_only_the_premium() {
        let input = CalculationInput {
            night_hours: 10.0,
            ..salary(2_400_000.0)
        };
        let result = estimate(&input, &EstimatorConfig::default());
        assert_eq!(result.contributions.night, 35_000.0);
        assert_eq!(result.total, 2_435_000.0);
    }

    #[test]
    fn day_overtime_is_a_total_pay_factor() {
        let input = CalculationInput {
            day_overtime: 5.0,
            ..salary(2_400_000.0)
        };
        let result = estimate(&input, &EstimatorConfig::default());
        assert_eq!(result.contributions.day_overtime, 62_500.0);
        assert_eq!(result.total, 2_462_500.0);
    }

    #[test]
    fn sunday_and_night_overtime_combine() {
        let input = CalculationInput {
            sunday_hours: 8.0,
            night_overtime: 2.0,
            ..salary(2_400_000.0)
        };
        let result = estimate(&input, &EstimatorConfig::default());
        assert_eq!(result.contributions.sunday, 140_000.0);
        assert_eq!(result.contributions.night_overtime, 35_000.0);
        assert_eq!(result.extra_income, 175_000.0);
        assert_eq!(result.total, 2_575_000.0);
        assert_eq!(variable_income(&result), 175_000.0);
    }

    #[test]
    fn zero_salary_yields_zero_total() {
        let input = CalculationInput {
            base_salary: 0.0,
            night_hours: 40.0,
            day_overtime: 12.0,
            night_overtime: 3.0,
            sunday_hours: 16.0,
        };
        assert_eq!(estimate(&input, &EstimatorConfig::default()).total, 0.0);
    }

    #[test]
    fn degenerate_divisor_gives_zero_hourly_rate() {
        assert_eq!(hourly_rate(2_400_000.0, 0.0), 0.0);
        assert_eq!(hourly_rate(2_400_000.0, -240.0), 0.0);
        assert_eq!(hourly_rate(2_400_000.0, f64::NAN), 0.0);
        assert_eq!(hourly_rate(2_400_000.0, 240.0), 10_000.0);

        let config = EstimatorConfig {
            monthly_divisor: 0.0,
            ..EstimatorConfig::default()
        };
        let input = CalculationInput {
            sunday_hours: 8.0,
            ..salary(2_400_000.0)
        };
        assert_eq!(estimate(&input, &config).total, 2_400_000.0);
    }

    #[test]
    fn total_equals_salary_without_hours() {
        for base in [0.0, 1.0, 908_526.0, 1_300_000.0, 12_345_678.9] {
            assert_eq!(estimate(&salary(base), &EstimatorConfig::default()).total, base);
        }
    }

    #[test]
    fn doubling_salary_doubles_total_without_hours() {
        let config = EstimatorConfig::default();
        for base in [1.0, 1_300_000.0, 4_750_000.5] {
            let single = estimate(&salary(base), &config).total;
            let double = estimate(&salary(base * 2.0), &config).total;
            assert_eq!(double, single * 2.0);
        }
    }

    #[test]
    fn total_never_below_salary_and_monotonic_in_hours() {
        let config = EstimatorConfig::default();
        let base = CalculationInput {
            night_hours: 3.0,
            day_overtime: 2.0,
            night_overtime: 1.0,
            sunday_hours: 4.0,
            ..salary(1_800_000.0)
        };
        let start = estimate(&base, &config).total;
        assert!(start >= base.base_salary);

        let bumps: [fn(&mut CalculationInput); 4] = [
            |i| i.night_hours += 5.0,
            |i| i.day_overtime += 5.0,
            |i| i.night_overtime += 5.0,
            |i| i.sunday_hours += 5.0,
        ];
        for bump in bumps {
            let mut more = base;
            bump(&mut more);
            assert!(estimate(&more, &config).total >= start);
        }
    }

    #[test]
    fn is_idempotent() {
        let input = CalculationInput {
            night_hours: 7.25,
            sunday_hours: 3.5,
            ..salary(1_550_000.0)
        };
        let config = EstimatorConfig::default();
        assert_eq!(estimate(&input, &config), estimate(&input, &config));
    }

    #[test]
    fn malformed_text_matches_zero_hours() {
        let config = EstimatorConfig::default();
        let garbage: RawCalculationInput = serde_json::from_str(
            r#"{"baseSalary": 2400000, "nightHours": "diez", "dayOvertime": "??", "nightOvertime": "", "sundayHours": "n/a"}"#,
        )
        .unwrap();
        let zero = salary(2_400_000.0);
        assert_eq!(estimate(&garbage.into_input(), &config), estimate(&zero, &config));
    }

    #[test]
    fn huge_salary_never_yields_infinite_total() {
        let input = CalculationInput {
            sunday_hours: 100.0,
            ..salary(f64::MAX)
        };
        let result = estimate(&input, &EstimatorConfig::default());
        assert!(result.total.is_finite());
        assert_eq!(result.total, 0.0);
    }

    #[test]
    fn alternate_rate_regime() {
        let config = EstimatorConfig {
            rates: SurchargeRateTable {
                night: 1.35,
                ..SurchargeRateTable::default()
            },
            ..EstimatorConfig::default()
        };
        let input = CalculationInput {
            night_hours: 10.0,
            ..salary(2_400_000.0)
        };
        assert_eq!(estimate(&input, &config).contributions.night, 135_000.0);
    }

    #[test]
    fn batch_preserves_order() {
        let config = EstimatorConfig::default();
        let inputs = vec![
            salary(1_300_000.0),
            CalculationInput {
                day_overtime: 5.0,
                ..salary(2_400_000.0)
            },
            salary(0.0),
        ];
        let totals: Vec<f64> = estimate_batch(&inputs, &config).iter().map(|b| b.total).collect();
        assert_eq!(totals, vec![1_300_000.0, 2_462_500.0, 0.0]);
    }
}
