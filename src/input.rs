//! Ingestion of user-entered quantities.
//!
//! Form fields arrive as free text (or as JSON numbers from API
//! clients).  Everything is coerced into a [`CalculationInput`] whose
//! fields are finite and non-negative: unparseable text becomes 0,
//! negative and non-finite values are clamped to 0.  Nothing here ever
//! reports an error to the caller.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::CalculationInput;

/// A quantity as received from a client: a number, raw text, or any
/// other JSON value, which counts as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawQuantity {
    Number(f64),
    Text(String),
    Other(Value),
}

impl RawQuantity {
    /// Sanitised numeric value of this quantity.
    pub fn value(&self) -> f64 {
        match self {
            RawQuantity::Number(n) => sanitize(*n),
            RawQuantity::Text(text) => parse_quantity(text),
            RawQuantity::Other(other) => {
                debug!(input = %other, "non-numeric quantity coerced to 0");
                0.0
            }
        }
    }
}

impl<'de> Deserialize<'de> for RawQuantity {
    /// Accepts any JSON value.  Numbers outside the `f64` range are
    /// kept as infinities and later clamped to 0.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => RawQuantity::Number(match n.as_f64() {
                Some(value) => value,
                None => n.to_string().parse::<f64>().unwrap_or(0.0),
            }),
            Value::String(text) => RawQuantity::Text(text),
            other => RawQuantity::Other(other),
        })
    }
}

/// Unvalidated scenario as posted by a client.  Missing fields take
/// the value of [`CalculationInput::default`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCalculationInput {
    #[serde(default)]
    pub base_salary: Option<RawQuantity>,
    #[serde(default)]
    pub night_hours: Option<RawQuantity>,
    #[serde(default)]
    pub day_overtime: Option<RawQuantity>,
    #[serde(default)]
    pub night_overtime: Option<RawQuantity>,
    #[serde(default)]
    pub sunday_hours: Option<RawQuantity>,
}

impl RawCalculationInput {
    /// Sanitise into a scenario, filling gaps from `defaults`.
    pub fn into_input_with(self, defaults: CalculationInput) -> CalculationInput {
        let pick = |raw: Option<RawQuantity>, fallback: f64| match raw {
            Some(raw) => raw.value(),
            None => sanitize(fallback),
        };
        CalculationInput {
            base_salary: pick(self.base_salary, defaults.base_salary),
            night_hours: pick(self.night_hours, defaults.night_hours),
            day_overtime: pick(self.day_overtime, defaults.day_overtime),
            night_overtime: pick(self.night_overtime, defaults.night_overtime),
            sunday_hours: pick(self.sunday_hours, defaults.sunday_hours),
        }
    }

    pub fn into_input(self) -> CalculationInput {
        self.into_input_with(CalculationInput::default())
    }
}

/// Names of the editable fields of a [`CalculationInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputField {
    BaseSalary,
    NightHours,
    DayOvertime,
    NightOvertime,
    SundayHours,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown input field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for InputField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baseSalary" => Ok(InputField::BaseSalary),
            "nightHours" => Ok(InputField::NightHours),
            "dayOvertime" => Ok(InputField::DayOvertime),
            "nightOvertime" => Ok(InputField::NightOvertime),
            "sundayHours" => Ok(InputField::SundayHours),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

impl CalculationInput {
    /// Replace one field with the sanitised value of `raw`.
    ///
    /// Callers recompute the estimate explicitly afterwards.
    pub fn set_field(&mut self, field: InputField, raw: &str) {
        let value = parse_quantity(raw);
        let slot = match field {
            InputField::BaseSalary => &mut self.base_salary,
            InputField::NightHours => &mut self.night_hours,
            InputField::DayOvertime => &mut self.day_overtime,
            InputField::NightOvertime => &mut self.night_overtime,
            InputField::SundayHours => &mut self.sunday_hours,
        };
        *slot = value;
    }
}

/// Clamp negative and non-finite values to 0.
pub fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parse the leading number of `text`, as a form field does.
///
/// Leading whitespace is skipped and the longest numeric prefix is
/// used, so `"12abc"` is 12.  Text without a numeric prefix is 0.
pub fn parse_quantity(text: &str) -> f64 {
    let trimmed = text.trim_start();
    let prefix = &trimmed[..numeric_prefix_len(trimmed)];
    match prefix.parse::<f64>() {
        Ok(value) => sanitize(value),
        Err(_) => {
            if !trimmed.is_empty() {
                debug!(input = text, "non-numeric quantity coerced to 0");
            }
            0.0
        }
    }
}

/// Length in bytes of the `[+-]digits[.digits][e[+-]digits]` prefix.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}
