//! Typed parse and range-check helpers for raw survey inputs.
//!
//! The adapter layer that owns raw text (form fields, spreadsheet cells)
//! funnels every scalar through these functions before it reaches a
//! calculator. Each function targets exactly one type, so there is no
//! runtime type inspection: callers pick the parser that matches the field.

use jiff::civil::Time;

use crate::error::ValidateError;

/// Parse a boolean field. Only case-insensitive `true`/`false` are accepted;
/// numeric spellings like `1`/`0` or `yes`/`no` are rejected.
pub fn parse_bool(raw: &str, name: &str) -> Result<bool, ValidateError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ValidateError::NotBoolean {
            name: name.to_string(),
        }),
    }
}

/// Parse an integer field. Float spellings with a zero fractional part
/// (`"4.0"`) are accepted; `"4.5"` is rejected as not a whole number.
pub fn parse_int(raw: &str, name: &str) -> Result<i64, ValidateError> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Ok(v as i64),
        Ok(v) if v.is_finite() => Err(ValidateError::NotWholeNumber {
            name: name.to_string(),
            value: v,
        }),
        _ => Err(ValidateError::CannotConvert {
            name: name.to_string(),
            target: "int",
        }),
    }
}

/// Parse a float field.
pub fn parse_float(raw: &str, name: &str) -> Result<f64, ValidateError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ValidateError::CannotConvert {
            name: name.to_string(),
            target: "float",
        }),
    }
}

/// Parse a free-text field. Whitespace-only input is rejected.
pub fn parse_nonempty(raw: &str, name: &str) -> Result<String, ValidateError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidateError::EmptyString {
            name: name.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Range check applied strictly after coercion. Violations of the lower and
/// upper bound are reported as distinct conditions.
pub fn float_in_range(
    value: f64,
    name: &str,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<f64, ValidateError> {
    if let Some(min) = min
        && value < min
    {
        return Err(ValidateError::BelowMinimum {
            name: name.to_string(),
            min,
        });
    }
    if let Some(max) = max
        && value > max
    {
        return Err(ValidateError::AboveMaximum {
            name: name.to_string(),
            max,
        });
    }
    Ok(value)
}

/// Integer companion of [`float_in_range`].
pub fn int_in_range(
    value: i64,
    name: &str,
    min: Option<i64>,
    max: Option<i64>,
) -> Result<i64, ValidateError> {
    if let Some(min) = min
        && value < min
    {
        return Err(ValidateError::BelowMinimum {
            name: name.to_string(),
            min: min as f64,
        });
    }
    if let Some(max) = max
        && value > max
    {
        return Err(ValidateError::AboveMaximum {
            name: name.to_string(),
            max: max as f64,
        });
    }
    Ok(value)
}

/// Case-sensitive membership in an enumerated choice set.
pub fn choice<'a>(
    value: &'a str,
    allowed: &'static [&'static str],
    name: &str,
) -> Result<&'a str, ValidateError> {
    if allowed.contains(&value) {
        Ok(value)
    } else {
        Err(ValidateError::InvalidChoice {
            name: name.to_string(),
            allowed,
        })
    }
}

/// Parse `"HH:MM"` text into a time-of-day, minute precision.
pub fn parse_time(raw: &str, name: &str) -> Result<Time, ValidateError> {
    let invalid = || ValidateError::InvalidTime {
        name: name.to_string(),
    };

    let mut parts = raw.trim().splitn(2, ':');
    let (Some(hour_text), Some(minute_text)) = (parts.next(), parts.next()) else {
        return Err(invalid());
    };
    let hour: i8 = hour_text.trim().parse().map_err(|_| invalid())?;
    let minute: i8 = minute_text.trim().parse().map_err(|_| invalid())?;
    Time::new(hour, minute, 0, 0).map_err(|_| invalid())
}

/// Normalize a structured time-of-day to minute precision, discarding
/// seconds and subseconds.
#[must_use]
pub fn truncate_time(t: Time) -> Time {
    jiff::civil::time(t.hour(), t.minute(), 0, 0)
}
