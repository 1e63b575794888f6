//! Input validation for values typed in by the user.
//!
//! Each function takes raw text and either returns a value the data model
//! accepts or an `Error::InvalidInput` describing what was wrong.

use crate::{Error, Result};

/// Non-empty activity label, surrounding whitespace removed
pub fn workout_type(raw: &str) -> Result<String> {
    let label = raw.trim();
    if label.is_empty() {
        return Err(Error::invalid("workout type must not be empty"));
    }
    Ok(label.to_string())
}

/// Workout duration in whole minutes
pub fn minutes(raw: &str) -> Result<u32> {
    positive_int(raw, "duration")
}

/// Kilocalories burned
pub fn calories(raw: &str) -> Result<u32> {
    positive_int(raw, "calories")
}

/// Daily calorie goal
pub fn daily_goal(raw: &str) -> Result<u32> {
    positive_int(raw, "daily goal")
}

pub fn weight_kg(raw: &str) -> Result<f64> {
    positive_float(raw, "weight")
}

pub fn height_cm(raw: &str) -> Result<f64> {
    positive_float(raw, "height")
}

fn positive_int(raw: &str, what: &str) -> Result<u32> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::invalid(format!("{} must be a whole number, got {:?}", what, raw.trim())))?;

    if value <= 0 {
        return Err(Error::invalid(format!("{} must be greater than zero", what)));
    }

    u32::try_from(value).map_err(|_| Error::invalid(format!("{} is too large", what)))
}

fn positive_float(raw: &str, what: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::invalid(format!("{} must be a number, got {:?}", what, raw.trim())))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid(format!("{} must be greater than zero", what)));
    }

    Ok(value)
}
