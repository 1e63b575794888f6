//! Core domain types for fitlog.
//!
//! This module defines:
//! - The workout record and its on-disk timestamp format
//! - Daily goal progress
//! - BMI readings and their classification bands

use crate::clock::Clock;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of every persisted and displayed workout timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Daily calorie goal used until the user picks one
pub const DEFAULT_DAILY_GOAL: u32 = 500;

// ============================================================================
// Workout Record
// ============================================================================

/// One logged exercise event.
///
/// Records are immutable once created; the store only ever appends them.
/// Numeric fields are signed so histories holding values typed before input
/// validation existed still load; new input is checked in `validate`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Workout {
    workout_type: String,
    duration: i64,
    calories: i64,
    #[serde(with = "timestamp")]
    date: NaiveDateTime,
}

impl Workout {
    /// Rebuild a workout from explicit values
    pub fn new(
        workout_type: impl Into<String>,
        duration: i64,
        calories: i64,
        date: NaiveDateTime,
    ) -> Self {
        Self {
            workout_type: workout_type.into(),
            duration,
            calories,
            date,
        }
    }

    /// Create a workout stamped with the clock's current time
    pub fn at(
        workout_type: impl Into<String>,
        duration: i64,
        calories: i64,
        clock: &dyn Clock,
    ) -> Self {
        Self::new(workout_type, duration, calories, clock.now())
    }

    pub fn workout_type(&self) -> &str {
        &self.workout_type
    }

    /// Duration in minutes
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Kilocalories burned
    pub fn calories(&self) -> i64 {
        self.calories
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    /// Calendar day the workout was logged on
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} min - {} cal",
            self.date.format(TIMESTAMP_FORMAT),
            self.workout_type,
            self.duration,
            self.calories
        )
    }
}

/// Serde adapter storing timestamps as `YYYY-MM-DD HH:MM:SS` strings
mod timestamp {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(|e| {
            serde::de::Error::custom(format!("invalid date {:?}: {}", raw, e))
        })
    }
}

// ============================================================================
// Daily Goal
// ============================================================================

/// Calories burned today measured against the daily goal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyProgress {
    pub calories_today: i64,
    pub goal: u32,
    /// `goal - calories_today`; negative once the goal is exceeded
    pub remaining: i64,
}

impl DailyProgress {
    pub fn achieved(&self) -> bool {
        self.calories_today >= i64::from(self.goal)
    }
}

// ============================================================================
// BMI
// ============================================================================

/// BMI classification band
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    NormalWeight,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Classify a BMI value.
    ///
    /// Thresholds are 18.5, 24.9, 25 and 29.9. Values in `[24.9, 25)` and
    /// `[29.9, 30)` match no lower band and land in `Obese`.
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if (18.5..24.9).contains(&bmi) {
            BmiCategory::NormalWeight
        } else if (25.0..29.9).contains(&bmi) {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::NormalWeight => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A computed BMI value with its band
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BmiReading {
    pub value: f64,
    pub category: BmiCategory,
}
