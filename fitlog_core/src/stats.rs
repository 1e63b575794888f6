//! Aggregates computed from the workout history.
//!
//! Everything here is a pure function over a slice of workouts.

use crate::{BmiCategory, BmiReading, DailyProgress, Error, Result, Workout};
use chrono::NaiveDate;

/// Sum of calories across all workouts
pub fn total_calories(workouts: &[Workout]) -> i64 {
    workouts.iter().map(|w| w.calories()).sum()
}

/// Calories burned on `today` compared against `goal`
pub fn daily_progress(workouts: &[Workout], goal: u32, today: NaiveDate) -> DailyProgress {
    let calories_today: i64 = workouts
        .iter()
        .filter(|w| w.day() == today)
        .map(|w| w.calories())
        .sum();

    DailyProgress {
        calories_today,
        goal,
        remaining: i64::from(goal) - calories_today,
    }
}

/// Compute BMI from weight in kilograms and height in centimetres.
///
/// Non-positive or non-finite inputs are rejected before any division.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Result<BmiReading> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(Error::invalid(format!(
            "weight must be a positive number of kilograms, got {}",
            weight_kg
        )));
    }
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(Error::invalid(format!(
            "height must be a positive number of centimetres, got {}",
            height_cm
        )));
    }

    let height_m = height_cm / 100.0;
    let value = weight_kg / (height_m * height_m);

    Ok(BmiReading {
        value,
        category: BmiCategory::classify(value),
    })
}

/// Per-activity totals
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeSummary {
    pub workout_type: String,
    pub sessions: usize,
    pub minutes: i64,
    pub calories: i64,
}

/// Totals grouped by workout type, in the order each type first appears
pub fn summary(workouts: &[Workout]) -> Vec<TypeSummary> {
    let mut rows: Vec<TypeSummary> = Vec::new();

    for workout in workouts {
        let idx = match rows
            .iter()
            .position(|r| r.workout_type == workout.workout_type())
        {
            Some(idx) => idx,
            None => {
                rows.push(TypeSummary {
                    workout_type: workout.workout_type().to_string(),
                    sessions: 0,
                    minutes: 0,
                    calories: 0,
                });
                rows.len() - 1
            }
        };

        let row = &mut rows[idx];
        row.sessions += 1;
        row.minutes += workout.duration();
        row.calories += workout.calories();
    }

    rows
}
