//! Calories-over-time chart.
//!
//! The chart data is one point per workout in insertion order, labelled
//! with the day it was logged. `render_text` draws it as a horizontal bar
//! chart for the terminal.

use crate::Workout;
use chrono::NaiveDate;
use std::fmt::Write;

pub const CHART_TITLE: &str = "Calories Burned Over Time";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub calories: i64,
}

/// One `(day, calories)` point per workout, in insertion order
pub fn calorie_series(workouts: &[Workout]) -> Vec<ChartPoint> {
    workouts
        .iter()
        .map(|w| ChartPoint {
            date: w.day(),
            calories: w.calories(),
        })
        .collect()
}

/// Render points as bars scaled so the largest value spans `width` columns
pub fn render_text(points: &[ChartPoint], width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", CHART_TITLE);
    let _ = writeln!(out, "{}", "─".repeat(CHART_TITLE.len()));

    let max = points.iter().map(|p| p.calories).max().unwrap_or(0);
    let value_width = points
        .iter()
        .map(|p| p.calories.to_string().len())
        .max()
        .unwrap_or(0);

    for point in points {
        let bar = bar_length(point.calories, max, width);
        let _ = writeln!(
            out,
            "{} │ {:>vw$} {}",
            point.date.format("%Y-%m-%d"),
            point.calories,
            "█".repeat(bar),
            vw = value_width
        );
    }

    out
}

fn bar_length(value: i64, max: i64, width: usize) -> usize {
    if max <= 0 || value <= 0 {
        return 0;
    }
    let (value, max) = (value as u128, max as u128);
    let scaled = (value * width as u128 + max / 2) / max;
    // Any non-zero value gets at least one cell
    (scaled as usize).max(1)
}
