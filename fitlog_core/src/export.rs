//! CSV export of the workout history.

use crate::{Result, Workout, TIMESTAMP_FORMAT};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    workout_type: &'a str,
    duration: i64,
    calories: i64,
    date: String,
}

impl<'a> From<&'a Workout> for CsvRow<'a> {
    fn from(workout: &'a Workout) -> Self {
        CsvRow {
            workout_type: workout.workout_type(),
            duration: workout.duration(),
            calories: workout.calories(),
            date: workout.date().format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Write every workout to `path` as CSV, replacing any existing file.
///
/// The header row is always written, even for an empty history. Returns the
/// number of workouts written.
pub fn export_csv(workouts: &[Workout], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record(["workout_type", "duration", "calories", "date"])?;
    for workout in workouts {
        writer.serialize(CsvRow::from(workout))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} workouts to {:?}", workouts.len(), path);
    Ok(workouts.len())
}
