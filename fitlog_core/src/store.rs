//! Workout history persistence.
//!
//! The whole history lives in one JSON file that is read once when the
//! store opens and rewritten in full after every append. Writes go to a
//! temp file in the same directory which is then renamed over the original.

use crate::clock::Clock;
use crate::{stats, DailyProgress, Error, Result, Workout, DEFAULT_DAILY_GOAL};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::Serialize;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// File name of the workout history inside the data directory
pub const DATA_FILE_NAME: &str = "fitness_data.json";

/// In-memory workout history backed by a JSON file
pub struct WorkoutStore {
    path: PathBuf,
    workouts: Vec<Workout>,
    daily_goal: u32,
    clock: Box<dyn Clock>,
    warnings: Vec<String>,
    /// Set when a corrupted file could not be moved aside; saving would destroy it
    blocked: bool,
}

impl WorkoutStore {
    /// Open the store at `path`, loading any persisted workouts.
    ///
    /// A missing file is an empty history. A corrupted file is moved aside
    /// to `<path>.corrupt` (or `<path>.corrupt.N` if that name is taken), a
    /// warning is recorded and the store starts empty. If the file cannot be
    /// moved it is left in place and saving is refused. Other IO failures
    /// are returned.
    pub fn open(path: impl Into<PathBuf>, clock: Box<dyn Clock>) -> Result<Self> {
        let mut store = Self {
            path: path.into(),
            workouts: Vec::new(),
            daily_goal: DEFAULT_DAILY_GOAL,
            clock,
            warnings: Vec::new(),
            blocked: false,
        };

        match store.load() {
            Ok(()) => {}
            Err(Error::DataCorruption { path, reason }) => {
                tracing::warn!(
                    "Workout data at {:?} is corrupted: {}. Starting with empty history.",
                    path,
                    reason
                );
                let moved = quarantine(&path);
                store.recover_from_corruption(&reason, moved);
            }
            Err(e) => return Err(e),
        }

        Ok(store)
    }

    fn recover_from_corruption(&mut self, reason: &str, moved: Result<PathBuf>) {
        match moved {
            Ok(backup) => self.warnings.push(format!(
                "Could not read workout history ({}). The file was moved to {} and a new history was started.",
                reason,
                backup.display()
            )),
            Err(e) => {
                tracing::warn!(
                    "Could not move corrupted workout data {:?} aside: {}",
                    self.path,
                    e
                );
                self.blocked = true;
                self.warnings.push(format!(
                    "Could not read workout history ({}). The file could not be moved ({}) and was left in place at {}. New workouts will not be saved until it is fixed or removed.",
                    reason,
                    e,
                    self.path.display()
                ));
            }
        }
    }

    /// Append every workout persisted at this store's path, in file order
    pub fn load(&mut self) -> Result<()> {
        let loaded = load_workouts(&self.path)?;
        self.workouts.extend(loaded);
        Ok(())
    }

    /// Rewrite the data file with the full in-memory history.
    ///
    /// Fails without touching the file while a corrupted history is still
    /// in place.
    pub fn save(&self) -> Result<()> {
        if self.blocked {
            return Err(Error::DataCorruption {
                path: self.path.clone(),
                reason: "the unreadable history is still in place; fix or remove it before logging workouts".into(),
            });
        }
        save_workouts(&self.path, &self.workouts)
    }

    /// Log a workout stamped with the current time and persist the history.
    ///
    /// If persisting fails the workout is dropped again, so memory never
    /// holds records the file does not.
    pub fn add(
        &mut self,
        workout_type: impl Into<String>,
        duration: i64,
        calories: i64,
    ) -> Result<&Workout> {
        let workout = Workout::at(workout_type, duration, calories, self.clock.as_ref());
        self.workouts.push(workout);

        if let Err(e) = self.save() {
            self.workouts.pop();
            return Err(e);
        }

        let added = &self.workouts[self.workouts.len() - 1];
        tracing::info!("Logged workout: {}", added);
        Ok(added)
    }

    pub fn set_daily_goal(&mut self, new_goal: u32) {
        tracing::info!("Daily goal changed from {} to {}", self.daily_goal, new_goal);
        self.daily_goal = new_goal;
    }

    pub fn daily_goal(&self) -> u32 {
        self.daily_goal
    }

    /// Workouts in insertion order
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Problems encountered while opening that the user should hear about
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn total_calories(&self) -> i64 {
        stats::total_calories(&self.workouts)
    }

    /// Today's calories against the current goal
    pub fn daily_progress(&self) -> DailyProgress {
        stats::daily_progress(&self.workouts, self.daily_goal, self.today())
    }
}

/// Read all workouts from a data file.
///
/// Returns an empty list if the file does not exist and
/// `Error::DataCorruption` if it exists but does not hold a list of workouts.
pub fn load_workouts(path: &Path) -> Result<Vec<Workout>> {
    if !path.exists() {
        tracing::debug!("No workout data at {:?}, starting empty", path);
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    // Acquire shared lock for reading
    file.lock_shared()?;

    let mut contents = Vec::new();
    let read = std::io::BufReader::new(&file).read_to_end(&mut contents);
    file.unlock()?;
    read?;

    let workouts: Vec<Workout> =
        serde_json::from_slice(&contents).map_err(|e| Error::DataCorruption {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    tracing::debug!("Loaded {} workouts from {:?}", workouts.len(), path);
    Ok(workouts)
}

/// Atomically replace the data file with `workouts`.
///
/// Output is pretty-printed with four-space indentation.
pub fn save_workouts(path: &Path, workouts: &[Workout]) -> Result<()> {
    let dir = parent_dir(path);
    std::fs::create_dir_all(dir)?;

    let temp = NamedTempFile::new_in(dir)?;
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = BufWriter::new(temp.as_file());
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        workouts.serialize(&mut serializer)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Saved {} workouts to {:?}", workouts.len(), path);
    Ok(())
}

/// Move a corrupted data file out of the way and return its new path.
///
/// Earlier backups are never overwritten.
fn quarantine(path: &Path) -> Result<PathBuf> {
    let backup = backup_path(path);
    std::fs::rename(path, &backup)?;
    tracing::warn!("Moved corrupted workout data to {:?}", backup);
    Ok(backup)
}

/// First of `<path>.corrupt`, `<path>.corrupt.1`, ... that does not exist
fn backup_path(path: &Path) -> PathBuf {
    let mut base = OsString::from(path.as_os_str());
    base.push(".corrupt");

    let mut candidate = PathBuf::from(&base);
    let mut n = 1;
    while candidate.exists() {
        let mut name = base.clone();
        name.push(format!(".{}", n));
        candidate = PathBuf::from(name);
        n += 1;
    }
    candidate
}

pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;

    fn clock_at(s: &str) -> Box<dyn Clock> {
        Box::new(FixedClock(
            NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap(),
        ))
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);

        let store = WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();
        assert!(store.workouts().is_empty());
        assert!(store.warnings().is_empty());
        assert_eq!(store.daily_goal(), 500);
        assert!(!path.exists());
    }

    #[test]
    fn test_add_then_reopen_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);

        let original = {
            let mut store = WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();
            store.add("Running", 30, 300).unwrap();
            store.add("Cycling", 60, 550).unwrap();
            store.add("Yoga", 45, 120).unwrap();
            store.workouts().to_vec()
        };

        let reopened = WorkoutStore::open(&path, clock_at("2024-06-02 09:00:00")).unwrap();
        assert_eq!(reopened.workouts(), original.as_slice());
        assert_eq!(reopened.workouts()[0].workout_type(), "Running");
        assert_eq!(reopened.workouts()[2].workout_type(), "Yoga");
    }

    #[test]
    fn test_add_is_visible_without_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);

        let mut store = WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();
        store.add("Run", 20, 100).unwrap();
        assert_eq!(store.total_calories(), 100);

        let added = store.add("Swim", 40, 250).unwrap();
        assert_eq!(
            added.to_string(),
            "[2024-06-01 09:00:00] Swim - 40 min - 250 cal"
        );
        assert_eq!(store.total_calories(), 350);
        assert_eq!(store.workouts().last().unwrap().workout_type(), "Swim");
    }

    #[test]
    fn test_add_persists_immediately() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);

        let mut store = WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();
        store.add("Rowing", 25, 210).unwrap();

        let on_disk = load_workouts(&path).unwrap();
        assert_eq!(on_disk.len(), 1);
        assert_eq!(on_disk[0].calories(), 210);
    }

    #[test]
    fn test_file_layout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);

        let mut store = WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();
        store.add("Running", 30, 300).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n    {\n        \"workout_type\": \"Running\""));

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &value.as_array().unwrap()[0];
        assert_eq!(entry["date"], "2024-06-01 09:00:00");
        assert_eq!(entry["duration"], 30);
    }

    #[test]
    fn test_load_reads_external_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);
        std::fs::write(
            &path,
            r#"[
    {"workout_type": "Running", "duration": 30, "calories": 300, "date": "2024-05-30 07:00:00"},
    {"workout_type": "Yoga", "duration": 60, "calories": 150, "date": "2024-05-31 19:10:42"}
]"#,
        )
        .unwrap();

        let store = WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();
        assert_eq!(store.workouts().len(), 2);
        assert_eq!(store.total_calories(), 450);
        assert_eq!(store.workouts()[1].to_string(), "[2024-05-31 19:10:42] Yoga - 60 min - 150 cal");
    }

    #[test]
    fn test_load_workouts_malformed_json_is_corruption() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);
        std::fs::write(&path, "[{ not json").unwrap();

        let err = load_workouts(&path).unwrap_err();
        assert!(matches!(err, Error::DataCorruption { .. }));
    }

    #[test]
    fn test_load_workouts_missing_field_is_corruption() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);
        std::fs::write(
            &path,
            r#"[{"workout_type": "Run", "duration": 10, "date": "2024-05-30 07:00:00"}]"#,
        )
        .unwrap();

        let err = load_workouts(&path).unwrap_err();
        assert!(matches!(err, Error::DataCorruption { .. }));
    }

    #[test]
    fn test_open_corrupted_file_recovers_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);
        std::fs::write(&path, "{ invalid json }}}").unwrap();

        let mut store = WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();
        assert!(store.workouts().is_empty());
        assert_eq!(store.warnings().len(), 1);

        let backup = temp_dir.path().join("fitness_data.json.corrupt");
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "{ invalid json }}}");

        // The next save starts a fresh file and leaves the backup alone
        store.add("Walk", 15, 60).unwrap();
        assert_eq!(load_workouts(&path).unwrap().len(), 1);
        assert!(backup.exists());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);

        let mut store = WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();
        store.add("Run", 10, 90).unwrap();
        store.add("Run", 10, 90).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != DATA_FILE_NAME)
            .collect();
        assert!(extras.is_empty(), "unexpected files: {:?}", extras);
    }

    #[test]
    fn test_failed_save_rolls_back_add() {
        let temp_dir = tempfile::tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let path = blocker.join(DATA_FILE_NAME);

        let mut store = WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();
        assert!(store.add("Run", 10, 90).is_err());
        assert!(store.workouts().is_empty());
        assert_eq!(store.total_calories(), 0);
    }

    #[test]
    fn test_daily_goal_change_applies_to_progress() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);

        let mut store = WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();
        store.add("Run", 30, 400).unwrap();
        assert!(!store.daily_progress().achieved());

        store.set_daily_goal(350);
        let progress = store.daily_progress();
        assert_eq!(progress.goal, 350);
        assert_eq!(progress.remaining, -50);
        assert!(progress.achieved());
    }

    #[test]
    fn test_negative_values_in_file_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);
        std::fs::write(
            &path,
            r#"[
    {"workout_type": "Running", "duration": 30, "calories": 300, "date": "2024-05-30 07:00:00"},
    {"workout_type": "Oops", "duration": -5, "calories": -20, "date": "2024-05-30 08:00:00"}
]"#,
        )
        .unwrap();

        let store = WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();
        assert_eq!(store.workouts().len(), 2);
        assert!(store.warnings().is_empty());
        assert_eq!(store.workouts()[1].duration(), -5);
        assert_eq!(store.total_calories(), 280);
        assert!(!temp_dir.path().join("fitness_data.json.corrupt").exists());
    }

    #[test]
    fn test_unknown_field_is_corruption() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);
        std::fs::write(
            &path,
            r#"[{"workout_type": "Run", "duration": 10, "calories": 90, "date": "2024-05-30 07:00:00", "notes": "easy"}]"#,
        )
        .unwrap();

        let err = load_workouts(&path).unwrap_err();
        assert!(matches!(err, Error::DataCorruption { .. }));
    }

    #[test]
    fn test_repeated_corruption_keeps_every_backup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);

        std::fs::write(&path, "first broken history").unwrap();
        WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();

        std::fs::write(&path, "second broken history").unwrap();
        let store = WorkoutStore::open(&path, clock_at("2024-06-01 09:05:00")).unwrap();

        let first = temp_dir.path().join("fitness_data.json.corrupt");
        let second = temp_dir.path().join("fitness_data.json.corrupt.1");
        assert_eq!(std::fs::read_to_string(&first).unwrap(), "first broken history");
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "second broken history");
        assert!(store.warnings()[0].contains("fitness_data.json.corrupt.1"));
    }

    #[test]
    fn test_unmovable_corrupt_file_is_left_alone() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);

        let mut store = WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap();
        std::fs::write(&path, "{ broken").unwrap();
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only directory");
        store.recover_from_corruption("expected value", Err(denied.into()));

        assert!(store.workouts().is_empty());
        assert_eq!(store.warnings().len(), 1);
        assert!(store.warnings()[0].contains("left in place"));

        let err = store.add("Run", 10, 90).unwrap_err();
        assert!(matches!(err, Error::DataCorruption { .. }));
        assert!(store.workouts().is_empty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ broken");
    }

    #[test]
    fn test_corruption_recovery_is_logged() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(DATA_FILE_NAME);
        std::fs::write(&path, "not json").unwrap();

        let (store, logs) = crate::logging::capture_logs(|| {
            WorkoutStore::open(&path, clock_at("2024-06-01 09:00:00")).unwrap()
        });

        assert!(store.workouts().is_empty());
        assert!(logs.contains("WARN"));
        assert!(logs.contains("is corrupted"));
        assert!(logs.contains("Moved corrupted workout data"));
    }
}
