//! Operations shared by the interactive menu and the subcommands.
//!
//! Each operation does its work against the store and renders the result
//! to the given writer.

use fitlog_core::chart::{self, calorie_series};
use fitlog_core::stats;
use fitlog_core::*;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct App {
    store: WorkoutStore,
    settings_path: PathBuf,
    chart_width: usize,
}

impl App {
    pub fn open(config: &Config) -> Result<Self> {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: &Config, clock: Box<dyn Clock>) -> Result<Self> {
        let mut store = WorkoutStore::open(config.data_file(), clock)?;
        let settings_path = config.settings_file();

        let goal = match UserSettings::load(&settings_path)? {
            Some(settings) => settings.daily_goal,
            None => config.goals.default_daily_goal,
        };
        if goal != store.daily_goal() {
            store.set_daily_goal(goal);
        }

        Ok(Self {
            store,
            settings_path,
            chart_width: config.chart.width,
        })
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn add_workout(
        &mut self,
        out: &mut dyn Write,
        workout_type: &str,
        duration: u32,
        calories: u32,
    ) -> Result<()> {
        self.store.add(workout_type, i64::from(duration), i64::from(calories))?;
        writeln!(out, "\n✓ Workout added successfully!\n")?;
        Ok(())
    }

    pub fn view_history(&self, out: &mut dyn Write) -> Result<()> {
        let workouts = self.store.workouts();
        if workouts.is_empty() {
            writeln!(out, "\nNo workouts logged yet.\n")?;
            return Ok(());
        }

        writeln!(out, "\nWorkout History:")?;
        for workout in workouts {
            writeln!(out, "{}", workout)?;
        }
        writeln!(out)?;
        Ok(())
    }

    pub fn total_calories(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(
            out,
            "\nTotal Calories Burned: {} cal\n",
            self.store.total_calories()
        )?;
        Ok(())
    }

    pub fn plot_progress(&self, out: &mut dyn Write) -> Result<()> {
        let series = calorie_series(self.store.workouts());
        if series.is_empty() {
            writeln!(out, "\nNo data to plot.\n")?;
            return Ok(());
        }

        writeln!(out)?;
        write!(out, "{}", chart::render_text(&series, self.chart_width))?;
        writeln!(out)?;
        Ok(())
    }

    pub fn bmi(&self, out: &mut dyn Write, weight_kg: f64, height_cm: f64) -> Result<()> {
        let reading = stats::bmi(weight_kg, height_cm)?;
        writeln!(out, "\nYour BMI is: {:.2}", reading.value)?;
        writeln!(out, "Status: {}\n", reading.category)?;
        Ok(())
    }

    pub fn check_daily_goal(&self, out: &mut dyn Write) -> Result<()> {
        let progress = self.store.daily_progress();
        writeln!(
            out,
            "\nToday's Calories Burned: {} cal (goal: {} cal)",
            progress.calories_today, progress.goal
        )?;

        if progress.achieved() {
            writeln!(
                out,
                "✓ Congrats! You achieved your daily goal! ({} cal over)\n",
                -progress.remaining
            )?;
        } else {
            writeln!(
                out,
                "✗ You are {} cal away from your goal.\n",
                progress.remaining
            )?;
        }
        Ok(())
    }

    /// Change the daily goal and persist it for future runs
    pub fn set_daily_goal(&mut self, out: &mut dyn Write, goal: u32) -> Result<()> {
        UserSettings { daily_goal: goal }.save(&self.settings_path)?;
        self.store.set_daily_goal(goal);
        writeln!(out, "\n✓ Daily calorie goal set to {} cal.\n", goal)?;
        Ok(())
    }

    pub fn summary(&self, out: &mut dyn Write) -> Result<()> {
        let rows = stats::summary(self.store.workouts());
        if rows.is_empty() {
            writeln!(out, "\nNo workouts logged yet.\n")?;
            return Ok(());
        }

        let name_width = rows
            .iter()
            .map(|r| r.workout_type.chars().count())
            .max()
            .unwrap_or(0)
            .max("Workout".len());

        writeln!(out)?;
        writeln!(
            out,
            "{:<nw$}  {:>8}  {:>8}  {:>9}",
            "Workout",
            "Sessions",
            "Minutes",
            "Calories",
            nw = name_width
        )?;
        for row in &rows {
            writeln!(
                out,
                "{:<nw$}  {:>8}  {:>8}  {:>9}",
                row.workout_type,
                row.sessions,
                row.minutes,
                row.calories,
                nw = name_width
            )?;
        }
        writeln!(out)?;
        Ok(())
    }

    pub fn export(&self, out: &mut dyn Write, path: &Path) -> Result<()> {
        let count = export_csv(self.store.workouts(), path)?;
        writeln!(out, "✓ Exported {} workouts to {}", count, path.display())?;
        Ok(())
    }
}
