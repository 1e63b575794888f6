use clap::{Parser, Subcommand};
use fitlog_core::{validate, Config, Result};
use std::io::{self, Write};
use std::path::PathBuf;

mod app;
mod menu;

use app::App;

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Personal fitness tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive menu (default)
    Menu,

    /// Log a workout
    Add {
        /// Activity, e.g. Running
        #[arg(long = "type", value_parser = validate::workout_type)]
        workout_type: String,

        /// Duration in minutes
        #[arg(long, value_parser = validate::minutes)]
        duration: u32,

        /// Calories burned
        #[arg(long, value_parser = validate::calories)]
        calories: u32,
    },

    /// List all logged workouts
    History,

    /// Show total calories burned
    Total,

    /// Chart calories burned over time
    Plot,

    /// Show totals per workout type
    Summary,

    /// Calculate BMI
    Bmi {
        /// Weight in kilograms
        #[arg(long, value_parser = validate::weight_kg)]
        weight: f64,

        /// Height in centimetres
        #[arg(long, value_parser = validate::height_cm)]
        height: f64,
    },

    /// Check today's calories against the daily goal
    Goal,

    /// Set the daily calorie goal
    SetGoal {
        #[arg(value_parser = validate::daily_goal)]
        goal: u32,
    },

    /// Export the workout history as CSV
    Export {
        /// Destination file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        fitlog_core::logging::init_with_level("debug");
    } else {
        fitlog_core::logging::init();
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    let mut app = App::open(&config)?;
    for warning in app.store().warnings() {
        eprintln!("Warning: {}", warning);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        None | Some(Commands::Menu) => {
            let stdin = io::stdin();
            menu::run(&mut app, &mut stdin.lock(), &mut out)?;
        }
        Some(Commands::Add {
            workout_type,
            duration,
            calories,
        }) => app.add_workout(&mut out, &workout_type, duration, calories)?,
        Some(Commands::History) => app.view_history(&mut out)?,
        Some(Commands::Total) => app.total_calories(&mut out)?,
        Some(Commands::Plot) => app.plot_progress(&mut out)?,
        Some(Commands::Summary) => app.summary(&mut out)?,
        Some(Commands::Bmi { weight, height }) => app.bmi(&mut out, weight, height)?,
        Some(Commands::Goal) => app.check_daily_goal(&mut out)?,
        Some(Commands::SetGoal { goal }) => app.set_daily_goal(&mut out, goal)?,
        Some(Commands::Export { path }) => app.export(&mut out, &path)?,
    }

    out.flush()?;
    Ok(())
}
