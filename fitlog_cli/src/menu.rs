//! Interactive numbered menu.
//!
//! The loop never exits on bad input: numeric prompts re-ask until they get
//! a valid value, a blank answer cancels back to the menu, and errors from
//! an operation are reported before the menu is shown again. End of input
//! ends the loop.

use crate::app::App;
use fitlog_core::{validate, Result};
use std::io::{BufRead, Write};

const MENU: &str = "\
===== Personal Fitness Tracker =====
1. Add Workout
2. View Workout History
3. Total Calories Burned
4. Plot Progress
5. BMI Calculator
6. Check Daily Calorie Goal
7. Set Daily Calorie Goal
8. Exit";

/// What the loop does after an operation
enum Flow {
    Continue,
    Quit,
}

/// Outcome of a single prompt
enum Answer<T> {
    Value(T),
    Cancelled,
    EndOfInput,
}

/// Unwrap a prompt answer, leaving the operation early on cancel or EOF
macro_rules! answer {
    ($prompt:expr) => {
        match $prompt? {
            Answer::Value(v) => v,
            Answer::Cancelled => return Ok(Flow::Continue),
            Answer::EndOfInput => return Ok(Flow::Quit),
        }
    };
}

pub fn run<R: BufRead, W: Write>(app: &mut App, input: &mut R, out: &mut W) -> Result<()> {
    loop {
        writeln!(out, "\n{}", MENU)?;
        write!(out, "Enter your choice (1-8): ")?;
        out.flush()?;

        let Some(choice) = read_line(input)? else {
            writeln!(out)?;
            tracing::debug!("End of input at menu");
            return Ok(());
        };

        let result = match choice.trim() {
            "1" => add_workout(app, input, out),
            "2" => app.view_history(out).map(|_| Flow::Continue),
            "3" => app.total_calories(out).map(|_| Flow::Continue),
            "4" => app.plot_progress(out).map(|_| Flow::Continue),
            "5" => bmi(app, input, out),
            "6" => app.check_daily_goal(out).map(|_| Flow::Continue),
            "7" => set_goal(app, input, out),
            "8" => {
                writeln!(
                    out,
                    "\nThank you for using the Fitness Tracker. Stay healthy!"
                )?;
                return Ok(());
            }
            other => {
                tracing::debug!("Invalid menu choice {:?}", other);
                writeln!(out, "\nInvalid choice. Please try again.\n")?;
                Ok(Flow::Continue)
            }
        };

        match result {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => {
                writeln!(out)?;
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("Menu operation failed: {}", e);
                writeln!(out, "\nError: {}\n", e)?;
            }
        }
    }
}

fn add_workout<R: BufRead, W: Write>(app: &mut App, input: &mut R, out: &mut W) -> Result<Flow> {
    let workout_type = answer!(prompt(
        input,
        out,
        "Enter workout type (e.g., Running, Cycling, Yoga): ",
        validate::workout_type
    ));
    let duration = answer!(prompt(
        input,
        out,
        "Enter duration (in minutes): ",
        validate::minutes
    ));
    let calories = answer!(prompt(
        input,
        out,
        "Enter calories burned: ",
        validate::calories
    ));

    app.add_workout(out, &workout_type, duration, calories)?;
    Ok(Flow::Continue)
}

fn bmi<R: BufRead, W: Write>(app: &mut App, input: &mut R, out: &mut W) -> Result<Flow> {
    let weight = answer!(prompt(
        input,
        out,
        "Enter your weight (in kg): ",
        validate::weight_kg
    ));
    let height = answer!(prompt(
        input,
        out,
        "Enter your height (in cm): ",
        validate::height_cm
    ));

    app.bmi(out, weight, height)?;
    Ok(Flow::Continue)
}

fn set_goal<R: BufRead, W: Write>(app: &mut App, input: &mut R, out: &mut W) -> Result<Flow> {
    let goal = answer!(prompt(
        input,
        out,
        "Set your new daily calorie goal: ",
        validate::daily_goal
    ));

    app.set_daily_goal(out, goal)?;
    Ok(Flow::Continue)
}

/// Ask until `parse` accepts the answer
fn prompt<T, R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    question: &str,
    parse: fn(&str) -> Result<T>,
) -> Result<Answer<T>> {
    loop {
        write!(out, "{}", question)?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(Answer::EndOfInput);
        };

        if line.trim().is_empty() {
            writeln!(out, "Cancelled.")?;
            return Ok(Answer::Cancelled);
        }

        match parse(&line) {
            Ok(value) => return Ok(Answer::Value(value)),
            Err(e) => writeln!(out, "{}. Try again, or leave blank to cancel.", e)?,
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
