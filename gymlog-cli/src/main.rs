use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::env;

use gymlog::service::Tracker;

#[derive(Parser, Debug)]
#[command(version, about = "Gymlog - Workout Tracker CLI", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record a new workout session
    AddWorkout {
        /// Date of the workout (YYYY-MM-DD), today when omitted
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Register a new exercise
    AddExercise {
        name: String,
        #[arg(short, long)]
        category: String,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Log one set against an existing workout
    LogSet {
        workout_id: i32,
        exercise: String,
        reps: i32,
        weight: f32,
        #[arg(long)]
        rpe: Option<f32>,
    },
    /// List all workouts from the database
    ListWorkouts {
        #[arg(short, long)]
        verbose: bool,
    },
    /// List exercises, optionally restricted to one category
    ListExercises {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show every logged set for an exercise, oldest first
    History {
        name: String,
        #[arg(long)]
        json: bool,
    },
    /// Show the best lift and estimated one-rep max for an exercise
    Best { name: String },
    /// Show the most recent workout with its sets
    Last {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();
    let args = Args::parse();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "gymlog.db".to_string());
    let tracker = Tracker::open(&database_url)?;

    match args.command {
        Commands::AddWorkout { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let workout = tracker.create_workout(date, &[])?;
            println!("Created workout #{} on {}", workout.id, workout.date);
            Ok(())
        }
        Commands::AddExercise {
            name,
            category,
            notes,
        } => {
            let exercise = tracker.add_exercise(&name, &category, notes.as_deref())?;
            println!("Added exercise #{}: {}", exercise.id, exercise);
            Ok(())
        }
        Commands::LogSet {
            workout_id,
            exercise,
            reps,
            weight,
            rpe,
        } => {
            let logged = tracker.log_performance(workout_id, &exercise, reps, weight, rpe)?;
            println!("Logged set #{} for workout #{}", logged.id, workout_id);
            Ok(())
        }
        Commands::ListWorkouts { verbose } => {
            for workout in tracker.list_workouts()? {
                println!("{}", workout);
                if verbose {
                    for set in tracker.workout_performances(workout.id)? {
                        println!("\t{}", set);
                    }
                }
            }
            Ok(())
        }
        Commands::ListExercises { category, json } => {
            let exercises = tracker.list_exercises(category.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&exercises)?);
                return Ok(());
            }
            for exercise in exercises {
                println!("{}", exercise);
                if let Some(notes) = &exercise.notes {
                    println!("\t{}", notes);
                }
            }
            Ok(())
        }
        Commands::History { name, json } => {
            let history = tracker.exercise_history(&name)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
                return Ok(());
            }
            if history.is_empty() {
                println!("No sets recorded for {}", name);
                return Ok(());
            }
            for entry in history {
                println!("{}", entry);
            }
            Ok(())
        }
        Commands::Best { name } => {
            match tracker.best_lift(&name)? {
                Some(best) => println!("Best lift: {}", best),
                None => println!("No sets recorded for {}", name),
            }
            if let Some(one_rm) = tracker.best_one_rep_max(&name)? {
                println!("Estimated 1RM: {:.1}kg", one_rm);
            }
            Ok(())
        }
        Commands::Last { json } => {
            match tracker.last_workout_summary()? {
                Some(summary) if json => println!("{}", serde_json::to_string_pretty(&summary)?),
                Some(summary) => println!("{}", summary),
                None => println!("No workouts recorded yet"),
            }
            Ok(())
        }
    }
}
