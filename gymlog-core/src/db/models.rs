use chrono::NaiveDate;
use diesel::{Insertable, Queryable};
use serde::Serialize;
use std::fmt;

use crate::db::schema;

// Workout models
#[derive(Queryable, Debug, Clone, Serialize)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Workout {
    pub id: i32,
    pub date: NaiveDate,
}

#[derive(Insertable)]
#[diesel(table_name = schema::workouts)]
pub struct NewWorkout {
    pub date: NaiveDate,
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Workout #{} on {}", self.id, self.date)
    }
}

// Exercise models
#[derive(Queryable, Debug, Clone, Serialize)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Exercise {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub notes: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = schema::exercises)]
pub struct NewExercise {
    pub name: String,
    pub category: String,
    pub notes: Option<String>,
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.category)
    }
}

// Performance models
#[derive(Queryable, Debug, Clone, Serialize)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Performance {
    pub id: i32,
    pub workout_id: i32,
    pub exercise_id: i32,
    pub reps: i32,
    pub weight: f32,
    pub rpe: Option<f32>,
}

#[derive(Insertable)]
#[diesel(table_name = schema::performances)]
pub struct NewPerformance {
    pub workout_id: i32,
    pub exercise_id: i32,
    pub reps: i32,
    pub weight: f32,
    pub rpe: Option<f32>,
}

impl Performance {
    /// Total load moved in this set.
    pub fn volume(&self) -> f32 {
        self.reps as f32 * self.weight
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rpe_str = self.rpe.map(|r| format!(" @{:.1}", r)).unwrap_or_default();

        write!(
            f,
            "Exercise #{}: {:.1}kg x {} reps{}",
            self.exercise_id, self.weight, self.reps, rpe_str
        )
    }
}

/// One performance of an exercise joined with the date of its workout.
#[derive(Queryable, Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: i32,
    pub date: NaiveDate,
    pub exercise: String,
    pub reps: i32,
    pub weight: f32,
    pub rpe: Option<f32>,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rpe_str = self.rpe.map(|r| format!(" @{:.1}", r)).unwrap_or_default();

        write!(
            f,
            "{}: {:.1}kg x {} reps{}",
            self.date, self.weight, self.reps, rpe_str
        )
    }
}

/// The heaviest set recorded for an exercise, ties broken by rep count.
#[derive(Queryable, Debug, Clone, Serialize)]
pub struct BestLift {
    pub weight: f32,
    pub reps: i32,
    pub rpe: Option<f32>,
    pub date: NaiveDate,
}

impl fmt::Display for BestLift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rpe_str = self.rpe.map(|r| format!(" @{:.1}", r)).unwrap_or_default();

        write!(
            f,
            "{:.1}kg x {} reps{} on {}",
            self.weight, self.reps, rpe_str, self.date
        )
    }
}

/// One set of a workout joined with the name of its exercise.
#[derive(Queryable, Debug, Clone, Serialize)]
pub struct WorkoutSetRow {
    pub id: i32,
    pub exercise_id: i32,
    pub exercise: String,
    pub reps: i32,
    pub weight: f32,
    pub rpe: Option<f32>,
}

impl fmt::Display for WorkoutSetRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rpe_str = self.rpe.map(|r| format!(" @{:.1}", r)).unwrap_or_default();

        write!(
            f,
            "{}: {:.1}kg x {} reps{}",
            self.exercise, self.weight, self.reps, rpe_str
        )
    }
}

/// Estimated one-rep max for a set, via the Epley formula.
pub fn epley_1rm(weight: f32, reps: i32) -> f32 {
    weight * (1.0 + reps as f32 / 30.0)
}
