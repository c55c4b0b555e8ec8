//! Workout creation and listing.

use anyhow::Result;
use chrono::NaiveDate;

use crate::db::models::Workout;
use crate::db::operations::{
    add_performance, add_workout, get_or_create_exercise, last_workout, list_workouts,
    workout_performances,
};
use crate::service::summary::WorkoutSummary;
use crate::service::Tracker;

/// One exercise of a planned workout together with its sets.
#[derive(Debug, Clone)]
pub struct ExercisePlan {
    pub name: String,
    pub category: String,
    pub notes: Option<String>,
    pub sets: Vec<PlannedSet>,
}

#[derive(Debug, Clone)]
pub struct PlannedSet {
    pub reps: i32,
    pub weight: f32,
    pub rpe: Option<f32>,
}

impl Tracker {
    /// Record a full workout: the session itself, every planned exercise
    /// (created on first use) and every planned set.
    pub fn create_workout(&self, date: NaiveDate, plan: &[ExercisePlan]) -> Result<Workout> {
        let mut conn = self.db().conn();
        let workout = add_workout(&mut conn, date)?;

        for entry in plan {
            let exercise = get_or_create_exercise(
                &mut conn,
                &entry.name,
                &entry.category,
                entry.notes.as_deref(),
            )?;

            for set in &entry.sets {
                add_performance(&mut conn, workout.id, exercise.id, set.reps, set.weight, set.rpe)?;
            }
        }

        Ok(workout)
    }

    /// All workouts, most recent first.
    pub fn list_workouts(&self) -> Result<Vec<Workout>> {
        let mut conn = self.db().conn();
        Ok(list_workouts(&mut conn)?)
    }

    /// The most recent workout with its sets grouped per exercise, or `None`
    /// when nothing has been recorded yet.
    pub fn last_workout_summary(&self) -> Result<Option<WorkoutSummary>> {
        let mut conn = self.db().conn();
        let Some(workout) = last_workout(&mut conn)? else {
            return Ok(None);
        };

        let rows = workout_performances(&mut conn, workout.id)?;
        Ok(Some(WorkoutSummary::from_rows(&workout, rows)))
    }
}
