//! Set logging and performance queries.

use anyhow::Result;

use crate::db::models::{HistoryEntry, Performance, WorkoutSetRow};
use crate::db::operations::{
    add_performance, exercise_history, find_exercise, workout_performances,
};
use crate::service::Tracker;

impl Tracker {
    /// Log one set against a workout, resolving the exercise by name. The
    /// exercise must already exist; logging never creates one implicitly.
    pub fn log_performance(
        &self,
        workout_id: i32,
        exercise_name: &str,
        reps: i32,
        weight: f32,
        rpe: Option<f32>,
    ) -> Result<Performance> {
        let mut conn = self.db().conn();
        let exercise = find_exercise(&mut conn, exercise_name)?
            .ok_or_else(|| anyhow::anyhow!("no exercise named \"{exercise_name}\""))?;

        Ok(add_performance(
            &mut conn,
            workout_id,
            exercise.id,
            reps,
            weight,
            rpe,
        )?)
    }

    /// Every logged set for the named exercise, oldest first.
    pub fn exercise_history(&self, name: &str) -> Result<Vec<HistoryEntry>> {
        let mut conn = self.db().conn();
        Ok(exercise_history(&mut conn, name)?)
    }

    /// All sets of one workout with their exercise names.
    pub fn workout_performances(&self, workout_id: i32) -> Result<Vec<WorkoutSetRow>> {
        let mut conn = self.db().conn();
        Ok(workout_performances(&mut conn, workout_id)?)
    }
}
