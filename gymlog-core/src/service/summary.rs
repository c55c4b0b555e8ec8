//! Per-workout summaries assembled from stored rows.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::db::models::{Workout, WorkoutSetRow};

/// A workout with its sets grouped per exercise, in the order the exercises
/// first appeared.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutSummary {
    pub id: i32,
    pub date: NaiveDate,
    pub exercises: Vec<ExerciseSets>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseSets {
    pub exercise_id: i32,
    pub name: String,
    pub sets: Vec<SetSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetSummary {
    pub reps: i32,
    pub weight: f32,
    pub rpe: Option<f32>,
}

impl WorkoutSummary {
    /// Group rows by exercise id, keeping the order exercises first appear.
    pub(crate) fn from_rows(workout: &Workout, rows: Vec<WorkoutSetRow>) -> Self {
        let mut exercises: Vec<ExerciseSets> = Vec::new();

        for row in rows {
            let set = SetSummary {
                reps: row.reps,
                weight: row.weight,
                rpe: row.rpe,
            };

            match exercises
                .iter_mut()
                .find(|group| group.exercise_id == row.exercise_id)
            {
                Some(group) => group.sets.push(set),
                None => exercises.push(ExerciseSets {
                    exercise_id: row.exercise_id,
                    name: row.exercise,
                    sets: vec![set],
                }),
            }
        }

        Self {
            id: workout.id,
            date: workout.date,
            exercises,
        }
    }

    /// Total load moved across every set of the workout.
    pub fn total_volume(&self) -> f32 {
        self.exercises
            .iter()
            .flat_map(|group| group.sets.iter())
            .map(|set| set.reps as f32 * set.weight)
            .sum()
    }
}

impl fmt::Display for WorkoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Workout on {}", self.date)?;
        for group in &self.exercises {
            writeln!(f, "- {}:", group.name)?;
            for set in &group.sets {
                let rpe_str = set.rpe.map(|r| format!(" @{:.1}", r)).unwrap_or_default();
                writeln!(f, "   {:.1}kg x {} reps{}", set.weight, set.reps, rpe_str)?;
            }
        }
        write!(f, "Total volume: {:.1} kg", self.total_volume())
    }
}
