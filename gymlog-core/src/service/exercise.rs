//! Exercise management and analytical queries.

use anyhow::Result;

use crate::db::models::{BestLift, Exercise};
use crate::db::operations::{
    add_exercise, best_lift, best_one_rep_max, exercise_category, list_exercises,
};
use crate::service::Tracker;

impl Tracker {
    /// Register a new exercise under a unique name.
    pub fn add_exercise(
        &self,
        name: &str,
        category: &str,
        notes: Option<&str>,
    ) -> Result<Exercise> {
        let mut conn = self.db().conn();
        Ok(add_exercise(&mut conn, name, category, notes)?)
    }

    /// All exercises ordered by name, optionally restricted to one category.
    pub fn list_exercises(&self, category: Option<&str>) -> Result<Vec<Exercise>> {
        let mut conn = self.db().conn();
        Ok(list_exercises(&mut conn, category)?)
    }

    pub fn exercise_category(&self, name: &str) -> Result<Option<String>> {
        let mut conn = self.db().conn();
        Ok(exercise_category(&mut conn, name)?)
    }

    /// The heaviest recorded set for the named exercise.
    pub fn best_lift(&self, name: &str) -> Result<Option<BestLift>> {
        let mut conn = self.db().conn();
        Ok(best_lift(&mut conn, name)?)
    }

    /// Best estimated one-rep max across the named exercise's history.
    pub fn best_one_rep_max(&self, name: &str) -> Result<Option<f32>> {
        let mut conn = self.db().conn();
        Ok(best_one_rep_max(&mut conn, name)?)
    }
}
