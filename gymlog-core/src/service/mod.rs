//! Domain-level operations layered over the persistence module.
//!
//! `Tracker` owns the database handle and translates name-based requests
//! into the store's id-based primitives.

mod exercise;
mod performance;
mod summary;
mod workout;

pub use summary::{ExerciseSets, SetSummary, WorkoutSummary};
pub use workout::{ExercisePlan, PlannedSet};

use anyhow::Result;

use crate::db::Db;

pub struct Tracker {
    db: Db,
}

impl Tracker {
    /// Open the database at `database_url` and wrap it in a tracker.
    pub fn open(database_url: &str) -> Result<Self> {
        Ok(Self {
            db: Db::open(database_url)?,
        })
    }

    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }
}
