//! SQLite-backed persistence for workouts, exercises and performances.

pub mod error;
pub mod models;
pub mod operations;
pub mod schema;

pub use error::StoreError;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{debug, info};
use std::sync::{Mutex, MutexGuard};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Handle to the single database connection.
///
/// Opened once at startup and released when dropped. Callers within the same
/// process are serialized through the mutex, so each operation runs against
/// the connection alone.
pub struct Db {
    conn: Mutex<SqliteConnection>,
}

impl Db {
    /// Open (creating if absent) the database at `database_url` and bring its
    /// schema up to date.
    pub fn open(database_url: &str) -> Result<Self, StoreError> {
        let mut conn = SqliteConnection::establish(database_url)?;
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")?;
        run_migrations(&mut conn)?;
        debug!("opened database at {database_url}");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open(":memory:")
    }

    /// Lock the connection for the duration of one or more operations.
    pub fn conn(&self) -> MutexGuard<'_, SqliteConnection> {
        // A panic in another caller poisons the mutex but leaves the
        // connection usable.
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn run_migrations(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Migration(e.to_string()))?;

    for version in &applied {
        info!("applied migration {version}");
    }

    Ok(())
}
