use thiserror::Error;

/// Failures surfaced by the persistence layer.
///
/// Validation variants are raised before any statement reaches SQLite;
/// everything else wraps an engine-level failure for the operation that
/// triggered it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("exercise name must not be empty")]
    EmptyExerciseName,

    #[error("reps must be greater than zero (got {0})")]
    InvalidReps(i32),

    #[error("weight must be greater than zero (got {0})")]
    InvalidWeight(f32),

    #[error("rpe must be between 1 and 10 (got {0})")]
    RpeOutOfRange(f32),

    #[error("workout id {workout_id} and exercise id {exercise_id} must both be positive")]
    InvalidReference { workout_id: i32, exercise_id: i32 },

    #[error("an exercise named \"{0}\" already exists")]
    DuplicateExerciseName(String),

    #[error("no workout with id {workout_id} or no exercise with id {exercise_id}")]
    MissingReference { workout_id: i32, exercise_id: i32 },

    #[error("failed to open database: {0}")]
    Connection(#[from] diesel::result::ConnectionError),

    #[error("database migration failed: {0}")]
    Migration(String),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
}

impl StoreError {
    /// True when the caller's input was rejected before touching storage.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StoreError::EmptyExerciseName
                | StoreError::InvalidReps(_)
                | StoreError::InvalidWeight(_)
                | StoreError::RpeOutOfRange(_)
                | StoreError::InvalidReference { .. }
        )
    }
}
