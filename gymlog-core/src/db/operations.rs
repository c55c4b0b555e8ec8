use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use log::warn;

use crate::db::error::StoreError;
use crate::db::models::{
    BestLift, Exercise, HistoryEntry, NewExercise, NewPerformance, NewWorkout, Performance,
    Workout, WorkoutSetRow, epley_1rm,
};
use crate::db::schema::{exercises, performances, workouts};

// Workouts

pub fn add_workout(conn: &mut SqliteConnection, date: NaiveDate) -> Result<Workout, StoreError> {
    diesel::insert_into(workouts::table)
        .values(&NewWorkout { date })
        .get_result::<Workout>(conn)
        .map_err(|e| {
            warn!("failed to add workout on {date}: {e}");
            e.into()
        })
}

/// All workouts, most recent first.
pub fn list_workouts(conn: &mut SqliteConnection) -> Result<Vec<Workout>, StoreError> {
    workouts::table
        .order(workouts::date.desc())
        .load::<Workout>(conn)
        .map_err(Into::into)
}

/// The most recent workout by date, if any exists.
pub fn last_workout(conn: &mut SqliteConnection) -> Result<Option<Workout>, StoreError> {
    workouts::table
        .order(workouts::date.desc())
        .first::<Workout>(conn)
        .optional()
        .map_err(Into::into)
}

// Exercises

/// Register a new exercise under a unique name. Empty notes are stored as
/// absent.
pub fn add_exercise(
    conn: &mut SqliteConnection,
    name: &str,
    category: &str,
    notes: Option<&str>,
) -> Result<Exercise, StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::EmptyExerciseName);
    }

    let notes = notes.map(str::trim).filter(|n| !n.is_empty());

    diesel::insert_into(exercises::table)
        .values(&NewExercise {
            name: name.to_string(),
            category: category.to_string(),
            notes: notes.map(str::to_string),
        })
        .get_result::<Exercise>(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::DuplicateExerciseName(name.to_string())
            }
            other => {
                warn!("failed to add exercise \"{name}\": {other}");
                other.into()
            }
        })
}

pub fn find_exercise(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<Exercise>, StoreError> {
    exercises::table
        .filter(exercises::name.eq(name))
        .first::<Exercise>(conn)
        .optional()
        .map_err(Into::into)
}

/// Look an exercise up by exact name, inserting it on a miss.
pub fn get_or_create_exercise(
    conn: &mut SqliteConnection,
    name: &str,
    category: &str,
    notes: Option<&str>,
) -> Result<Exercise, StoreError> {
    if let Some(exercise) = find_exercise(conn, name)? {
        return Ok(exercise);
    }

    add_exercise(conn, name, category, notes)
}

/// All exercises ordered by name, optionally restricted to one category.
pub fn list_exercises(
    conn: &mut SqliteConnection,
    category: Option<&str>,
) -> Result<Vec<Exercise>, StoreError> {
    let mut query = exercises::table.into_boxed();

    if let Some(category) = category {
        query = query.filter(exercises::category.eq(category));
    }

    query
        .order(exercises::name.asc())
        .load::<Exercise>(conn)
        .map_err(Into::into)
}

pub fn exercise_category(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<String>, StoreError> {
    exercises::table
        .filter(exercises::name.eq(name))
        .select(exercises::category)
        .first::<String>(conn)
        .optional()
        .map_err(Into::into)
}

// Performances

/// Record one logged set against an existing workout and exercise.
pub fn add_performance(
    conn: &mut SqliteConnection,
    workout_id: i32,
    exercise_id: i32,
    reps: i32,
    weight: f32,
    rpe: Option<f32>,
) -> Result<Performance, StoreError> {
    if reps <= 0 {
        return Err(StoreError::InvalidReps(reps));
    }
    if weight <= 0.0 {
        return Err(StoreError::InvalidWeight(weight));
    }
    if workout_id <= 0 || exercise_id <= 0 {
        return Err(StoreError::InvalidReference {
            workout_id,
            exercise_id,
        });
    }
    if let Some(rpe) = rpe {
        if !(1.0..=10.0).contains(&rpe) {
            return Err(StoreError::RpeOutOfRange(rpe));
        }
    }

    diesel::insert_into(performances::table)
        .values(&NewPerformance {
            workout_id,
            exercise_id,
            reps,
            weight,
            rpe,
        })
        .get_result::<Performance>(conn)
        .map_err(|e| match e {
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                StoreError::MissingReference {
                    workout_id,
                    exercise_id,
                }
            }
            other => {
                warn!("failed to add performance for workout {workout_id}: {other}");
                other.into()
            }
        })
}

/// Every logged set for the named exercise, oldest workout first.
pub fn exercise_history(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Vec<HistoryEntry>, StoreError> {
    performances::table
        .inner_join(workouts::table)
        .inner_join(exercises::table)
        .filter(exercises::name.eq(name))
        .order(workouts::date.asc())
        .select((
            performances::id,
            workouts::date,
            exercises::name,
            performances::reps,
            performances::weight,
            performances::rpe,
        ))
        .load::<HistoryEntry>(conn)
        .map_err(Into::into)
}

/// All sets of one workout with their exercise names, in insertion order.
pub fn workout_performances(
    conn: &mut SqliteConnection,
    workout_id: i32,
) -> Result<Vec<WorkoutSetRow>, StoreError> {
    performances::table
        .inner_join(exercises::table)
        .filter(performances::workout_id.eq(workout_id))
        .order(performances::id.asc())
        .select((
            performances::id,
            performances::exercise_id,
            exercises::name,
            performances::reps,
            performances::weight,
            performances::rpe,
        ))
        .load::<WorkoutSetRow>(conn)
        .map_err(Into::into)
}

/// The heaviest set for the named exercise; equal weights are broken by the
/// higher rep count.
pub fn best_lift(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<BestLift>, StoreError> {
    performances::table
        .inner_join(workouts::table)
        .inner_join(exercises::table)
        .filter(exercises::name.eq(name))
        .order((performances::weight.desc(), performances::reps.desc()))
        .select((
            performances::weight,
            performances::reps,
            performances::rpe,
            workouts::date,
        ))
        .first::<BestLift>(conn)
        .optional()
        .map_err(Into::into)
}

/// Best estimated one-rep max across every set of the named exercise.
pub fn best_one_rep_max(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Option<f32>, StoreError> {
    let sets: Vec<(f32, i32)> = performances::table
        .inner_join(exercises::table)
        .filter(exercises::name.eq(name))
        .select((performances::weight, performances::reps))
        .load(conn)?;

    Ok(sets
        .into_iter()
        .map(|(weight, reps)| epley_1rm(weight, reps))
        .max_by(f32::total_cmp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn performance_count(conn: &mut SqliteConnection) -> i64 {
        performances::table.count().get_result(conn).unwrap()
    }

    #[test]
    fn add_exercise_roundtrip() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        let added = add_exercise(&mut conn, "Bench Press", "push", Some("pause reps")).unwrap();
        assert!(added.id > 0);

        let listed = list_exercises(&mut conn, None).unwrap();
        let matching: Vec<_> = listed.iter().filter(|e| e.name == "Bench Press").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].category, "push");
        assert_eq!(matching[0].notes.as_deref(), Some("pause reps"));
    }

    #[test]
    fn add_exercise_rejects_empty_name() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        let err = add_exercise(&mut conn, "   ", "push", None).unwrap_err();
        assert!(matches!(err, StoreError::EmptyExerciseName));
        assert!(err.is_validation());
        assert!(list_exercises(&mut conn, None).unwrap().is_empty());
    }

    #[test]
    fn add_exercise_normalizes_empty_notes() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        let added = add_exercise(&mut conn, "Deadlift", "pull", Some("")).unwrap();
        assert_eq!(added.notes, None);
    }

    #[test]
    fn duplicate_exercise_name_is_rejected_without_clobbering() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        add_exercise(&mut conn, "Squat", "legs", Some("high bar")).unwrap();
        let err = add_exercise(&mut conn, "Squat", "other", None).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateExerciseName(ref n) if n == "Squat"));
        assert!(!err.is_validation());

        let listed = list_exercises(&mut conn, None).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category, "legs");
        assert_eq!(listed[0].notes.as_deref(), Some("high bar"));
    }

    #[test]
    fn exercise_names_are_case_sensitive() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        add_exercise(&mut conn, "Row", "pull", None).unwrap();
        add_exercise(&mut conn, "row", "pull", None).unwrap();
        assert_eq!(list_exercises(&mut conn, None).unwrap().len(), 2);
        assert!(find_exercise(&mut conn, "ROW").unwrap().is_none());
    }

    #[test]
    fn list_exercises_orders_by_name_and_filters_by_category() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        add_exercise(&mut conn, "Squat", "legs", None).unwrap();
        add_exercise(&mut conn, "Bench Press", "push", None).unwrap();
        add_exercise(&mut conn, "Leg Press", "legs", None).unwrap();

        let all = list_exercises(&mut conn, None).unwrap();
        let names: Vec<_> = all.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Bench Press", "Leg Press", "Squat"]);

        let legs = list_exercises(&mut conn, Some("legs")).unwrap();
        let names: Vec<_> = legs.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Leg Press", "Squat"]);
    }

    #[test]
    fn exercise_category_lookup() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        add_exercise(&mut conn, "Squat", "legs", None).unwrap();
        assert_eq!(
            exercise_category(&mut conn, "Squat").unwrap().as_deref(),
            Some("legs")
        );
        assert_eq!(exercise_category(&mut conn, "Curl").unwrap(), None);
    }

    #[test]
    fn get_or_create_returns_the_existing_row() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        let first = get_or_create_exercise(&mut conn, "Squat", "legs", None).unwrap();
        let second = get_or_create_exercise(&mut conn, "Squat", "other", None).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.category, "legs");
        assert_eq!(list_exercises(&mut conn, None).unwrap().len(), 1);
    }

    #[test]
    fn add_performance_validates_before_storage() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        let workout = add_workout(&mut conn, date(2024, 1, 1)).unwrap();
        let exercise = add_exercise(&mut conn, "Bench Press", "push", None).unwrap();

        let cases = [
            add_performance(&mut conn, workout.id, exercise.id, 0, 100.0, None),
            add_performance(&mut conn, workout.id, exercise.id, -3, 100.0, None),
            add_performance(&mut conn, workout.id, exercise.id, 5, 0.0, None),
            add_performance(&mut conn, workout.id, exercise.id, 5, -20.0, None),
            add_performance(&mut conn, 0, exercise.id, 5, 100.0, None),
            add_performance(&mut conn, workout.id, -1, 5, 100.0, None),
            add_performance(&mut conn, workout.id, exercise.id, 5, 100.0, Some(0.5)),
            add_performance(&mut conn, workout.id, exercise.id, 5, 100.0, Some(11.0)),
        ];

        for result in cases {
            let err = result.unwrap_err();
            assert!(err.is_validation(), "expected validation error, got {err}");
        }
        assert_eq!(performance_count(&mut conn), 0);
    }

    #[test]
    fn add_performance_requires_existing_parents() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        let workout = add_workout(&mut conn, date(2024, 1, 1)).unwrap();
        let exercise = add_exercise(&mut conn, "Bench Press", "push", None).unwrap();

        let err = add_performance(&mut conn, workout.id + 99, exercise.id, 5, 100.0, None)
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference { .. }));

        let err = add_performance(&mut conn, workout.id, exercise.id + 99, 5, 100.0, None)
            .unwrap_err();
        assert!(matches!(err, StoreError::MissingReference { .. }));

        assert_eq!(performance_count(&mut conn), 0);
    }

    #[test]
    fn add_performance_accepts_rpe_bounds() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        let workout = add_workout(&mut conn, date(2024, 1, 1)).unwrap();
        let exercise = add_exercise(&mut conn, "Bench Press", "push", None).unwrap();

        add_performance(&mut conn, workout.id, exercise.id, 5, 100.0, Some(1.0)).unwrap();
        add_performance(&mut conn, workout.id, exercise.id, 5, 100.0, Some(10.0)).unwrap();
        add_performance(&mut conn, workout.id, exercise.id, 5, 100.0, Some(8.5)).unwrap();
        assert_eq!(performance_count(&mut conn), 3);
    }

    #[test]
    fn workouts_list_most_recent_first() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        add_workout(&mut conn, date(2024, 1, 5)).unwrap();
        add_workout(&mut conn, date(2024, 2, 1)).unwrap();
        add_workout(&mut conn, date(2024, 1, 20)).unwrap();

        let dates: Vec<_> = list_workouts(&mut conn)
            .unwrap()
            .into_iter()
            .map(|w| w.date)
            .collect();
        assert_eq!(dates, [date(2024, 2, 1), date(2024, 1, 20), date(2024, 1, 5)]);

        let last = last_workout(&mut conn).unwrap().unwrap();
        assert_eq!(last.date, date(2024, 2, 1));
    }

    #[test]
    fn empty_store_reads_are_not_errors() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        assert!(list_workouts(&mut conn).unwrap().is_empty());
        assert!(last_workout(&mut conn).unwrap().is_none());
        assert!(list_exercises(&mut conn, None).unwrap().is_empty());
        assert!(exercise_history(&mut conn, "Bench Press").unwrap().is_empty());
        assert!(best_lift(&mut conn, "Bench Press").unwrap().is_none());
        assert!(best_one_rep_max(&mut conn, "Bench Press").unwrap().is_none());
    }

    #[test]
    fn history_is_chronological_regardless_of_insertion_order() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        let later = add_workout(&mut conn, date(2024, 1, 10)).unwrap();
        let earlier = add_workout(&mut conn, date(2024, 1, 1)).unwrap();
        let exercise = add_exercise(&mut conn, "Bench Press", "push", None).unwrap();

        add_performance(&mut conn, later.id, exercise.id, 8, 90.0, None).unwrap();
        add_performance(&mut conn, earlier.id, exercise.id, 5, 100.0, Some(9.0)).unwrap();

        let history = exercise_history(&mut conn, "Bench Press").unwrap();
        let dates: Vec<_> = history.iter().map(|h| h.date).collect();
        assert_eq!(dates, [date(2024, 1, 1), date(2024, 1, 10)]);
        assert_eq!(history[0].reps, 5);
        assert_eq!(history[0].rpe, Some(9.0));
        assert_eq!(history[1].exercise, "Bench Press");
    }

    #[test]
    fn history_matches_names_exactly() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        let workout = add_workout(&mut conn, date(2024, 1, 1)).unwrap();
        let bench = add_exercise(&mut conn, "Bench Press", "push", None).unwrap();
        let incline = add_exercise(&mut conn, "Incline Bench Press", "push", None).unwrap();

        add_performance(&mut conn, workout.id, bench.id, 5, 100.0, None).unwrap();
        add_performance(&mut conn, workout.id, incline.id, 8, 70.0, None).unwrap();

        let history = exercise_history(&mut conn, "Bench Press").unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].weight, 100.0);
    }

    #[test]
    fn best_lift_breaks_weight_ties_by_reps() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        let first = add_workout(&mut conn, date(2024, 1, 1)).unwrap();
        let second = add_workout(&mut conn, date(2024, 1, 8)).unwrap();
        let exercise = add_exercise(&mut conn, "Bench Press", "push", None).unwrap();

        add_performance(&mut conn, first.id, exercise.id, 5, 100.0, Some(8.0)).unwrap();
        add_performance(&mut conn, first.id, exercise.id, 10, 90.0, None).unwrap();
        add_performance(&mut conn, second.id, exercise.id, 6, 100.0, Some(9.0)).unwrap();

        let best = best_lift(&mut conn, "Bench Press").unwrap().unwrap();
        assert_eq!(best.weight, 100.0);
        assert_eq!(best.reps, 6);
        assert_eq!(best.rpe, Some(9.0));
        assert_eq!(best.date, date(2024, 1, 8));
    }

    #[test]
    fn best_one_rep_max_reduces_epley_estimates() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        let workout = add_workout(&mut conn, date(2024, 1, 1)).unwrap();
        let exercise = add_exercise(&mut conn, "Bench Press", "push", None).unwrap();

        // 100kg x 5 estimates to ~116.7, 90kg x 10 to 120.
        add_performance(&mut conn, workout.id, exercise.id, 5, 100.0, None).unwrap();
        add_performance(&mut conn, workout.id, exercise.id, 10, 90.0, None).unwrap();

        let best = best_one_rep_max(&mut conn, "Bench Press").unwrap().unwrap();
        assert!((best - 120.0).abs() < 1e-3);
    }

    #[test]
    fn workout_performances_join_exercise_names_in_insertion_order() {
        let db = Db::open_in_memory().unwrap();
        let mut conn = db.conn();

        let workout = add_workout(&mut conn, date(2024, 1, 1)).unwrap();
        let other = add_workout(&mut conn, date(2024, 1, 2)).unwrap();
        let squat = add_exercise(&mut conn, "Squat", "legs", None).unwrap();
        let bench = add_exercise(&mut conn, "Bench Press", "push", None).unwrap();

        add_performance(&mut conn, workout.id, squat.id, 5, 140.0, None).unwrap();
        add_performance(&mut conn, workout.id, bench.id, 5, 100.0, None).unwrap();
        add_performance(&mut conn, workout.id, squat.id, 5, 140.0, None).unwrap();
        add_performance(&mut conn, other.id, bench.id, 3, 105.0, None).unwrap();

        let rows = workout_performances(&mut conn, workout.id).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.exercise.as_str()).collect();
        assert_eq!(names, ["Squat", "Bench Press", "Squat"]);
    }
}
