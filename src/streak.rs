//! Streak bookkeeping for the denormalized counters on each user.
//!
//! The fields `current_streak`, `longest_streak`, `last_exercise_date`, and
//! `total_exercises` are caches over the exercise table. Every write to them
//! goes through this module so the repair paths ([`reconcile_on_delete`],
//! [`full_reset`]) stay the only way the counters and the table can drift
//! back together.

use crate::errors::AppError;
use crate::models::AppData;
use chrono::NaiveDate;
use tracing::{info, warn};

/// Applies one logged exercise to the user's streak state. The exercise row
/// itself must already be stored; this only maintains the derived fields.
///
/// A repeat entry on the same calendar day leaves the streak triple alone.
/// Any earlier `last_exercise_date`, no matter how far back, carries the
/// streak forward and adds one: streaks never reset here. Expiry of stale
/// streaks is [`reconcile_sweep`]'s job.
pub fn record_exercise(data: &mut AppData, user_id: u64, day: NaiveDate) -> Result<(), AppError> {
    let user = data
        .users
        .get_mut(&user_id)
        .ok_or_else(|| AppError::not_found(format!("no user with id {user_id}")))?;

    // The row exists regardless of what happens to the streak.
    user.total_exercises = user.total_exercises.saturating_add(1);

    if user.last_exercise_date == Some(day) {
        return Ok(());
    }

    user.current_streak += 1;
    user.longest_streak = user.longest_streak.max(user.current_streak);
    user.last_exercise_date = Some(day);
    Ok(())
}

/// Repairs the user's derived fields after one of their exercise rows was
/// deleted.
///
/// `total_exercises` and `last_exercise_date` are recomputed from the rows
/// that remain, not decremented, so any prior drift is corrected here too.
/// `current_streak` drops by one, floored at zero; `longest_streak` never
/// decreases.
pub fn reconcile_on_delete(data: &mut AppData, user_id: u64) -> Result<(), AppError> {
    let count = data.count_exercises(user_id);
    let last = data.max_exercise_date(user_id);
    let user = data
        .users
        .get_mut(&user_id)
        .ok_or_else(|| AppError::not_found(format!("no user with id {user_id}")))?;

    user.total_exercises = count;
    user.current_streak = user.current_streak.saturating_sub(1);
    user.last_exercise_date = last;
    Ok(())
}

/// Expires every streak whose gap to `today` exceeds the configured
/// threshold. Users are independent; a failure on one is logged and the
/// sweep moves on. Returns how many users were reset.
pub fn reconcile_sweep(data: &mut AppData, today: NaiveDate) -> usize {
    let max_gap = i64::from(data.settings.max_days_without_exercise);

    let expired: Vec<(u64, i64)> = data
        .users
        .values()
        .filter(|user| user.current_streak > 0)
        .filter_map(|user| user.last_exercise_date.map(|last| (user.id, last)))
        .map(|(id, last)| (id, (today - last).num_days()))
        .filter(|(_, gap)| *gap > max_gap)
        .collect();

    let mut reset_count = 0;
    for (user_id, gap) in expired {
        match full_reset(data, user_id) {
            Ok(()) => {
                info!("streak expired for user {user_id} ({gap} days without exercise)");
                reset_count += 1;
            }
            Err(err) => warn!("skipping streak reset for user {user_id}: {err}"),
        }
    }
    reset_count
}

/// Zeroes the whole streak state, including `longest_streak`, and fixes
/// `total_exercises` to the actual row count. Backs both sweep expiry and
/// the manual admin reset.
pub fn full_reset(data: &mut AppData, user_id: u64) -> Result<(), AppError> {
    let count = data.count_exercises(user_id);
    let user = data
        .users
        .get_mut(&user_id)
        .ok_or_else(|| AppError::not_found(format!("no user with id {user_id}")))?;

    user.current_streak = 0;
    user.longest_streak = 0;
    user.last_exercise_date = None;
    user.total_exercises = count;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseRecord, User};
    use chrono::{Duration, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn data_with_user(id: u64) -> AppData {
        let mut data = AppData::default();
        data.users.insert(id, User::new(id, format!("user-{id}"), None));
        data
    }

    fn insert_exercise(data: &mut AppData, user_id: u64, day: NaiveDate) -> u64 {
        let id = data.alloc_id();
        data.exercises.insert(
            id,
            ExerciseRecord {
                id,
                user_id,
                activity: "🏃:Running".to_string(),
                distance: 0.0,
                duration: 20,
                calories: 0.0,
                image_url: None,
                date: day,
                created_at: Utc::now(),
            },
        );
        id
    }

    /// Logs an exercise the way the handler does: row first, then streak.
    fn log(data: &mut AppData, user_id: u64, day: NaiveDate) {
        insert_exercise(data, user_id, day);
        record_exercise(data, user_id, day).unwrap();
    }

    fn assert_invariants(data: &AppData, user_id: u64) {
        let user = &data.users[&user_id];
        assert!(user.current_streak <= user.longest_streak);
        assert_eq!(user.total_exercises, data.count_exercises(user_id));
    }

    #[test]
    fn first_exercise_starts_streak_at_one() {
        let mut data = data_with_user(1);
        log(&mut data, 1, date(2024, 1, 1));

        let user = &data.users[&1];
        assert_eq!(user.current_streak, 1);
        assert_eq!(user.longest_streak, 1);
        assert_eq!(user.last_exercise_date, Some(date(2024, 1, 1)));
        assert_eq!(user.total_exercises, 1);
        assert_invariants(&data, 1);
    }

    #[test]
    fn same_day_repeat_leaves_streak_unchanged() {
        let mut data = data_with_user(1);
        log(&mut data, 1, date(2024, 1, 1));
        log(&mut data, 1, date(2024, 1, 1));

        let user = &data.users[&1];
        assert_eq!(user.current_streak, 1);
        assert_eq!(user.longest_streak, 1);
        assert_eq!(user.last_exercise_date, Some(date(2024, 1, 1)));
        // The second row still counts.
        assert_eq!(user.total_exercises, 2);
        assert_invariants(&data, 1);
    }

    #[test]
    fn large_gap_carries_streak_forward() {
        let mut data = data_with_user(1);
        data.settings.max_days_without_exercise = 3;
        let start = date(2024, 2, 1);
        {
            let user = data.users.get_mut(&1).unwrap();
            user.current_streak = 5;
            user.longest_streak = 5;
            user.last_exercise_date = Some(start);
        }

        log(&mut data, 1, start + Duration::days(10));

        let user = &data.users[&1];
        assert_eq!(user.current_streak, 6);
        assert_eq!(user.longest_streak, 6);
        assert_eq!(user.last_exercise_date, Some(start + Duration::days(10)));
    }

    #[test]
    fn record_exercise_unknown_user_is_not_found() {
        let mut data = AppData::default();
        let err = record_exercise(&mut data, 42, date(2024, 1, 1)).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn sweep_expires_streak_past_threshold() {
        let mut data = data_with_user(1);
        data.settings.max_days_without_exercise = 3;
        let last = date(2024, 3, 1);
        {
            let user = data.users.get_mut(&1).unwrap();
            user.current_streak = 5;
            user.longest_streak = 8;
            user.last_exercise_date = Some(last);
        }

        let reset = reconcile_sweep(&mut data, last + Duration::days(4));

        assert_eq!(reset, 1);
        let user = &data.users[&1];
        assert_eq!(user.current_streak, 0);
        assert_eq!(user.longest_streak, 0);
        assert_eq!(user.last_exercise_date, None);
        assert_invariants(&data, 1);
    }

    #[test]
    fn sweep_keeps_streak_within_threshold() {
        let mut data = data_with_user(1);
        data.settings.max_days_without_exercise = 3;
        let last = date(2024, 3, 1);
        {
            let user = data.users.get_mut(&1).unwrap();
            user.current_streak = 5;
            user.longest_streak = 8;
            user.last_exercise_date = Some(last);
        }

        // Gap of exactly the threshold is still alive.
        let reset = reconcile_sweep(&mut data, last + Duration::days(3));

        assert_eq!(reset, 0);
        assert_eq!(data.users[&1].current_streak, 5);
        assert_eq!(data.users[&1].longest_streak, 8);
    }

    #[test]
    fn sweep_skips_users_without_active_streak() {
        let mut data = data_with_user(1);
        data.users.insert(2, User::new(2, "idle".to_string(), None));
        data.settings.max_days_without_exercise = 1;
        {
            // Active streak but no recorded date: nothing to measure a gap from.
            let user = data.users.get_mut(&1).unwrap();
            user.current_streak = 4;
            user.longest_streak = 4;
        }

        let reset = reconcile_sweep(&mut data, date(2024, 6, 1));

        assert_eq!(reset, 0);
        assert_eq!(data.users[&1].current_streak, 4);
        assert_eq!(data.users[&2].current_streak, 0);
    }

    #[test]
    fn sweep_processes_remaining_users_independently() {
        let mut data = data_with_user(1);
        data.users.insert(2, User::new(2, "stale".to_string(), None));
        data.settings.max_days_without_exercise = 2;
        for id in [1, 2] {
            let user = data.users.get_mut(&id).unwrap();
            user.current_streak = 3;
            user.longest_streak = 3;
            user.last_exercise_date = Some(date(2024, 1, 1));
        }

        let reset = reconcile_sweep(&mut data, date(2024, 1, 10));

        assert_eq!(reset, 2);
        assert_eq!(data.users[&1].current_streak, 0);
        assert_eq!(data.users[&2].current_streak, 0);
    }

    #[test]
    fn delete_decrement_floors_at_zero() {
        let mut data = data_with_user(1);
        let id = insert_exercise(&mut data, 1, date(2024, 5, 1));
        // Streak already zero, e.g. after a sweep reset.
        data.users.get_mut(&1).unwrap().total_exercises = 1;

        data.exercises.remove(&id);
        reconcile_on_delete(&mut data, 1).unwrap();

        let user = &data.users[&1];
        assert_eq!(user.current_streak, 0);
        assert_eq!(user.total_exercises, 0);
        assert_eq!(user.last_exercise_date, None);
        assert_invariants(&data, 1);
    }

    #[test]
    fn delete_recounts_totals_and_last_date() {
        let mut data = data_with_user(1);
        log(&mut data, 1, date(2024, 1, 1));
        log(&mut data, 1, date(2024, 1, 3));
        let latest = insert_exercise(&mut data, 1, date(2024, 1, 5));
        record_exercise(&mut data, 1, date(2024, 1, 5)).unwrap();

        data.exercises.remove(&latest);
        reconcile_on_delete(&mut data, 1).unwrap();

        let user = &data.users[&1];
        assert_eq!(user.current_streak, 2);
        assert_eq!(user.longest_streak, 3);
        assert_eq!(user.total_exercises, 2);
        assert_eq!(user.last_exercise_date, Some(date(2024, 1, 3)));
        assert_invariants(&data, 1);
    }

    #[test]
    fn full_reset_clears_state_and_repairs_count() {
        let mut data = data_with_user(1);
        log(&mut data, 1, date(2024, 1, 1));
        log(&mut data, 1, date(2024, 1, 2));
        // Simulate counter drift from an out-of-band write.
        data.users.get_mut(&1).unwrap().total_exercises = 99;

        full_reset(&mut data, 1).unwrap();

        let user = &data.users[&1];
        assert_eq!(user.current_streak, 0);
        assert_eq!(user.longest_streak, 0);
        assert_eq!(user.last_exercise_date, None);
        assert_eq!(user.total_exercises, 2);
        assert_invariants(&data, 1);
    }

    #[test]
    fn longest_streak_is_monotonic_until_reset() {
        let mut data = data_with_user(1);
        let mut previous_longest = 0;
        for offset in 0..6 {
            log(&mut data, 1, date(2024, 1, 1) + Duration::days(offset));
            let longest = data.users[&1].longest_streak;
            assert!(longest >= previous_longest);
            previous_longest = longest;
        }

        for _ in 0..3 {
            let id = *data.exercises.keys().next().unwrap();
            data.exercises.remove(&id);
            reconcile_on_delete(&mut data, 1).unwrap();
            assert_eq!(data.users[&1].longest_streak, previous_longest);
            assert_invariants(&data, 1);
        }
    }

    #[test]
    fn end_to_end_scenario() {
        let mut data = data_with_user(1);

        log(&mut data, 1, date(2024, 1, 1));
        let user = &data.users[&1];
        assert_eq!(
            (user.current_streak, user.longest_streak, user.last_exercise_date),
            (1, 1, Some(date(2024, 1, 1)))
        );

        log(&mut data, 1, date(2024, 1, 1));
        let user = &data.users[&1];
        assert_eq!(
            (user.current_streak, user.longest_streak, user.last_exercise_date),
            (1, 1, Some(date(2024, 1, 1)))
        );

        log(&mut data, 1, date(2024, 1, 2));
        let user = &data.users[&1];
        assert_eq!(
            (user.current_streak, user.longest_streak, user.last_exercise_date),
            (2, 2, Some(date(2024, 1, 2)))
        );

        let id = *data.exercises.keys().next().unwrap();
        data.exercises.remove(&id);
        reconcile_on_delete(&mut data, 1).unwrap();
        let user = &data.users[&1];
        assert_eq!(user.current_streak, 1);
        assert_eq!(user.total_exercises, data.count_exercises(1));
        assert_invariants(&data, 1);
    }
}
