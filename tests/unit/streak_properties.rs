/// Streak engine properties with a fixed reference date
use chrono::{Days, NaiveDate};
use habit_streaks::*;

/// Wednesday of ISO week 11
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
}

fn days_ago(n: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(n)).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn habit_with(cadence: Cadence, dates: &[NaiveDate]) -> (Habit, CompletionLog) {
    let habit = Habit::new("Habit".to_string(), None, cadence).unwrap();
    let mut log = CompletionLog::new(habit.id.clone());
    for date in dates {
        log.record(*date);
    }
    (habit, log)
}

#[cfg(test)]
mod streak_property_tests {
    use super::*;

    #[test]
    fn test_empty_history_for_every_cadence() {
        let engine = StreakEngine::default();
        for cadence in Cadence::ALL {
            let (mut habit, log) = habit_with(cadence, &[]);
            assert_eq!(engine.current_streak(&mut habit, &log, today()), 0);
            assert_eq!(engine.best_streak_ever(&habit, &log), 0);
        }
    }

    #[test]
    fn test_record_is_idempotent() {
        let (_, mut log) = habit_with(Cadence::Daily, &[]);

        let (first, outcome) = log.record(today());
        assert_eq!(outcome, RecordOutcome::Created);
        let (second, outcome) = log.record(today());
        assert_eq!(outcome, RecordOutcome::AlreadyRecorded);

        assert_eq!(first.id, second.id);
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.list_valid(), vec![today()]);
    }

    #[test]
    fn test_soft_deleted_completions_are_ignored() {
        let engine = StreakEngine::default();
        let (mut habit, mut log) = habit_with(Cadence::Daily, &[days_ago(2), days_ago(1), today()]);
        log.soft_delete_on(days_ago(1));
        log.soft_delete_on(today());

        assert_eq!(engine.current_streak(&mut habit, &log, today()), 0);
        assert_eq!(engine.best_streak_ever(&habit, &log), 1);
    }

    #[test]
    fn test_daily_scenarios() {
        let engine = StreakEngine::default();

        let (mut consecutive, log) = habit_with(Cadence::Daily, &[days_ago(2), days_ago(1), today()]);
        assert_eq!(engine.current_streak(&mut consecutive, &log, today()), 3);

        let (mut gap, log) = habit_with(Cadence::Daily, &[days_ago(2), today()]);
        assert_eq!(engine.current_streak(&mut gap, &log, today()), 1);
    }

    #[test]
    fn test_anchor_rules_on_run_ending_yesterday() {
        let dates = [days_ago(3), days_ago(2), days_ago(1)];

        let (mut lenient_habit, log) = habit_with(Cadence::Daily, &dates);
        let lenient = StreakEngine::new(AnchorRule::AllowPrevious);
        assert_eq!(lenient.current_streak(&mut lenient_habit, &log, today()), 3);

        let (mut strict_habit, log) = habit_with(Cadence::Daily, &dates);
        let strict = StreakEngine::new(AnchorRule::RequireCurrent);
        assert_eq!(strict.current_streak(&mut strict_habit, &log, today()), 0);
        assert_eq!(strict_habit.best_streak, 3);
    }

    #[test]
    fn test_weekly_scenario() {
        let engine = StreakEngine::default();
        // Weeks 9, 10 (twice) and 11 of 2025
        let dates = [day(2025, 2, 26), day(2025, 3, 3), day(2025, 3, 7), today()];
        let (mut habit, log) = habit_with(Cadence::Weekly, &dates);

        assert_eq!(engine.current_streak(&mut habit, &log, today()), 3);
        assert_eq!(engine.best_streak_ever(&habit, &log), 3);
    }

    #[test]
    fn test_weekly_rollover_into_new_iso_year() {
        let engine = StreakEngine::default();
        // 2025-W52, 2026-W01 (starts Monday 2025-12-29), 2026-W02
        let dates = [day(2025, 12, 24), day(2025, 12, 30), day(2026, 1, 6)];
        let (mut habit, log) = habit_with(Cadence::Weekly, &dates);

        assert_eq!(engine.current_streak(&mut habit, &log, day(2026, 1, 7)), 3);
    }

    #[test]
    fn test_monthly_gap_scenario() {
        let engine = StreakEngine::default();
        let april = day(2025, 4, 15);
        let (mut habit, log) = habit_with(Cadence::Monthly, &[day(2025, 1, 9), day(2025, 2, 9), day(2025, 4, 9)]);

        assert_eq!(engine.current_streak(&mut habit, &log, april), 1);
        assert_eq!(engine.best_streak_ever(&habit, &log), 2);
    }

    #[test]
    fn test_best_streak_from_history() {
        let engine = StreakEngine::default();
        let dates = [day(2025, 1, 1), day(2025, 1, 2), day(2025, 1, 4), day(2025, 1, 5), day(2025, 1, 6)];
        let (habit, log) = habit_with(Cadence::Daily, &dates);

        assert_eq!(engine.best_streak_ever(&habit, &log), 3);
    }

    #[test]
    fn test_pause_then_inactivate() {
        let engine = StreakEngine::default();
        let (mut habit, mut log) = habit_with(Cadence::Daily, &[days_ago(1), today()]);
        engine.current_streak(&mut habit, &log, today());

        engine.transition(&mut habit, &mut log, HabitStatus::Paused, today());
        assert_eq!(engine.current_streak(&mut habit, &log, today()), 2);

        let change = engine.transition(&mut habit, &mut log, HabitStatus::Inactive, today());
        assert_eq!(change.from, HabitStatus::Paused);
        assert_eq!(engine.current_streak(&mut habit, &log, today()), 0);
        assert!(!log.is_completed_on(today()));
        assert_eq!(habit.best_streak, 2);
    }

    #[test]
    fn test_snapshot_reports_history() {
        let engine = StreakEngine::default();
        let (mut habit, log) = habit_with(Cadence::Daily, &[days_ago(9), days_ago(8), days_ago(7), today()]);

        let streak = engine.snapshot(&mut habit, &log, today());
        assert_eq!(streak.current_streak, 1);
        assert_eq!(streak.best_streak, 3);
        assert_eq!(streak.best_streak_ever, 3);
        assert_eq!(streak.total_completions, 4);
        assert_eq!(streak.last_completed, Some(today()));
    }
}
