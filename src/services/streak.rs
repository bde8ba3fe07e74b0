use chrono::NaiveDate;

use crate::models::{format_date, parse_date, Motivation};

/// What a streak check did to the stored motivation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakOutcome {
    /// Already studied today.
    Unchanged(u32),
    /// Studied yesterday; the streak grew by one.
    Extended(u32),
    /// Gap of more than a day, or no usable record; back to 1.
    Reset,
}

impl StreakOutcome {
    pub fn streak(&self) -> u32 {
        match self {
            StreakOutcome::Unchanged(n) | StreakOutcome::Extended(n) => *n,
            StreakOutcome::Reset => 1,
        }
    }

    pub fn changed(&self) -> bool {
        !matches!(self, StreakOutcome::Unchanged(_))
    }
}

pub fn evaluate(motivation: &Motivation, today: NaiveDate) -> StreakOutcome {
    let Some(last) = parse_date(&motivation.last_studied) else {
        return StreakOutcome::Reset;
    };
    match (today - last).num_days() {
        0 => StreakOutcome::Unchanged(motivation.current_streak),
        1 => StreakOutcome::Extended(motivation.current_streak.saturating_add(1)),
        // Includes dates in the future, which can only come from a clock change
        _ => StreakOutcome::Reset,
    }
}

/// Runs the check and writes the result into `motivation` when it changed.
/// `last_sent_date` and `time` are left as they were.
pub fn apply(motivation: &mut Motivation, today: NaiveDate) -> StreakOutcome {
    let outcome = evaluate(motivation, today);
    if outcome.changed() {
        motivation.current_streak = outcome.streak();
        motivation.last_studied = format_date(today);
    }
    outcome
}
