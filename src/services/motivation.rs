use rand::seq::SliceRandom;
use rand::Rng;

pub const MOTIVATIONAL_QUOTES: &[&str] = &[
    "The secret of getting ahead is getting started. - Mark Twain",
    "You don't have to be great to start, but you have to start to be great. - Zig Ziglar",
    "The expert in anything was once a beginner. - Helen Hayes",
    "Success is the sum of small efforts, repeated day in and day out. - Robert Collier",
    "The only way to learn mathematics is to do mathematics. - Paul Halmos",
];

pub const PRODUCTIVITY_TIPS: &[&str] = &[
    "Use the Pomodoro Technique: 25 minutes of focused work, then 5-minute break.",
    "Prioritize your tasks using the Eisenhower Matrix (Urgent/Important).",
    "Break large tasks into smaller, manageable chunks.",
    "Review your notes within 24 hours to improve retention.",
    "Get enough sleep - it's essential for memory consolidation.",
];

/// Quote and tip picked once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyPick {
    pub quote: &'static str,
    pub tip: &'static str,
}

impl DailyPick {
    pub fn random() -> Self {
        Self::with_rng(&mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            quote: MOTIVATIONAL_QUOTES.choose(rng).copied().unwrap_or_default(),
            tip: PRODUCTIVITY_TIPS.choose(rng).copied().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn picks_come_from_the_lists() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let pick = DailyPick::with_rng(&mut rng);
            assert!(MOTIVATIONAL_QUOTES.contains(&pick.quote));
            assert!(PRODUCTIVITY_TIPS.contains(&pick.tip));
        }
    }
}
