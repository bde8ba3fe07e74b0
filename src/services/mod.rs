pub mod motivation;
pub mod notifier;
mod planner;
pub mod reminders;
pub mod streak;
pub mod week;

pub use motivation::DailyPick;
pub use notifier::{LogNotifier, Notifier};
pub use planner::{PlannerService, StartupReport};
pub use reminders::{Reminder, ReminderId, ReminderKind};
pub use streak::StreakOutcome;
pub use week::{DayProgress, WeekView};
