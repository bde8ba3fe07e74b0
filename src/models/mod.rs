mod document;
mod profile;
mod schedule;
mod stats;
mod task;

use chrono::{NaiveDate, NaiveTime};

pub use document::{Document, DOCUMENT_VERSION};
pub use profile::{Motivation, Profile, Settings, Theme, DEFAULT_AVATAR_PATH};
pub use schedule::{sort_schedules, NewSchedule, Schedule, MAX_DESCRIPTION_LEN};
pub use stats::{Dashboard, TaskStats};
pub use task::{NewTask, Task, TaskStatus, TaskType, TaskUpdate, TasksByType};

/// Day-first date format used for every date stored in the document.
pub const DATE_FORMAT: &str = "%d-%m-%Y";
pub const TIME_FORMAT: &str = "%H:%M";

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

pub fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_first_dates() {
        assert_eq!(
            parse_date("05-03-2025"),
            NaiveDate::from_ymd_opt(2025, 3, 5)
        );
        assert_eq!(parse_date("2025-03-05"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn parses_hour_minute_times() {
        assert_eq!(parse_time("07:30"), NaiveTime::from_hms_opt(7, 30, 0));
        assert_eq!(parse_time("7pm"), None);
        assert_eq!(parse_time("24:00"), None);
    }
}
