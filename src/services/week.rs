use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::Schedule;

/// Monday and Sunday of the week containing `day`.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = day - Days::new(day.weekday().num_days_from_monday() as u64);
    (monday, monday + Days::new(6))
}

pub fn in_week(schedule: &Schedule, day: NaiveDate) -> bool {
    let (monday, sunday) = week_bounds(day);
    schedule
        .parsed_date()
        .is_some_and(|d| d >= monday && d <= sunday)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub done: usize,
    pub total: usize,
}

impl DayProgress {
    /// Whole-number percentage for the progress bar, 0 for an empty day.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            (self.done * 100 / self.total) as u32
        }
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.done, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekView {
    pub days: Vec<DayProgress>,
}

impl WeekView {
    pub fn start(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayProgress> {
        self.days.iter().find(|d| d.date == date)
    }
}

/// Seven consecutive days from `week_start`, counting sessions already started by `now`.
pub fn build_week_view(schedules: &[Schedule], week_start: NaiveDate, now: NaiveDateTime) -> WeekView {
    let days = (0..7)
        .map(|offset| {
            let date = week_start + Days::new(offset);
            let on_day: Vec<&Schedule> = schedules
                .iter()
                .filter(|s| s.parsed_date() == Some(date))
                .collect();
            DayProgress {
                date,
                done: on_day.iter().filter(|s| s.is_done(now)).count(),
                total: on_day.len(),
            }
        })
        .collect();
    WeekView { days }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewSchedule;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn schedule(date: &str, time: &str) -> Schedule {
        Schedule::from_new(NewSchedule {
            name: format!("{} {}", date, time),
            subject: "Bio".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn bounds_run_monday_to_sunday() {
        // 12 March 2025 is a Wednesday
        assert_eq!(week_bounds(date(12)), (date(10), date(16)));
        assert_eq!(week_bounds(date(10)), (date(10), date(16)));
        assert_eq!(week_bounds(date(16)), (date(10), date(16)));
        assert_eq!(week_bounds(date(17)), (date(17), date(23)));
    }

    #[test]
    fn in_week_checks_parsed_date() {
        assert!(in_week(&schedule("10-03-2025", "09:00"), date(12)));
        assert!(in_week(&schedule("16-03-2025", "09:00"), date(12)));
        assert!(!in_week(&schedule("09-03-2025", "09:00"), date(12)));
        assert!(!in_week(&schedule("17-03-2025", "09:00"), date(12)));
        assert!(!in_week(&schedule("not a date", "09:00"), date(12)));
    }

    #[test]
    fn counts_done_and_total_per_day() {
        let schedules = vec![
            schedule("10-03-2025", "09:00"),
            schedule("12-03-2025", "08:00"),
            schedule("12-03-2025", "13:00"),
            schedule("12-03-2025", "bad"),
            schedule("20-03-2025", "09:00"),
        ];
        let now = date(12).and_hms_opt(12, 0, 0).unwrap();
        let view = build_week_view(&schedules, date(10), now);

        assert_eq!(view.days.len(), 7);
        assert_eq!(view.start(), Some(date(10)));

        let monday = view.day(date(10)).unwrap();
        assert_eq!((monday.done, monday.total), (1, 1));
        assert_eq!(monday.percent(), 100);

        let wednesday = view.day(date(12)).unwrap();
        assert_eq!((wednesday.done, wednesday.total), (1, 3));
        assert_eq!(wednesday.percent(), 33);
        assert_eq!(wednesday.label(), "1/3");

        let sunday = view.day(date(16)).unwrap();
        assert_eq!(sunday.total, 0);
        assert_eq!(sunday.percent(), 0);
        assert_eq!(sunday.label(), "0/0");
    }
}
