use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{parse_date, parse_time};
use crate::error::{AppError, Result};

pub const MAX_DESCRIPTION_LEN: usize = 150;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub description: String,
    pub time: String, // HH:MM
    pub date: String, // DD-MM-YYYY
    pub notification: bool,
}

/// Input for a schedule that has not been stored yet.
#[derive(Debug, Clone, Default)]
pub struct NewSchedule {
    pub name: String,
    pub subject: String,
    pub description: String,
    pub time: String,
    pub date: String,
    pub notification: bool,
}

impl NewSchedule {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty()
            || self.subject.trim().is_empty()
            || self.time.trim().is_empty()
            || self.date.trim().is_empty()
        {
            return Err(AppError::Validation(
                "name, subject, date and time are required".to_string(),
            ));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(AppError::Validation(format!(
                "description cannot exceed {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        if parse_date(&self.date).is_none() {
            return Err(AppError::Validation(format!(
                "invalid date '{}', expected DD-MM-YYYY",
                self.date
            )));
        }
        if parse_time(&self.time).is_none() {
            return Err(AppError::Validation(format!(
                "invalid time '{}', expected HH:MM",
                self.time
            )));
        }
        Ok(())
    }
}

impl Schedule {
    pub fn from_new(new: NewSchedule) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            subject: new.subject.trim().to_string(),
            description: new.description,
            time: new.time.trim().to_string(),
            date: new.date.trim().to_string(),
            notification: new.notification,
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn parsed_time(&self) -> Option<NaiveTime> {
        parse_time(&self.time)
    }

    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        Some(self.parsed_date()?.and_time(self.parsed_time()?))
    }

    /// A session is done once its start is strictly in the past.
    /// Entries with an unreadable date or time never count as done.
    pub fn is_done(&self, now: NaiveDateTime) -> bool {
        self.starts_at().is_some_and(|start| start < now)
    }
}

/// Orders schedules newest date first, earliest time first within a date.
/// Entries whose date or time cannot be read sink to the end of their group.
pub fn sort_schedules(schedules: &mut [Schedule]) {
    schedules.sort_by(|a, b| {
        let by_date = match (a.parsed_date(), b.parsed_date()) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_date.then_with(|| match (a.parsed_time(), b.parsed_time()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(name: &str, date: &str, time: &str) -> Schedule {
        Schedule::from_new(NewSchedule {
            name: name.to_string(),
            subject: "Maths".to_string(),
            date: date.to_string(),
            time: time.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn sorts_by_date_desc_then_time_asc() {
        let mut list = vec![
            schedule("a", "10-03-2025", "14:00"),
            schedule("b", "11-03-2025", "09:00"),
            schedule("c", "10-03-2025", "08:30"),
            schedule("d", "11-03-2025", "07:15"),
        ];
        sort_schedules(&mut list);
        let names: Vec<_> = list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn malformed_entries_sort_last() {
        let mut list = vec![
            schedule("bad-date", "someday", "09:00"),
            schedule("ok", "10-03-2025", "09:00"),
            schedule("bad-time", "10-03-2025", "noon"),
        ];
        sort_schedules(&mut list);
        let names: Vec<_> = list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ok", "bad-time", "bad-date"]);
    }

    #[test]
    fn done_only_when_start_is_strictly_past() {
        let s = schedule("lecture", "10-03-2025", "09:00");
        let at = |h, m| {
            NaiveDate::from_ymd_opt(2025, 3, 10)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap()
        };
        assert!(!s.is_done(at(8, 59)));
        assert!(!s.is_done(at(9, 0)));
        assert!(s.is_done(at(9, 1)));

        let broken = schedule("broken", "10-03-2025", "??");
        assert!(!broken.is_done(at(23, 59)));
    }

    #[test]
    fn validation_rejects_missing_fields_and_long_descriptions() {
        let mut new = NewSchedule {
            name: "Lab".to_string(),
            subject: "Physics".to_string(),
            date: "12-03-2025".to_string(),
            time: "10:00".to_string(),
            ..Default::default()
        };
        assert!(new.validate().is_ok());

        new.description = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(matches!(new.validate(), Err(AppError::Validation(_))));

        new.description.clear();
        new.subject = "  ".to_string();
        assert!(matches!(new.validate(), Err(AppError::Validation(_))));

        new.subject = "Physics".to_string();
        new.time = "25:00".to_string();
        assert!(matches!(new.validate(), Err(AppError::Validation(_))));
    }
}
