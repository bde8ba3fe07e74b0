use std::collections::BTreeMap;
use std::fmt;

use chrono::{Days, NaiveDateTime};
use uuid::Uuid;

use crate::models::parse_time;

pub const SCHEDULE_REMINDER_TITLE: &str = "Study Reminder";
pub const MOTIVATION_TITLE: &str = "Daily Study Motivation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReminderId(u64);

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderKind {
    Schedule(Uuid),
    DailyMotivation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ReminderId,
    pub fire_at: NaiveDateTime,
    pub kind: ReminderKind,
    pub title: String,
    pub message: String,
}

/// Pending reminders ordered by fire time, ties broken by insertion order.
#[derive(Debug, Default)]
pub struct ReminderQueue {
    next_id: u64,
    pending: BTreeMap<(NaiveDateTime, ReminderId), Reminder>,
}

impl ReminderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        fire_at: NaiveDateTime,
        kind: ReminderKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> ReminderId {
        let id = ReminderId(self.next_id);
        self.next_id += 1;
        let reminder = Reminder {
            id,
            fire_at,
            kind,
            title: title.into(),
            message: message.into(),
        };
        self.pending.insert((fire_at, id), reminder);
        id
    }

    pub fn cancel(&mut self, id: ReminderId) -> bool {
        let key = self.pending.keys().find(|(_, rid)| *rid == id).copied();
        match key {
            Some(key) => self.pending.remove(&key).is_some(),
            None => false,
        }
    }

    /// Drops every reminder whose kind matches; returns how many went.
    pub fn cancel_where<F>(&mut self, mut pred: F) -> usize
    where
        F: FnMut(&ReminderKind) -> bool,
    {
        let before = self.pending.len();
        self.pending.retain(|_, r| !pred(&r.kind));
        before - self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Removes and returns everything due at or before `now`, earliest first.
    pub fn pop_due(&mut self, now: NaiveDateTime) -> Vec<Reminder> {
        let mut due = Vec::new();
        while let Some(entry) = self.pending.first_entry() {
            if entry.key().0 > now {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    pub fn next_fire_at(&self) -> Option<NaiveDateTime> {
        self.pending.keys().next().map(|(at, _)| *at)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reminder> {
        self.pending.values()
    }
}

/// Next occurrence of an `HH:MM` time of day: today if it has not passed yet, otherwise tomorrow.
pub fn next_fire_time(time_of_day: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let time = parse_time(time_of_day)?;
    let today = now.date().and_time(time);
    if today < now {
        today.checked_add_days(Days::new(1))
    } else {
        Some(today)
    }
}

pub fn schedule_message(name: &str) -> String {
    format!("It's time for: {}", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn fire_time_rolls_to_tomorrow_once_passed() {
        assert_eq!(next_fire_time("18:30", at(12, 9, 0)), Some(at(12, 18, 30)));
        assert_eq!(next_fire_time("08:00", at(12, 9, 0)), Some(at(13, 8, 0)));
        assert_eq!(next_fire_time("09:00", at(12, 9, 0)), Some(at(12, 9, 0)));
        assert_eq!(next_fire_time("whenever", at(12, 9, 0)), None);
    }

    #[test]
    fn pops_in_fire_order() {
        let mut queue = ReminderQueue::new();
        queue.push(at(12, 10, 0), ReminderKind::DailyMotivation, "t", "late");
        queue.push(at(12, 9, 0), ReminderKind::DailyMotivation, "t", "early");
        queue.push(at(12, 9, 0), ReminderKind::DailyMotivation, "t", "early-2");
        queue.push(at(13, 9, 0), ReminderKind::DailyMotivation, "t", "tomorrow");

        assert_eq!(queue.next_fire_at(), Some(at(12, 9, 0)));
        let due: Vec<_> = queue
            .pop_due(at(12, 10, 0))
            .into_iter()
            .map(|r| r.message)
            .collect();
        assert_eq!(due, vec!["early", "early-2", "late"]);
        assert_eq!(queue.len(), 1);
        assert!(queue.pop_due(at(12, 23, 59)).is_empty());
    }

    #[test]
    fn cancel_by_id_and_kind() {
        let mut queue = ReminderQueue::new();
        let lecture = Uuid::new_v4();
        let a = queue.push(at(12, 9, 0), ReminderKind::Schedule(lecture), "t", "a");
        queue.push(at(12, 10, 0), ReminderKind::Schedule(lecture), "t", "b");
        queue.push(at(12, 11, 0), ReminderKind::DailyMotivation, "t", "c");

        assert!(queue.cancel(a));
        assert!(!queue.cancel(a));
        assert_eq!(
            queue.cancel_where(|k| *k == ReminderKind::Schedule(lecture)),
            1
        );
        assert_eq!(queue.len(), 1);

        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.next_fire_at(), None);
    }
}
