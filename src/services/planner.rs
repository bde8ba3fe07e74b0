use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::{AppError, Result};
use crate::models::{
    format_date, sort_schedules, Dashboard, Document, NewSchedule, NewTask, Profile, Schedule,
    Settings, Task, TaskStats, TaskStatus, TaskUpdate, TasksByType, Theme,
};
use crate::store::DataStore;

use super::motivation::DailyPick;
use super::notifier::Notifier;
use super::reminders::{
    next_fire_time, schedule_message, Reminder, ReminderId, ReminderKind, ReminderQueue,
    MOTIVATION_TITLE, SCHEDULE_REMINDER_TITLE,
};
use super::streak::{self, StreakOutcome};
use super::week::{self, WeekView};

const DEFAULT_MOTIVATION_DELAY: TimeDelta = TimeDelta::seconds(5);

/// What the startup routine did.
#[derive(Debug, Clone, PartialEq)]
pub struct StartupReport {
    pub streak: StreakOutcome,
    pub reminders_queued: usize,
    pub motivation_queued: bool,
}

pub struct PlannerService {
    store: Arc<DataStore>,
    clock: Arc<dyn Clock>,
    reminders: Mutex<ReminderQueue>,
    pick: DailyPick,
    motivation_delay: TimeDelta,
}

impl PlannerService {
    pub fn new(store: Arc<DataStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            reminders: Mutex::new(ReminderQueue::new()),
            pick: DailyPick::random(),
            motivation_delay: DEFAULT_MOTIVATION_DELAY,
        }
    }

    pub fn with_motivation_delay(mut self, delay: TimeDelta) -> Self {
        self.motivation_delay = delay;
        self
    }

    pub fn with_daily_pick(mut self, pick: DailyPick) -> Self {
        self.pick = pick;
        self
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    async fn document(&self) -> Result<Document> {
        self.store.load(true).await
    }

    // Startup

    /// Streak check, daily motivation and schedule reminders. Schedule cleanup
    /// is left to the caller so it can run after a delay.
    pub async fn startup(&self) -> Result<StartupReport> {
        let streak = self.check_streak().await?;
        let mut reminders_queued = 0;
        let mut motivation_queued = false;
        if self.get_settings().await?.notifications_enabled {
            motivation_queued = self.queue_daily_motivation().await?.is_some();
            reminders_queued = self.reschedule_all().await?;
        }
        tracing::info!(
            "Startup: streak {}, {} reminders queued",
            streak.streak(),
            reminders_queued
        );
        Ok(StartupReport {
            streak,
            reminders_queued,
            motivation_queued,
        })
    }

    // Schedules

    /// All schedules, newest date first and earliest time first within a date.
    pub async fn get_all_schedules(&self) -> Result<Vec<Schedule>> {
        let mut schedules = self.document().await?.schedules;
        sort_schedules(&mut schedules);
        Ok(schedules)
    }

    pub async fn schedules_on(&self, date: NaiveDate) -> Result<Vec<Schedule>> {
        let mut day: Vec<Schedule> = self
            .document()
            .await?
            .schedules
            .into_iter()
            .filter(|s| s.parsed_date() == Some(date))
            .collect();
        sort_schedules(&mut day);
        Ok(day)
    }

    pub async fn add_schedule(&self, new: NewSchedule) -> Result<Schedule> {
        new.validate()?;
        let schedule = Schedule::from_new(new);
        let stored = schedule.clone();
        let notifications_enabled = self
            .store
            .update(move |doc| {
                doc.schedules.push(stored);
                sort_schedules(&mut doc.schedules);
                doc.settings.notifications_enabled
            })
            .await?;
        tracing::info!("Schedule added: '{}' on {} at {}", schedule.name, schedule.date, schedule.time);

        if schedule.notification && notifications_enabled {
            self.queue_schedule_reminder(&schedule).await;
        }
        Ok(schedule)
    }

    /// Removes every schedule with this name. Returns how many were removed.
    pub async fn delete_schedule_by_name(&self, name: &str) -> Result<usize> {
        let removed = self
            .store
            .update(|doc| drain_where(&mut doc.schedules, |s| s.name == name))
            .await?;
        self.forget_schedules(&removed).await;
        tracing::info!("Deleted {} schedule(s) named '{}'", removed.len(), name);
        Ok(removed.len())
    }

    pub async fn delete_schedule(&self, id: Uuid) -> Result<bool> {
        let removed = self
            .store
            .update(|doc| drain_where(&mut doc.schedules, |s| s.id == id))
            .await?;
        self.forget_schedules(&removed).await;
        Ok(!removed.is_empty())
    }

    /// Drops schedules dated outside the current Monday–Sunday week.
    pub async fn clean_old_schedules(&self) -> Result<usize> {
        let today = self.today();
        let removed = self
            .store
            .update(|doc| drain_where(&mut doc.schedules, |s| !week::in_week(s, today)))
            .await?;
        self.forget_schedules(&removed).await;
        if !removed.is_empty() {
            tracing::info!("Cleaned {} schedule(s) outside the current week", removed.len());
        }
        Ok(removed.len())
    }

    pub async fn build_week_view(&self, week_start: NaiveDate) -> Result<WeekView> {
        let doc = self.document().await?;
        Ok(week::build_week_view(&doc.schedules, week_start, self.now()))
    }

    pub async fn current_week_view(&self) -> Result<WeekView> {
        let (monday, _) = week::week_bounds(self.today());
        self.build_week_view(monday).await
    }

    async fn forget_schedules(&self, removed: &[Schedule]) {
        if removed.is_empty() {
            return;
        }
        let mut queue = self.reminders.lock().await;
        queue.cancel_where(|kind| {
            matches!(kind, ReminderKind::Schedule(id) if removed.iter().any(|s| s.id == *id))
        });
    }

    // Tasks

    pub async fn get_all_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.document().await?.tasks)
    }

    pub async fn tasks_by_type(&self) -> Result<TasksByType> {
        Ok(TasksByType::from_tasks(self.get_all_tasks().await?))
    }

    pub async fn find_task_by_name(&self, name: &str) -> Result<Option<Task>> {
        Ok(self
            .get_all_tasks()
            .await?
            .into_iter()
            .find(|t| t.name == name))
    }

    pub async fn add_task(&self, new: NewTask) -> Result<Task> {
        new.validate()?;
        let task = Task::from_new(new, format_date(self.today()));
        let stored = task.clone();
        self.store.update(move |doc| doc.tasks.push(stored)).await?;
        tracing::info!("Task added: '{}' ({})", task.name, task.task_type);
        if task.is_done() {
            self.check_streak().await?;
        }
        Ok(task)
    }

    /// Merges `update` into the first task named `name`. Returns false, without
    /// error, when there is no such task.
    pub async fn update_task(&self, name: &str, update: TaskUpdate) -> Result<bool> {
        update.validate()?;
        let outcome = self
            .store
            .update(|doc| {
                doc.tasks
                    .iter_mut()
                    .find(|t| t.name == name)
                    .map(|task| update.apply(task))
            })
            .await?;

        match outcome {
            Some(became_done) => {
                tracing::info!("Task updated: '{}'", name);
                if became_done {
                    self.check_streak().await?;
                }
                Ok(true)
            }
            None => {
                tracing::debug!("No task named '{}' to update", name);
                Ok(false)
            }
        }
    }

    pub async fn set_task_status(&self, id: Uuid, status: TaskStatus) -> Result<Task> {
        let outcome = self
            .store
            .update(|doc| {
                doc.tasks.iter_mut().find(|t| t.id == id).map(|task| {
                    let became_done = TaskUpdate::status(status).apply(task);
                    (task.clone(), became_done)
                })
            })
            .await?;

        let (task, became_done) =
            outcome.ok_or_else(|| AppError::NotFound(format!("task {}", id)))?;
        tracing::info!("Task '{}' is now {}", task.name, task.status);
        if became_done {
            self.check_streak().await?;
        }
        Ok(task)
    }

    /// Marks the task done and counts today towards the streak.
    pub async fn complete_task(&self, id: Uuid) -> Result<Task> {
        self.set_task_status(id, TaskStatus::Done).await
    }

    /// Removes every task with this name. Returns how many were removed.
    pub async fn delete_task(&self, name: &str) -> Result<usize> {
        let removed = self
            .store
            .update(|doc| drain_where(&mut doc.tasks, |t| t.name == name).len())
            .await?;
        tracing::info!("Deleted {} task(s) named '{}'", removed, name);
        Ok(removed)
    }

    pub async fn delete_task_by_id(&self, id: Uuid) -> Result<bool> {
        let removed = self
            .store
            .update(|doc| drain_where(&mut doc.tasks, |t| t.id == id).len())
            .await?;
        Ok(removed > 0)
    }

    pub async fn compute_stats(&self) -> Result<TaskStats> {
        Ok(TaskStats::from_tasks(&self.get_all_tasks().await?))
    }

    // Streak and dashboard

    /// Advances, keeps or resets the streak for today. Only writes when it changes.
    pub async fn check_streak(&self) -> Result<StreakOutcome> {
        let today = self.today();
        let current = self.store.load(false).await?;
        let outcome = streak::evaluate(&current.motivation, today);
        if !outcome.changed() {
            return Ok(outcome);
        }
        let outcome = self
            .store
            .update(|doc| streak::apply(&mut doc.motivation, today))
            .await?;
        tracing::info!("Streak is now {} day(s)", outcome.streak());
        Ok(outcome)
    }

    pub async fn current_streak(&self) -> Result<u32> {
        Ok(self.document().await?.motivation.current_streak)
    }

    pub async fn dashboard(&self) -> Result<Dashboard> {
        let doc = self.document().await?;
        let stats = TaskStats::from_tasks(&doc.tasks);
        Ok(Dashboard {
            current_streak: doc.motivation.current_streak,
            stats,
            gpa: stats.gpa(),
            study_hours: stats.study_hours(),
            quote: self.pick.quote,
            tip: self.pick.tip,
        })
    }

    pub fn daily_pick(&self) -> DailyPick {
        self.pick
    }

    // Profile and settings

    pub async fn get_profile(&self) -> Result<Profile> {
        Ok(self.document().await?.profile)
    }

    /// Sets name and title; the avatar is kept.
    pub async fn update_profile(&self, name: &str, title: &str) -> Result<Profile> {
        if name.trim().is_empty() || title.trim().is_empty() {
            return Err(AppError::Validation("name and title are required".to_string()));
        }
        let (name, title) = (name.trim().to_string(), title.trim().to_string());
        self.store
            .update(move |doc| {
                doc.profile.name = name;
                doc.profile.title = title;
                doc.profile.clone()
            })
            .await
    }

    pub async fn set_avatar(&self, path: &str) -> Result<Profile> {
        if path.trim().is_empty() {
            return Err(AppError::Validation("avatar path is empty".to_string()));
        }
        let path = path.trim().to_string();
        self.store
            .update(move |doc| {
                doc.profile.avatar_path = path;
                doc.profile.clone()
            })
            .await
    }

    pub async fn get_settings(&self) -> Result<Settings> {
        Ok(self.document().await?.settings)
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<Settings> {
        self.store
            .update(|doc| {
                doc.settings.theme = theme;
                doc.settings.clone()
            })
            .await
    }

    pub async fn set_primary_color(&self, color: &str) -> Result<Settings> {
        if color.trim().is_empty() {
            return Err(AppError::Validation("colour name is empty".to_string()));
        }
        let color = color.trim().to_string();
        self.store
            .update(move |doc| {
                doc.settings.primary_color = color;
                doc.settings.clone()
            })
            .await
    }

    /// Persists the switch. Turning it off drops every pending reminder;
    /// turning it on rebuilds them from the stored schedules.
    pub async fn set_notifications_enabled(&self, enabled: bool) -> Result<Settings> {
        let settings = self
            .store
            .update(|doc| {
                doc.settings.notifications_enabled = enabled;
                doc.settings.clone()
            })
            .await?;

        if enabled {
            self.reschedule_all().await?;
            self.queue_daily_motivation().await?;
        } else {
            self.cancel_all_reminders().await;
        }
        Ok(settings)
    }

    // Reminders

    /// Queues a reminder for one schedule if notifications are on.
    pub async fn schedule_reminder(&self, schedule: &Schedule) -> Result<Option<ReminderId>> {
        if !self.get_settings().await?.notifications_enabled {
            return Ok(None);
        }
        Ok(self.queue_schedule_reminder(schedule).await)
    }

    async fn queue_schedule_reminder(&self, schedule: &Schedule) -> Option<ReminderId> {
        let Some(fire_at) = next_fire_time(&schedule.time, self.now()) else {
            tracing::warn!("Cannot schedule '{}': bad time '{}'", schedule.name, schedule.time);
            return None;
        };
        let id = self.reminders.lock().await.push(
            fire_at,
            ReminderKind::Schedule(schedule.id),
            SCHEDULE_REMINDER_TITLE,
            schedule_message(&schedule.name),
        );
        tracing::debug!("Reminder {} for '{}' at {}", id, schedule.name, fire_at);
        Some(id)
    }

    /// Queues today's motivation quote unless it was already sent today.
    pub async fn queue_daily_motivation(&self) -> Result<Option<ReminderId>> {
        let doc = self.document().await?;
        let today = format_date(self.today());
        if !doc.settings.notifications_enabled || doc.motivation.last_sent_date == today {
            return Ok(None);
        }

        let Some(fire_at) = self.now().checked_add_signed(self.motivation_delay) else {
            tracing::warn!(
                "Motivation delay of {}s is out of range, not queueing it",
                self.motivation_delay.num_seconds()
            );
            return Ok(None);
        };

        let mut queue = self.reminders.lock().await;
        queue.cancel_where(|kind| *kind == ReminderKind::DailyMotivation);
        let id = queue.push(
            fire_at,
            ReminderKind::DailyMotivation,
            MOTIVATION_TITLE,
            self.pick.quote,
        );
        Ok(Some(id))
    }

    pub async fn cancel_reminder(&self, id: ReminderId) -> bool {
        self.reminders.lock().await.cancel(id)
    }

    pub async fn cancel_all_reminders(&self) {
        let mut queue = self.reminders.lock().await;
        let count = queue.len();
        queue.clear();
        tracing::info!("Cancelled {} pending reminder(s)", count);
    }

    /// Rebuilds the schedule reminders from every notification-enabled schedule.
    pub async fn reschedule_all(&self) -> Result<usize> {
        let schedules = self.get_all_schedules().await?;
        self.reminders
            .lock()
            .await
            .cancel_where(|kind| matches!(kind, ReminderKind::Schedule(_)));

        let mut queued = 0;
        for schedule in schedules.iter().filter(|s| s.notification) {
            if self.queue_schedule_reminder(schedule).await.is_some() {
                queued += 1;
            }
        }
        Ok(queued)
    }

    pub async fn pending_reminders(&self) -> Vec<Reminder> {
        self.reminders.lock().await.iter().cloned().collect()
    }

    pub async fn next_reminder_at(&self) -> Option<NaiveDateTime> {
        self.reminders.lock().await.next_fire_at()
    }

    /// Delivers every reminder that is due. Returns how many were delivered.
    pub async fn dispatch_due(&self, notifier: &dyn Notifier) -> Result<usize> {
        let notifications_enabled = self.get_settings().await?.notifications_enabled;
        let due = self.reminders.lock().await.pop_due(self.now());
        if due.is_empty() {
            return Ok(0);
        }
        if !notifications_enabled {
            tracing::debug!("Dropping {} reminder(s): notifications are off", due.len());
            return Ok(0);
        }

        let mut motivation_sent = false;
        for reminder in &due {
            notifier.notify(&reminder.title, &reminder.message);
            motivation_sent |= reminder.kind == ReminderKind::DailyMotivation;
        }
        if motivation_sent {
            let today = format_date(self.today());
            self.store
                .update(move |doc| doc.motivation.last_sent_date = today)
                .await?;
        }
        Ok(due.len())
    }
}

/// Removes matching items in place, keeping the order of the rest.
fn drain_where<T, F>(items: &mut Vec<T>, mut pred: F) -> Vec<T>
where
    F: FnMut(&T) -> bool,
{
    let mut removed = Vec::new();
    let mut kept = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if pred(&item) {
            removed.push(item);
        } else {
            kept.push(item);
        }
    }
    *items = kept;
    removed
}
