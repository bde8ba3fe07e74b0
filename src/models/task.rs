use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::parse_date;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskType {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl TaskType {
    pub const ALL: [TaskType; 3] = [TaskType::Daily, TaskType::Weekly, TaskType::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Daily => "Daily",
            TaskType::Weekly => "Weekly",
            TaskType::Monthly => "Monthly",
        }
    }
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TaskType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown task type '{}' (Daily, Weekly, Monthly)", s))
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Accept "in-progress" / "in_progress" from the command line too
        let wanted = s.trim().replace(['-', '_'], " ");
        TaskStatus::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown status '{}' (Pending, In Progress, Done)", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub due_date: String, // DD-MM-YYYY
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub created_at: String, // DD-MM-YYYY
}

#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub due_date: String,
    pub task_type: TaskType,
    pub status: TaskStatus,
}

impl NewTask {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty()
            || self.description.trim().is_empty()
            || self.due_date.trim().is_empty()
        {
            return Err(AppError::Validation(
                "name, description and due date are required".to_string(),
            ));
        }
        if parse_date(&self.due_date).is_none() {
            return Err(AppError::Validation(format!(
                "invalid due date '{}', expected DD-MM-YYYY",
                self.due_date
            )));
        }
        Ok(())
    }
}

impl Task {
    pub fn from_new(new: NewTask, created_at: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            description: new.description,
            due_date: new.due_date.trim().to_string(),
            task_type: new.task_type,
            status: new.status,
            created_at,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// Partial update merged into an existing task; `None` fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.task_type.is_none()
            && self.status.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("name cannot be empty".to_string()));
            }
        }
        if let Some(description) = &self.description {
            if description.trim().is_empty() {
                return Err(AppError::Validation("description cannot be empty".to_string()));
            }
        }
        if let Some(due) = &self.due_date {
            if parse_date(due).is_none() {
                return Err(AppError::Validation(format!(
                    "invalid due date '{}', expected DD-MM-YYYY",
                    due
                )));
            }
        }
        Ok(())
    }

    /// Merges the fields into `task`. Returns true when the task moved into `Done`.
    pub fn apply(self, task: &mut Task) -> bool {
        let was_done = task.is_done();
        if let Some(name) = self.name {
            task.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date.trim().to_string();
        }
        if let Some(task_type) = self.task_type {
            task.task_type = task_type;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        !was_done && task.is_done()
    }
}

/// Tasks split into their recurrence sections, each in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasksByType {
    pub daily: Vec<Task>,
    pub weekly: Vec<Task>,
    pub monthly: Vec<Task>,
}

impl TasksByType {
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut grouped = Self::default();
        for task in tasks {
            match task.task_type {
                TaskType::Daily => grouped.daily.push(task),
                TaskType::Weekly => grouped.weekly.push(task),
                TaskType::Monthly => grouped.monthly.push(task),
            }
        }
        grouped
    }

    pub fn section(&self, task_type: TaskType) -> &[Task] {
        match task_type {
            TaskType::Daily => &self.daily,
            TaskType::Weekly => &self.weekly,
            TaskType::Monthly => &self.monthly,
        }
    }
}
