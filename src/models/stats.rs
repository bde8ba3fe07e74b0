use serde::Serialize;

use super::Task;

/// Hours credited per completed task.
const HOURS_PER_TASK: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub completion_percentage: f64,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.is_done()).count();
        let completion_percentage = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Self {
            total,
            completed,
            completion_percentage,
        }
    }

    /// Completed ratio rounded to one decimal place.
    pub fn gpa(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let ratio = self.completed as f64 / self.total as f64;
        (ratio * 10.0).round() / 10.0
    }

    pub fn study_hours(&self) -> f64 {
        self.completed as f64 * HOURS_PER_TASK
    }
}

/// Everything the statistics view shows in one read.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub current_streak: u32,
    pub stats: TaskStats,
    pub gpa: f64,
    pub study_hours: f64,
    pub quote: &'static str,
    pub tip: &'static str,
}
