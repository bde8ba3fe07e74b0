use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::TimeDelta;

use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::Result;
use crate::services::{LogNotifier, Notifier, PlannerService};
use crate::store::DataStore;

// Upper bound on one idle sleep, so clock changes are picked up
const MAX_IDLE: Duration = Duration::from_secs(60);

pub struct App {
    pub planner: Arc<PlannerService>,
    notifier: Arc<dyn Notifier>,
    cleanup_delay: Duration,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let store = Arc::new(DataStore::new(PathBuf::from(&config.data_path)));
        let motivation_delay = TimeDelta::from_std(config.motivation_delay())
            .unwrap_or_else(|_| TimeDelta::seconds(5));
        let planner = PlannerService::new(store, Arc::new(SystemClock))
            .with_motivation_delay(motivation_delay);

        Self::with_parts(Arc::new(planner), Arc::new(LogNotifier), config.cleanup_delay())
    }

    pub fn with_parts(
        planner: Arc<PlannerService>,
        notifier: Arc<dyn Notifier>,
        cleanup_delay: Duration,
    ) -> Self {
        Self {
            planner,
            notifier,
            cleanup_delay,
        }
    }

    /// Runs until Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Startup, deferred cleanup, then delivers reminders as they fall due
    /// until `shutdown` completes.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let report = self.planner.startup().await?;
        if report.streak.changed() {
            tracing::info!("Study streak: {} day(s)", report.streak.streak());
        }

        let cleanup = {
            let planner = Arc::clone(&self.planner);
            let delay = self.cleanup_delay;
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                if let Err(e) = planner.clean_old_schedules().await {
                    tracing::error!("Failed to clean old schedules: {}", e);
                }
            })
        };

        tokio::pin!(shutdown);
        loop {
            match self.planner.dispatch_due(self.notifier.as_ref()).await {
                Ok(0) => {}
                Ok(n) => tracing::debug!("Delivered {} reminder(s)", n),
                Err(e) => tracing::error!("Failed to deliver reminders: {}", e),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.idle_time().await) => {}
                _ = &mut shutdown => break,
            }
        }

        cleanup.abort();
        tracing::info!("Reminder loop stopped");
        Ok(())
    }

    async fn idle_time(&self) -> Duration {
        match self.planner.next_reminder_at().await {
            Some(at) => (at - self.planner.now())
                .to_std()
                .unwrap_or(Duration::ZERO)
                .min(MAX_IDLE),
            None => MAX_IDLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::NewSchedule;
    use crate::services::motivation::{DailyPick, MOTIVATIONAL_QUOTES};
    use chrono::NaiveDate;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, _title: &str, message: &str) {
            self.sent.lock().unwrap().push(message.to_string());
        }
    }

    #[tokio::test]
    async fn run_cleans_up_and_sends_motivation() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(DataStore::new(dir.path().join("study_buddy.json")));
        let now = NaiveDate::from_ymd_opt(2025, 3, 12)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let planner = Arc::new(
            PlannerService::new(store, Arc::new(FixedClock::new(now)))
                .with_motivation_delay(TimeDelta::zero())
                .with_daily_pick(DailyPick {
                    quote: MOTIVATIONAL_QUOTES[2],
                    tip: "tip",
                }),
        );
        for (name, date) in [("old", "01-01-2024"), ("current", "13-03-2025")] {
            planner
                .add_schedule(NewSchedule {
                    name: name.to_string(),
                    subject: "History".to_string(),
                    date: date.to_string(),
                    time: "18:00".to_string(),
                    ..Default::default()
                })
                .await
                .unwrap();
        }

        let notifier = Arc::new(RecordingNotifier::default());
        let app = App::with_parts(planner.clone(), notifier.clone(), Duration::ZERO);
        app.run_until(tokio::time::sleep(Duration::from_millis(200)))
            .await
            .unwrap();

        let left: Vec<_> = planner
            .get_all_schedules()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(left, vec!["current"]);
        assert_eq!(*notifier.sent.lock().unwrap(), vec![MOTIVATIONAL_QUOTES[2]]);
        assert_eq!(planner.current_streak().await.unwrap(), 1);
    }
}
