/// Delivery channel for reminders. Fire-and-forget: there is no confirmation.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Writes reminders to the log and to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) {
        tracing::info!("Notification: {} - {}", title, message);
        println!("[{}] {}", title, message);
    }
}
