//! Scheduled runs: notification delivery, templates and log rotation.

mod logs;
mod notifier;
mod templates;

pub use logs::{cleanup_old_logs, daily_log_path};
pub use notifier::{EmailNotifier, Notifier};
pub use templates::{error_notification, problems_notification, success_notification, Notification};
