use crate::core::{Notification, Notifier, Severity};
use colored::{ColoredString, Colorize};

/// Prints notifications to stderr as a coloured badge and mirrors them into
/// the log.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self
    }

    pub fn render(notification: &Notification) -> ColoredString {
        let (r, g, b) = notification.severity.rgb();
        format!(" {} ", notification.message)
            .bold()
            .white()
            .on_truecolor(r, g, b)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        let color = notification.severity.color();
        match notification.severity {
            Severity::Success => tracing::info!(color, "{}", notification.message),
            Severity::Warning => tracing::warn!(color, "{}", notification.message),
            Severity::Error => tracing::error!(color, "{}", notification.message),
        }
        eprintln!("{}", Self::render(&notification));
    }
}
