use tracing::error;

/// Surfaces a blocking, user-facing alert (a browser `alert()`, a CLI error line).
pub trait Alert {
    fn alert(&self, message: &str);
}

/// Alerts that only go to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlert;

impl Alert for LogAlert {
    fn alert(&self, message: &str) {
        error!(target: "brushmap::alert", "{message}");
    }
}

impl<F: Fn(&str)> Alert for F {
    fn alert(&self, message: &str) { self(message) }
}
