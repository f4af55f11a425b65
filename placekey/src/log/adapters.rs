//! [`Logger`] implementations.

use super::{LogLevel, Logger};
use std::fmt::Arguments;
use std::sync::Mutex;

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    #[inline]
    fn log(&self, _level: LogLevel, _args: Arguments<'_>) {}
}

/// Forwards messages to the `tracing` crate.
///
/// Output only appears once a subscriber is installed, e.g. with
/// [`crate::logging::init_logging`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "placekey", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "placekey", "{}", args),
            LogLevel::Info => tracing::info!(target: "placekey", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "placekey", "{}", args),
            LogLevel::Error => tracing::error!(target: "placekey", "{}", args),
        }
    }
}

/// Keeps formatted messages in memory.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded messages with their levels, oldest first.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries.lock().unwrap().clone()
    }

    /// Recorded message texts, oldest first.
    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    /// Recorded messages at `level` or above.
    pub fn at_least(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l >= level)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        self.entries.lock().unwrap().push((level, args.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_loggers_are_send_sync() {
        assert_send_sync::<NoOpLogger>();
        assert_send_sync::<TracingLogger>();
        assert_send_sync::<MemoryLogger>();
    }

    #[test]
    fn test_noop_and_tracing_accept_messages() {
        let loggers: Vec<Box<dyn Logger>> = vec![Box::new(NoOpLogger), Box::new(TracingLogger)];
        for logger in loggers {
            logger.info(format_args!("lookup {}", "@5vg-7gq-tvz"));
            logger.error(format_args!("failed"));
        }
    }

    #[test]
    fn test_memory_logger_filters_by_level() {
        let logger = MemoryLogger::new();
        logger.debug(format_args!("retrying"));
        logger.warn(format_args!("malformed body"));
        logger.error(format_args!("gave up"));

        assert_eq!(logger.messages().len(), 3);
        assert_eq!(
            logger.at_least(LogLevel::Warn),
            vec!["malformed body", "gave up"]
        );
    }
}
