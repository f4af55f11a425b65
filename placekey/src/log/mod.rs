//! Logging abstraction.
//!
//! Library components never call a logging backend directly. They hold an
//! `Arc<dyn Logger>` and log through the `log_*!` macros, so the client and
//! batch processor can run silently in tests and forward to `tracing` in
//! the CLI.
//!
//! - [`Logger`]: the interface components depend on
//! - [`TracingLogger`]: forwards to the `tracing` crate
//! - [`NoOpLogger`]: discards everything (the default)
//! - [`MemoryLogger`]: keeps messages in memory for inspection
//!
//! ```
//! use placekey::log::{Logger, MemoryLogger};
//! use placekey::log_warn;
//! use std::sync::Arc;
//!
//! let memory = Arc::new(MemoryLogger::new());
//! let logger: Arc<dyn Logger> = memory.clone();
//! log_warn!(logger, "cache disabled for {} queries", 3);
//!
//! assert_eq!(memory.messages(), vec!["cache disabled for 3 queries"]);
//! ```

mod adapters;

pub use adapters::{MemoryLogger, NoOpLogger, TracingLogger};

use std::fmt::Arguments;

/// Severity of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Logging interface for library components.
pub trait Logger: Send + Sync {
    /// Log a message at `level`. The other methods delegate here.
    fn log(&self, level: LogLevel, args: Arguments<'_>);

    fn trace(&self, args: Arguments<'_>) {
        self.log(LogLevel::Trace, args);
    }

    fn debug(&self, args: Arguments<'_>) {
        self.log(LogLevel::Debug, args);
    }

    fn info(&self, args: Arguments<'_>) {
        self.log(LogLevel::Info, args);
    }

    fn warn(&self, args: Arguments<'_>) {
        self.log(LogLevel::Warn, args);
    }

    fn error(&self, args: Arguments<'_>) {
        self.log(LogLevel::Error, args);
    }
}

#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)*) => {
        $logger.trace(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($logger:expr, $($arg:tt)*) => {
        $logger.error(format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_macros_route_to_levels() {
        let memory = Arc::new(MemoryLogger::new());
        let logger: Arc<dyn Logger> = memory.clone();

        log_trace!(logger, "t");
        log_debug!(logger, "d");
        log_info!(logger, "i {}", 1);
        log_warn!(logger, "w");
        log_error!(logger, "e");

        let levels: Vec<LogLevel> = memory.entries().into_iter().map(|(l, _)| l).collect();
        assert_eq!(
            levels,
            vec![
                LogLevel::Trace,
                LogLevel::Debug,
                LogLevel::Info,
                LogLevel::Warn,
                LogLevel::Error
            ]
        );
        assert_eq!(memory.entries()[2].1, "i 1");
    }
}
