// JobLogs - util/logging.rs
//
// Structured logging with runtime-selectable debug mode, plus the warning
// capability used by discovery to report tolerated I/O failures.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - Debug flag from the embedding application
//   - Config file: [logging] level = "debug"
//
// Output: stderr. Never logs secrets, tokens, or PII at any level.

use std::cell::RefCell;
use std::fmt;
use std::io;
use tracing_subscriber::EnvFilter;

/// Initialise a `tracing` subscriber for the process.
///
/// `debug_flag` is true when the embedding application runs in debug mode.
/// `config_level` is the level from the config file (if present).
///
/// Priority: RUST_LOG env var > debug flag > config level > default "info".
///
/// Returns `false` if a global subscriber was already installed (by the
/// embedding application or a previous call); that subscriber is left alone.
pub fn init(debug_flag: bool, config_level: Option<&str>) -> bool {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            lib = super::constants::APP_NAME,
            version = super::constants::APP_VERSION,
            "Logging initialised"
        );
    }
    installed
}

// =============================================================================
// Warning capability
// =============================================================================

/// The filesystem operation a warning is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    /// Listing a log directory.
    List,
    /// Reading lines from a log file.
    Read,
    /// Listing stopped early because the match cap was reached.
    Limit,
}

impl IoOperation {
    pub fn label(&self) -> &'static str {
        match self {
            IoOperation::List => "list",
            IoOperation::Read => "read",
            IoOperation::Limit => "limit",
        }
    }
}

/// A tolerated I/O failure: which operation, on which path, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogWarning {
    pub operation: IoOperation,
    pub path: String,
    pub message: String,
}

impl LogWarning {
    pub fn new(operation: IoOperation, path: &str, error: &io::Error) -> Self {
        Self {
            operation,
            path: path.to_string(),
            message: error.to_string(),
        }
    }

    /// Discovery stopped in `dir` after yielding `max_matches` logs.
    pub fn limit(dir: &str, max_matches: usize) -> Self {
        Self {
            operation: IoOperation::Limit,
            path: dir.to_string(),
            message: format!(
                "match limit of {max_matches} reached; remaining logs were not listed"
            ),
        }
    }
}

impl fmt::Display for LogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation {
            IoOperation::Limit => write!(f, "Stopped in '{}': {}", self.path, self.message),
            op => write!(f, "Cannot {} '{}': {}", op.label(), self.path, self.message),
        }
    }
}

/// Receiver for warnings raised while listing and reading logs.
///
/// Injected into discovery so callers own where warnings go.
pub trait WarningSink {
    fn warn(&self, warning: &LogWarning);
}

/// Default sink: forwards every warning to `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, warning: &LogWarning) {
        tracing::warn!(
            operation = warning.operation.label(),
            path = %warning.path,
            error = %warning.message,
            "Tolerated log discovery problem"
        );
    }
}

/// Sink that keeps warnings in memory, e.g. to show them in a report.
#[derive(Debug, Default)]
pub struct CollectingSink {
    warnings: RefCell<Vec<LogWarning>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of warnings received so far.
    pub fn len(&self) -> usize {
        self.warnings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.borrow().is_empty()
    }

    /// Snapshot of the warnings received so far, in arrival order.
    pub fn warnings(&self) -> Vec<LogWarning> {
        self.warnings.borrow().clone()
    }

    /// Take all warnings, leaving the sink empty.
    pub fn drain(&self) -> Vec<LogWarning> {
        std::mem::take(&mut *self.warnings.borrow_mut())
    }
}

impl WarningSink for CollectingSink {
    fn warn(&self, warning: &LogWarning) {
        tracing::debug!(warning = %warning, "Warning collected");
        self.warnings.borrow_mut().push(warning.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display_names_operation_and_path() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let w = LogWarning::new(IoOperation::List, "ssh://node1/logs", &err);
        assert_eq!(w.to_string(), "Cannot list 'ssh://node1/logs': access denied");
    }

    #[test]
    fn test_limit_warning_display() {
        let w = LogWarning::limit("s3://bucket/logs", 2);
        assert_eq!(w.operation, IoOperation::Limit);
        assert_eq!(
            w.to_string(),
            "Stopped in 's3://bucket/logs': match limit of 2 reached; remaining logs were not listed"
        );
    }

    #[test]
    fn test_collecting_sink_records_and_drains() {
        let sink = CollectingSink::new();
        assert!(sink.is_empty());

        let err = io::Error::new(io::ErrorKind::Other, "boom");
        sink.warn(&LogWarning::new(IoOperation::Read, "a.log", &err));
        sink.warn(&LogWarning::new(IoOperation::List, "dir/", &err));

        assert_eq!(sink.len(), 2);
        let drained = sink.drain();
        assert_eq!(drained[0].operation, IoOperation::Read);
        assert_eq!(drained[1].path, "dir/");
        assert!(sink.is_empty(), "drain must empty the sink");
    }

    #[test]
    fn test_init_is_safe_to_call_twice() {
        // Whichever call wins, the second must not panic and must report
        // that it did not install a subscriber.
        let _ = init(false, Some("warn"));
        assert!(!init(true, None));
    }
}
