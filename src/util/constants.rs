// JobLogs - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Library metadata
// =============================================================================

/// Library display name.
pub const APP_NAME: &str = "JobLogs";

/// Current library version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Identifier formats
// =============================================================================

/// Separator between the fields of a runtime identifier.
pub const ID_FIELD_SEPARATOR: char = '_';

/// Type tag prefixed to derived task IDs.
pub const TASK_ID_PREFIX: &str = "task_";

/// Type tag prefixed to derived job IDs.
pub const JOB_ID_PREFIX: &str = "job_";

/// `chrono` format of the timestamp field of job/task/attempt IDs
/// (e.g. `201601081945`).
pub const JOB_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";

// =============================================================================
// Discovery limits
// =============================================================================

/// Maximum number of matches a single discovery emits.
pub const DEFAULT_MAX_MATCHES: usize = 100_000;

/// Minimum sensible value for the max-matches limit.
pub const MIN_MAX_MATCHES: usize = 1;

/// Hard upper bound on max matches (prevents configuration mistakes).
pub const ABSOLUTE_MAX_MATCHES: usize = 10_000_000;

// =============================================================================
// Matcher limits
// =============================================================================

/// Maximum regex pattern length accepted by `RegexMatcher`.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4_096;

// =============================================================================
// Logging
// =============================================================================

/// Default log level when neither RUST_LOG, a debug flag, nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Export
// =============================================================================

/// Format of the `submitted_at` column in CSV exports.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

// =============================================================================
// File names
// =============================================================================

/// Conventional configuration file name.
pub const CONFIG_FILE_NAME: &str = "joblogs.toml";
