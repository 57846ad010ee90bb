// JobLogs - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// One enum per subsystem; all errors preserve the causal chain for
// diagnostic logging.
//
// Tolerated I/O failures during discovery are NOT errors: they are reported
// through `util::logging::WarningSink` and never reach these types.

use std::fmt;
use std::io;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Discovery errors
// ---------------------------------------------------------------------------

/// Errors related to log discovery.
///
/// Only caller contract violations live here; listing and reading failures
/// are downgraded to warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// A log-dir group was a single directory string rather than a list of
    /// directories.
    BareGroup { index: usize, value: String },
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BareGroup { index, value } => write!(
                f,
                "Log dir group {index} is a single path ('{value}'), expected a list of \
                 directories. Wrap it in a list: [\"{value}\"]"
            ),
        }
    }
}

impl std::error::Error for DiscoveryError {}

// ---------------------------------------------------------------------------
// Matcher errors
// ---------------------------------------------------------------------------

/// Errors building a path matcher.
#[derive(Debug)]
pub enum MatcherError {
    /// Regex pattern failed to compile.
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },

    /// Regex pattern exceeds the maximum allowed length.
    RegexTooLong { length: usize, max_length: usize },

    /// Glob pattern failed to compile.
    InvalidGlob {
        pattern: String,
        source: glob::PatternError,
    },
}

impl fmt::Display for MatcherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegex { pattern, source } => {
                write!(f, "Invalid matcher regex '{pattern}': {source}")
            }
            Self::RegexTooLong { length, max_length } => write!(
                f,
                "Matcher regex is {length} chars, exceeds maximum of {max_length}"
            ),
            Self::InvalidGlob { pattern, source } => {
                write!(f, "Invalid matcher glob '{pattern}': {source}")
            }
        }
    }
}

impl std::error::Error for MatcherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            Self::InvalidGlob { source, .. } => Some(source),
            Self::RegexTooLong { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Failure writing a list of discovered log matches to a report.
///
/// `path` names the report destination and is used only in messages.
#[derive(Debug)]
pub enum ExportError {
    /// The writer rejected the match report.
    Io { path: PathBuf, source: io::Error },

    /// A match record could not be encoded as a CSV row.
    Csv { path: PathBuf, source: csv::Error },

    /// The match list could not be encoded as JSON.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(
                f,
                "Could not write log match report '{}': {source}",
                path.display()
            ),
            Self::Csv { path, source } => write!(
                f,
                "Could not encode log matches as CSV for '{}': {source}",
                path.display()
            ),
            Self::Json { path, source } => write!(
                f,
                "Could not encode log matches as JSON for '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Problems with the discovery config file (`joblogs.toml`).
///
/// `platform::config::load_config` never returns these; it downgrades them
/// to warnings and falls back to defaults. `parse_config` surfaces them.
#[derive(Debug)]
pub enum ConfigError {
    /// The file is not valid TOML or does not fit the expected sections.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The file exists but could not be read.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => write!(
                f,
                "Invalid log discovery config '{}': {source}",
                path.display()
            ),
            Self::Io { path, source } => write!(
                f,
                "Cannot read log discovery config '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}
