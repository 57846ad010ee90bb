// JobLogs - platform/config.rs
//
// Config-file loading with startup validation.
//
// A missing file is not an error (defaults apply). An unreadable or
// unparseable file falls back to defaults with a warning. Each field is
// validated against named constants; out-of-range values produce an
// actionable warning and the default is kept.

use crate::core::discovery::DiscoveryConfig;
use crate::core::model::LogDirGroup;
use crate::util::constants;
use crate::util::error::ConfigError;
use std::path::Path;

// =============================================================================
// Raw file shape
// =============================================================================

/// Raw deserialisable shape of the config file.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Redundant log locations, searched in order, e.g.
    /// `[["s3://bucket/logs/j-1/"], ["ssh://master/var/log/hadoop"]]`.
    pub log_dir_groups: Option<Vec<LogDirGroup>>,
    /// Maximum matches per discovery.
    pub max_matches: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

// =============================================================================
// Validated config
// =============================================================================

/// Validated configuration derived from the config file.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Discovery --
    /// Groups passed verbatim to discovery. A bare-string group is kept as
    /// written so discovery reports it as a contract error.
    pub log_dir_groups: Vec<LogDirGroup>,
    /// Maximum matches per discovery.
    pub max_matches: usize,

    // -- Logging --
    /// Logging level string (for `util::logging::init`).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir_groups: Vec::new(),
            max_matches: constants::DEFAULT_MAX_MATCHES,
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Discovery settings derived from this config.
    pub fn discovery_config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            max_matches: self.max_matches,
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Load and validate the config file at `path`.
///
/// Returns the validated config and a list of non-fatal warnings. Never
/// fails: problems are reported as warnings and defaults are used.
pub fn load_config(path: &Path) -> (AppConfig, Vec<String>) {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config file found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(source) => {
            let err = ConfigError::Io {
                path: path.to_path_buf(),
                source,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    match parse_config(&content, path) {
        Ok((config, warnings)) => {
            tracing::info!(path = %path.display(), "Loaded config file");
            (config, warnings)
        }
        Err(err) => {
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Parse and validate config `content`; `origin` is used in messages.
///
/// Fails only if the TOML itself is malformed. Invalid values are reported
/// in the returned warnings and replaced by defaults.
pub fn parse_config(
    content: &str,
    origin: &Path,
) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|source| ConfigError::TomlParse {
        path: origin.to_path_buf(),
        source,
    })?;

    let mut warnings: Vec<String> = Vec::new();
    let mut config = AppConfig::default();

    // -- Discovery: log_dir_groups --
    if let Some(groups) = raw.discovery.log_dir_groups {
        config.log_dir_groups = groups;
    }

    // -- Discovery: max_matches --
    if let Some(max) = raw.discovery.max_matches {
        if (constants::MIN_MAX_MATCHES..=constants::ABSOLUTE_MAX_MATCHES).contains(&max) {
            config.max_matches = max;
        } else {
            warnings.push(format!(
                "[discovery] max_matches = {max} is out of range ({}-{}). Using default ({}).",
                constants::MIN_MAX_MATCHES,
                constants::ABSOLUTE_MAX_MATCHES,
                constants::DEFAULT_MAX_MATCHES,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    Ok((config, warnings))
}
