// JobLogs - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// These types are the shared vocabulary across all layers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Identifier record
// =============================================================================

/// The kinds of runtime identifier an `IdRecord` can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdKind {
    ApplicationId,
    ContainerId,
    JobId,
    TaskId,
    AttemptId,
}

impl IdKind {
    /// Returns all variants, coarsest namespace first.
    pub fn all() -> &'static [IdKind] {
        &[
            IdKind::ApplicationId,
            IdKind::ContainerId,
            IdKind::JobId,
            IdKind::TaskId,
            IdKind::AttemptId,
        ]
    }

    /// Key name as used in match records and regex capture groups.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdKind::ApplicationId => "application_id",
            IdKind::ContainerId => "container_id",
            IdKind::JobId => "job_id",
            IdKind::TaskId => "task_id",
            IdKind::AttemptId => "attempt_id",
        }
    }

    /// Inverse of `as_str`.
    pub fn from_name(name: &str) -> Option<IdKind> {
        IdKind::all().iter().copied().find(|k| k.as_str() == name)
    }
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime identifiers describing one entity (a job, task, attempt,
/// application or container) at whatever granularity the runtime reported.
///
/// An empty string is treated exactly like an absent value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt_id: Option<String>,
}

impl IdRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly for tests and matchers.
    pub fn with(mut self, kind: IdKind, value: impl Into<String>) -> Self {
        self.set(kind, value);
        self
    }

    /// The value for `kind`, or `None` if absent or empty.
    pub fn get(&self, kind: IdKind) -> Option<&str> {
        let slot = match kind {
            IdKind::ApplicationId => &self.application_id,
            IdKind::ContainerId => &self.container_id,
            IdKind::JobId => &self.job_id,
            IdKind::TaskId => &self.task_id,
            IdKind::AttemptId => &self.attempt_id,
        };
        slot.as_deref().filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, kind: IdKind, value: impl Into<String>) {
        let slot = match kind {
            IdKind::ApplicationId => &mut self.application_id,
            IdKind::ContainerId => &mut self.container_id,
            IdKind::JobId => &mut self.job_id,
            IdKind::TaskId => &mut self.task_id,
            IdKind::AttemptId => &mut self.attempt_id,
        };
        *slot = Some(value.into());
    }

    /// True if `kind` is absent or empty.
    pub fn is_missing(&self, kind: IdKind) -> bool {
        self.get(kind).is_none()
    }
}

impl AsRef<IdRecord> for IdRecord {
    fn as_ref(&self) -> &IdRecord {
        self
    }
}

// =============================================================================
// Matches
// =============================================================================

/// What a matcher extracted from a recognised log path.
///
/// An empty `MatchInfo` is a valid match: it means "this is a log file" with
/// no further metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchInfo {
    /// Identifiers implied by the path.
    pub ids: IdRecord,
    /// Free-form attributes (e.g. `log_type = "syslog"`).
    pub attrs: BTreeMap<String, String>,
}

impl MatchInfo {
    pub fn new(ids: IdRecord) -> Self {
        Self {
            ids,
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}

/// A discovered log file: the matcher's output with the path attached.
///
/// Serialises flat, e.g. `{"path": "...", "job_id": "...", "log_type": "..."}`.
/// Every key appears once: the listed path always wins over a matcher
/// attribute named `path`, and attributes named after an ID kind fold into
/// `ids`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogMatch {
    pub path: String,
    #[serde(flatten)]
    pub ids: IdRecord,
    #[serde(flatten)]
    pub attrs: BTreeMap<String, String>,
}

impl LogMatch {
    pub fn new(path: impl Into<String>, info: MatchInfo) -> Self {
        let MatchInfo { mut ids, mut attrs } = info;
        attrs.remove("path");
        for kind in IdKind::all() {
            if let Some(value) = attrs.remove(kind.as_str()) {
                if ids.is_missing(*kind) {
                    ids.set(*kind, value);
                }
            }
        }
        Self {
            path: path.into(),
            ids,
            attrs,
        }
    }
}

impl AsRef<IdRecord> for LogMatch {
    fn as_ref(&self) -> &IdRecord {
        &self.ids
    }
}

// =============================================================================
// Log directory groups
// =============================================================================

/// One redundant source of logs: a list of directories searched together.
///
/// Deserialised untagged so that a config file containing a bare string
/// where a list was expected is still representable. Discovery rejects
/// `Bare` groups rather than treating the string as a list of characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogDirGroup {
    /// The valid form: an ordered list of directories.
    Dirs(Vec<String>),
    /// A single directory string given where a list was expected.
    Bare(String),
}

impl LogDirGroup {
    /// Build a valid group from any sequence of directory paths.
    pub fn dirs<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LogDirGroup::Dirs(dirs.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for LogDirGroup {
    fn from(dirs: Vec<String>) -> Self {
        LogDirGroup::Dirs(dirs)
    }
}

impl From<&[&str]> for LogDirGroup {
    fn from(dirs: &[&str]) -> Self {
        LogDirGroup::dirs(dirs.iter().copied())
    }
}
