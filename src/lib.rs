// JobLogs - lib.rs
//
// Library entry point.
//
// Finds the log files of a failed cluster job across redundant storage
// locations and ranks them so the one most likely to explain the failure
// comes first. Storage backends and runtime-specific matchers are supplied
// by the caller.

pub mod core;
pub mod platform;
pub mod util;

pub use crate::core::discovery::{
    discover_logs, discover_ranked, read_log_tolerant, DiscoveryConfig, LogDiscovery,
    TolerantLines,
};
pub use crate::core::ids::{add_implied_ids, recency_key, sort_by_recency, RecencyKey};
pub use crate::core::matcher::{GlobMatcher, LogMatcher, RegexMatcher};
pub use crate::core::model::{IdKind, IdRecord, LogDirGroup, LogMatch, MatchInfo};
pub use crate::platform::fs::{Filesystem, LineStream, PathStream};
pub use crate::util::logging::{CollectingSink, LogWarning, TracingSink, WarningSink};
