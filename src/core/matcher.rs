// JobLogs - core/matcher.rs
//
// Path matchers: decide whether a listed path is a log of interest and
// extract the identifiers it implies.
//
// Runtime-specific matchers (job driver logs, task logs, ...) are supplied
// by callers, either as closures or by configuring `RegexMatcher` /
// `GlobMatcher`. Arguments a matcher needs (e.g. "only this job") are
// captured by the matcher value itself.

use crate::core::ids::add_implied_ids;
use crate::core::model::{IdKind, IdRecord, MatchInfo};
use crate::util::constants;
use crate::util::error::MatcherError;
use regex::Regex;

/// Decides whether `path` is a recognised log file.
///
/// Returns `None` for no match, or the metadata extracted from the path.
/// An empty `MatchInfo` is a valid match.
pub trait LogMatcher {
    fn match_path(&self, path: &str) -> Option<MatchInfo>;
}

impl<F> LogMatcher for F
where
    F: Fn(&str) -> Option<MatchInfo>,
{
    fn match_path(&self, path: &str) -> Option<MatchInfo> {
        self(path)
    }
}

// =============================================================================
// Regex matcher
// =============================================================================

/// Matches full paths against a regex with named capture groups.
///
/// Groups named after an `IdKind` (`job_id`, `attempt_id`, ...) populate the
/// match's `IdRecord`; any other named group becomes an attribute. Implied
/// IDs are filled in after extraction, so a pattern capturing only
/// `attempt_id` still yields `task_id` and `job_id`.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
    filters: Vec<(IdKind, String)>,
}

impl RegexMatcher {
    /// Compile `pattern`.
    pub fn new(pattern: &str) -> Result<Self, MatcherError> {
        if pattern.len() > constants::MAX_REGEX_PATTERN_LENGTH {
            return Err(MatcherError::RegexTooLong {
                length: pattern.len(),
                max_length: constants::MAX_REGEX_PATTERN_LENGTH,
            });
        }
        let regex = Regex::new(pattern).map_err(|e| MatcherError::InvalidRegex {
            pattern: pattern.to_string(),
            source: e,
        })?;
        Ok(Self {
            regex,
            filters: Vec::new(),
        })
    }

    /// Only match paths whose (implied) `kind` ID equals `value`.
    ///
    /// A path that does not imply a `kind` ID at all does not match.
    pub fn with_filter(mut self, kind: IdKind, value: impl Into<String>) -> Self {
        self.filters.push((kind, value.into()));
        self
    }
}

impl LogMatcher for RegexMatcher {
    fn match_path(&self, path: &str) -> Option<MatchInfo> {
        let caps = self.regex.captures(path)?;

        let mut info = MatchInfo::default();
        for name in self.regex.capture_names().flatten() {
            let Some(value) = caps.name(name) else {
                continue;
            };
            match IdKind::from_name(name) {
                Some(kind) => info.ids.set(kind, value.as_str()),
                None => {
                    info.attrs
                        .insert(name.to_string(), value.as_str().to_string());
                }
            }
        }
        add_implied_ids(&mut info.ids);

        if !passes_filters(&info.ids, &self.filters) {
            tracing::trace!(path, "Matched pattern but rejected by ID filter");
            return None;
        }
        Some(info)
    }
}

fn passes_filters(ids: &IdRecord, filters: &[(IdKind, String)]) -> bool {
    filters
        .iter()
        .all(|(kind, wanted)| ids.get(*kind) == Some(wanted.as_str()))
}

// =============================================================================
// Glob matcher
// =============================================================================

/// Matches the final segment of a path against filename globs.
///
/// Works for URIs as well as local paths: the segment is whatever follows
/// the last `/`. Produces an empty `MatchInfo`.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    patterns: Vec<glob::Pattern>,
}

impl GlobMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, MatcherError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                glob::Pattern::new(p).map_err(|e| MatcherError::InvalidGlob {
                    pattern: p.to_string(),
                    source: e,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }
}

impl LogMatcher for GlobMatcher {
    fn match_path(&self, path: &str) -> Option<MatchInfo> {
        let file_name = path.trim_end_matches('/').rsplit('/').next()?;
        self.patterns
            .iter()
            .any(|p| p.matches(file_name))
            .then(MatchInfo::default)
    }
}
