// JobLogs - core/discovery.rs
//
// Listing and reading logs across redundant storage locations without
// failing on I/O errors.
//
// The same logs may exist in several places (e.g. copied to object storage
// and still on the cluster nodes). Callers pass those places as ordered
// groups of directories; discovery walks the groups in turn and stops after
// the first group that produced any match, so duplicate copies are not
// listed twice.
//
// Error policy:
//   - Listing and read failures are non-fatal: reported to the injected
//     `WarningSink`, then the directory (or file) is treated as exhausted.
//   - A bare-string group is a caller mistake and is returned as
//     `DiscoveryError` before any directory is listed.
//
// Both entry points are pull-based iterators: nothing is listed or read
// until the caller asks for the next item, and dropping the iterator stops
// all work.

use crate::core::ids::{add_implied_ids, sort_by_recency};
use crate::core::matcher::LogMatcher;
use crate::core::model::{LogDirGroup, LogMatch};
use crate::platform::fs::{Filesystem, LineStream, PathStream};
use crate::util::constants;
use crate::util::error::DiscoveryError;
use crate::util::logging::{IoOperation, LogWarning, WarningSink};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a discovery operation.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum number of matches to emit before stopping with a warning.
    pub max_matches: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_matches: constants::DEFAULT_MAX_MATCHES,
        }
    }
}

// =============================================================================
// Tolerant reading
// =============================================================================

/// Stream the lines of `path`, ending early instead of failing.
///
/// The file is opened on the first call to `next()`. If opening or any
/// later read fails, one warning is sent to `sink` and the iterator ends;
/// lines read before the failure are still yielded.
pub fn read_log_tolerant<'a, F>(
    fs: &'a F,
    path: &str,
    sink: &'a dyn WarningSink,
) -> TolerantLines<'a, F>
where
    F: Filesystem + ?Sized,
{
    TolerantLines {
        fs,
        path: path.to_string(),
        sink,
        state: ReadState::Pending,
    }
}

enum ReadState<'a> {
    Pending,
    Reading(LineStream<'a>),
    Done,
}

/// Iterator returned by [`read_log_tolerant`].
pub struct TolerantLines<'a, F: ?Sized> {
    fs: &'a F,
    path: String,
    sink: &'a dyn WarningSink,
    state: ReadState<'a>,
}

impl<F: Filesystem + ?Sized> TolerantLines<'_, F> {
    fn fail(&mut self, error: &std::io::Error) {
        self.sink
            .warn(&LogWarning::new(IoOperation::Read, &self.path, error));
        self.state = ReadState::Done;
    }
}

impl<F: Filesystem + ?Sized> Iterator for TolerantLines<'_, F> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            match &mut self.state {
                ReadState::Done => return None,
                ReadState::Pending => match self.fs.cat(&self.path) {
                    Ok(lines) => self.state = ReadState::Reading(lines),
                    Err(e) => {
                        self.fail(&e);
                        return None;
                    }
                },
                ReadState::Reading(lines) => {
                    return match lines.next() {
                        Some(Ok(line)) => Some(line),
                        Some(Err(e)) => {
                            self.fail(&e);
                            None
                        }
                        None => {
                            self.state = ReadState::Done;
                            None
                        }
                    };
                }
            }
        }
    }
}

impl<F: Filesystem + ?Sized> std::iter::FusedIterator for TolerantLines<'_, F> {}

// =============================================================================
// Discovery
// =============================================================================

/// Find logs matching `matcher` in the first group of directories that has
/// any.
///
/// Groups are searched in order; within a group every directory is listed
/// in order and every listed path is offered to `matcher`. Matches are
/// yielded as they are found, with their path attached. Once a group has
/// produced at least one match, later groups are not listed.
///
/// # Errors
/// Returns `DiscoveryError::BareGroup` if any group is a single string
/// rather than a list of directories. This is checked for every group before
/// anything is listed, so the error is returned even when an earlier group
/// would have matched and the bad group would never have been searched:
/// `[["A"], "B"]` fails although `A` holds logs.
pub fn discover_logs<'a, F, M>(
    fs: &'a F,
    groups: &[LogDirGroup],
    matcher: M,
    config: &DiscoveryConfig,
    sink: &'a dyn WarningSink,
) -> Result<LogDiscovery<'a, F, M>, DiscoveryError>
where
    F: Filesystem + ?Sized,
    M: LogMatcher,
{
    let groups = groups
        .iter()
        .enumerate()
        .map(|(index, group)| match group {
            LogDirGroup::Dirs(dirs) => Ok(dirs.clone()),
            LogDirGroup::Bare(value) => Err(DiscoveryError::BareGroup {
                index,
                value: value.clone(),
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let max_matches = config.max_matches.min(constants::ABSOLUTE_MAX_MATCHES);

    tracing::debug!(groups = groups.len(), max_matches, "Discovery starting");

    Ok(LogDiscovery {
        fs,
        matcher,
        sink,
        groups: groups.into_iter(),
        group_index: 0,
        dirs: Vec::new().into_iter(),
        listing: None,
        matched_in_group: false,
        emitted: 0,
        max_matches,
        finished: false,
    })
}

/// A directory currently being listed.
struct Listing<'a> {
    dir: String,
    paths: PathStream<'a>,
}

/// Iterator returned by [`discover_logs`].
pub struct LogDiscovery<'a, F: ?Sized, M> {
    fs: &'a F,
    matcher: M,
    sink: &'a dyn WarningSink,
    groups: std::vec::IntoIter<Vec<String>>,
    /// 1-based index of the group being searched (0 before the first).
    group_index: usize,
    dirs: std::vec::IntoIter<String>,
    listing: Option<Listing<'a>>,
    matched_in_group: bool,
    emitted: usize,
    max_matches: usize,
    finished: bool,
}

impl<'a, F, M> LogDiscovery<'a, F, M>
where
    F: Filesystem + ?Sized,
    M: LogMatcher,
{
    /// Number of matches yielded so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn finish(&mut self) -> Option<LogMatch> {
        self.finished = true;
        self.listing = None;
        tracing::debug!(
            groups_searched = self.group_index,
            matches = self.emitted,
            "Discovery complete"
        );
        None
    }

    /// Open the next directory of the current group. Returns false when the
    /// group has no directories left.
    fn open_next_dir(&mut self) -> bool {
        let Some(dir) = self.dirs.next() else {
            return false;
        };
        match self.fs.ls(&dir) {
            Ok(paths) => {
                tracing::trace!(dir = %dir, group = self.group_index, "Listing log dir");
                self.listing = Some(Listing { dir, paths });
            }
            Err(e) => {
                self.sink.warn(&LogWarning::new(IoOperation::List, &dir, &e));
            }
        }
        true
    }
}

impl<'a, F, M> Iterator for LogDiscovery<'a, F, M>
where
    F: Filesystem + ?Sized,
    M: LogMatcher,
{
    type Item = LogMatch;

    fn next(&mut self) -> Option<LogMatch> {
        loop {
            if self.finished {
                return None;
            }

            if let Some(listing) = self.listing.as_mut() {
                match listing.paths.next() {
                    Some(Ok(path)) => {
                        let Some(info) = self.matcher.match_path(&path) else {
                            continue;
                        };
                        if self.emitted >= self.max_matches {
                            self.sink
                                .warn(&LogWarning::limit(&listing.dir, self.max_matches));
                            return self.finish();
                        }
                        self.matched_in_group = true;
                        self.emitted += 1;
                        return Some(LogMatch::new(path, info));
                    }
                    Some(Err(e)) => {
                        self.sink
                            .warn(&LogWarning::new(IoOperation::List, &listing.dir, &e));
                        self.listing = None;
                    }
                    None => self.listing = None,
                }
                continue;
            }

            if self.open_next_dir() {
                continue;
            }

            // Current group exhausted.
            if self.matched_in_group {
                tracing::debug!(
                    group = self.group_index,
                    "Group produced matches; skipping remaining groups"
                );
                return self.finish();
            }
            match self.groups.next() {
                Some(dirs) => {
                    self.group_index += 1;
                    tracing::debug!(group = self.group_index, dirs = dirs.len(), "Searching group");
                    self.dirs = dirs.into_iter();
                }
                None => return self.finish(),
            }
        }
    }
}

impl<'a, F, M> std::iter::FusedIterator for LogDiscovery<'a, F, M>
where
    F: Filesystem + ?Sized,
    M: LogMatcher,
{
}

// =============================================================================
// Ranking
// =============================================================================

/// Discover logs and order them best candidate first.
///
/// Drains [`discover_logs`], fills in implied IDs on every match, and sorts
/// the result with [`sort_by_recency`] so the log most likely to hold the
/// cause of a failure comes first.
pub fn discover_ranked<F, M>(
    fs: &F,
    groups: &[LogDirGroup],
    matcher: M,
    config: &DiscoveryConfig,
    sink: &dyn WarningSink,
) -> Result<Vec<LogMatch>, DiscoveryError>
where
    F: Filesystem + ?Sized,
    M: LogMatcher,
{
    let matches: Vec<LogMatch> = discover_logs(fs, groups, matcher, config, sink)?
        .map(|mut m| {
            add_implied_ids(&mut m.ids);
            m
        })
        .collect();

    tracing::info!(matches = matches.len(), "Ranked discovered logs");
    Ok(sort_by_recency(matches))
}

// =============================================================================
// Tests
// =============================================================================
