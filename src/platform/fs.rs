// JobLogs - platform/fs.rs
//
// Filesystem abstraction trait.
// Enables discovery to run against any storage backend (local disk, cluster
// nodes over SSH, object storage) and to be tested without real I/O.
//
// Concrete backends live with the caller; this crate only consumes the trait.

use std::io;

/// Lazy stream of paths produced by `Filesystem::ls`.
pub type PathStream<'a> = Box<dyn Iterator<Item = io::Result<String>> + 'a>;

/// Lazy stream of decoded text lines produced by `Filesystem::cat`.
pub type LineStream<'a> = Box<dyn Iterator<Item = io::Result<String>> + 'a>;

/// Storage capability consumed by log discovery.
///
/// Paths are plain strings so that URIs (`s3://...`, `ssh://host/...`) are
/// representable alongside local paths.
///
/// Both operations may fail up front (`Err` from the call) or part way
/// through (`Err` items from the stream). Callers in this crate treat the
/// two the same way.
pub trait Filesystem {
    /// List the entries under `dir`.
    fn ls<'a>(&'a self, dir: &str) -> io::Result<PathStream<'a>>;

    /// Stream the lines of the file at `path`.
    ///
    /// Implementations own decoding; lines arrive as `String` without their
    /// trailing newline.
    fn cat<'a>(&'a self, path: &str) -> io::Result<LineStream<'a>>;
}
