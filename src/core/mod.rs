// JobLogs - core/mod.rs
//
// Core logic layer: identifier ordering, matchers, discovery and export.
// Storage is reached only through the `platform::fs::Filesystem` trait and
// warnings only through `util::logging::WarningSink`.

pub mod discovery;
pub mod export;
pub mod ids;
pub mod matcher;
pub mod model;
