// JobLogs - platform/mod.rs
//
// Platform abstraction layer: the storage capability consumed by discovery
// and config-file loading.
// `fs` depends on nothing in `core`. `config` uses core model types for
// config shapes and converts into `core::discovery::DiscoveryConfig`; it
// never runs discovery itself.

pub mod config;
pub mod fs;
