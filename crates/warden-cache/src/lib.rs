//! # warden-cache: Profile Snapshot on Disk
//!
//! Keeps the result of the last successful sync in a single versioned file
//! so a restarting DNS service can answer queries before the backend is
//! reachable, and continue with an incremental sync from the stored
//! watermark.
//!
//! ## Usage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  startup:  LocalCache::load() ──► Some(FileCache) ──► serve + incremental│
//! │                              └──► None / stale error ──► full sync      │
//! │                                                                         │
//! │  after sync:  FileCache::new(sync_time, profiles, devices)             │
//! │               LocalCache::store(&cache)                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`codec`] - `FileCache` and its binary encoding
//! - [`local`] - `LocalCache` load/store
//! - [`schema`] - protobuf messages of the file format
//! - [`error`] - `CacheError`

pub mod codec;
pub mod error;
pub mod local;
pub mod schema;

pub use codec::{FileCache, FILE_CACHE_VERSION};
pub use error::{CacheError, CacheResult};
pub use local::LocalCache;
