#![cfg_attr(not(test), deny(unsafe_code))]
#![warn(
    clippy::pedantic,
    clippy::unwrap_used,
    clippy::missing_docs_in_private_items
)]

//! Client-side query cache for the drive-ox client.
//!
//! The cache owns the canonical in-memory copy of everything fetched from
//! the server, keyed by [`QueryKey`]. Queries read through it, mutations
//! patch it optimistically and reconcile with server truth afterwards, and
//! the preload helpers warm it before navigation.

pub mod cache;
pub mod error;
pub mod mutations;
pub mod preload;
pub mod queries;

pub use cache::{CacheEvent, QueryCache, QueryKey};
pub use error::QueryError;
pub use mutations::{FileMutations, Notifier, OptimisticTxn, SilentNotifier};
pub use preload::{Navigator, Preloader, ProgressSink, Route, SilentProgress};
pub use queries::{
    CategoryStorageQuery, FilesQuery, SessionListQuery, SessionQuery, UploadRow, UploadStatsQuery,
};
