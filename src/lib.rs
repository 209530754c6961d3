// ============================================================================
// Leadertrack Library
// ============================================================================

pub mod core;
pub mod fetch;
pub mod pool;
pub mod storage;
pub mod sync;

// Re-export main types for convenience
pub use core::{GameMode, Result, SyncError};
pub use fetch::{DetailFetch, FetchConfig, HttpFetcher, ListingFetch, Page};
pub use pool::{EnrichTask, TaskOutcome, WorkerPool};
pub use storage::{Archive, Board, DailyDelta, ObserveOutcome, Pilot, RawPayload};
pub use sync::{SyncOptions, SyncReport, sync};
