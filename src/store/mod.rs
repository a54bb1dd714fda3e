//! Analysis storage.
//!
//! Records move `processing -> completed` or `processing -> failed`. Once a
//! record reaches a terminal state, `set_progress`, `complete` and `fail`
//! leave it untouched.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::analysis::{AnalysisRecord, AnalysisStats, Completion};

/// Error stored on records whose pipeline did not survive a restart.
pub const INTERRUPTED: &str = "Analysis interrupted by a server restart";

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn insert(&self, record: AnalysisRecord) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError>;

    async fn set_progress(&self, id: Uuid, progress: u8) -> Result<(), AppError>;

    /// Mark as completed with progress 100.
    async fn complete(&self, id: Uuid, completion: Completion) -> Result<(), AppError>;

    async fn fail(&self, id: Uuid, error: &str) -> Result<(), AppError>;

    /// Fail every record that is still processing. Returns how many changed.
    ///
    /// Pipelines run inside the server process, so at startup nothing can
    /// still be working on these.
    async fn fail_interrupted(&self, error: &str) -> Result<u64, AppError>;

    async fn stats(&self) -> Result<AnalysisStats, AppError>;

    /// Check the backend is reachable.
    async fn ping(&self) -> Result<(), AppError>;

    /// Whether records survive a restart.
    fn is_persistent(&self) -> bool;
}
