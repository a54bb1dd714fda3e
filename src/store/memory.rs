use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::AnalysisStore;
use crate::error::AppError;
use crate::models::analysis::{AnalysisRecord, AnalysisStats, AnalysisStatus, Completion};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, AnalysisRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `update` to the record if it is still processing.
    async fn update_processing(&self, id: Uuid, update: impl FnOnce(&mut AnalysisRecord)) {
        let mut records = self.records.write().await;
        if let Some(record) = records.get_mut(&id) {
            if !record.status.is_terminal() {
                update(record);
            }
        }
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn insert(&self, record: AnalysisRecord) -> Result<(), AppError> {
        self.records.write().await.insert(record.id, record);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn set_progress(&self, id: Uuid, progress: u8) -> Result<(), AppError> {
        self.update_processing(id, |record| record.progress = progress.min(100))
            .await;
        Ok(())
    }

    async fn complete(&self, id: Uuid, completion: Completion) -> Result<(), AppError> {
        self.update_processing(id, |record| {
            record.status = AnalysisStatus::Completed;
            record.progress = 100;
            record.report_path = Some(completion.report_path);
            record.data = Some(completion.data);
            record.completed_at = Some(Utc::now());
        })
        .await;
        Ok(())
    }

    async fn fail(&self, id: Uuid, error: &str) -> Result<(), AppError> {
        self.update_processing(id, |record| {
            record.status = AnalysisStatus::Failed;
            record.error = Some(error.to_string());
            record.failed_at = Some(Utc::now());
        })
        .await;
        Ok(())
    }

    async fn fail_interrupted(&self, error: &str) -> Result<u64, AppError> {
        let mut records = self.records.write().await;
        let mut failed = 0;
        for record in records.values_mut() {
            if !record.status.is_terminal() {
                record.status = AnalysisStatus::Failed;
                record.error = Some(error.to_string());
                record.failed_at = Some(Utc::now());
                failed += 1;
            }
        }
        Ok(failed)
    }

    async fn stats(&self) -> Result<AnalysisStats, AppError> {
        let records = self.records.read().await;
        let mut stats = AnalysisStats::default();

        for record in records.values() {
            stats.total += 1;
            match record.status {
                AnalysisStatus::Processing => stats.processing += 1,
                AnalysisStatus::Completed => stats.completed += 1,
                AnalysisStatus::Failed => stats.failed += 1,
            }
            *stats
                .industries
                .entry(record.industry.to_string())
                .or_insert(0) += 1;
        }

        Ok(stats)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}
