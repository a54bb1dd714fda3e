use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use super::AnalysisStore;
use crate::db::DbPool;
use crate::error::AppError;
use crate::models::analysis::{
    AnalysisRecord, AnalysisStats, AnalysisStatus, AnalysisSummary, Completion,
};

/// Analyses kept in the `analyses` table.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Row shape of the `analyses` table.
#[derive(Debug, sqlx::FromRow)]
struct AnalysisRow {
    id: Uuid,
    status: String,
    progress: i16,
    website_url: String,
    industry: String,
    email: String,
    company_name: Option<String>,
    report_path: Option<String>,
    data: Option<Json<AnalysisSummary>>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    failed_at: Option<DateTime<Utc>>,
}

impl TryFrom<AnalysisRow> for AnalysisRecord {
    type Error = sqlx::Error;

    fn try_from(row: AnalysisRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            status: row.status.parse().map_err(|e: String| sqlx::Error::Decode(e.into()))?,
            progress: row.progress.clamp(0, 100) as u8,
            website_url: row.website_url,
            industry: row.industry.parse().map_err(|e: String| sqlx::Error::Decode(e.into()))?,
            email: row.email,
            company_name: row.company_name,
            report_path: row.report_path.map(PathBuf::from),
            data: row.data.map(|Json(data)| data),
            error: row.error,
            created_at: row.created_at,
            completed_at: row.completed_at,
            failed_at: row.failed_at,
        })
    }
}

#[async_trait]
impl AnalysisStore for PgStore {
    async fn insert(&self, record: AnalysisRecord) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO analyses (id, status, progress, website_url, industry, email, company_name, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id)
        .bind(record.status.as_str())
        .bind(i16::from(record.progress))
        .bind(&record.website_url)
        .bind(record.industry.as_str())
        .bind(&record.email)
        .bind(&record.company_name)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError> {
        let row = sqlx::query_as::<_, AnalysisRow>("SELECT * FROM analyses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(AnalysisRecord::try_from).transpose()?)
    }

    async fn set_progress(&self, id: Uuid, progress: u8) -> Result<(), AppError> {
        sqlx::query("UPDATE analyses SET progress = $2 WHERE id = $1 AND status = 'processing'")
            .bind(id)
            .bind(i16::from(progress.min(100)))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn complete(&self, id: Uuid, completion: Completion) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE analyses
            SET status = 'completed', progress = 100, report_path = $2, data = $3, completed_at = NOW()
            WHERE id = $1 AND status = 'processing'
            "#,
        )
        .bind(id)
        .bind(completion.report_path.to_string_lossy().into_owned())
        .bind(Json(completion.data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fail(&self, id: Uuid, error: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE analyses
            SET status = 'failed', error = $2, failed_at = NOW()
            WHERE id = $1 AND status = 'processing'
            "#,
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fail_interrupted(&self, error: &str) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE analyses
            SET status = 'failed', error = $1, failed_at = NOW()
            WHERE status = 'processing'
            "#,
        )
        .bind(error)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn stats(&self) -> Result<AnalysisStats, AppError> {
        let rows = sqlx::query_as::<_, (String, String, i64)>(
            "SELECT status, industry, COUNT(*) FROM analyses GROUP BY status, industry",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stats = AnalysisStats::default();
        for (status, industry, count) in rows {
            stats.total += count;
            match status.parse::<AnalysisStatus>() {
                Ok(AnalysisStatus::Processing) => stats.processing += count,
                Ok(AnalysisStatus::Completed) => stats.completed += count,
                Ok(AnalysisStatus::Failed) => stats.failed += count,
                Err(e) => tracing::warn!("Skipping unknown status in stats: {}", e),
            }
            *stats.industries.entry(industry).or_insert(0) += count;
        }

        Ok(stats)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        true
    }
}
