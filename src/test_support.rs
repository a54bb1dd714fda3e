//! Helpers shared by tests that need a real HTTP peer.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::models::analysis::{AnalysisRecord, AnalysisStats, Completion};
use crate::services::{
    crawler::Crawler, notion::NotionClient, pipeline::Pipeline, report::ReportGenerator,
};
use crate::state::AppState;
use crate::store::{AnalysisStore, MemoryStore};

/// Serve `router` on an ephemeral local port and return its base URL.
///
/// The server runs until the test's runtime shuts down.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Request bodies recorded by a fake upstream.
pub type Recorded<T> = Arc<Mutex<Vec<T>>>;

pub fn recorded<T>() -> Recorded<T> {
    Arc::new(Mutex::new(Vec::new()))
}

/// Router state backed by a [`MemoryStore`], no Brevo, no webhook and no
/// PDF rendering. Reports go to the returned (not yet created) directory.
pub fn app_state(notion: Option<NotionClient>) -> (AppState, PathBuf) {
    let dir = std::env::temp_dir().join(format!("chatpro-test-{}", Uuid::new_v4()));
    let config = Config::from_pairs(vec![(
        "OUTPUT_DIR".to_string(),
        dir.to_string_lossy().into_owned(),
    )])
    .unwrap();

    let pipeline = Pipeline::new(
        Arc::new(config),
        Crawler::new(Duration::from_secs(5)).unwrap(),
        ReportGenerator::new(&dir, None),
        None,
        None,
    );

    let state = AppState {
        store: Arc::new(MemoryStore::new()),
        pipeline: Arc::new(pipeline),
        notion,
    };
    (state, dir)
}

/// [`MemoryStore`] that records progress updates. When `broken`, `ping` and
/// `complete` fail like an unreachable database.
#[derive(Debug, Default)]
pub struct ObservedStore {
    pub inner: MemoryStore,
    pub progress: Recorded<u8>,
    pub broken: bool,
}

impl ObservedStore {
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), AppError> {
        if self.broken {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AnalysisStore for ObservedStore {
    async fn insert(&self, record: AnalysisRecord) -> Result<(), AppError> {
        self.inner.insert(record).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError> {
        self.inner.get(id).await
    }

    async fn set_progress(&self, id: Uuid, progress: u8) -> Result<(), AppError> {
        self.progress.lock().unwrap().push(progress);
        self.inner.set_progress(id, progress).await
    }

    async fn complete(&self, id: Uuid, completion: Completion) -> Result<(), AppError> {
        self.check()?;
        self.inner.complete(id, completion).await
    }

    async fn fail(&self, id: Uuid, error: &str) -> Result<(), AppError> {
        self.inner.fail(id, error).await
    }

    async fn fail_interrupted(&self, error: &str) -> Result<u64, AppError> {
        self.inner.fail_interrupted(error).await
    }

    async fn stats(&self) -> Result<AnalysisStats, AppError> {
        self.inner.stats().await
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check()
    }

    fn is_persistent(&self) -> bool {
        true
    }
}
