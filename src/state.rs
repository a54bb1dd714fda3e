//! Shared handler state.

use std::sync::Arc;

use crate::services::{notion::NotionClient, pipeline::Pipeline};
use crate::store::AnalysisStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AnalysisStore>,
    pub pipeline: Arc<Pipeline>,

    /// `None` without `NOTION_API_KEY`
    pub notion: Option<NotionClient>,
}
