//! ChatPro AI Analyzer - Main Application Entry Point
//!
//! A public REST API that produces a free website analysis for small
//! businesses: it crawls the submitted site, estimates the ROI of a chatbot,
//! renders a German PDF report and files the requester as a lead.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: in memory, or PostgreSQL with sqlx when `DATABASE_URL` is set
//! - **Reports**: maud templates printed to PDF by headless Chromium
//! - **Integrations**: Brevo (CRM, e-mail), Notion (partners), signed webhook
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. With `--smoke-test`, launch Chromium once and exit
//! 3. Pick the analysis store (and run migrations for PostgreSQL)
//! 4. Build the pipeline and integration clients
//! 5. Start server on `0.0.0.0:$PORT`

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;
mod state;
mod store;

#[cfg(test)]
mod test_support;

use std::process::ExitCode;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::services::{
    brevo::BrevoClient, crawler::Crawler, notion::NotionClient, pdf::PdfRenderer,
    pipeline::Pipeline, report::ReportGenerator, webhook_service::CompletionNotifier,
};
use crate::state::AppState;
use crate::store::{AnalysisStore, MemoryStore, PgStore};

#[derive(Debug, Parser)]
#[command(name = "chatpro-analyzer", version, about = "ChatPro AI website analyzer API")]
struct Args {
    /// Launch headless Chromium once and exit with its result
    #[arg(long)]
    smoke_test: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Reads RUST_LOG (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    if args.smoke_test {
        return Ok(smoke_test(&config).await);
    }

    let state = build_state(config.clone()).await?;
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(ExitCode::SUCCESS)
}

async fn smoke_test(config: &Config) -> ExitCode {
    let renderer = PdfRenderer::new(config.chromium_path.clone(), config.pdf_timeout());
    match renderer.smoke_test().await {
        Ok(()) => {
            println!("Chromium smoke test passed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Chromium smoke test failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn build_state(config: Config) -> anyhow::Result<AppState> {
    let store: Arc<dyn AnalysisStore> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            tracing::info!("Database pool created");
            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, analyses are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let interrupted = store.fail_interrupted(crate::store::INTERRUPTED).await?;
    if interrupted > 0 {
        tracing::warn!("Marked {} interrupted analyses as failed", interrupted);
    }

    let pdf = config
        .render_pdf
        .then(|| PdfRenderer::new(config.chromium_path.clone(), config.pdf_timeout()));
    let reports = ReportGenerator::new(config.output_dir.clone(), pdf);

    let brevo = BrevoClient::from_config(&config)?;
    if brevo.is_none() {
        tracing::warn!("BREVO_API_KEY not set, report e-mails and CRM sync are disabled");
    }
    let webhook = CompletionNotifier::from_config(&config)?;
    let notion = NotionClient::from_config(&config)?;

    let crawler = Crawler::new(config.crawl_timeout())?;
    let pipeline = Pipeline::new(Arc::new(config), crawler, reports, brevo, webhook);

    Ok(AppState {
        store,
        pipeline: Arc::new(pipeline),
        notion,
    })
}

/// All routes with CORS and request tracing.
fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::service_info))
        .route("/health", get(handlers::health::health_check))
        .route("/api/analyze", post(handlers::analysis::start_analysis))
        .route("/api/status/{id}", get(handlers::analysis::get_status))
        .route("/api/report/{id}", get(handlers::analysis::download_report))
        .route("/api/stats", get(handlers::analysis::get_stats))
        .route("/api/partner", post(handlers::partner::create_partner))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
