//! Data models shared by handlers, services and storage.

/// Analysis jobs, requests and responses
pub mod analysis;
/// Crawler output
pub mod crawl;
/// Analyzer output
pub mod insights;
/// Partner applications
pub mod partner;
/// Completion webhook payload
pub mod webhook;
