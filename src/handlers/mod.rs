//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Calls into the store or services
//! 3. Returns HTTP response (JSON, status code, file)

/// Analysis submission, status, report download and stats
pub mod analysis;

/// Service info and health check
pub mod health;

/// Partner applications
pub mod partner;
