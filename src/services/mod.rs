//! Business logic services.
//!
//! Services contain the analysis pipeline and its steps, separated from HTTP
//! handlers, plus clients for the third-party APIs it talks to.

pub mod analyzer;
pub mod brevo;
pub mod crawler;
pub mod email;
pub mod integration;
pub mod notion;
pub mod pdf;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod webhook_service;
