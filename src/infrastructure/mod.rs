//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - Database repositories (PostgreSQL)
//! - Cache implementations (Redis)
//! - Prometheus metrics

pub mod database;
pub mod cache;
pub mod metrics;
pub mod repositories;
