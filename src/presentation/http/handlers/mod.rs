//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod health;
pub mod auth;
pub mod user;
pub mod session;
pub mod breathing;
pub mod stress;
pub mod journal;
pub mod gamification;
pub mod analytics;
pub mod friend;
pub mod group;
pub mod notification;
