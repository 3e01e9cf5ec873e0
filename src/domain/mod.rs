//! # Domain Layer
//!
//! The domain layer contains the core business logic of the wellness
//! tracker. It is independent of any external frameworks or infrastructure
//! concerns.
//!
//! ## Structure
//!
//! - **entities**: Core domain entities (User, WellnessSession, etc.)
//! - **services**: Pure domain helpers (descriptive statistics)
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Pure business logic and domain rules (the session status state
//!   machine lives on the entity, not in handlers)
//! - Repository traits define data access contracts

pub mod entities;
pub mod services;

// Re-export commonly used types
pub use entities::*;
