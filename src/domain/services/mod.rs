//! Domain Services
//!
//! Pure business logic with no infrastructure dependencies.

pub mod statistics;

pub use statistics::{label_trend, mean, std_dev, Trend};
