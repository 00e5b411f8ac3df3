//! # occu-core
//!
//! Shared types for occusim: the error enum and the long-format data
//! contract handed to the external inference engine.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error type and `Result` alias.
pub mod error;
/// Long-format occupancy dataset (the engine's data list).
pub mod types;

pub use error::{Error, Result};
pub use types::OccupancyData;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
