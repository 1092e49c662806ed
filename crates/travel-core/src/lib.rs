//! Travel Planner Core Library
//!
//! Domain error type and the storage ports the HTTP layer is wired against.

// Re-export pure types from travel-types
pub use travel_types::*;

pub mod error;
pub mod ports;

pub use error::{Result, TravelError};
