//! Travel Types - Pure type definitions
//!
//! Plain serde data types shared by the store and the HTTP layer,
//! with no async runtime dependencies.

pub mod account;
pub mod plan;

pub use account::*;
pub use plan::*;
