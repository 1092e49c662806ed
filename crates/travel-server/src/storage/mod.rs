//! Storage layer
//!
//! SQLite (embedded) for persistent runs, DashMap (in-memory) for
//! throwaway runs and tests. Both implement the `travel_core` ports.

pub mod db;
pub mod memory;

pub use db::Database;
pub use memory::MemoryStore;
