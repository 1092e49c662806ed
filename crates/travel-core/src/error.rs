//! Error types for the travel planner

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TravelError>;

#[derive(Error, Debug)]
pub enum TravelError {
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Travel plan not found: {0}")]
    PlanNotFound(String),

    #[error("Email already exists: {0}")]
    EmailTaken(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(String),
}
