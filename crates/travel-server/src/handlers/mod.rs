//! HTTP handlers

pub mod auth;
pub mod health;
pub mod plans;

pub use health::health;

use serde::Serialize;

/// Link to a newly created resource
#[derive(Debug, Serialize)]
pub struct ReferenceUrl {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
