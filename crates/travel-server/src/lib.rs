//! Travel Planner Server
//!
//! REST backend for travel plans and user accounts. Handlers reach the
//! store through the `travel_core` ports held in [`AppState`].

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod services;
pub mod storage;

use anyhow::{Context, Result};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use travel_core::ports::{TravelPlanStore, UserAccountStore};

use crate::config::{ServerConfig, StorageKind};
use crate::services::AuthService;
use crate::storage::{Database, MemoryStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub plans: Arc<dyn TravelPlanStore>,
    pub auth_service: Arc<AuthService>,
    pub public_url: Arc<str>,
}

impl AppState {
    /// Wire both collections to one store.
    pub fn new<S>(store: Arc<S>, public_url: &str) -> travel_core::Result<Self>
    where
        S: TravelPlanStore + UserAccountStore + 'static,
    {
        let auth_service = AuthService::new(store.clone())?;
        Ok(Self {
            plans: store,
            auth_service: Arc::new(auth_service),
            public_url: Arc::from(public_url.trim_end_matches('/')),
        })
    }

    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        let state = match config.storage {
            StorageKind::Sqlite => {
                let db = Database::new(&config.database_path)
                    .await
                    .context("Failed to initialize database")?;
                Self::new(Arc::new(db), &config.public_url)
            }
            StorageKind::Memory => {
                tracing::warn!("Using in-memory storage, data is lost on shutdown");
                Self::new(Arc::new(MemoryStore::new()), &config.public_url)
            }
        };

        state.context("Failed to initialize services")
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // REST API routes
        .nest("/api/v1.0", api_routes())
        // Layers
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/travelplans/all", get(handlers::plans::list))
        .route("/travelplans/clear", delete(handlers::plans::clear))
        .route("/travelplans/addnewplan", post(handlers::plans::create))
        .route("/travelplans/update/:id", put(handlers::plans::update))
        .route("/travelplans/all/:id", delete(handlers::plans::delete))
        .route("/travelplans/:id", get(handlers::plans::get))
        .route(
            "/UserAuthentication/register",
            post(handlers::auth::register),
        )
        .route("/UserAuthentication/login", post(handlers::auth::login))
}
