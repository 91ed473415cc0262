//! Back-office Server - HTTP API for the admin list views.
//!
//! Every view in the [`catalog::Catalog`] is served through the same set of
//! routes: paginated listing with search, filters and sort, CSV export, and
//! the create, update, status and delete mutations.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod seed;

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::db::Repository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Repository,
    pub catalog: Arc<Catalog>,
    pub config: Arc<Config>,
}

/// Build the router with tracing and CORS layers applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::create_routes())
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}
