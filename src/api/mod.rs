use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;

mod admins;
pub mod auth;
mod books;
mod error;
mod types;
mod words;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    store: Store,

    config: Config,
}

impl AppState {
    #[must_use]
    pub const fn new(store: Store, config: Config) -> Self {
        Self { store, config }
    }

    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

pub async fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.effective_database_url(),
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(Arc::new(AppState::new(store, config)))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_admin))
        .route("/admins", post(admins::create_admin))
        .route("/books", get(books::list_books))
        .route(
            "/words/upload",
            // Corpus uploads can be arbitrarily large; the pipeline streams
            // them instead of buffering, so the body limit is lifted here.
            post(words::upload_words).layer(DefaultBodyLimit::disable()),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
