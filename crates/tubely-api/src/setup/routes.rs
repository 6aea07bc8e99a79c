//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::auth::{auth_middleware, AuthState};
use crate::constants::{API_BASE, MULTIPART_OVERHEAD_BYTES};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tubely_core::Config;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = AuthState {
        jwt: state.jwt.clone(),
    };

    let public_routes = Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route(
            &format!("{API_BASE}/openapi.json"),
            get(|| async { Json(ApiDoc::openapi()) }),
        );

    // Protected routes (require authentication)
    let protected_routes = protected_routes(config).layer(axum::middleware::from_fn_with_state(
        Arc::new(auth_state),
        auth_middleware,
    ));

    let app = public_routes
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state);

    Ok(app)
}

fn protected_routes(config: &Config) -> Router<Arc<AppState>> {
    let video_limit =
        usize::try_from(config.max_video_size_bytes()).unwrap_or(usize::MAX);
    let thumbnail_limit =
        usize::try_from(config.max_thumbnail_size_bytes()).unwrap_or(usize::MAX);

    // The pipeline enforces the exact ceiling while streaming; this layer only
    // stops bodies that are clearly oversized.
    let video_upload = Router::new()
        .route(
            &format!("{API_BASE}/videos/{{video_id}}/upload"),
            post(handlers::video_upload::upload_video),
        )
        .route(
            &format!("{API_BASE}/video_upload/{{video_id}}"),
            post(handlers::video_upload::upload_video),
        )
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(
            video_limit.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ));

    let thumbnail_upload = Router::new()
        .route(
            &format!("{API_BASE}/videos/{{video_id}}/thumbnail"),
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
        .route(
            &format!("{API_BASE}/thumbnail_upload/{{video_id}}"),
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
        .layer(DefaultBodyLimit::max(
            thumbnail_limit.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ));

    Router::new()
        .route(
            &format!("{API_BASE}/videos"),
            get(handlers::video_get::list_videos).post(handlers::video_create::create_video),
        )
        .route(
            &format!("{API_BASE}/videos/{{video_id}}"),
            get(handlers::video_get::get_video),
        )
        .merge(video_upload)
        .merge(thumbnail_upload)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
