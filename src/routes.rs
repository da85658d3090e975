use axum::{
    Router,
    routing::{get, post, put},
    extract::DefaultBodyLimit,
};
use http::{HeaderValue, Method, header};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
    cors::{AllowOrigin, CorsLayer},
};
use tracing::Level;

use crate::{
    config::Config,
    handlers,
    services::uploads::PUBLIC_UPLOAD_PREFIX,
    state::AppState,
};

/// Builds the CORS layer from the configured origins.
fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("⚠️ Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400))
}

/// Builds the application router.
///
/// Uploaded photos are served from the upload directory under `/uploads`;
/// anything else that matches no route falls through to the public directory.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let body_limit = state.config.body_limit();
    let uploads = ServeDir::new(&state.config.upload_dir);
    let public = ServeDir::new(&state.config.public_dir);

    Router::new()
        .route("/api/session", post(handlers::sessions::create_session))
        .route(
            "/api/session/{session_id}",
            get(handlers::sessions::get_session),
        )
        .route(
            "/api/upload/{session_id}",
            post(handlers::uploads::upload_photos),
        )
        .route("/api/vote/{session_id}", post(handlers::votes::cast_vote))
        .route(
            "/api/results/{session_id}",
            get(handlers::results::get_results),
        )
        .route("/api/user/projects", get(handlers::sessions::list_projects))
        .route(
            "/api/project/{session_id}",
            put(handlers::sessions::rename_project),
        )
        .with_state(state)
        .nest_service(PUBLIC_UPLOAD_PREFIX, uploads)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .fallback_service(public)
}
