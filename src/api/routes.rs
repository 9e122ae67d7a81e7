use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::services::{ServeDir, ServeFile};

use crate::api::handlers::{get_comparison, get_profile_detail, get_profiles, AppState};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/profiles", get(get_profiles))
        .route("/api/profile/:id", get(get_profile_detail))
        .route("/api/compare/:left_id/:right_id", get(get_comparison))
        .with_state(state)
}

/// API routes with the built site as fallback
pub fn create_app(state: Arc<AppState>, dist_dir: &Path) -> Router {
    let site = ServeDir::new(dist_dir)
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new(dist_dir.join("404.html")));

    create_router(state).fallback_service(site)
}
