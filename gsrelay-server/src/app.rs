use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Extension};
use axum::Router;

use crate::state::AppState;

/// Build the axum router.
///
/// A single intake endpoint serves every path and method; the handler itself
/// rejects anything but POST so the 405 carries the right `Allow` header.
/// The default body cap is lifted because print-ready PDFs routinely exceed
/// it; the body is bounded by disk space, not by the framework.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(crate::handlers::intake::submit)
        .layer(Extension(state))
        .layer(DefaultBodyLimit::disable())
}
