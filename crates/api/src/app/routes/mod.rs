use axum::Router;

pub mod plants;
pub mod system;

/// Router for the plant resource.
pub fn router() -> Router {
    Router::new().nest("/plants", plants::router())
}
