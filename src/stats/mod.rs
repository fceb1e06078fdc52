use crate::state::AppState;
use axum::Router;

pub mod buckets;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::stats_routes())
}
