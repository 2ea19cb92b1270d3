use crate::granularity::QueryProfiles;
use axum::Router;
use std::sync::Arc;

mod vnstat;

pub fn get_router(profiles: Arc<QueryProfiles>) -> Router {
    vnstat::router(profiles)
}
