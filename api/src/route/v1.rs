use super::{
    court::build_court_routers, health::build_health_check_routers,
    reservation::build_reservation_routers, schedule_block::build_schedule_block_routers,
};
use axum::Router;
use registry::AppRegistry;

pub fn routes() -> Router<AppRegistry> {
    let router = Router::new()
        .merge(build_health_check_routers())
        .merge(build_court_routers())
        .merge(build_reservation_routers())
        .merge(build_schedule_block_routers());
    Router::new().nest("/api/v1", router)
}
