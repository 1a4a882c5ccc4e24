use axum::{
    routing::{get, post, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::availability::{check_court_availability, show_available_slots};
use crate::handler::court::{register_court, show_court, show_court_list, update_court};
use crate::handler::reservation::{create_reservation, show_court_reservations};
use crate::handler::schedule_block::{create_block, create_special_rate, show_block_list};

pub fn build_court_routers() -> Router<AppRegistry> {
    let court_routers = Router::new()
        .route("/", post(register_court))
        .route("/", get(show_court_list))
        .route("/:court_id", get(show_court))
        .route("/:court_id", put(update_court))
        .route("/:court_id/availability", get(show_available_slots))
        .route("/:court_id/availability/check", get(check_court_availability))
        .route("/:court_id/reservations", post(create_reservation))
        .route("/:court_id/reservations", get(show_court_reservations))
        .route("/:court_id/blocks", post(create_block))
        .route("/:court_id/blocks", get(show_block_list))
        .route("/:court_id/special-rates", post(create_special_rate));

    Router::new().nest("/courts", court_routers)
}
