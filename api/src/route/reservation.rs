use axum::{
    routing::{get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{
    cancel_reservation, check_in, check_out, confirm_payment, mark_no_show, show_reservation,
};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservation_routers = Router::new()
        .route("/:reservation_id", get(show_reservation))
        .route("/:reservation_id/confirm", put(confirm_payment))
        .route("/:reservation_id/check-in", put(check_in))
        .route("/:reservation_id/check-out", put(check_out))
        .route("/:reservation_id/cancel", put(cancel_reservation))
        .route("/:reservation_id/no-show", put(mark_no_show));

    Router::new().nest("/reservations", reservation_routers)
}
