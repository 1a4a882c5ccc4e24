use axum::{routing::delete, Router};
use registry::AppRegistry;

use crate::handler::schedule_block::remove_block;

pub fn build_schedule_block_routers() -> Router<AppRegistry> {
    let block_routers = Router::new().route("/:block_id", delete(remove_block));

    Router::new().nest("/blocks", block_routers)
}
