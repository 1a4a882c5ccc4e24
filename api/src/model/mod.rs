pub mod availability;
pub mod court;
pub mod reservation;
pub mod schedule_block;
