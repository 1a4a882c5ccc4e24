pub mod court;
pub mod reservation;
pub mod schedule_block;
