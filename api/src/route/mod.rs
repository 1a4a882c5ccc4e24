pub mod court;
pub mod health;
pub mod reservation;
pub mod schedule_block;
pub mod v1;
