use crate::model::id::CourtId;
use crate::model::schedule_block::BlockType;
use crate::model::time::TimeOfDay;
use chrono::NaiveDate;
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateBlock {
    pub court_id: CourtId,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub block_type: BlockType,
    pub reason: Option<String>,
}

#[derive(Debug, new)]
pub struct CreateSpecialRate {
    pub court_id: CourtId,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub rate: f64,
}
