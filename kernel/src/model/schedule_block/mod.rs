use crate::model::id::{BlockId, CourtId};
use crate::model::time::TimeOfDay;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod event;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Maintenance,
    PrivateEvent,
    Weather,
    StaffUnavailable,
    Other,
}

/// コートの特定日・特定時間帯に対する利用不可ブロック、
/// または特別料金（is_blocked = false かつ override_rate あり）。
#[derive(Debug, Clone)]
pub struct ScheduleBlock {
    pub block_id: BlockId,
    pub court_id: CourtId,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub is_blocked: bool,
    pub block_type: Option<BlockType>,
    pub reason: Option<String>,
    pub override_rate: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl ScheduleBlock {
    pub fn is_special_rate(&self) -> bool {
        !self.is_blocked && self.override_rate.is_some()
    }
}
