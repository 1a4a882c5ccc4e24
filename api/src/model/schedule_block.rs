use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use kernel::model::{
    id::{BlockId, CourtId},
    schedule_block::{BlockType, ScheduleBlock},
    time::TimeOfDay,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockRequest {
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    pub start_time: TimeOfDay,
    #[garde(skip)]
    pub end_time: TimeOfDay,
    #[garde(skip)]
    pub block_type: BlockType,
    #[garde(skip)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpecialRateRequest {
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    pub start_time: TimeOfDay,
    #[garde(skip)]
    pub end_time: TimeOfDay,
    #[garde(range(min = 0.0))]
    pub rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockListQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockResponse {
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

impl From<ScheduleBlock> for BlockResponse {
    fn from(value: ScheduleBlock) -> Self {
        let ScheduleBlock {
            block_id,
            court_id,
            date,
            start_time,
            end_time,
            is_blocked,
            block_type,
            reason,
            override_rate,
            created_at,
        } = value;
        Self {
            block_id,
            court_id,
            date,
            start_time,
            end_time,
            is_blocked,
            block_type,
            reason,
            override_rate,
            created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlocksResponse {
    pub items: Vec<BlockResponse>,
}

impl From<Vec<ScheduleBlock>> for BlocksResponse {
    fn from(value: Vec<ScheduleBlock>) -> Self {
        Self {
            items: value.into_iter().map(BlockResponse::from).collect(),
        }
    }
}
