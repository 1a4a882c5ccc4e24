use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kernel::model::{
    id::{BlockId, CourtId},
    schedule_block::{BlockType, ScheduleBlock},
};
use shared::error::AppError;

#[derive(sqlx::FromRow)]
pub struct ScheduleBlockRow {
    pub block_id: BlockId,
    pub court_id: CourtId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_blocked: bool,
    pub block_type: Option<String>,
    pub reason: Option<String>,
    pub override_rate: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ScheduleBlockRow> for ScheduleBlock {
    type Error = AppError;

    fn try_from(value: ScheduleBlockRow) -> Result<Self, Self::Error> {
        let ScheduleBlockRow {
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

        let block_type = block_type
            .map(|t| {
                t.parse::<BlockType>().map_err(|_| {
                    AppError::ConversionEntityError(format!("不明なブロック種別です: {t}"))
                })
            })
            .transpose()?;

        Ok(ScheduleBlock {
            block_id,
            court_id,
            date,
            start_time: start_time.into(),
            end_time: end_time.into(),
            is_blocked,
            block_type,
            reason,
            override_rate,
            created_at,
        })
    }
}
