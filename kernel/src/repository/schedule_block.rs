use crate::model::id::{BlockId, CourtId};
use crate::model::schedule_block::{
    event::{CreateBlock, CreateSpecialRate},
    ScheduleBlock,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;

#[async_trait]
pub trait ScheduleBlockRepository: Send + Sync {
    /// 利用不可ブロックを作成する。pending / confirmed の予約と重なる場合は
    /// Conflict を返し、何も書き込まない（予約を黙って潰すブロックは許さない）。
    async fn create_block(&self, event: CreateBlock) -> AppResult<BlockId>;
    /// 特別料金ブロック（is_blocked = false）を作成する。
    async fn create_special_rate(&self, event: CreateSpecialRate) -> AppResult<BlockId>;
    /// ブロックを無条件に削除する。
    async fn remove(&self, block_id: BlockId) -> AppResult<()>;
    async fn find_by_court_and_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Vec<ScheduleBlock>>;
}
