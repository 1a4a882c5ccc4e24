use crate::model::court::{
    event::{CreateCourt, UpdateCourt},
    Court,
};
use crate::model::id::CourtId;
use async_trait::async_trait;
use shared::error::AppResult;

/// コート情報はファシリティ管理側が書き込み、予約エンジンからは読み取り専用。
#[async_trait]
pub trait CourtRepository: Send + Sync {
    async fn create(&self, event: CreateCourt) -> AppResult<CourtId>;
    async fn update(&self, event: UpdateCourt) -> AppResult<()>;
    async fn find_all(&self) -> AppResult<Vec<Court>>;
    async fn find_by_id(&self, court_id: CourtId) -> AppResult<Option<Court>>;
}
