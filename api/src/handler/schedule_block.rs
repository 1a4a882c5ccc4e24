use crate::model::schedule_block::{
    BlockListQuery, BlocksResponse, CreateBlockRequest, CreateSpecialRateRequest,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::id::{BlockId, CourtId};
use kernel::model::schedule_block::event::{CreateBlock, CreateSpecialRate};
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn create_block(
    Path(court_id): Path<CourtId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateBlockRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate(&())?;

    if req.end_time <= req.start_time {
        return Err(AppError::UnprocessableEntity(
            "終了時刻は開始時刻より後で指定してください。".into(),
        ));
    }

    registry
        .court_repository()
        .find_by_id(court_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("コート（{}）が見つかりませんでした。", court_id))
        })?;

    // 予約と重なる場合はリポジトリ側で Conflict になる
    let block_id = registry
        .schedule_block_repository()
        .create_block(CreateBlock::new(
            court_id,
            req.date,
            req.start_time,
            req.end_time,
            req.block_type,
            req.reason,
        ))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "blockId": block_id.to_string() })),
    ))
}

pub async fn create_special_rate(
    Path(court_id): Path<CourtId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateSpecialRateRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate(&())?;

    if req.end_time <= req.start_time {
        return Err(AppError::UnprocessableEntity(
            "終了時刻は開始時刻より後で指定してください。".into(),
        ));
    }

    registry
        .court_repository()
        .find_by_id(court_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("コート（{}）が見つかりませんでした。", court_id))
        })?;

    let block_id = registry
        .schedule_block_repository()
        .create_special_rate(CreateSpecialRate::new(
            court_id,
            req.date,
            req.start_time,
            req.end_time,
            req.rate,
        ))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "blockId": block_id.to_string() })),
    ))
}

pub async fn show_block_list(
    Path(court_id): Path<CourtId>,
    Query(query): Query<BlockListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BlocksResponse>> {
    registry
        .schedule_block_repository()
        .find_by_court_and_date(court_id, query.date)
        .await
        .map(BlocksResponse::from)
        .map(Json)
}

pub async fn remove_block(
    Path(block_id): Path<BlockId>,
    State(registry): State<AppRegistry>,
) -> AppResult<StatusCode> {
    registry
        .schedule_block_repository()
        .remove(block_id)
        .await
        .map(|_| StatusCode::OK)
}
