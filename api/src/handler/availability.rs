use crate::model::availability::{
    AvailableSlotsQuery, AvailableSlotsResponse, CheckAvailabilityQuery, CheckAvailabilityResponse,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use kernel::model::id::CourtId;
use kernel::service::availability;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

// 空き枠一覧・空き判定はどちらもスナップショットに対する読み取りで、
// 返した結果は予約確定時に改めて検証される。

pub async fn show_available_slots(
    Path(court_id): Path<CourtId>,
    Query(query): Query<AvailableSlotsQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<AvailableSlotsResponse>> {
    let court = registry
        .court_repository()
        .find_by_id(court_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("コート（{}）が見つかりませんでした。", court_id))
        })?;

    let reservations = registry
        .reservation_repository()
        .find_active_by_court_and_date(court_id, query.date)
        .await?;
    let blocks = registry
        .schedule_block_repository()
        .find_by_court_and_date(court_id, query.date)
        .await?;

    let today = Utc::now().date_naive();
    let slots = availability::get_available_slots(
        registry.pricing_engine().as_ref(),
        &court,
        query.date,
        today,
        &reservations,
        &blocks,
    );

    Ok(Json(AvailableSlotsResponse::from_slots(
        court_id, query.date, slots,
    )))
}

pub async fn check_court_availability(
    Path(court_id): Path<CourtId>,
    Query(query): Query<CheckAvailabilityQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CheckAvailabilityResponse>> {
    if query.end <= query.start {
        return Err(AppError::UnprocessableEntity(
            "終了時刻は開始時刻より後で指定してください。".into(),
        ));
    }

    let court = registry
        .court_repository()
        .find_by_id(court_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("コート（{}）が見つかりませんでした。", court_id))
        })?;

    let reservations = registry
        .reservation_repository()
        .find_active_by_court_and_date(court_id, query.date)
        .await?;
    let blocks = registry
        .schedule_block_repository()
        .find_by_court_and_date(court_id, query.date)
        .await?;

    let today = Utc::now().date_naive();
    let verdict = availability::check_availability(
        registry.pricing_engine().as_ref(),
        &court,
        query.date,
        query.start,
        query.end,
        today,
        &reservations,
        &blocks,
    );

    Ok(Json(verdict.into()))
}
