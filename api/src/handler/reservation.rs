use crate::model::reservation::{
    CancelReservationRequest, ConfirmPaymentRequest, CreateReservationRequest,
    ReservationListQuery, ReservationResponse, ReservationsResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use garde::Validate;
use kernel::event::ReservationEvent;
use kernel::model::id::{CourtId, ReservationId};
use kernel::model::reservation::event::{
    CancelReservation, CheckIn, CheckOut, ConfirmPayment, CreateReservation, MarkNoShow,
};
use kernel::service::conflict::detect_conflicts;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn create_reservation(
    Path(court_id): Path<CourtId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateReservationRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate(&())?;

    if req.end_time <= req.start_time {
        return Err(AppError::UnprocessableEntity(
            "終了時刻は開始時刻より後で指定してください。".into(),
        ));
    }

    // -------------------------
    // ① コートの存在確認
    // -------------------------
    let court = registry
        .court_repository()
        .find_by_id(court_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("コート（{}）が見つかりませんでした。", court_id))
        })?;

    // -------------------------
    // ② 最新の予約・ブロックに対して違反を全件チェックする
    //    （リトライ判断のため、最初の 1 件ではなく全件を返す）
    // -------------------------
    let reservations = registry
        .reservation_repository()
        .find_active_by_court_and_date(court_id, req.date)
        .await?;
    let blocks = registry
        .schedule_block_repository()
        .find_by_court_and_date(court_id, req.date)
        .await?;

    let today = Utc::now().date_naive();
    let violations = detect_conflicts(
        &court,
        req.date,
        req.start_time,
        req.end_time,
        today,
        &reservations,
        &blocks,
    );
    if !violations.is_empty() {
        return Err(AppError::Conflict(violations));
    }

    // -------------------------
    // ③ 料金を確定し、予約を作成する
    //    重複の最終チェックはリポジトリ側のトランザクションが行うため、
    //    ここまでの判定が古くなっていても二重予約にはならない
    // -------------------------
    let price = registry.pricing_engine().calculate(
        &court,
        req.date,
        req.start_time,
        req.end_time,
        &blocks,
    );

    let create_reservation = CreateReservation::new(
        court_id,
        req.user_id,
        req.date,
        req.start_time,
        req.end_time,
        req.notes,
        price,
        Utc::now(),
    );
    let reservation_id = registry
        .reservation_repository()
        .create(create_reservation)
        .await?;

    let reservation = registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                reservation_id
            ))
        })?;

    registry.event_publisher().publish(ReservationEvent::Created {
        reservation_id,
        court_id,
        reserved_by: reservation.reserved_by,
        date: reservation.date,
        start_time: reservation.start_time,
        end_time: reservation.end_time,
    });

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse::from(reservation)),
    ))
}

pub async fn show_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    registry
        .reservation_repository()
        .find_by_id(reservation_id)
        .await
        .and_then(|reservation| match reservation {
            Some(reservation) => Ok(Json(reservation.into())),
            None => Err(AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                reservation_id
            ))),
        })
}

pub async fn show_court_reservations(
    Path(court_id): Path<CourtId>,
    Query(query): Query<ReservationListQuery>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationsResponse>> {
    registry
        .reservation_repository()
        .find_active_by_court_and_date(court_id, query.date)
        .await
        .map(ReservationsResponse::from)
        .map(Json)
}

pub async fn confirm_payment(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<ConfirmPaymentRequest>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;

    let reservation = registry
        .reservation_repository()
        .confirm_payment(ConfirmPayment::new(reservation_id, req.payment_reference))
        .await?;

    registry
        .event_publisher()
        .publish(ReservationEvent::PaymentConfirmed { reservation_id });

    Ok(Json(reservation.into()))
}

pub async fn check_in(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    let now = Utc::now();
    let reservation = registry
        .reservation_repository()
        .check_in(CheckIn::new(reservation_id, now))
        .await?;

    registry.event_publisher().publish(ReservationEvent::CheckedIn {
        reservation_id,
        at: now,
        late_arrival: reservation.late_arrival,
    });

    Ok(Json(reservation.into()))
}

pub async fn check_out(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    let now = Utc::now();
    let reservation = registry
        .reservation_repository()
        .check_out(CheckOut::new(reservation_id, now))
        .await?;

    registry
        .event_publisher()
        .publish(ReservationEvent::CheckedOut {
            reservation_id,
            at: now,
        });

    Ok(Json(reservation.into()))
}

pub async fn cancel_reservation(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<CancelReservationRequest>,
) -> AppResult<Json<ReservationResponse>> {
    req.validate(&())?;

    let reservation = registry
        .reservation_repository()
        .cancel(CancelReservation::new(
            reservation_id,
            req.user_id,
            req.reason,
            Utc::now(),
        ))
        .await?;

    // 返金の実行は外部の決済コラボレーターに任せ、ここでは金額の記録と通知のみ
    let refund_amount = reservation
        .cancellation
        .as_ref()
        .map(|c| c.refund_amount)
        .unwrap_or(0.0);
    registry.event_publisher().publish(ReservationEvent::Cancelled {
        reservation_id,
        refund_amount,
    });

    Ok(Json(reservation.into()))
}

pub async fn mark_no_show(
    Path(reservation_id): Path<ReservationId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<ReservationResponse>> {
    let reservation = registry
        .reservation_repository()
        .mark_no_show(MarkNoShow::new(reservation_id, Utc::now()))
        .await?;

    registry
        .event_publisher()
        .publish(ReservationEvent::NoShowMarked { reservation_id });

    Ok(Json(reservation.into()))
}
