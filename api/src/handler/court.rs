use crate::model::court::{
    CourtResponse, CourtsResponse, CreateCourtRequest, UpdateCourtRequest, UpdateCourtRequestWithId,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use garde::Validate;
use kernel::model::id::CourtId;
use registry::AppRegistry;
use shared::error::{AppError, AppResult};

pub async fn register_court(
    State(registry): State<AppRegistry>,
    Json(req): Json<CreateCourtRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate(&())?;

    // 料金の下限は garde で確認済み。利用時間の上下限の整合性はここで確認する
    if req.min_duration_minutes > req.max_duration_minutes {
        return Err(AppError::UnprocessableEntity(
            "最小利用時間は最大利用時間以下で指定してください。".into(),
        ));
    }

    let court_id = registry.court_repository().create(req.into()).await?;
    let court = registry
        .court_repository()
        .find_by_id(court_id)
        .await?
        .ok_or_else(|| {
            AppError::EntityNotFound(format!("コート（{}）が見つかりませんでした。", court_id))
        })?;

    Ok((StatusCode::CREATED, Json(CourtResponse::from(court))))
}

pub async fn show_court_list(
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CourtsResponse>> {
    registry
        .court_repository()
        .find_all()
        .await
        .map(CourtsResponse::from)
        .map(Json)
}

pub async fn show_court(
    Path(court_id): Path<CourtId>,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<CourtResponse>> {
    registry
        .court_repository()
        .find_by_id(court_id)
        .await
        .and_then(|court| match court {
            Some(court) => Ok(Json(court.into())),
            None => Err(AppError::EntityNotFound(format!(
                "コート（{}）が見つかりませんでした。",
                court_id
            ))),
        })
}

pub async fn update_court(
    Path(court_id): Path<CourtId>,
    State(registry): State<AppRegistry>,
    Json(req): Json<UpdateCourtRequest>,
) -> AppResult<StatusCode> {
    req.validate(&())?;

    if let (Some(min), Some(max)) = (req.min_duration_minutes, req.max_duration_minutes) {
        if min > max {
            return Err(AppError::UnprocessableEntity(
                "最小利用時間は最大利用時間以下で指定してください。".into(),
            ));
        }
    }

    let update_court = UpdateCourtRequestWithId::new(court_id, req);
    registry
        .court_repository()
        .update(update_court.into())
        .await
        .map(|_| StatusCode::OK)
}
