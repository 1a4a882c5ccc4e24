use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

pub type AppResult<T> = Result<T, AppError>;

/// 予約を妨げる違反の種別。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    OperatingHours,
    AdvanceBooking,
    Duration,
    Reservation,
    Maintenance,
}

/// 違反 1 件分の詳細。上流でユーザー向けメッセージを組み立てられるよう、
/// 種別と衝突相手（予約 ID・ブロック種別）を構造化して持つ。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictDetail {
    pub kind: ConflictKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_type: Option<String>,
}

impl ConflictDetail {
    pub fn new(kind: ConflictKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            reservation_id: None,
            block_type: None,
        }
    }

    pub fn reservation(reservation_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            kind: ConflictKind::Reservation,
            message: message.into(),
            reservation_id: Some(reservation_id),
            block_type: None,
        }
    }

    pub fn maintenance(block_type: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ConflictKind::Maintenance,
            message: message.into(),
            reservation_id: None,
            block_type,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 指定の時間帯が予約できない。違反の全件リストを持つ。
    #[error("指定の時間帯は予約できません。")]
    Conflict(Vec<ConflictDetail>),
    /// 現在のステータスからは実行できない操作。
    #[error("{0}")]
    InvalidState(String),
    /// チェックイン受付時間帯の外。
    #[error("{0}")]
    OutOfWindow(String),
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("{0}")]
    ConversionEntityError(String),
    #[error("トランザクションを実行できませんでした。")]
    TransactionError(#[source] sqlx::Error),
    #[error("データベース処理実行中にエラーが発生しました。")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            AppError::ValidationError(_) | AppError::ConversionEntityError(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidState(_)
            | AppError::OutOfWindow(_)
            | AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            e @ (AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e, error.message = %e,
                    "Unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Conflict の場合は違反一覧も返し、呼び出し側が空き状況を再取得できるようにする
        let body = match &self {
            AppError::Conflict(violations) => serde_json::json!({
                "error": "conflict",
                "message": self.to_string(),
                "violations": violations,
            }),
            _ => serde_json::json!({
                "error": status_code.canonical_reason().unwrap_or("error"),
                "message": self.to_string(),
            }),
        };

        (status_code, Json(body)).into_response()
    }
}
