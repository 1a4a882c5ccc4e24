use crate::database::{model::court::CourtRow, ConnectionPool};
use async_trait::async_trait;
use derive_new::new;
use kernel::model::court::{
    event::{CreateCourt, UpdateCourt},
    Court,
};
use kernel::model::id::CourtId;
use kernel::repository::court::CourtRepository;
use shared::error::{AppError, AppResult};
use sqlx::types::Json;

const COURT_COLUMNS: &str = r#"
    court_id,
    facility_id,
    court_name,
    is_active,
    weekly_hours,
    base_rate,
    peak_rate,
    weekend_rate,
    min_duration_minutes,
    max_duration_minutes,
    advance_booking_days,
    cancellation_deadline_hours
"#;

#[derive(new)]
pub struct CourtRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl CourtRepository for CourtRepositoryImpl {
    async fn create(&self, event: CreateCourt) -> AppResult<CourtId> {
        let court_id = CourtId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO courts
                (court_id, facility_id, court_name, is_active, weekly_hours,
                 base_rate, peak_rate, weekend_rate,
                 min_duration_minutes, max_duration_minutes,
                 advance_booking_days, cancellation_deadline_hours)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(court_id)
        .bind(event.facility_id)
        .bind(&event.court_name)
        .bind(true)
        .bind(Json(&event.weekly_hours))
        .bind(event.base_rate)
        .bind(event.peak_rate)
        .bind(event.weekend_rate)
        .bind(event.min_duration_minutes)
        .bind(event.max_duration_minutes)
        .bind(event.advance_booking_days)
        .bind(event.cancellation_deadline_hours)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No court record has been created".into(),
            ));
        }

        Ok(court_id)
    }

    async fn update(&self, event: UpdateCourt) -> AppResult<()> {
        let res = sqlx::query(
            r#"
                UPDATE courts
                SET
                    court_name = COALESCE($2, court_name),
                    is_active = COALESCE($3, is_active),
                    weekly_hours = COALESCE($4, weekly_hours),
                    base_rate = COALESCE($5, base_rate),
                    peak_rate = COALESCE($6, peak_rate),
                    weekend_rate = COALESCE($7, weekend_rate),
                    min_duration_minutes = COALESCE($8, min_duration_minutes),
                    max_duration_minutes = COALESCE($9, max_duration_minutes),
                    advance_booking_days = COALESCE($10, advance_booking_days),
                    cancellation_deadline_hours = COALESCE($11, cancellation_deadline_hours),
                    updated_at = CURRENT_TIMESTAMP
                WHERE court_id = $1
            "#,
        )
        .bind(event.court_id)
        .bind(event.court_name)
        .bind(event.is_active)
        .bind(event.weekly_hours.map(Json))
        .bind(event.base_rate)
        .bind(event.peak_rate)
        .bind(event.weekend_rate)
        .bind(event.min_duration_minutes)
        .bind(event.max_duration_minutes)
        .bind(event.advance_booking_days)
        .bind(event.cancellation_deadline_hours)
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "コート（{}）が見つかりませんでした。",
                event.court_id
            )));
        }

        Ok(())
    }

    async fn find_all(&self) -> AppResult<Vec<Court>> {
        let rows: Vec<CourtRow> = sqlx::query_as(&format!(
            "SELECT {COURT_COLUMNS} FROM courts ORDER BY created_at DESC"
        ))
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(rows.into_iter().map(Court::from).collect())
    }

    async fn find_by_id(&self, court_id: CourtId) -> AppResult<Option<Court>> {
        let row: Option<CourtRow> = sqlx::query_as(&format!(
            "SELECT {COURT_COLUMNS} FROM courts WHERE court_id = $1"
        ))
        .bind(court_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        Ok(row.map(Court::from))
    }
}
