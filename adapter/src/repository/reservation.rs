use crate::database::{model::reservation::ReservationRow, ConnectionPool};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use derive_new::new;
use kernel::model::id::{CourtId, ReservationId, UserId};
use kernel::model::reservation::{
    event::{CancelReservation, CheckIn, CheckOut, ConfirmPayment, CreateReservation, MarkNoShow},
    Reservation, ReservationStatus,
};
use kernel::repository::reservation::ReservationRepository;
use shared::error::{AppError, AppResult, ConflictDetail, ConflictKind};
use uuid::Uuid;

const RESERVATION_COLUMNS: &str = r#"
    reservation_id,
    court_id,
    user_id,
    date,
    start_time,
    end_time,
    duration_minutes,
    base_rate,
    duration_hours,
    peak_multiplier,
    weekend_multiplier,
    subtotal,
    tax_amount,
    service_fee,
    total_amount,
    status,
    notes,
    payment_reference,
    checked_in_at,
    late_arrival,
    late_minutes,
    checked_out_at,
    cancelled_at,
    cancelled_by,
    cancellation_reason,
    refund_amount,
    refund_processed,
    reserved_at
"#;

#[derive(new)]
pub struct ReservationRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ReservationRepository for ReservationRepositoryImpl {
    // 予約操作を行う
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する
        self.set_transaction_serializable(&mut tx).await?;

        // 事前のチェックとして、以下を調べる。
        // - 指定のコート ID をもつコートが存在するか
        // - 存在した場合、その時間帯は既存予約・利用不可ブロックと重ならないか
        //
        // 上記をすべて通過した場合のみ INSERT に進む。
        // なお、同じチェックは reservations テーブルの排他制約でも強制されるため、
        // ここをすり抜けた同時予約もコミット時に弾かれる。
        {
            //
            // ① コートの存在確認 ＋ is_active チェック
            //
            let court: Option<bool> =
                sqlx::query_scalar("SELECT is_active FROM courts WHERE court_id = $1")
                    .bind(event.court_id)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(AppError::SpecificOperationError)?;

            let Some(is_active) = court else {
                return Err(AppError::EntityNotFound(format!(
                    "コート（{}）が見つかりませんでした。",
                    event.court_id
                )));
            };

            if !is_active {
                return Err(AppError::UnprocessableEntity(format!(
                    "コート（{}）は現在利用できません（is_active = false）",
                    event.court_id
                )));
            }

            //
            // ② 希望時間帯が pending / confirmed の既存予約と重なっていないか確認
            //    重複条件：
            //        existing.start < new.end AND new.start < existing.end
            //
            let overlap: Option<(Uuid, NaiveTime, NaiveTime)> = sqlx::query_as(
                r#"
                SELECT reservation_id, start_time, end_time
                FROM reservations
                WHERE court_id = $1
                  AND date = $2
                  AND status IN ('pending', 'confirmed')
                  AND start_time < $4
                  AND $3 < end_time
                LIMIT 1
                "#,
            )
            .bind(event.court_id)
            .bind(event.date)
            .bind(event.start_time.as_naive())
            .bind(event.end_time.as_naive())
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if let Some((reservation_id, start, end)) = overlap {
                return Err(AppError::Conflict(vec![ConflictDetail::reservation(
                    reservation_id,
                    format!(
                        "既存の予約（{} 〜 {}）と重なっています。",
                        start.format("%H:%M"),
                        end.format("%H:%M")
                    ),
                )]));
            }

            //
            // ③ 利用不可ブロックと重なっていないか確認
            //
            let blocked: Option<(Option<String>, Option<String>)> = sqlx::query_as(
                r#"
                SELECT block_type, reason
                FROM schedule_blocks
                WHERE court_id = $1
                  AND date = $2
                  AND is_blocked = TRUE
                  AND start_time < $4
                  AND $3 < end_time
                LIMIT 1
                "#,
            )
            .bind(event.court_id)
            .bind(event.date)
            .bind(event.start_time.as_naive())
            .bind(event.end_time.as_naive())
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::SpecificOperationError)?;

            if let Some((block_type, reason)) = blocked {
                return Err(AppError::Conflict(vec![ConflictDetail::maintenance(
                    block_type,
                    reason.unwrap_or_else(|| "コートが利用できない時間帯です。".into()),
                )]));
            }
        }

        // 予約処理を行う、すなわち reservations テーブルにレコードを追加する
        let reservation_id = ReservationId::new();
        let duration_minutes =
            (event.end_time.to_minutes() - event.start_time.to_minutes()) as i32;
        let res = sqlx::query(
            r#"
                INSERT INTO reservations
                (reservation_id, court_id, user_id, date, start_time, end_time,
                 duration_minutes,
                 base_rate, duration_hours, peak_multiplier, weekend_multiplier,
                 subtotal, tax_amount, service_fee, total_amount,
                 status, notes, reserved_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                        $14, $15, 'pending', $16, $17)
            "#,
        )
        .bind(reservation_id)
        .bind(event.court_id)
        .bind(event.reserved_by)
        .bind(event.date)
        .bind(event.start_time.as_naive())
        .bind(event.end_time.as_naive())
        .bind(duration_minutes)
        .bind(event.price.base_rate)
        .bind(event.price.duration_hours)
        .bind(event.price.peak_multiplier)
        .bind(event.price.weekend_multiplier)
        .bind(event.price.subtotal)
        .bind(event.price.tax_amount)
        .bind(event.price.service_fee)
        .bind(event.price.total_amount)
        .bind(event.notes)
        .bind(event.reserved_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| self.map_uniqueness_race(e, AppError::SpecificOperationError))?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been created".into(),
            ));
        }

        tx.commit()
            .await
            .map_err(|e| self.map_uniqueness_race(e, AppError::TransactionError))?;

        Ok(reservation_id)
    }

    async fn confirm_payment(&self, event: ConfirmPayment) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        let reservation = self.find_for_update(&mut tx, event.reservation_id).await?;
        reservation.verify_transition(ReservationStatus::Confirmed)?;

        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET status = 'confirmed', payment_reference = $2
                WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .bind(&event.payment_reference)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.fetch_updated(event.reservation_id).await
    }

    async fn check_in(&self, event: CheckIn) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        let reservation = self.find_for_update(&mut tx, event.reservation_id).await?;
        // 受付時間帯の検証と遅刻記録の組み立てはドメイン側で行う
        let record = reservation.check_in_record(event.now)?;

        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET status = 'checked_in',
                    checked_in_at = $2,
                    late_arrival = $3,
                    late_minutes = $4
                WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .bind(record.checked_in_at)
        .bind(record.late_arrival)
        .bind(record.late_minutes)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.fetch_updated(event.reservation_id).await
    }

    async fn check_out(&self, event: CheckOut) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        let reservation = self.find_for_update(&mut tx, event.reservation_id).await?;
        reservation.verify_transition(ReservationStatus::Completed)?;

        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET status = 'completed', checked_out_at = $2
                WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .bind(event.now)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.fetch_updated(event.reservation_id).await
    }

    async fn cancel(&self, event: CancelReservation) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        let reservation = self.find_for_update(&mut tx, event.reservation_id).await?;
        // 返金額の確定はドメイン側のキャンセルポリシーに任せる
        let record =
            reservation.cancellation_record(event.now, event.cancelled_by, event.reason)?;

        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET status = 'cancelled',
                    cancelled_at = $2,
                    cancelled_by = $3,
                    cancellation_reason = $4,
                    refund_amount = $5,
                    refund_processed = FALSE
                WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .bind(record.cancelled_at)
        .bind(record.cancelled_by)
        .bind(&record.reason)
        .bind(record.refund_amount)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.fetch_updated(event.reservation_id).await
    }

    async fn mark_no_show(&self, event: MarkNoShow) -> AppResult<Reservation> {
        let mut tx = self.db.begin().await?;

        let reservation = self.find_for_update(&mut tx, event.reservation_id).await?;
        reservation.verify_no_show(event.now)?;

        let res = sqlx::query(
            r#"
                UPDATE reservations
                SET status = 'no_show'
                WHERE reservation_id = $1
            "#,
        )
        .bind(event.reservation_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No reservation record has been updated".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        self.fetch_updated(event.reservation_id).await
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE reservation_id = $1"
        ))
        .bind(reservation_id)
        .fetch_optional(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        row.map(Reservation::try_from).transpose()
    }

    async fn find_active_by_court_and_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations
                WHERE court_id = $1
                  AND date = $2
                  AND status IN ('pending', 'confirmed')
                ORDER BY start_time ASC
            "#
        ))
        .bind(court_id)
        .bind(date)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let rows: Vec<ReservationRow> = sqlx::query_as(&format!(
            r#"
                SELECT {RESERVATION_COLUMNS}
                FROM reservations
                WHERE user_id = $1
                ORDER BY reserved_at ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }
}

impl ReservationRepositoryImpl {
    // create メソッドでのトランザクションを利用するにあたり
    // トランザクション分離レベルを SERIALIZABLE にするために
    // 内部的に使うメソッド
    async fn set_transaction_serializable(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> AppResult<()> {
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut **tx)
            .await
            .map_err(AppError::SpecificOperationError)?;
        Ok(())
    }

    // ステータス更新の前に、対象の予約行をロックして取得する
    async fn find_for_update(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        reservation_id: ReservationId,
    ) -> AppResult<Reservation> {
        let row: Option<ReservationRow> = sqlx::query_as(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE reservation_id = $1 FOR UPDATE"
        ))
        .bind(reservation_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        let Some(row) = row else {
            return Err(AppError::EntityNotFound(format!(
                "予約（{}）が見つかりませんでした。",
                reservation_id
            )));
        };

        row.try_into()
    }

    // 更新後の予約を返すために取得し直す
    async fn fetch_updated(&self, reservation_id: ReservationId) -> AppResult<Reservation> {
        self.find_by_id(reservation_id).await?.ok_or_else(|| {
            AppError::EntityNotFound(format!("予約（{}）が見つかりませんでした。", reservation_id))
        })
    }

    // 排他制約違反（23P01）と直列化失敗（40001）は、同時予約がコミット時に
    // 弾かれたことを意味する。ストア都合のエラーではなく、事前チェックで
    // 検出した場合と同じ Conflict として呼び出し側へ返す。
    fn map_uniqueness_race(
        &self,
        err: sqlx::Error,
        fallback: fn(sqlx::Error) -> AppError,
    ) -> AppError {
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(db_err.code().as_deref(), Some("23P01") | Some("40001")) {
                return AppError::Conflict(vec![ConflictDetail::new(
                    ConflictKind::Reservation,
                    "同じ時間帯の予約が同時に確定されました。空き状況を再取得してください。",
                )]);
            }
        }
        fallback(err)
    }
}
