use crate::database::{model::schedule_block::ScheduleBlockRow, ConnectionPool};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};
use derive_new::new;
use kernel::model::id::{BlockId, CourtId};
use kernel::model::schedule_block::{
    event::{CreateBlock, CreateSpecialRate},
    ScheduleBlock,
};
use kernel::repository::schedule_block::ScheduleBlockRepository;
use shared::error::{AppError, AppResult, ConflictDetail};
use uuid::Uuid;

const BLOCK_COLUMNS: &str = r#"
    block_id,
    court_id,
    date,
    start_time,
    end_time,
    is_blocked,
    block_type,
    reason,
    override_rate,
    created_at
"#;

#[derive(new)]
pub struct ScheduleBlockRepositoryImpl {
    db: ConnectionPool,
}

#[async_trait]
impl ScheduleBlockRepository for ScheduleBlockRepositoryImpl {
    // 利用不可ブロックを作成する
    async fn create_block(&self, event: CreateBlock) -> AppResult<BlockId> {
        let mut tx = self.db.begin().await?;

        // トランザクション分離レベルを SERIALIZABLE に設定する
        self.set_transaction_serializable(&mut tx).await?;

        // ブロック対象の時間帯に pending / confirmed の予約がないか確認する。
        // 予約を黙ってキャンセルするようなブロック作成は許さないため、
        // 重なる予約があれば Conflict を返して何も書き込まない。
        {
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
                        "指定の時間帯には予約（{} 〜 {}）が入っています。",
                        start.format("%H:%M"),
                        end.format("%H:%M")
                    ),
                )]));
            }
        }

        let block_id = BlockId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO schedule_blocks
                (block_id, court_id, date, start_time, end_time,
                 is_blocked, block_type, reason, created_at)
                VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7, $8)
            "#,
        )
        .bind(block_id)
        .bind(event.court_id)
        .bind(event.date)
        .bind(event.start_time.as_naive())
        .bind(event.end_time.as_naive())
        .bind(event.block_type.to_string())
        .bind(&event.reason)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No schedule block record has been created".into(),
            ));
        }

        tx.commit().await.map_err(AppError::TransactionError)?;

        Ok(block_id)
    }

    // 特別料金ブロックを作成する。時間帯は塞がないため予約との重複確認は不要
    async fn create_special_rate(&self, event: CreateSpecialRate) -> AppResult<BlockId> {
        let block_id = BlockId::new();
        let res = sqlx::query(
            r#"
                INSERT INTO schedule_blocks
                (block_id, court_id, date, start_time, end_time,
                 is_blocked, override_rate, created_at)
                VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
            "#,
        )
        .bind(block_id)
        .bind(event.court_id)
        .bind(event.date)
        .bind(event.start_time.as_naive())
        .bind(event.end_time.as_naive())
        .bind(event.rate)
        .bind(Utc::now())
        .execute(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::NoRowsAffectedError(
                "No schedule block record has been created".into(),
            ));
        }

        Ok(block_id)
    }

    async fn remove(&self, block_id: BlockId) -> AppResult<()> {
        let res = sqlx::query("DELETE FROM schedule_blocks WHERE block_id = $1")
            .bind(block_id)
            .execute(self.db.inner_ref())
            .await
            .map_err(AppError::SpecificOperationError)?;

        if res.rows_affected() < 1 {
            return Err(AppError::EntityNotFound(format!(
                "スケジュールブロック（{}）が見つかりませんでした。",
                block_id
            )));
        }

        Ok(())
    }

    async fn find_by_court_and_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Vec<ScheduleBlock>> {
        let rows: Vec<ScheduleBlockRow> = sqlx::query_as(&format!(
            r#"
                SELECT {BLOCK_COLUMNS}
                FROM schedule_blocks
                WHERE court_id = $1 AND date = $2
                ORDER BY start_time ASC
            "#
        ))
        .bind(court_id)
        .bind(date)
        .fetch_all(self.db.inner_ref())
        .await
        .map_err(AppError::SpecificOperationError)?;

        rows.into_iter().map(ScheduleBlock::try_from).collect()
    }
}

impl ScheduleBlockRepositoryImpl {
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
}
