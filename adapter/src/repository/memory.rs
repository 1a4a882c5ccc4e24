//! インメモリのローカルリポジトリ実装。
//!
//! 単体テストとローカル開発向けに、すべてのリポジトリトレイトを
//! HashMap ベースで実装する。検出から挿入までを単一のロック区間で
//! 行うため、Postgres 実装が排他制約とトランザクションで保証する
//! 「同時予約の二重確定なし」をここでも満たす。

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use kernel::model::court::{
    event::{CreateCourt, UpdateCourt},
    Court,
};
use kernel::model::id::{BlockId, CourtId, ReservationId, UserId};
use kernel::model::reservation::{
    event::{CancelReservation, CheckIn, CheckOut, ConfirmPayment, CreateReservation, MarkNoShow},
    Reservation, ReservationStatus,
};
use kernel::model::schedule_block::{
    event::{CreateBlock, CreateSpecialRate},
    ScheduleBlock,
};
use kernel::model::time::overlaps;
use kernel::repository::court::CourtRepository;
use kernel::repository::health::HealthCheckRepository;
use kernel::repository::reservation::ReservationRepository;
use kernel::repository::schedule_block::ScheduleBlockRepository;
use shared::error::{AppError, AppResult, ConflictDetail};

#[derive(Clone, Default)]
pub struct MemoryRepository {
    data: Arc<RwLock<MemoryData>>,
}

#[derive(Default)]
struct MemoryData {
    courts: HashMap<CourtId, Court>,
    reservations: HashMap<ReservationId, Reservation>,
    blocks: HashMap<BlockId, ScheduleBlock>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// テストデータ投入用。
    pub fn insert_court(&self, court: Court) {
        let mut data = self.data.write().unwrap();
        data.courts.insert(court.court_id, court);
    }

    fn reservation_not_found(reservation_id: ReservationId) -> AppError {
        AppError::EntityNotFound(format!("予約（{}）が見つかりませんでした。", reservation_id))
    }
}

#[async_trait]
impl HealthCheckRepository for MemoryRepository {
    async fn check_db(&self) -> bool {
        true
    }
}

#[async_trait]
impl CourtRepository for MemoryRepository {
    async fn create(&self, event: CreateCourt) -> AppResult<CourtId> {
        let court_id = CourtId::new();
        let court = Court {
            court_id,
            facility_id: event.facility_id,
            court_name: event.court_name,
            is_active: true,
            weekly_hours: event.weekly_hours,
            base_rate: event.base_rate,
            peak_rate: event.peak_rate,
            weekend_rate: event.weekend_rate,
            min_duration_minutes: event.min_duration_minutes,
            max_duration_minutes: event.max_duration_minutes,
            advance_booking_days: event.advance_booking_days,
            cancellation_deadline_hours: event.cancellation_deadline_hours,
        };
        self.insert_court(court);
        Ok(court_id)
    }

    async fn update(&self, event: UpdateCourt) -> AppResult<()> {
        let mut data = self.data.write().unwrap();
        let Some(court) = data.courts.get_mut(&event.court_id) else {
            return Err(AppError::EntityNotFound(format!(
                "コート（{}）が見つかりませんでした。",
                event.court_id
            )));
        };

        if let Some(v) = event.court_name {
            court.court_name = v;
        }
        if let Some(v) = event.is_active {
            court.is_active = v;
        }
        if let Some(v) = event.weekly_hours {
            court.weekly_hours = v;
        }
        if let Some(v) = event.base_rate {
            court.base_rate = v;
        }
        if let Some(v) = event.peak_rate {
            court.peak_rate = v;
        }
        if let Some(v) = event.weekend_rate {
            court.weekend_rate = v;
        }
        if let Some(v) = event.min_duration_minutes {
            court.min_duration_minutes = v;
        }
        if let Some(v) = event.max_duration_minutes {
            court.max_duration_minutes = v;
        }
        if let Some(v) = event.advance_booking_days {
            court.advance_booking_days = v;
        }
        if let Some(v) = event.cancellation_deadline_hours {
            court.cancellation_deadline_hours = v;
        }
        Ok(())
    }

    async fn find_all(&self) -> AppResult<Vec<Court>> {
        let data = self.data.read().unwrap();
        Ok(data.courts.values().cloned().collect())
    }

    async fn find_by_id(&self, court_id: CourtId) -> AppResult<Option<Court>> {
        let data = self.data.read().unwrap();
        Ok(data.courts.get(&court_id).cloned())
    }
}

#[async_trait]
impl ReservationRepository for MemoryRepository {
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId> {
        // 検出から挿入までを 1 つの書き込みロック区間で行う。
        // Postgres 実装の SERIALIZABLE トランザクション＋排他制約に相当する。
        let mut data = self.data.write().unwrap();

        let Some(court) = data.courts.get(&event.court_id) else {
            return Err(AppError::EntityNotFound(format!(
                "コート（{}）が見つかりませんでした。",
                event.court_id
            )));
        };
        if !court.is_active {
            return Err(AppError::UnprocessableEntity(format!(
                "コート（{}）は現在利用できません（is_active = false）",
                event.court_id
            )));
        }

        let overlap = data.reservations.values().find(|r| {
            r.court_id == event.court_id
                && r.date == event.date
                && r.status.occupies_slot()
                && overlaps(event.start_time, event.end_time, r.start_time, r.end_time)
        });
        if let Some(existing) = overlap {
            return Err(AppError::Conflict(vec![ConflictDetail::reservation(
                existing.reservation_id.raw(),
                format!(
                    "既存の予約（{} 〜 {}）と重なっています。",
                    existing.start_time, existing.end_time
                ),
            )]));
        }

        let blocked = data.blocks.values().find(|b| {
            b.court_id == event.court_id
                && b.date == event.date
                && b.is_blocked
                && overlaps(event.start_time, event.end_time, b.start_time, b.end_time)
        });
        if let Some(block) = blocked {
            return Err(AppError::Conflict(vec![ConflictDetail::maintenance(
                block.block_type.map(|t| t.to_string()),
                block
                    .reason
                    .clone()
                    .unwrap_or_else(|| "コートが利用できない時間帯です。".into()),
            )]));
        }

        let reservation_id = ReservationId::new();
        let duration_minutes =
            (event.end_time.to_minutes() - event.start_time.to_minutes()) as i32;
        data.reservations.insert(
            reservation_id,
            Reservation {
                reservation_id,
                court_id: event.court_id,
                reserved_by: event.reserved_by,
                date: event.date,
                start_time: event.start_time,
                end_time: event.end_time,
                duration_minutes,
                price: event.price,
                status: ReservationStatus::Pending,
                notes: event.notes,
                payment_reference: None,
                checked_in_at: None,
                late_arrival: false,
                late_minutes: None,
                checked_out_at: None,
                cancellation: None,
                reserved_at: event.reserved_at,
            },
        );
        Ok(reservation_id)
    }

    async fn confirm_payment(&self, event: ConfirmPayment) -> AppResult<Reservation> {
        let mut data = self.data.write().unwrap();
        let Some(reservation) = data.reservations.get_mut(&event.reservation_id) else {
            return Err(Self::reservation_not_found(event.reservation_id));
        };
        reservation.verify_transition(ReservationStatus::Confirmed)?;
        reservation.status = ReservationStatus::Confirmed;
        reservation.payment_reference = Some(event.payment_reference);
        Ok(reservation.clone())
    }

    async fn check_in(&self, event: CheckIn) -> AppResult<Reservation> {
        let mut data = self.data.write().unwrap();
        let Some(reservation) = data.reservations.get_mut(&event.reservation_id) else {
            return Err(Self::reservation_not_found(event.reservation_id));
        };
        let record = reservation.check_in_record(event.now)?;
        reservation.status = ReservationStatus::CheckedIn;
        reservation.checked_in_at = Some(record.checked_in_at);
        reservation.late_arrival = record.late_arrival;
        reservation.late_minutes = record.late_minutes;
        Ok(reservation.clone())
    }

    async fn check_out(&self, event: CheckOut) -> AppResult<Reservation> {
        let mut data = self.data.write().unwrap();
        let Some(reservation) = data.reservations.get_mut(&event.reservation_id) else {
            return Err(Self::reservation_not_found(event.reservation_id));
        };
        reservation.verify_transition(ReservationStatus::Completed)?;
        reservation.status = ReservationStatus::Completed;
        reservation.checked_out_at = Some(event.now);
        Ok(reservation.clone())
    }

    async fn cancel(&self, event: CancelReservation) -> AppResult<Reservation> {
        let mut data = self.data.write().unwrap();
        let Some(reservation) = data.reservations.get_mut(&event.reservation_id) else {
            return Err(Self::reservation_not_found(event.reservation_id));
        };
        let record =
            reservation.cancellation_record(event.now, event.cancelled_by, event.reason)?;
        reservation.status = ReservationStatus::Cancelled;
        reservation.cancellation = Some(record);
        Ok(reservation.clone())
    }

    async fn mark_no_show(&self, event: MarkNoShow) -> AppResult<Reservation> {
        let mut data = self.data.write().unwrap();
        let Some(reservation) = data.reservations.get_mut(&event.reservation_id) else {
            return Err(Self::reservation_not_found(event.reservation_id));
        };
        reservation.verify_no_show(event.now)?;
        reservation.status = ReservationStatus::NoShow;
        Ok(reservation.clone())
    }

    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>> {
        let data = self.data.read().unwrap();
        Ok(data.reservations.get(&reservation_id).cloned())
    }

    async fn find_active_by_court_and_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        let data = self.data.read().unwrap();
        let mut reservations: Vec<Reservation> = data
            .reservations
            .values()
            .filter(|r| r.court_id == court_id && r.date == date && r.status.occupies_slot())
            .cloned()
            .collect();
        reservations.sort_by_key(|r| r.start_time);
        Ok(reservations)
    }

    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>> {
        let data = self.data.read().unwrap();
        let mut reservations: Vec<Reservation> = data
            .reservations
            .values()
            .filter(|r| r.reserved_by == user_id)
            .cloned()
            .collect();
        reservations.sort_by_key(|r| r.reserved_at);
        Ok(reservations)
    }
}

#[async_trait]
impl ScheduleBlockRepository for MemoryRepository {
    async fn create_block(&self, event: CreateBlock) -> AppResult<BlockId> {
        let mut data = self.data.write().unwrap();

        // 予約を黙って潰すブロック作成は許さない
        let overlap = data.reservations.values().find(|r| {
            r.court_id == event.court_id
                && r.date == event.date
                && r.status.occupies_slot()
                && overlaps(event.start_time, event.end_time, r.start_time, r.end_time)
        });
        if let Some(existing) = overlap {
            return Err(AppError::Conflict(vec![ConflictDetail::reservation(
                existing.reservation_id.raw(),
                format!(
                    "指定の時間帯には予約（{} 〜 {}）が入っています。",
                    existing.start_time, existing.end_time
                ),
            )]));
        }

        let block_id = BlockId::new();
        data.blocks.insert(
            block_id,
            ScheduleBlock {
                block_id,
                court_id: event.court_id,
                date: event.date,
                start_time: event.start_time,
                end_time: event.end_time,
                is_blocked: true,
                block_type: Some(event.block_type),
                reason: event.reason,
                override_rate: None,
                created_at: Utc::now(),
            },
        );
        Ok(block_id)
    }

    async fn create_special_rate(&self, event: CreateSpecialRate) -> AppResult<BlockId> {
        let mut data = self.data.write().unwrap();
        let block_id = BlockId::new();
        data.blocks.insert(
            block_id,
            ScheduleBlock {
                block_id,
                court_id: event.court_id,
                date: event.date,
                start_time: event.start_time,
                end_time: event.end_time,
                is_blocked: false,
                block_type: None,
                reason: None,
                override_rate: Some(event.rate),
                created_at: Utc::now(),
            },
        );
        Ok(block_id)
    }

    async fn remove(&self, block_id: BlockId) -> AppResult<()> {
        let mut data = self.data.write().unwrap();
        if data.blocks.remove(&block_id).is_none() {
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
        let data = self.data.read().unwrap();
        let mut blocks: Vec<ScheduleBlock> = data
            .blocks
            .values()
            .filter(|b| b.court_id == court_id && b.date == date)
            .cloned()
            .collect();
        blocks.sort_by_key(|b| b.start_time);
        Ok(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use kernel::model::court::{DayHours, WeeklyHours};
    use kernel::model::id::FacilityId;
    use kernel::model::schedule_block::BlockType;
    use kernel::model::time::TimeOfDay;
    use kernel::service::pricing::PricingEngine;
    use rand::Rng;
    use shared::config::PricingConfig;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 9).unwrap()
    }

    fn court() -> Court {
        let day = DayHours {
            open: t("06:00"),
            close: t("22:00"),
            is_open: true,
        };
        Court {
            court_id: CourtId::new(),
            facility_id: FacilityId::new(),
            court_name: "Court A".into(),
            is_active: true,
            weekly_hours: WeeklyHours::new([day; 7]),
            base_rate: 350.0,
            peak_rate: 450.0,
            weekend_rate: 400.0,
            min_duration_minutes: 60,
            max_duration_minutes: 180,
            advance_booking_days: 30,
            cancellation_deadline_hours: 24,
        }
    }

    fn create_event(court: &Court, start: &str, end: &str) -> CreateReservation {
        let engine = PricingEngine::new(PricingConfig::default());
        let price = engine.calculate(court, date(), t(start), t(end), &[]);
        CreateReservation::new(
            court.court_id,
            UserId::new(),
            date(),
            t(start),
            t(end),
            None,
            price,
            Utc::now(),
        )
    }

    fn repo_with_court() -> (MemoryRepository, Court) {
        let repo = MemoryRepository::new();
        let court = court();
        repo.insert_court(court.clone());
        (repo, court)
    }

    #[tokio::test]
    async fn create_stores_pending_reservation() {
        let (repo, court) = repo_with_court();
        let id = ReservationRepository::create(&repo, create_event(&court, "18:00", "19:30"))
            .await
            .unwrap();

        let reservation = ReservationRepository::find_by_id(&repo, id).await.unwrap().unwrap();
        assert_eq!(reservation.status, ReservationStatus::Pending);
        assert_eq!(reservation.duration_minutes, 90);
        assert_eq!(reservation.price.subtotal, 675.0);
    }

    #[tokio::test]
    async fn create_rejects_overlapping_window() {
        let (repo, court) = repo_with_court();
        let first = ReservationRepository::create(&repo, create_event(&court, "18:00", "19:30"))
            .await
            .unwrap();

        let err = ReservationRepository::create(&repo, create_event(&court, "18:30", "19:30"))
            .await
            .unwrap_err();
        let AppError::Conflict(violations) = err else {
            panic!("Conflict expected");
        };
        assert_eq!(violations[0].reservation_id, Some(first.raw()));
    }

    #[tokio::test]
    async fn touching_windows_do_not_conflict() {
        let (repo, court) = repo_with_court();
        ReservationRepository::create(&repo, create_event(&court, "09:00", "10:00"))
            .await
            .unwrap();
        ReservationRepository::create(&repo, create_event(&court, "10:00", "11:00"))
            .await
            .unwrap();

        let active = repo
            .find_active_by_court_and_date(court.court_id, date())
            .await
            .unwrap();
        assert_eq!(active.len(), 2);
    }

    #[tokio::test]
    async fn create_rejects_inactive_court() {
        let (repo, mut court) = repo_with_court();
        court.is_active = false;
        repo.insert_court(court.clone());

        let err = ReservationRepository::create(&repo, create_event(&court, "09:00", "10:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_creates_never_double_book() {
        let (repo, court) = repo_with_court();
        let repo = Arc::new(repo);

        // 10:00 〜 14:00 の間でランダムな 60 分枠を同時に予約し続けても、
        // pending / confirmed 同士の時間帯が重なることはない
        let mut handles = Vec::new();
        for _ in 0..32 {
            let repo = Arc::clone(&repo);
            let court = court.clone();
            handles.push(tokio::spawn(async move {
                let start_minutes = {
                    let mut rng = rand::thread_rng();
                    10 * 60 + rng.gen_range(0..8) * 30
                };
                let start = TimeOfDay::from_minutes(start_minutes).unwrap();
                let end = TimeOfDay::from_minutes(start_minutes + 60).unwrap();
                let engine = PricingEngine::new(PricingConfig::default());
                let price = engine.calculate(&court, date(), start, end, &[]);
                let event = CreateReservation::new(
                    court.court_id,
                    UserId::new(),
                    date(),
                    start,
                    end,
                    None,
                    price,
                    Utc::now(),
                );
                ReservationRepository::create(repo.as_ref(), event).await
            }));
        }

        let mut succeeded = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                succeeded += 1;
            }
        }
        assert!(succeeded >= 1);

        let active = repo
            .find_active_by_court_and_date(court.court_id, date())
            .await
            .unwrap();
        assert_eq!(active.len(), succeeded);
        for (i, a) in active.iter().enumerate() {
            for b in &active[i + 1..] {
                assert!(
                    !overlaps(a.start_time, a.end_time, b.start_time, b.end_time),
                    "double booking detected: {} - {} and {} - {}",
                    a.start_time,
                    a.end_time,
                    b.start_time,
                    b.end_time
                );
            }
        }
    }

    #[tokio::test]
    async fn lifecycle_happy_path() {
        let (repo, court) = repo_with_court();
        let id = ReservationRepository::create(&repo, create_event(&court, "18:00", "19:30"))
            .await
            .unwrap();

        let confirmed = repo
            .confirm_payment(ConfirmPayment::new(id, "pay_12345".into()))
            .await
            .unwrap();
        assert_eq!(confirmed.status, ReservationStatus::Confirmed);
        assert_eq!(confirmed.payment_reference.as_deref(), Some("pay_12345"));

        let starts_at = confirmed.starts_at();
        let checked_in = repo
            .check_in(CheckIn::new(id, starts_at - Duration::minutes(10)))
            .await
            .unwrap();
        assert_eq!(checked_in.status, ReservationStatus::CheckedIn);
        assert!(!checked_in.late_arrival);

        let completed = repo
            .check_out(CheckOut::new(id, starts_at + Duration::minutes(90)))
            .await
            .unwrap();
        assert_eq!(completed.status, ReservationStatus::Completed);
        assert!(completed.checked_out_at.is_some());
    }

    #[tokio::test]
    async fn check_in_outside_window_leaves_status_unchanged() {
        let (repo, court) = repo_with_court();
        let id = ReservationRepository::create(&repo, create_event(&court, "18:00", "19:30"))
            .await
            .unwrap();
        repo.confirm_payment(ConfirmPayment::new(id, "pay_1".into()))
            .await
            .unwrap();

        let reservation = ReservationRepository::find_by_id(&repo, id).await.unwrap().unwrap();
        let err = repo
            .check_in(CheckIn::new(id, reservation.starts_at() - Duration::minutes(45)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::OutOfWindow(_)));

        let unchanged = ReservationRepository::find_by_id(&repo, id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn cancel_10_hours_before_refunds_half() {
        let (repo, court) = repo_with_court();
        let id = ReservationRepository::create(&repo, create_event(&court, "18:00", "19:30"))
            .await
            .unwrap();
        let confirmed = repo
            .confirm_payment(ConfirmPayment::new(id, "pay_1".into()))
            .await
            .unwrap();

        let now = confirmed.starts_at() - Duration::hours(10);
        let cancelled = repo
            .cancel(CancelReservation::new(id, confirmed.reserved_by, None, now))
            .await
            .unwrap();
        assert_eq!(cancelled.status, ReservationStatus::Cancelled);
        let record = cancelled.cancellation.expect("cancellation record expected");
        // total 803.25 の 50%
        assert_eq!(record.refund_amount, 401.63);
        assert!(!record.refund_processed);
    }

    #[tokio::test]
    async fn cancel_30_hours_before_refunds_everything() {
        let (repo, court) = repo_with_court();
        let id = ReservationRepository::create(&repo, create_event(&court, "18:00", "19:30"))
            .await
            .unwrap();
        let confirmed = repo
            .confirm_payment(ConfirmPayment::new(id, "pay_1".into()))
            .await
            .unwrap();

        let now = confirmed.starts_at() - Duration::hours(30);
        let cancelled = repo
            .cancel(CancelReservation::new(id, confirmed.reserved_by, None, now))
            .await
            .unwrap();
        let record = cancelled.cancellation.expect("cancellation record expected");
        assert_eq!(record.refund_amount, 803.25);
    }

    #[tokio::test]
    async fn cancelled_reservation_rejects_further_operations() {
        let (repo, court) = repo_with_court();
        let id = ReservationRepository::create(&repo, create_event(&court, "18:00", "19:30"))
            .await
            .unwrap();
        let reservation = ReservationRepository::find_by_id(&repo, id).await.unwrap().unwrap();
        repo.cancel(CancelReservation::new(
            id,
            reservation.reserved_by,
            Some("都合が悪くなった".into()),
            reservation.starts_at() - Duration::hours(48),
        ))
        .await
        .unwrap();

        let err = repo
            .confirm_payment(ConfirmPayment::new(id, "pay_late".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let reservation = ReservationRepository::find_by_id(&repo, id).await.unwrap().unwrap();
        let err = repo
            .check_in(CheckIn::new(id, reservation.starts_at()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn cancelled_slot_becomes_bookable_again() {
        let (repo, court) = repo_with_court();
        let id = ReservationRepository::create(&repo, create_event(&court, "18:00", "19:30"))
            .await
            .unwrap();
        let reservation = ReservationRepository::find_by_id(&repo, id).await.unwrap().unwrap();
        repo.cancel(CancelReservation::new(
            id,
            reservation.reserved_by,
            None,
            reservation.starts_at() - Duration::hours(48),
        ))
        .await
        .unwrap();

        // キャンセル済みは時間帯を占有しないので、同じ枠を予約できる
        ReservationRepository::create(&repo, create_event(&court, "18:00", "19:30"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn no_show_after_check_in_window() {
        let (repo, court) = repo_with_court();
        let id = ReservationRepository::create(&repo, create_event(&court, "18:00", "19:30"))
            .await
            .unwrap();
        let confirmed = repo
            .confirm_payment(ConfirmPayment::new(id, "pay_1".into()))
            .await
            .unwrap();

        let too_early = confirmed.starts_at() + Duration::minutes(10);
        assert!(matches!(
            repo.mark_no_show(MarkNoShow::new(id, too_early)).await,
            Err(AppError::InvalidState(_))
        ));

        let after_window = confirmed.starts_at() + Duration::minutes(20);
        let marked = repo
            .mark_no_show(MarkNoShow::new(id, after_window))
            .await
            .unwrap();
        assert_eq!(marked.status, ReservationStatus::NoShow);
    }

    #[tokio::test]
    async fn block_over_active_reservation_is_rejected() {
        let (repo, court) = repo_with_court();
        let id = ReservationRepository::create(&repo, create_event(&court, "18:00", "19:30"))
            .await
            .unwrap();
        repo.confirm_payment(ConfirmPayment::new(id, "pay_1".into()))
            .await
            .unwrap();

        let err = repo
            .create_block(CreateBlock::new(
                court.court_id,
                date(),
                t("17:00"),
                t("20:00"),
                BlockType::Maintenance,
                Some("コート整備".into()),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // 予約もブロック一覧も無傷のまま
        let reservation = ReservationRepository::find_by_id(&repo, id).await.unwrap().unwrap();
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        let blocks = repo
            .find_by_court_and_date(court.court_id, date())
            .await
            .unwrap();
        assert!(blocks.is_empty());
    }

    #[tokio::test]
    async fn blocked_window_rejects_new_reservations() {
        let (repo, court) = repo_with_court();
        repo.create_block(CreateBlock::new(
            court.court_id,
            date(),
            t("10:00"),
            t("12:00"),
            BlockType::Weather,
            None,
        ))
        .await
        .unwrap();

        let err = ReservationRepository::create(&repo, create_event(&court, "11:00", "12:00"))
            .await
            .unwrap_err();
        let AppError::Conflict(violations) = err else {
            panic!("Conflict expected");
        };
        assert_eq!(violations[0].block_type.as_deref(), Some("weather"));
    }

    #[tokio::test]
    async fn remove_block_is_unconditional() {
        let (repo, court) = repo_with_court();
        let block_id = repo
            .create_block(CreateBlock::new(
                court.court_id,
                date(),
                t("06:00"),
                t("08:00"),
                BlockType::Maintenance,
                None,
            ))
            .await
            .unwrap();

        ScheduleBlockRepository::remove(&repo, block_id).await.unwrap();
        let err = ScheduleBlockRepository::remove(&repo, block_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::EntityNotFound(_)));
    }

    #[tokio::test]
    async fn special_rate_block_does_not_occupy_the_window() {
        let (repo, court) = repo_with_court();
        repo.create_special_rate(CreateSpecialRate::new(
            court.court_id,
            date(),
            t("10:00"),
            t("12:00"),
            200.0,
        ))
        .await
        .unwrap();

        // 特別料金ブロックは時間帯を塞がない
        ReservationRepository::create(&repo, create_event(&court, "10:00", "11:00"))
            .await
            .unwrap();

        let blocks = repo
            .find_by_court_and_date(court.court_id, date())
            .await
            .unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_special_rate());
    }

    #[tokio::test]
    async fn find_by_user_id_returns_only_their_reservations() {
        let (repo, court) = repo_with_court();
        let mut event = create_event(&court, "09:00", "10:00");
        let user_id = UserId::new();
        event.reserved_by = user_id;
        ReservationRepository::create(&repo, event).await.unwrap();
        ReservationRepository::create(&repo, create_event(&court, "11:00", "12:00"))
            .await
            .unwrap();

        let reservations = repo.find_by_user_id(user_id).await.unwrap();
        assert_eq!(reservations.len(), 1);
        assert_eq!(reservations[0].reserved_by, user_id);
    }
}
