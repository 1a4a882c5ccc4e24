use crate::model::id::{CourtId, ReservationId, UserId};
use crate::model::reservation::{
    event::{CancelReservation, CheckIn, CheckOut, ConfirmPayment, CreateReservation, MarkNoShow},
    Reservation,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::error::AppResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// 予約を作成する。重複チェックと INSERT は単一のトランザクションとして
    /// 実行され、同時予約による競合は Conflict として返る。
    async fn create(&self, event: CreateReservation) -> AppResult<ReservationId>;
    /// pending -> confirmed。決済参照を紐づける。
    async fn confirm_payment(&self, event: ConfirmPayment) -> AppResult<Reservation>;
    /// confirmed -> checked_in。受付時間帯の検証を含む。
    async fn check_in(&self, event: CheckIn) -> AppResult<Reservation>;
    /// checked_in -> completed。
    async fn check_out(&self, event: CheckOut) -> AppResult<Reservation>;
    /// pending | confirmed -> cancelled。返金額を記録する。
    async fn cancel(&self, event: CancelReservation) -> AppResult<Reservation>;
    /// confirmed -> no_show。
    async fn mark_no_show(&self, event: MarkNoShow) -> AppResult<Reservation>;
    async fn find_by_id(&self, reservation_id: ReservationId) -> AppResult<Option<Reservation>>;
    /// コート・日付に紐づく pending / confirmed の予約を取得する。
    async fn find_active_by_court_and_date(
        &self,
        court_id: CourtId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>>;
    /// ユーザー ID に紐づく予約履歴を取得する。
    async fn find_by_user_id(&self, user_id: UserId) -> AppResult<Vec<Reservation>>;
}
