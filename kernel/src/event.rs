use crate::model::id::{CourtId, ReservationId, UserId};
use crate::model::time::TimeOfDay;
use chrono::{DateTime, NaiveDate, Utc};

/// 予約ライフサイクルで発火するイベント。
/// 通知の整形・配送は外部コラボレーターの責務で、この層からは
/// fire-and-forget で発行するだけ。送達は待たず、失敗しても操作は巻き戻さない。
#[derive(Debug, Clone)]
pub enum ReservationEvent {
    Created {
        reservation_id: ReservationId,
        court_id: CourtId,
        reserved_by: UserId,
        date: NaiveDate,
        start_time: TimeOfDay,
        end_time: TimeOfDay,
    },
    PaymentConfirmed {
        reservation_id: ReservationId,
    },
    CheckedIn {
        reservation_id: ReservationId,
        at: DateTime<Utc>,
        late_arrival: bool,
    },
    CheckedOut {
        reservation_id: ReservationId,
        at: DateTime<Utc>,
    },
    Cancelled {
        reservation_id: ReservationId,
        refund_amount: f64,
    },
    NoShowMarked {
        reservation_id: ReservationId,
    },
}

pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: ReservationEvent);
}
