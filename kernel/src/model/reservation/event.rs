use crate::model::id::{CourtId, ReservationId, UserId};
use crate::model::reservation::PriceBreakdown;
use crate::model::time::TimeOfDay;
use chrono::{DateTime, NaiveDate, Utc};
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateReservation {
    pub court_id: CourtId,
    pub reserved_by: UserId,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub notes: Option<String>,
    pub price: PriceBreakdown,
    pub reserved_at: DateTime<Utc>,
}

#[derive(Debug, new)]
pub struct ConfirmPayment {
    pub reservation_id: ReservationId,
    pub payment_reference: String,
}

#[derive(Debug, new)]
pub struct CheckIn {
    pub reservation_id: ReservationId,
    pub now: DateTime<Utc>,
}

#[derive(Debug, new)]
pub struct CheckOut {
    pub reservation_id: ReservationId,
    pub now: DateTime<Utc>,
}

#[derive(Debug, new)]
pub struct CancelReservation {
    pub reservation_id: ReservationId,
    pub cancelled_by: UserId,
    pub reason: Option<String>,
    pub now: DateTime<Utc>,
}

#[derive(Debug, new)]
pub struct MarkNoShow {
    pub reservation_id: ReservationId,
    pub now: DateTime<Utc>,
}
