use chrono::{DateTime, NaiveDate, Utc};
use garde::Validate;
use kernel::model::{
    id::{CourtId, ReservationId, UserId},
    reservation::{Cancellation, PriceBreakdown, Reservation, ReservationStatus},
    time::TimeOfDay,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(skip)]
    pub date: NaiveDate,
    #[garde(skip)]
    pub start_time: TimeOfDay,
    #[garde(skip)]
    pub end_time: TimeOfDay,
    #[garde(skip)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    #[garde(length(min = 1))]
    pub payment_reference: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CancelReservationRequest {
    #[garde(skip)]
    pub user_id: UserId,
    #[garde(skip)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationListQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdownResponse {
    pub base_rate: f64,
    pub duration_hours: f64,
    pub peak_multiplier: f64,
    pub weekend_multiplier: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub service_fee: f64,
    pub total_amount: f64,
}

impl From<PriceBreakdown> for PriceBreakdownResponse {
    fn from(value: PriceBreakdown) -> Self {
        let PriceBreakdown {
            base_rate,
            duration_hours,
            peak_multiplier,
            weekend_multiplier,
            subtotal,
            tax_amount,
            service_fee,
            total_amount,
        } = value;
        Self {
            base_rate,
            duration_hours,
            peak_multiplier,
            weekend_multiplier,
            subtotal,
            tax_amount,
            service_fee,
            total_amount,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancellationResponse {
    pub cancelled_at: DateTime<Utc>,
    pub cancelled_by: UserId,
    pub reason: Option<String>,
    pub refund_amount: f64,
    pub refund_processed: bool,
}

impl From<Cancellation> for CancellationResponse {
    fn from(value: Cancellation) -> Self {
        let Cancellation {
            cancelled_at,
            cancelled_by,
            reason,
            refund_amount,
            refund_processed,
        } = value;
        Self {
            cancelled_at,
            cancelled_by,
            reason,
            refund_amount,
            refund_processed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub reservation_id: ReservationId,
    pub court_id: CourtId,
    pub reserved_by: UserId,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub duration_minutes: i32,
    pub price: PriceBreakdownResponse,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub payment_reference: Option<String>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub late_arrival: bool,
    pub late_minutes: Option<i32>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub cancellation: Option<CancellationResponse>,
    pub reserved_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationResponse {
    fn from(value: Reservation) -> Self {
        let Reservation {
            reservation_id,
            court_id,
            reserved_by,
            date,
            start_time,
            end_time,
            duration_minutes,
            price,
            status,
            notes,
            payment_reference,
            checked_in_at,
            late_arrival,
            late_minutes,
            checked_out_at,
            cancellation,
            reserved_at,
        } = value;
        Self {
            reservation_id,
            court_id,
            reserved_by,
            date,
            start_time,
            end_time,
            duration_minutes,
            price: price.into(),
            status,
            notes,
            payment_reference,
            checked_in_at,
            late_arrival,
            late_minutes,
            checked_out_at,
            cancellation: cancellation.map(CancellationResponse::from),
            reserved_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationsResponse {
    pub items: Vec<ReservationResponse>,
}

impl From<Vec<Reservation>> for ReservationsResponse {
    fn from(value: Vec<Reservation>) -> Self {
        Self {
            items: value.into_iter().map(ReservationResponse::from).collect(),
        }
    }
}
