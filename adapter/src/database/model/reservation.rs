use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use kernel::model::{
    id::{CourtId, ReservationId, UserId},
    reservation::{Cancellation, PriceBreakdown, Reservation, ReservationStatus},
};
use shared::error::AppError;

/// reservations テーブルの 1 行分。ステータスや料金内訳はカラムとして
/// フラットに持ち、ドメイン型への変換時に組み立てる。
#[derive(sqlx::FromRow)]
pub struct ReservationRow {
    pub reservation_id: ReservationId,
    pub court_id: CourtId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
    pub base_rate: f64,
    pub duration_hours: f64,
    pub peak_multiplier: f64,
    pub weekend_multiplier: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub service_fee: f64,
    pub total_amount: f64,
    pub status: String,
    pub notes: Option<String>,
    pub payment_reference: Option<String>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub late_arrival: bool,
    pub late_minutes: Option<i32>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<UserId>,
    pub cancellation_reason: Option<String>,
    pub refund_amount: Option<f64>,
    pub refund_processed: Option<bool>,
    pub reserved_at: DateTime<Utc>,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = AppError;

    fn try_from(value: ReservationRow) -> Result<Self, Self::Error> {
        let ReservationRow {
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
            reserved_at,
        } = value;

        let status = status.parse::<ReservationStatus>().map_err(|_| {
            AppError::ConversionEntityError(format!("不明な予約ステータスです: {status}"))
        })?;

        // キャンセル済みの場合のみキャンセル記録を復元する
        let cancellation = match (cancelled_at, cancelled_by) {
            (Some(cancelled_at), Some(cancelled_by)) => Some(Cancellation {
                cancelled_at,
                cancelled_by,
                reason: cancellation_reason,
                refund_amount: refund_amount.unwrap_or(0.0),
                refund_processed: refund_processed.unwrap_or(false),
            }),
            _ => None,
        };

        Ok(Reservation {
            reservation_id,
            court_id,
            reserved_by: user_id,
            date,
            start_time: start_time.into(),
            end_time: end_time.into(),
            duration_minutes,
            price: PriceBreakdown {
                base_rate,
                duration_hours,
                peak_multiplier,
                weekend_multiplier,
                subtotal,
                tax_amount,
                service_fee,
                total_amount,
            },
            status,
            notes,
            payment_reference,
            checked_in_at,
            late_arrival,
            late_minutes,
            checked_out_at,
            cancellation,
            reserved_at,
        })
    }
}
