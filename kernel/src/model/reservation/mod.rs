use crate::model::id::{CourtId, ReservationId, UserId};
use crate::model::time::TimeOfDay;
use crate::service::pricing::round_to_cents;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};

pub mod event;

/// チェックイン受付の開始（予約開始の何分前から）
pub const CHECK_IN_OPENS_BEFORE_MINUTES: i64 = 30;
/// チェックイン受付の終了（予約開始の何分後まで）
pub const CHECK_IN_CLOSES_AFTER_MINUTES: i64 = 15;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    Completed,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    /// pending / confirmed の予約だけがコートの時間帯を占有する。
    pub fn occupies_slot(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed | Self::NoShow)
    }

    /// 許可される遷移:
    ///   pending -> confirmed -> checked_in -> completed
    ///   pending | confirmed -> cancelled
    ///   confirmed -> no_show
    pub fn can_transition_to(self, next: Self) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, CheckedIn)
                | (CheckedIn, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
        )
    }
}

/// 料金内訳。金額はすべて計算時点で銭単位へ丸め済み。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_rate: f64,
    pub duration_hours: f64,
    pub peak_multiplier: f64,
    pub weekend_multiplier: f64,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub service_fee: f64,
    pub total_amount: f64,
}

/// キャンセル記録。返金額はここで確定するが、実際の返金処理は
/// 外部の決済コラボレーターが行う。
#[derive(Debug, Clone)]
pub struct Cancellation {
    pub cancelled_at: DateTime<Utc>,
    pub cancelled_by: UserId,
    pub reason: Option<String>,
    pub refund_amount: f64,
    pub refund_processed: bool,
}

/// チェックイン時に記録する情報。
#[derive(Debug, Clone, Copy)]
pub struct CheckInRecord {
    pub checked_in_at: DateTime<Utc>,
    pub late_arrival: bool,
    pub late_minutes: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct Reservation {
    pub reservation_id: ReservationId,
    pub court_id: CourtId,
    pub reserved_by: UserId,
    pub date: NaiveDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub duration_minutes: i32,
    pub price: PriceBreakdown,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub payment_reference: Option<String>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub late_arrival: bool,
    pub late_minutes: Option<i32>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub cancellation: Option<Cancellation>,
    pub reserved_at: DateTime<Utc>,
}

impl Reservation {
    /// 予約開始日時（UTC）。
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.date.and_time(self.start_time.as_naive()).and_utc()
    }

    /// 現在のステータスから next へ遷移できるか検証する。
    pub fn verify_transition(&self, next: ReservationStatus) -> AppResult<()> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(AppError::InvalidState(format!(
                "予約（{}）はステータス {} から {} へは変更できません。",
                self.reservation_id, self.status, next
            )))
        }
    }

    /// チェックインを検証し、記録する情報を組み立てる。
    /// 受付時間帯は [開始 30 分前, 開始 15 分後]。
    pub fn check_in_record(&self, now: DateTime<Utc>) -> AppResult<CheckInRecord> {
        self.verify_transition(ReservationStatus::CheckedIn)?;

        let starts_at = self.starts_at();
        let opens = starts_at - Duration::minutes(CHECK_IN_OPENS_BEFORE_MINUTES);
        let closes = starts_at + Duration::minutes(CHECK_IN_CLOSES_AFTER_MINUTES);
        if now < opens || now > closes {
            return Err(AppError::OutOfWindow(format!(
                "チェックインは開始 {} 分前から開始 {} 分後まで受け付けます（予約開始: {}）。",
                CHECK_IN_OPENS_BEFORE_MINUTES,
                CHECK_IN_CLOSES_AFTER_MINUTES,
                starts_at.format("%Y-%m-%d %H:%M"),
            )));
        }

        let late_arrival = now > starts_at;
        Ok(CheckInRecord {
            checked_in_at: now,
            late_arrival,
            late_minutes: late_arrival.then(|| (now - starts_at).num_minutes() as i32),
        })
    }

    /// キャンセルを検証し、返金額を確定した記録を組み立てる。
    pub fn cancellation_record(
        &self,
        now: DateTime<Utc>,
        cancelled_by: UserId,
        reason: Option<String>,
    ) -> AppResult<Cancellation> {
        self.verify_transition(ReservationStatus::Cancelled)?;

        let hours_until_start = (self.starts_at() - now).num_minutes() as f64 / 60.0;
        let refund_amount =
            round_to_cents(self.price.total_amount * refund_rate(hours_until_start));
        Ok(Cancellation {
            cancelled_at: now,
            cancelled_by,
            reason,
            refund_amount,
            refund_processed: false,
        })
    }

    /// no_show への遷移を検証する。チェックイン受付が閉じるまでは扱えない。
    pub fn verify_no_show(&self, now: DateTime<Utc>) -> AppResult<()> {
        self.verify_transition(ReservationStatus::NoShow)?;

        let closes = self.starts_at() + Duration::minutes(CHECK_IN_CLOSES_AFTER_MINUTES);
        if now <= closes {
            return Err(AppError::InvalidState(format!(
                "予約（{}）はまだチェックイン受付中のため no_show にはできません。",
                self.reservation_id
            )));
        }
        Ok(())
    }
}

/// キャンセル時の返金率。開始までの残り時間で決まる。
///   24 時間以上前: 100% / 2 〜 24 時間前: 50% / 2 時間未満: 0%
pub fn refund_rate(hours_until_start: f64) -> f64 {
    if hours_until_start >= 24.0 {
        1.0
    } else if hours_until_start >= 2.0 {
        0.5
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn reservation(status: ReservationStatus) -> Reservation {
        Reservation {
            reservation_id: ReservationId::new(),
            court_id: CourtId::new(),
            reserved_by: UserId::new(),
            date: NaiveDate::from_ymd_opt(2025, 7, 9).unwrap(),
            start_time: t("18:00"),
            end_time: t("19:30"),
            duration_minutes: 90,
            price: PriceBreakdown {
                base_rate: 350.0,
                duration_hours: 1.5,
                peak_multiplier: 1.0,
                weekend_multiplier: 1.0,
                subtotal: 525.0,
                tax_amount: 84.0,
                service_fee: 15.75,
                total_amount: 624.75,
            },
            status,
            notes: None,
            payment_reference: None,
            checked_in_at: None,
            late_arrival: false,
            late_minutes: None,
            checked_out_at: None,
            cancellation: None,
            reserved_at: Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn terminal_states_reject_every_transition() {
        use ReservationStatus::*;
        let all = [Pending, Confirmed, CheckedIn, Completed, Cancelled, NoShow];
        for terminal in [Cancelled, Completed, NoShow] {
            for next in all {
                assert!(
                    !terminal.can_transition_to(next),
                    "{terminal} -> {next} must be rejected"
                );
            }
        }
    }

    #[test]
    fn verify_transition_reports_invalid_state() {
        let r = reservation(ReservationStatus::Cancelled);
        let err = r.verify_transition(ReservationStatus::Confirmed).unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[test]
    fn refund_rate_matches_thresholds() {
        assert_eq!(refund_rate(48.0), 1.0);
        assert_eq!(refund_rate(24.0), 1.0);
        assert_eq!(refund_rate(23.9), 0.5);
        assert_eq!(refund_rate(10.0), 0.5);
        assert_eq!(refund_rate(2.0), 0.5);
        assert_eq!(refund_rate(1.9), 0.0);
        assert_eq!(refund_rate(0.0), 0.0);
        assert_eq!(refund_rate(-1.0), 0.0);
    }

    #[test]
    fn refund_rate_is_monotonic() {
        let mut prev = f64::MAX;
        let mut hours = 50.0;
        while hours >= -2.0 {
            let rate = refund_rate(hours);
            assert!(rate <= prev, "refund rate must not increase as start nears");
            prev = rate;
            hours -= 0.25;
        }
    }

    #[test]
    fn cancellation_refunds_half_between_2_and_24_hours() {
        let r = reservation(ReservationStatus::Confirmed);
        let now = r.starts_at() - Duration::hours(10);
        let record = r.cancellation_record(now, r.reserved_by, None).unwrap();
        // 624.75 * 0.5 を銭へ丸め
        assert_eq!(record.refund_amount, 312.38);
        assert!(!record.refund_processed);
    }

    #[test]
    fn cancellation_refunds_full_before_24_hours() {
        let r = reservation(ReservationStatus::Confirmed);
        let now = r.starts_at() - Duration::hours(30);
        let record = r.cancellation_record(now, r.reserved_by, None).unwrap();
        assert_eq!(record.refund_amount, 624.75);
    }

    #[test]
    fn cancellation_refunds_nothing_inside_2_hours() {
        let r = reservation(ReservationStatus::Pending);
        let now = r.starts_at() - Duration::minutes(30);
        let record = r.cancellation_record(now, r.reserved_by, None).unwrap();
        assert_eq!(record.refund_amount, 0.0);
    }

    #[test]
    fn check_in_rejected_45_minutes_early() {
        let r = reservation(ReservationStatus::Confirmed);
        let now = r.starts_at() - Duration::minutes(45);
        let err = r.check_in_record(now).unwrap_err();
        assert!(matches!(err, AppError::OutOfWindow(_)));
    }

    #[test]
    fn check_in_accepted_10_minutes_early() {
        let r = reservation(ReservationStatus::Confirmed);
        let now = r.starts_at() - Duration::minutes(10);
        let record = r.check_in_record(now).unwrap();
        assert!(!record.late_arrival);
        assert_eq!(record.late_minutes, None);
    }

    #[test]
    fn check_in_after_start_records_lateness() {
        let r = reservation(ReservationStatus::Confirmed);
        let now = r.starts_at() + Duration::minutes(10);
        let record = r.check_in_record(now).unwrap();
        assert!(record.late_arrival);
        assert_eq!(record.late_minutes, Some(10));
    }

    #[test]
    fn check_in_rejected_after_window_closes() {
        let r = reservation(ReservationStatus::Confirmed);
        let now = r.starts_at() + Duration::minutes(16);
        let err = r.check_in_record(now).unwrap_err();
        assert!(matches!(err, AppError::OutOfWindow(_)));
    }

    #[test]
    fn no_show_only_after_check_in_window() {
        let r = reservation(ReservationStatus::Confirmed);
        let during = r.starts_at() + Duration::minutes(10);
        assert!(matches!(
            r.verify_no_show(during),
            Err(AppError::InvalidState(_))
        ));
        let after = r.starts_at() + Duration::minutes(16);
        assert!(r.verify_no_show(after).is_ok());
    }
}
