use crate::model::court::Court;
use crate::model::reservation::{PriceBreakdown, Reservation};
use crate::model::schedule_block::ScheduleBlock;
use crate::model::time::TimeOfDay;
use crate::service::conflict::detect_conflicts;
use crate::service::pricing::PricingEngine;
use crate::service::slots::{generate_day_slots, Slot};
use chrono::NaiveDate;
use shared::error::{ConflictDetail, ConflictKind};

/// 空き枠一覧の 1 件分。埋まっている場合は先頭の阻害要因を添える。
#[derive(Debug, Clone)]
pub struct SlotAvailability {
    pub slot: Slot,
    pub available: bool,
    pub price: Option<PriceBreakdown>,
    pub blocking: Option<ConflictDetail>,
}

/// 任意の時間帯に対する空き判定の結果。
#[derive(Debug, Clone)]
pub struct AvailabilityVerdict {
    pub available: bool,
    pub price: Option<PriceBreakdown>,
    pub violations: Vec<ConflictDetail>,
}

/// その日の候補枠それぞれについて空き状況と料金を評価する（読み取り専用）。
///
/// 30 分の候補枠は予約開始位置の提示であり、コートの最低利用時間は
/// 実際の予約時に適用するため、ここでは duration 違反を除いて判定する。
/// 結果はスナップショットであり、予約確定時に改めて検証される。
pub fn get_available_slots(
    pricing: &PricingEngine,
    court: &Court,
    date: NaiveDate,
    today: NaiveDate,
    reservations: &[Reservation],
    blocks: &[ScheduleBlock],
) -> Vec<SlotAvailability> {
    generate_day_slots(court.hours_on(date))
        .into_iter()
        .map(|slot| {
            let mut violations = detect_conflicts(
                court,
                date,
                slot.start,
                slot.end,
                today,
                reservations,
                blocks,
            );
            violations.retain(|v| v.kind != ConflictKind::Duration);

            if violations.is_empty() {
                SlotAvailability {
                    slot,
                    available: true,
                    price: Some(pricing.calculate(court, date, slot.start, slot.end, blocks)),
                    blocking: None,
                }
            } else {
                SlotAvailability {
                    slot,
                    available: false,
                    price: None,
                    blocking: violations.into_iter().next(),
                }
            }
        })
        .collect()
}

/// 枠に揃っていない任意の時間帯の空きを判定する（読み取り専用）。
pub fn check_availability(
    pricing: &PricingEngine,
    court: &Court,
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
    today: NaiveDate,
    reservations: &[Reservation],
    blocks: &[ScheduleBlock],
) -> AvailabilityVerdict {
    let violations = detect_conflicts(court, date, start, end, today, reservations, blocks);
    if violations.is_empty() {
        AvailabilityVerdict {
            available: true,
            price: Some(pricing.calculate(court, date, start, end, blocks)),
            violations,
        }
    } else {
        AvailabilityVerdict {
            available: false,
            price: None,
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::court::{DayHours, WeeklyHours};
    use crate::model::id::{CourtId, FacilityId, ReservationId, UserId};
    use crate::model::reservation::ReservationStatus;
    use chrono::Utc;
    use shared::config::PricingConfig;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    // 2025-07-09 は水曜
    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 9).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
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

    fn engine() -> PricingEngine {
        PricingEngine::new(PricingConfig::default())
    }

    fn reservation(court: &Court, start: &str, end: &str) -> Reservation {
        Reservation {
            reservation_id: ReservationId::new(),
            court_id: court.court_id,
            reserved_by: UserId::new(),
            date: date(),
            start_time: t(start),
            end_time: t(end),
            duration_minutes: (t(end).to_minutes() - t(start).to_minutes()) as i32,
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
            status: ReservationStatus::Confirmed,
            notes: None,
            payment_reference: None,
            checked_in_at: None,
            late_arrival: false,
            late_minutes: None,
            checked_out_at: None,
            cancellation: None,
            reserved_at: Utc::now(),
        }
    }

    #[test]
    fn empty_day_lists_32_available_slots() {
        // 最低利用時間 60 分のコートでも、30 分の候補枠はすべて空きとして出す
        let court = court();
        let slots = get_available_slots(&engine(), &court, date(), today(), &[], &[]);
        assert_eq!(slots.len(), 32);
        assert!(slots.iter().all(|s| s.available));
        assert!(slots.iter().all(|s| s.price.is_some()));
    }

    #[test]
    fn reserved_slots_carry_blocking_reason_and_id() {
        let court = court();
        let existing = reservation(&court, "18:00", "19:30");
        let slots = get_available_slots(
            &engine(),
            &court,
            date(),
            today(),
            std::slice::from_ref(&existing),
            &[],
        );

        // 18:00, 18:30, 19:00 の 3 枠が埋まる
        let unavailable: Vec<_> = slots.iter().filter(|s| !s.available).collect();
        assert_eq!(unavailable.len(), 3);
        for slot in &unavailable {
            let blocking = slot.blocking.as_ref().expect("blocking reason expected");
            assert_eq!(blocking.kind, ConflictKind::Reservation);
            assert_eq!(blocking.reservation_id, Some(existing.reservation_id.raw()));
            assert!(slot.price.is_none());
        }
        // 隣接する 17:30 と 19:30 の枠は空いたまま
        assert!(slots.iter().any(|s| s.slot.start == t("17:30") && s.available));
        assert!(slots.iter().any(|s| s.slot.start == t("19:30") && s.available));
    }

    #[test]
    fn check_reports_overlap_for_contained_window() {
        let court = court();
        let existing = reservation(&court, "18:00", "19:30");
        let verdict = check_availability(
            &engine(),
            &court,
            date(),
            t("18:30"),
            t("19:30"),
            today(),
            std::slice::from_ref(&existing),
            &[],
        );
        assert!(!verdict.available);
        assert!(verdict.price.is_none());
        assert!(verdict
            .violations
            .iter()
            .any(|v| v.kind == ConflictKind::Reservation
                && v.reservation_id == Some(existing.reservation_id.raw())));
    }

    #[test]
    fn check_prices_a_free_window() {
        let court = court();
        let verdict = check_availability(
            &engine(),
            &court,
            date(),
            t("18:00"),
            t("19:30"),
            today(),
            &[],
            &[],
        );
        assert!(verdict.available);
        assert!(verdict.violations.is_empty());
        let price = verdict.price.expect("price expected");
        assert_eq!(price.subtotal, 675.0);
        assert_eq!(price.total_amount, 803.25);
    }

    #[test]
    fn check_rejects_too_short_window() {
        let court = court();
        let verdict = check_availability(
            &engine(),
            &court,
            date(),
            t("10:00"),
            t("10:30"),
            today(),
            &[],
            &[],
        );
        assert!(!verdict.available);
        assert!(verdict
            .violations
            .iter()
            .any(|v| v.kind == ConflictKind::Duration));
    }
}
