use crate::model::court::DayHours;
use crate::model::time::TimeOfDay;

/// 予約枠の刻み幅（分）。
pub const SLOT_MINUTES: i64 = 30;

/// 半開区間 [start, end) の予約枠候補。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// 営業時間を 30 分刻みの候補枠へ展開する。
/// close をはみ出す端数枠は含めない。休業日は空を返す。
pub fn generate_day_slots(hours: DayHours) -> Vec<Slot> {
    if !hours.is_open {
        return Vec::new();
    }

    let close = hours.close.to_minutes();
    let mut slots = Vec::new();
    let mut cursor = hours.open.to_minutes();
    while cursor + SLOT_MINUTES <= close {
        let (Some(start), Some(end)) = (
            TimeOfDay::from_minutes(cursor),
            TimeOfDay::from_minutes(cursor + SLOT_MINUTES),
        ) else {
            break;
        };
        slots.push(Slot { start, end });
        cursor += SLOT_MINUTES;
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    fn open_day(open: &str, close: &str) -> DayHours {
        DayHours {
            open: t(open),
            close: t(close),
            is_open: true,
        }
    }

    #[test]
    fn full_day_yields_32_slots() {
        let slots = generate_day_slots(open_day("06:00", "22:00"));
        assert_eq!(slots.len(), 32);
        assert_eq!(slots[0].start, t("06:00"));
        assert_eq!(slots[0].end, t("06:30"));
        assert_eq!(slots[31].start, t("21:30"));
        assert_eq!(slots[31].end, t("22:00"));
    }

    #[test]
    fn slots_tile_the_opening_hours_exactly() {
        let slots = generate_day_slots(open_day("06:00", "22:00"));
        for pair in slots.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        for slot in &slots {
            assert_eq!(slot.end.to_minutes() - slot.start.to_minutes(), SLOT_MINUTES);
        }
    }

    #[test]
    fn closed_day_yields_no_slots() {
        let closed = DayHours {
            open: t("06:00"),
            close: t("22:00"),
            is_open: false,
        };
        assert!(generate_day_slots(closed).is_empty());
    }

    #[test]
    fn trailing_partial_slot_is_dropped() {
        let slots = generate_day_slots(open_day("09:00", "10:15"));
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].end, t("10:00"));
    }
}
