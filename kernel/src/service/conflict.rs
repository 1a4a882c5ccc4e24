use crate::model::court::Court;
use crate::model::id::CourtId;
use crate::model::reservation::Reservation;
use crate::model::schedule_block::ScheduleBlock;
use crate::model::time::{overlaps, TimeOfDay};
use chrono::{Duration, NaiveDate};
use shared::error::{ConflictDetail, ConflictKind};

/// 依頼された時間帯について、予約を妨げる要因をすべて列挙する。
/// 途中で打ち切らず、該当する違反を全件返す。空なら予約可能。
///
/// ここでの判定は読み取り時点のスナップショットに対するもので、
/// 予約確定時にはストア側のトランザクションで改めて検証される。
pub fn detect_conflicts(
    court: &Court,
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
    today: NaiveDate,
    reservations: &[Reservation],
    blocks: &[ScheduleBlock],
) -> Vec<ConflictDetail> {
    let mut violations = Vec::new();

    // 営業時間
    let hours = court.hours_on(date);
    if !hours.is_open {
        violations.push(ConflictDetail::new(
            ConflictKind::OperatingHours,
            format!("{} は休業日です。", date),
        ));
    } else if start < hours.open || end > hours.close {
        violations.push(ConflictDetail::new(
            ConflictKind::OperatingHours,
            format!("営業時間（{} 〜 {}）の範囲外です。", hours.open, hours.close),
        ));
    }

    // 事前予約の期限
    if date < today {
        violations.push(ConflictDetail::new(
            ConflictKind::AdvanceBooking,
            "過去の日付は予約できません。",
        ));
    } else if date > today + Duration::days(court.advance_booking_days as i64) {
        violations.push(ConflictDetail::new(
            ConflictKind::AdvanceBooking,
            format!("予約できるのは {} 日先までです。", court.advance_booking_days),
        ));
    }

    // 利用時間の上下限
    let duration = end.to_minutes() - start.to_minutes();
    if duration < court.min_duration_minutes as i64 {
        violations.push(ConflictDetail::new(
            ConflictKind::Duration,
            format!("利用時間は {} 分以上で指定してください。", court.min_duration_minutes),
        ));
    } else if duration > court.max_duration_minutes as i64 {
        violations.push(ConflictDetail::new(
            ConflictKind::Duration,
            format!("利用時間は {} 分以下で指定してください。", court.max_duration_minutes),
        ));
    }

    // 既存予約との重複
    violations.extend(detect_reservation_conflicts(
        court.court_id,
        date,
        start,
        end,
        reservations,
    ));

    // メンテナンス等の利用不可ブロックとの重複
    for block in blocks
        .iter()
        .filter(|b| b.court_id == court.court_id && b.date == date && b.is_blocked)
    {
        if overlaps(start, end, block.start_time, block.end_time) {
            let reason = block
                .reason
                .clone()
                .unwrap_or_else(|| "コートが利用できない時間帯です。".into());
            violations.push(ConflictDetail::maintenance(
                block.block_type.map(|t| t.to_string()),
                format!("{}（{} 〜 {}）", reason, block.start_time, block.end_time),
            ));
        }
    }

    violations
}

/// pending / confirmed の予約との重複だけを検出する。
/// スケジュールブロック作成時は既存予約を黙って潰さないよう、この判定のみを使う。
pub fn detect_reservation_conflicts(
    court_id: CourtId,
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
    reservations: &[Reservation],
) -> Vec<ConflictDetail> {
    reservations
        .iter()
        .filter(|r| r.court_id == court_id && r.date == date && r.status.occupies_slot())
        .filter(|r| overlaps(start, end, r.start_time, r.end_time))
        .map(|r| {
            ConflictDetail::reservation(
                r.reservation_id.raw(),
                format!("既存の予約（{} 〜 {}）と重なっています。", r.start_time, r.end_time),
            )
        })
        .collect()
}
