use crate::model::id::{CourtId, FacilityId};
use crate::model::time::TimeOfDay;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub mod event;

/// 1 日分の営業時間。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHours {
    pub open: TimeOfDay,
    pub close: TimeOfDay,
    pub is_open: bool,
}

/// 月曜はじまりで 7 日分の営業時間を持つ。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyHours([DayHours; 7]);

impl WeeklyHours {
    pub fn new(hours: [DayHours; 7]) -> Self {
        Self(hours)
    }

    pub fn for_weekday(&self, weekday: chrono::Weekday) -> DayHours {
        self.0[weekday.num_days_from_monday() as usize]
    }
}

#[derive(Debug, Clone)]
pub struct Court {
    pub court_id: CourtId,
    pub facility_id: FacilityId,
    pub court_name: String,
    pub is_active: bool,
    pub weekly_hours: WeeklyHours,
    /// 基本時間料金
    pub base_rate: f64,
    /// ピーク時間帯の時間料金
    pub peak_rate: f64,
    /// 週末の時間料金
    pub weekend_rate: f64,
    pub min_duration_minutes: i32,
    pub max_duration_minutes: i32,
    /// 何日先まで予約を受け付けるか
    pub advance_booking_days: i32,
    /// キャンセル期限（開始何時間前か）
    pub cancellation_deadline_hours: i32,
}

impl Court {
    /// 指定日の営業時間を返す。
    pub fn hours_on(&self, date: NaiveDate) -> DayHours {
        self.weekly_hours.for_weekday(date.weekday())
    }
}
