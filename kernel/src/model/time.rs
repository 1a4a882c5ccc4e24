use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use std::fmt;
use std::str::FromStr;

/// 1 日のうちの時刻。"HH:MM"（24 時間表記）で受け渡しする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// 深夜 0 時からの経過分。
    pub fn to_minutes(self) -> i64 {
        (self.0.num_seconds_from_midnight() / 60) as i64
    }

    /// 経過分から時刻へ戻す。0 〜 1439 の範囲外は None。
    pub fn from_minutes(minutes: i64) -> Option<Self> {
        if !(0..24 * 60).contains(&minutes) {
            return None;
        }
        NaiveTime::from_num_seconds_from_midnight_opt(minutes as u32 * 60, 0).map(Self)
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn as_naive(self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(value: NaiveTime) -> Self {
        Self(value)
    }
}

impl FromStr for TimeOfDay {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M").map(Self).map_err(|_| {
            AppError::ConversionEntityError(format!(
                "時刻は HH:MM（24 時間表記）で指定してください: {s}"
            ))
        })
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

/// 半開区間 [start, end) 同士の重なり判定。
/// 端点が接しているだけの場合は重ならない扱いとする。
pub fn overlaps(start_a: TimeOfDay, end_a: TimeOfDay, start_b: TimeOfDay, end_b: TimeOfDay) -> bool {
    start_a < end_b && end_a > start_b
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn parses_valid_time() {
        assert_eq!(t("06:00").to_minutes(), 360);
        assert_eq!(t("23:59").to_minutes(), 23 * 60 + 59);
        assert_eq!(t("00:00").to_minutes(), 0);
    }

    #[test]
    fn rejects_malformed_time() {
        assert!("24:00".parse::<TimeOfDay>().is_err());
        assert!("12:60".parse::<TimeOfDay>().is_err());
        assert!("ab:cd".parse::<TimeOfDay>().is_err());
        assert!("1200".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn formats_back_to_hh_mm() {
        assert_eq!(t("09:30").to_string(), "09:30");
        assert_eq!(TimeOfDay::from_minutes(570).unwrap().to_string(), "09:30");
        assert!(TimeOfDay::from_minutes(24 * 60).is_none());
        assert!(TimeOfDay::from_minutes(-1).is_none());
    }

    #[test]
    fn overlap_is_half_open() {
        // 端点が接するだけなら重ならない
        assert!(!overlaps(t("09:00"), t("10:00"), t("10:00"), t("11:00")));
        assert!(!overlaps(t("10:00"), t("11:00"), t("09:00"), t("10:00")));
        // 部分的な重なり
        assert!(overlaps(t("09:00"), t("10:30"), t("10:00"), t("11:00")));
        // 包含
        assert!(overlaps(t("09:00"), t("12:00"), t("10:00"), t("11:00")));
        assert!(overlaps(t("10:00"), t("11:00"), t("09:00"), t("12:00")));
        // 離れている
        assert!(!overlaps(t("09:00"), t("10:00"), t("11:00"), t("12:00")));
    }
}
