use crate::model::court::Court;
use crate::model::reservation::PriceBreakdown;
use crate::model::schedule_block::ScheduleBlock;
use crate::model::time::{overlaps, TimeOfDay};
use chrono::{Datelike, NaiveDate, Weekday};
use shared::config::PricingConfig;

/// 金額を小数第 2 位（銭）へ丸める。
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 料金計算エンジン。
/// レート表・税率は構築時に注入し、モジュールレベルの可変状態は持たない。
/// 同じ入力に対して常に同じ内訳を返す純粋な計算のみを行う。
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// コート・日付・時間帯から料金内訳を計算する。
    ///
    /// 特別料金ブロック（is_blocked = false かつ override_rate あり）が
    /// 時間帯に重なる場合はそのレートを優先し、ピーク・週末係数は適用しない。
    pub fn calculate(
        &self,
        court: &Court,
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        blocks: &[ScheduleBlock],
    ) -> PriceBreakdown {
        let duration_hours = (end.to_minutes() - start.to_minutes()) as f64 / 60.0;

        if let Some(rate) = self.special_rate_for(court, date, start, end, blocks) {
            let subtotal = rate * duration_hours;
            return self.breakdown(rate, duration_hours, 1.0, 1.0, subtotal);
        }

        let peak_multiplier = if self.is_peak_start(start) && court.base_rate > 0.0 {
            court.peak_rate / court.base_rate
        } else {
            1.0
        };
        let weekend_multiplier =
            if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && court.base_rate > 0.0 {
                court.weekend_rate / court.base_rate
            } else {
                1.0
            };

        let subtotal =
            court.base_rate * duration_hours * peak_multiplier * weekend_multiplier;
        self.breakdown(
            court.base_rate,
            duration_hours,
            peak_multiplier,
            weekend_multiplier,
            subtotal,
        )
    }

    fn breakdown(
        &self,
        base_rate: f64,
        duration_hours: f64,
        peak_multiplier: f64,
        weekend_multiplier: f64,
        subtotal: f64,
    ) -> PriceBreakdown {
        let subtotal = round_to_cents(subtotal);
        let tax_amount = round_to_cents(subtotal * self.config.tax_rate);
        let service_fee = round_to_cents(subtotal * self.config.service_fee_rate);
        PriceBreakdown {
            base_rate,
            duration_hours,
            peak_multiplier,
            weekend_multiplier,
            subtotal,
            tax_amount,
            service_fee,
            total_amount: round_to_cents(subtotal + tax_amount + service_fee),
        }
    }

    /// 枠の開始時刻がピーク時間帯 [from, to) に入るか。
    fn is_peak_start(&self, start: TimeOfDay) -> bool {
        let hour = start.hour();
        self.config
            .peak_hour_ranges
            .iter()
            .any(|&(from, to)| from <= hour && hour < to)
    }

    fn special_rate_for(
        &self,
        court: &Court,
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        blocks: &[ScheduleBlock],
    ) -> Option<f64> {
        blocks
            .iter()
            .filter(|b| b.court_id == court.court_id && b.date == date && b.is_special_rate())
            .find(|b| overlaps(start, end, b.start_time, b.end_time))
            .and_then(|b| b.override_rate)
    }
}
