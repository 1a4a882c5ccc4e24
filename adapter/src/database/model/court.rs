use kernel::model::{
    court::{Court, WeeklyHours},
    id::{CourtId, FacilityId},
};
use sqlx::types::Json;

#[derive(sqlx::FromRow)]
pub struct CourtRow {
    pub court_id: CourtId,
    pub facility_id: FacilityId,
    pub court_name: String,
    pub is_active: bool,
    pub weekly_hours: Json<WeeklyHours>,
    pub base_rate: f64,
    pub peak_rate: f64,
    pub weekend_rate: f64,
    pub min_duration_minutes: i32,
    pub max_duration_minutes: i32,
    pub advance_booking_days: i32,
    pub cancellation_deadline_hours: i32,
}

impl From<CourtRow> for Court {
    fn from(value: CourtRow) -> Self {
        let CourtRow {
            court_id,
            facility_id,
            court_name,
            is_active,
            weekly_hours,
            base_rate,
            peak_rate,
            weekend_rate,
            min_duration_minutes,
            max_duration_minutes,
            advance_booking_days,
            cancellation_deadline_hours,
        } = value;
        Court {
            court_id,
            facility_id,
            court_name,
            is_active,
            weekly_hours: weekly_hours.0,
            base_rate,
            peak_rate,
            weekend_rate,
            min_duration_minutes,
            max_duration_minutes,
            advance_booking_days,
            cancellation_deadline_hours,
        }
    }
}
