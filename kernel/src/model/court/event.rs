use crate::model::court::WeeklyHours;
use crate::model::id::{CourtId, FacilityId};
use derive_new::new;

#[derive(Debug, new)]
pub struct CreateCourt {
    pub facility_id: FacilityId,
    pub court_name: String,
    pub weekly_hours: WeeklyHours,
    pub base_rate: f64,
    pub peak_rate: f64,
    pub weekend_rate: f64,
    pub min_duration_minutes: i32,
    pub max_duration_minutes: i32,
    pub advance_booking_days: i32,
    pub cancellation_deadline_hours: i32,
}

#[derive(Debug)]
pub struct UpdateCourt {
    pub court_id: CourtId,
    pub court_name: Option<String>,
    pub is_active: Option<bool>,
    pub weekly_hours: Option<WeeklyHours>,
    pub base_rate: Option<f64>,
    pub peak_rate: Option<f64>,
    pub weekend_rate: Option<f64>,
    pub min_duration_minutes: Option<i32>,
    pub max_duration_minutes: Option<i32>,
    pub advance_booking_days: Option<i32>,
    pub cancellation_deadline_hours: Option<i32>,
}
