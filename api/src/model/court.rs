use derive_new::new;
use garde::Validate;
use kernel::model::{
    court::{
        event::{CreateCourt, UpdateCourt},
        Court, WeeklyHours,
    },
    id::{CourtId, FacilityId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourtRequest {
    #[garde(skip)]
    pub facility_id: FacilityId,
    #[garde(length(min = 1))]
    pub court_name: String,
    #[garde(skip)]
    pub weekly_hours: WeeklyHours,
    #[garde(range(min = 0.0))]
    pub base_rate: f64,
    #[garde(range(min = 0.0))]
    pub peak_rate: f64,
    #[garde(range(min = 0.0))]
    pub weekend_rate: f64,
    #[garde(range(min = 1))]
    pub min_duration_minutes: i32,
    #[garde(range(min = 1))]
    pub max_duration_minutes: i32,
    #[garde(range(min = 0))]
    pub advance_booking_days: i32,
    #[garde(range(min = 0))]
    pub cancellation_deadline_hours: i32,
}

impl From<CreateCourtRequest> for CreateCourt {
    fn from(value: CreateCourtRequest) -> Self {
        let CreateCourtRequest {
            facility_id,
            court_name,
            weekly_hours,
            base_rate,
            peak_rate,
            weekend_rate,
            min_duration_minutes,
            max_duration_minutes,
            advance_booking_days,
            cancellation_deadline_hours,
        } = value;
        CreateCourt {
            facility_id,
            court_name,
            weekly_hours,
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

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourtRequest {
    #[garde(skip)]
    pub court_name: Option<String>,
    #[garde(skip)]
    pub is_active: Option<bool>,
    #[garde(skip)]
    pub weekly_hours: Option<WeeklyHours>,
    #[garde(skip)]
    pub base_rate: Option<f64>,
    #[garde(skip)]
    pub peak_rate: Option<f64>,
    #[garde(skip)]
    pub weekend_rate: Option<f64>,
    #[garde(skip)]
    pub min_duration_minutes: Option<i32>,
    #[garde(skip)]
    pub max_duration_minutes: Option<i32>,
    #[garde(skip)]
    pub advance_booking_days: Option<i32>,
    #[garde(skip)]
    pub cancellation_deadline_hours: Option<i32>,
}

#[derive(new)]
pub struct UpdateCourtRequestWithId(CourtId, UpdateCourtRequest);

impl From<UpdateCourtRequestWithId> for UpdateCourt {
    fn from(value: UpdateCourtRequestWithId) -> Self {
        let UpdateCourtRequestWithId(
            court_id,
            UpdateCourtRequest {
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
            },
        ) = value;
        UpdateCourt {
            court_id,
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
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtResponse {
    pub court_id: CourtId,
    pub facility_id: FacilityId,
    pub court_name: String,
    pub is_active: bool,
    pub weekly_hours: WeeklyHours,
    pub base_rate: f64,
    pub peak_rate: f64,
    pub weekend_rate: f64,
    pub min_duration_minutes: i32,
    pub max_duration_minutes: i32,
    pub advance_booking_days: i32,
    pub cancellation_deadline_hours: i32,
}

impl From<Court> for CourtResponse {
    fn from(value: Court) -> Self {
        let Court {
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
        Self {
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
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtsResponse {
    pub items: Vec<CourtResponse>,
}

impl From<Vec<Court>> for CourtsResponse {
    fn from(value: Vec<Court>) -> Self {
        Self {
            items: value.into_iter().map(CourtResponse::from).collect(),
        }
    }
}
