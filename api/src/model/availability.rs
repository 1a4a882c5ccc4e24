use chrono::NaiveDate;
use derive_new::new;
use kernel::model::{id::CourtId, time::TimeOfDay};
use kernel::service::availability::{AvailabilityVerdict, SlotAvailability};
use serde::{Deserialize, Serialize};
use shared::error::ConflictDetail;
use uuid::Uuid;

use crate::model::reservation::PriceBreakdownResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityQuery {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotResponse {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceBreakdownResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicting_reservation_id: Option<Uuid>,
}

impl From<SlotAvailability> for SlotResponse {
    fn from(value: SlotAvailability) -> Self {
        let SlotAvailability {
            slot,
            available,
            price,
            blocking,
        } = value;
        let (blocked_reason, conflicting_reservation_id) = match blocking {
            Some(detail) => (Some(detail.message), detail.reservation_id),
            None => (None, None),
        };
        Self {
            start_time: slot.start,
            end_time: slot.end,
            available,
            price: price.map(PriceBreakdownResponse::from),
            blocked_reason,
            conflicting_reservation_id,
        }
    }
}

#[derive(Debug, Serialize, new)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsResponse {
    pub court_id: CourtId,
    pub date: NaiveDate,
    pub slots: Vec<SlotResponse>,
}

impl AvailableSlotsResponse {
    pub fn from_slots(
        court_id: CourtId,
        date: NaiveDate,
        slots: Vec<SlotAvailability>,
    ) -> Self {
        Self::new(court_id, date, slots.into_iter().map(SlotResponse::from).collect())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAvailabilityResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceBreakdownResponse>,
    pub violations: Vec<ConflictDetail>,
}

impl From<AvailabilityVerdict> for CheckAvailabilityResponse {
    fn from(value: AvailabilityVerdict) -> Self {
        let AvailabilityVerdict {
            available,
            price,
            violations,
        } = value;
        Self {
            available,
            price: price.map(PriceBreakdownResponse::from),
            violations,
        }
    }
}
