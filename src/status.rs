//! Status badge and distance text for presentation.

use serde::Serialize;

use crate::guidance::{ARRIVAL_RADIUS_M, Phrasebook};

/// Distance (meters) at or below which the badge shows "approaching".
pub const APPROACH_RADIUS_M: f64 = 50.0;

/// Coarse navigation status shown next to the distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationStatus {
    /// Position or destination not received yet
    AwaitingData,
    InTransit,
    Approaching,
    Arrived,
}

impl NavigationStatus {
    /// Status for a distance, or `AwaitingData` when none is known.
    pub fn from_distance(distance: Option<f64>) -> Self {
        match distance {
            None => NavigationStatus::AwaitingData,
            Some(d) if d <= ARRIVAL_RADIUS_M => NavigationStatus::Arrived,
            Some(d) if d <= APPROACH_RADIUS_M => NavigationStatus::Approaching,
            Some(_) => NavigationStatus::InTransit,
        }
    }

    pub fn label(&self, phrases: &Phrasebook) -> &'static str {
        match self {
            NavigationStatus::AwaitingData => phrases.status_awaiting_data(),
            NavigationStatus::InTransit => phrases.status_in_transit(),
            NavigationStatus::Approaching => phrases.status_approaching(),
            NavigationStatus::Arrived => phrases.status_arrived(),
        }
    }
}

/// Human distance: whole meters below 1 km, one decimal kilometer above.
pub fn format_distance(distance: f64, phrases: &Phrasebook) -> String {
    if distance < 1000.0 {
        format!("{} {}", distance.round() as u64, phrases.meter_unit())
    } else {
        format!("{:.1} km", distance / 1000.0)
    }
}
