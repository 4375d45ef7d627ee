//! Destination input handling.
//!
//! Input is either a literal `lat,lng` pair or a free-text address. Pairs skip
//! forward geocoding and are labelled by reverse geocoding, falling back to the
//! raw coordinates when that fails. Addresses must resolve.

use crate::error::{DishaError, Result};
use crate::geo::GeoPoint;
use crate::geocode::Geocoder;
use crate::source::DestinationSetter;

/// Parsed destination text.
#[derive(Clone, Debug, PartialEq)]
pub enum DestinationInput {
    Coordinates(GeoPoint),
    Address(String),
}

impl DestinationInput {
    /// Classify user input; blank input is rejected.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DishaError::InvalidInput(
                "enter a destination address or coordinates".to_string(),
            ));
        }
        Ok(match parse_coordinates(input) {
            Some(point) => DestinationInput::Coordinates(point),
            None => DestinationInput::Address(input.to_string()),
        })
    }
}

/// Parse `"lat,lng"` with both parts numeric and in range.
pub fn parse_coordinates(input: &str) -> Option<GeoPoint> {
    let mut parts = input.split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lng = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    GeoPoint::try_new(lat, lng).ok()
}

/// A destination ready to navigate to.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedDestination {
    pub point: GeoPoint,
    /// Address shown and spoken to the user
    pub label: String,
}

/// Turn parsed input into coordinates and a label.
pub fn resolve(input: &DestinationInput, geocoder: &dyn Geocoder) -> Result<ResolvedDestination> {
    match input {
        DestinationInput::Coordinates(point) => {
            let label = match geocoder.resolve_coordinates(*point) {
                Ok(address) => address,
                Err(e) => {
                    tracing::warn!("Reverse geocoding failed ({}), using coordinates", e);
                    format!("{}, {}", point.latitude, point.longitude)
                }
            };
            Ok(ResolvedDestination {
                point: *point,
                label,
            })
        }
        DestinationInput::Address(address) => {
            let place = geocoder.resolve_address(address)?;
            Ok(ResolvedDestination {
                point: place.point,
                label: place.formatted_address,
            })
        }
    }
}

/// Parse, resolve and persist a destination.
///
/// `announce` runs after resolution and before the destination is persisted,
/// so it is heard ahead of the first instruction for the new destination.
pub fn set_destination(
    input: &str,
    geocoder: &dyn Geocoder,
    setter: &dyn DestinationSetter,
    announce: impl FnOnce(&ResolvedDestination),
) -> Result<ResolvedDestination> {
    let parsed = DestinationInput::parse(input)?;
    let destination = resolve(&parsed, geocoder)?;
    announce(&destination);
    setter.set_destination(destination.point)?;
    tracing::info!(
        "Navigating to {} ({})",
        destination.label,
        destination.point
    );
    Ok(destination)
}
