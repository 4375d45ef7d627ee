//! Address ⇄ coordinate resolution.
//!
//! [`GoogleGeocoder`] talks to the Google Geocoding web service with a
//! blocking client; only one request is ever in flight.

use std::time::Duration;

use serde::Deserialize;

use crate::config::GeocoderConfig;
use crate::error::GeocodeError;
use crate::geo::GeoPoint;

/// A resolved place.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPlace {
    pub point: GeoPoint,
    pub formatted_address: String,
}

/// One-shot address lookup service.
pub trait Geocoder {
    /// Free-text address to coordinates.
    fn resolve_address(&self, address: &str) -> Result<ResolvedPlace, GeocodeError>;

    /// Coordinates to a formatted address.
    fn resolve_coordinates(&self, point: GeoPoint) -> Result<String, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Map a service response onto the first result or a typed error.
fn first_result(response: GeocodeResponse) -> Result<ResolvedPlace, GeocodeError> {
    match response.status.as_str() {
        "OK" => {
            let result = response
                .results
                .into_iter()
                .next()
                .ok_or_else(|| GeocodeError::NotFound("no results".to_string()))?;
            Ok(ResolvedPlace {
                point: GeoPoint::new(result.geometry.location.lat, result.geometry.location.lng),
                formatted_address: result.formatted_address,
            })
        }
        "ZERO_RESULTS" => Err(GeocodeError::NotFound("ZERO_RESULTS".to_string())),
        status => {
            let detail = match response.error_message {
                Some(message) => format!("{}: {}", status, message),
                None => status.to_string(),
            };
            Err(GeocodeError::Unavailable(detail))
        }
    }
}

/// Google Geocoding API client.
pub struct GoogleGeocoder {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
    region: String,
}

impl GoogleGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| GeocodeError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.resolved_api_key(),
            region: config.region.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn query(&self, params: &[(&str, &str)]) -> Result<ResolvedPlace, GeocodeError> {
        let key = self.api_key.as_deref().ok_or(GeocodeError::NotConfigured)?;

        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("region", self.region.as_str()));
        query.push(("key", key));

        let response: GeocodeResponse = self
            .client
            .get(&self.endpoint)
            .query(&query)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| GeocodeError::Unavailable(e.to_string()))?
            .json()
            .map_err(|e| GeocodeError::Unavailable(format!("malformed response: {}", e)))?;

        first_result(response)
    }
}

impl Geocoder for GoogleGeocoder {
    fn resolve_address(&self, address: &str) -> Result<ResolvedPlace, GeocodeError> {
        tracing::debug!("Geocoding address '{}'", address);
        let place = self.query(&[("address", address)])?;
        tracing::info!(
            "Resolved '{}' to {} ({})",
            address,
            place.point,
            place.formatted_address
        );
        Ok(place)
    }

    fn resolve_coordinates(&self, point: GeoPoint) -> Result<String, GeocodeError> {
        let latlng = format!("{},{}", point.latitude, point.longitude);
        tracing::debug!("Reverse geocoding {}", latlng);
        Ok(self.query(&[("latlng", latlng.as_str())])?.formatted_address)
    }
}
