//! Recorded walks for replay.
//!
//! ```toml
//! destination = "-6.2088, 106.8456"
//!
//! [[positions]]
//! latitude = -6.2000
//! longitude = 106.8000
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{DishaError, Result};
use crate::geo::GeoPoint;

/// A destination plus the stick positions reported while walking to it.
#[derive(Clone, Debug, Deserialize)]
pub struct WalkTrace {
    /// Destination input, coordinates or an address
    pub destination: String,

    /// Delay between samples during replay (default: 0)
    #[serde(default)]
    pub interval_ms: u64,

    #[serde(default)]
    pub positions: Vec<GeoPoint>,
}

impl WalkTrace {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let trace: WalkTrace =
            toml::from_str(content).map_err(|e| DishaError::Trace(e.to_string()))?;
        if trace.destination.trim().is_empty() {
            return Err(DishaError::Trace("destination is empty".to_string()));
        }
        Ok(trace)
    }
}
