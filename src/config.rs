//! Configuration loading for DishaNav

use crate::error::{DishaError, Result};
use crate::guidance::Language;
use serde::Deserialize;
use std::path::Path;

/// Environment variable consulted when no geocoder key is configured.
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DishaConfig {
    #[serde(default)]
    pub guidance: GuidanceConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Guidance settings
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GuidanceConfig {
    /// Message language: "en" or "id" (default: en)
    #[serde(default)]
    pub language: Language,
}

/// Speech output settings
#[derive(Clone, Debug, Deserialize)]
pub struct SpeechConfig {
    /// Speak instructions at startup (default: true)
    #[serde(default = "default_speech_enabled")]
    pub enabled: bool,

    /// Speaking rate multiplier (default: 0.8)
    #[serde(default = "default_rate")]
    pub rate: f32,

    /// Pitch multiplier (default: 1.0)
    #[serde(default = "default_pitch")]
    pub pitch: f32,

    /// Volume 0.0 - 1.0 (default: 1.0)
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// espeak-compatible synthesizer; empty prints to stdout (default: espeak-ng)
    #[serde(default = "default_program")]
    pub program: String,

    /// Extra arguments passed before the text
    #[serde(default)]
    pub args: Vec<String>,
}

/// Geocoding service settings
#[derive(Clone, Debug, Deserialize)]
pub struct GeocoderConfig {
    /// Google Maps API key; falls back to $GOOGLE_MAPS_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,

    /// Geocoding endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in milliseconds (default: 5000)
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Region bias as a ccTLD code (default: id)
    #[serde(default = "default_region")]
    pub region: String,
}

/// Output configuration
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Write an SVG of the walked track here after a replay
    #[serde(default)]
    pub svg_path: Option<String>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: default_speech_enabled(),
            rate: default_rate(),
            pitch: default_pitch(),
            volume: default_volume(),
            program: default_program(),
            args: Vec::new(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            timeout_ms: default_timeout(),
            region: default_region(),
        }
    }
}

// Default value functions
fn default_speech_enabled() -> bool {
    true
}
fn default_rate() -> f32 {
    0.8
}
fn default_pitch() -> f32 {
    1.0
}
fn default_volume() -> f32 {
    1.0
}
fn default_program() -> String {
    "espeak-ng".to_string()
}
fn default_endpoint() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}
fn default_timeout() -> u64 {
    5000
}
fn default_region() -> String {
    "id".to_string()
}

impl DishaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DishaError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: DishaConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let speech = &self.speech;
        if speech.rate <= 0.0 || speech.pitch <= 0.0 {
            return Err(DishaError::Config(
                "speech rate and pitch must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&speech.volume) {
            return Err(DishaError::Config(format!(
                "speech volume {} outside 0.0 - 1.0",
                speech.volume
            )));
        }
        Ok(())
    }
}

impl GeocoderConfig {
    /// Configured API key, else the environment, ignoring blanks.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}
