//! DishaNav - Spoken Navigation Guidance for a Smart White Cane
//!
//! The cane reports its GPS position; the user picks a destination by address
//! or coordinates. Every update produces one spoken instruction: go straight,
//! turn left or right, or arrival.
//!
//! ## Event Flow
//!
//! ```text
//! position source ──┐
//!                   ├─> UpdateCoordinator ─> GuidanceSession ─> SpeechDispatcher ─> SpeechSink
//! destination ──────┘         │
//!   source                    └─> MapRenderer, DisplayState
//! ```
//!
//! Everything runs on one thread: recomputation happens synchronously inside
//! the source's publish call.

pub mod config;
pub mod coordinator;
pub mod destination;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod guidance;
pub mod map;
pub mod source;
pub mod speech;
pub mod status;
pub mod trace;

pub use config::DishaConfig;
pub use coordinator::{DisplayState, UpdateCoordinator};
pub use destination::{DestinationInput, ResolvedDestination};
pub use error::{DishaError, GeocodeError, Result};
pub use geo::GeoPoint;
pub use geocode::{Geocoder, GoogleGeocoder, ResolvedPlace};
pub use guidance::{
    GuidanceSession, GuidanceState, InstructionKind, Language, NavigationInstruction, Phrasebook,
};
pub use map::{MapRenderer, SvgTrackMap};
pub use source::{DestinationSetter, PointSource, Subscription, Topic};
pub use speech::{SpeechDispatcher, SpeechSink};
pub use status::NavigationStatus;
pub use trace::WalkTrace;
