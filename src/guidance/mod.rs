//! Navigation guidance engine.
//!
//! Turns (position, destination) samples into spoken instructions:
//! - [`instruction`]: straight / left / right classification
//! - [`session`]: arrival state machine with 10m / 20m hysteresis
//! - [`phrases`]: message catalogue

pub mod instruction;
pub mod phrases;
pub mod session;

pub use instruction::{InstructionKind, NavigationInstruction, classify};
pub use phrases::{Language, Phrasebook};
pub use session::{GuidancePhase, GuidanceSession, GuidanceState};

/// Heading change (degrees) below which the user keeps going straight.
pub const TURN_THRESHOLD_DEG: f64 = 30.0;

/// Distance (meters) at or below which the stick has arrived.
pub const ARRIVAL_RADIUS_M: f64 = 10.0;

/// Distance (meters) beyond which a new arrival may be announced.
pub const REARM_RADIUS_M: f64 = 20.0;
