//! Guidance session: the arrival / re-departure state machine.
//!
//! A session lives for one navigation episode and keeps the previous bearing
//! and the arrival announcement flag across recomputations. Entering the
//! arrival radius announces arrival once; the flag is only re-armed after the
//! stick moves beyond the wider re-arm radius, so jitter around the arrival
//! boundary does not produce alternating messages.

use super::instruction::{InstructionKind, NavigationInstruction, classify};
use super::phrases::Phrasebook;
use super::{ARRIVAL_RADIUS_M, REARM_RADIUS_M};
use crate::geo::{GeoPoint, distance_meters, initial_bearing_degrees};

/// Phase of the current episode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuidancePhase {
    /// Walking toward the destination
    #[default]
    Approaching,
    /// Inside the arrival radius
    Arrived,
}

/// State carried between recomputations.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GuidanceState {
    /// Bearing to the destination at the last directional recomputation, [0, 360)
    pub previous_bearing: f64,
    /// Set when arrival was announced; cleared beyond the re-arm radius
    pub has_announced_arrival: bool,
}

/// Stateful guidance for one navigation episode.
#[derive(Debug, Default)]
pub struct GuidanceSession {
    phrases: Phrasebook,
    state: GuidanceState,
    phase: GuidancePhase,
}

impl GuidanceSession {
    pub fn new(phrases: Phrasebook) -> Self {
        Self {
            phrases,
            state: GuidanceState::default(),
            phase: GuidancePhase::default(),
        }
    }

    #[cfg(test)]
    fn with_state(phrases: Phrasebook, state: GuidanceState) -> Self {
        Self {
            phrases,
            state,
            phase: GuidancePhase::default(),
        }
    }

    pub fn state(&self) -> GuidanceState {
        self.state
    }

    pub fn phase(&self) -> GuidancePhase {
        self.phase
    }

    pub fn phrases(&self) -> &Phrasebook {
        &self.phrases
    }

    /// Forget bearing and arrival history, e.g. for a new destination.
    pub fn begin_episode(&mut self) {
        self.state = GuidanceState::default();
        self.phase = GuidancePhase::Approaching;
    }

    /// Recompute only when both position and destination are known.
    pub fn step(
        &mut self,
        position: Option<GeoPoint>,
        destination: Option<GeoPoint>,
    ) -> Option<NavigationInstruction> {
        match (position, destination) {
            (Some(position), Some(destination)) => Some(self.recompute(position, destination)),
            _ => None,
        }
    }

    /// Produce the instruction for one (position, destination) sample.
    pub fn recompute(&mut self, position: GeoPoint, destination: GeoPoint) -> NavigationInstruction {
        let distance = distance_meters(position, destination);
        self.advance(distance, || initial_bearing_degrees(position, destination))
    }

    /// State machine step for a measured distance; the bearing is only
    /// computed outside the arrival radius.
    fn advance(&mut self, distance: f64, bearing: impl FnOnce() -> f64) -> NavigationInstruction {
        if distance > REARM_RADIUS_M {
            if self.state.has_announced_arrival {
                tracing::debug!("Left re-arm radius ({:.1}m), arrival re-armed", distance);
            }
            self.phase = GuidancePhase::Approaching;
            self.state.has_announced_arrival = false;
        }

        if distance <= ARRIVAL_RADIUS_M {
            self.phase = GuidancePhase::Arrived;
            let message = if self.state.has_announced_arrival {
                self.phrases.at_destination()
            } else {
                tracing::info!("Destination reached ({:.1}m)", distance);
                self.state.has_announced_arrival = true;
                self.phrases.destination_reached()
            };
            return NavigationInstruction::new(InstructionKind::Arrived, message, distance);
        }

        let bearing = bearing();
        let instruction = classify(distance, bearing, self.state.previous_bearing, &self.phrases);
        tracing::debug!(
            "{:.1}m, bearing {:.1}° (prev {:.1}°) -> {}",
            distance,
            bearing,
            self.state.previous_bearing,
            instruction.kind.as_str()
        );
        self.state.previous_bearing = bearing;
        instruction
    }
}
