//! Directional instruction classification.

use serde::Serialize;

use super::TURN_THRESHOLD_DEG;
use super::phrases::Phrasebook;
use crate::geo::normalize_signed_degrees;

/// What the user should do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstructionKind {
    Straight,
    Left,
    Right,
    Arrived,
    Warning,
}

impl InstructionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstructionKind::Straight => "straight",
            InstructionKind::Left => "left",
            InstructionKind::Right => "right",
            InstructionKind::Arrived => "arrived",
            InstructionKind::Warning => "warning",
        }
    }
}

/// One guidance result, produced per recomputation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NavigationInstruction {
    pub kind: InstructionKind,
    pub message: String,
    /// Raw distance to the destination in meters.
    pub distance: f64,
}

impl NavigationInstruction {
    pub fn new(kind: InstructionKind, message: String, distance: f64) -> Self {
        Self {
            kind,
            message,
            distance,
        }
    }
}

/// Distance rounded to whole meters for message text.
pub fn rounded_meters(distance: f64) -> u64 {
    distance.max(0.0).round() as u64
}

/// Classify the heading change between the previous and current bearing.
///
/// Only the directional branch lives here; arrival is decided by the session.
pub fn classify(
    distance: f64,
    bearing: f64,
    previous_bearing: f64,
    phrases: &Phrasebook,
) -> NavigationInstruction {
    let delta = normalize_signed_degrees(bearing - previous_bearing);
    let meters = rounded_meters(distance);

    let (kind, message) = if delta.abs() < TURN_THRESHOLD_DEG {
        (InstructionKind::Straight, phrases.straight(meters))
    } else if delta > TURN_THRESHOLD_DEG {
        (InstructionKind::Right, phrases.turn_right(meters))
    } else {
        (InstructionKind::Left, phrases.turn_left(meters))
    };

    NavigationInstruction::new(kind, message, distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify_en(distance: f64, bearing: f64, previous: f64) -> NavigationInstruction {
        classify(distance, bearing, previous, &Phrasebook::default())
    }

    #[test]
    fn test_small_change_is_straight() {
        let instruction = classify_en(150.0, 10.0, 0.0);
        assert_eq!(instruction.kind, InstructionKind::Straight);
        assert_eq!(instruction.message, "go straight, 150 meters to destination");
    }

    #[test]
    fn test_clockwise_change_is_right() {
        assert_eq!(classify_en(150.0, 50.0, 0.0).kind, InstructionKind::Right);
    }

    #[test]
    fn test_counter_clockwise_change_is_left() {
        assert_eq!(classify_en(150.0, 310.0, 0.0).kind, InstructionKind::Left);
        assert_eq!(classify_en(150.0, -50.0, 0.0).kind, InstructionKind::Left);
    }

    #[test]
    fn test_wraparound_near_north() {
        // 350 -> 10 is a 20 degree clockwise change
        assert_eq!(classify_en(80.0, 10.0, 350.0).kind, InstructionKind::Straight);
        // 10 -> 300 is a 70 degree counter-clockwise change
        assert_eq!(classify_en(80.0, 300.0, 10.0).kind, InstructionKind::Left);
        // 300 -> 20 is an 80 degree clockwise change
        assert_eq!(classify_en(80.0, 20.0, 300.0).kind, InstructionKind::Right);
    }

    #[test]
    fn test_exact_threshold_falls_to_left() {
        assert_eq!(classify_en(80.0, 30.0, 0.0).kind, InstructionKind::Left);
        assert_eq!(classify_en(80.0, 330.0, 0.0).kind, InstructionKind::Left);
    }

    #[test]
    fn test_raw_distance_kept_and_message_rounded() {
        let instruction = classify_en(12.5, 0.0, 0.0);
        assert_eq!(instruction.distance, 12.5);
        assert_eq!(instruction.message, "go straight, 13 meters to destination");

        let instruction = classify_en(12.49, 100.0, 0.0);
        assert_eq!(instruction.message, "turn right, 12 meters to destination");
    }
}
