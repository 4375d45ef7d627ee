//! End-to-end guidance behaviour through the public API.

use approx::assert_relative_eq;

use disha_nav::guidance::{InstructionKind, Language, Phrasebook, classify};
use disha_nav::speech::SpeechEvent;
use disha_nav::status::format_distance;
use disha_nav::{DishaError, GeoPoint, GeocodeError, NavigationStatus};

use crate::harness::{TestHarness, north_of};

const START: GeoPoint = GeoPoint::new(-6.2000, 106.8000);
const DESTINATION: GeoPoint = GeoPoint::new(-6.2088, 106.8456);

fn count(spoken: &[String], message: &str) -> usize {
    spoken.iter().filter(|s| s.as_str() == message).count()
}

#[test]
fn test_reference_walk_is_in_transit() {
    let harness = TestHarness::new();
    harness.go_to("-6.2088, 106.8456").unwrap();
    harness.walk(START);

    let state = harness.coordinator.snapshot();
    assert_eq!(state.status, NavigationStatus::InTransit);
    let distance = state.distance.unwrap();
    assert_relative_eq!(distance, 5140.6, epsilon = 1.0);
    assert_eq!(format_distance(distance, &Phrasebook::default()), "5.1 km");
    assert!(state.last_instruction.starts_with("turn right"));
}

#[test]
fn test_coordinate_input_skips_address_lookup() {
    let harness = TestHarness::new();
    let resolved = harness.go_to("-6.2088, 106.8456").unwrap();

    assert!(harness.geocoder.forward_calls.borrow().is_empty());
    assert_eq!(resolved.point, DESTINATION);
    assert_eq!(harness.destinations.latest(), Some(DESTINATION));
    assert_eq!(
        harness.spoken(),
        vec!["destination set to Jl. Medan Merdeka Selatan, Jakarta, you may start walking"]
    );
}

#[test]
fn test_place_name_goes_through_address_lookup() {
    let harness = TestHarness::new();
    let resolved = harness.go_to("Monas Jakarta").unwrap();

    assert_eq!(*harness.geocoder.forward_calls.borrow(), vec!["Monas Jakarta"]);
    assert_eq!(resolved.point, GeoPoint::new(-6.1754, 106.8272));
    assert_eq!(
        harness.coordinator.snapshot().destination_label.as_deref(),
        Some("Monumen Nasional, Gambir, Jakarta Pusat")
    );
}

#[test]
fn test_unknown_address_is_not_persisted() {
    let harness = TestHarness::new();
    let err = harness.go_to("Jalan Tidak Ada").unwrap_err();

    assert!(matches!(err, DishaError::Geocode(GeocodeError::NotFound(_))));
    assert_eq!(harness.destinations.latest(), None);
    assert!(harness.spoken().is_empty());
}

#[test]
fn test_empty_destination_rejected() {
    let harness = TestHarness::new();
    assert!(matches!(
        harness.go_to("  "),
        Err(DishaError::InvalidInput(_))
    ));
}

#[test]
fn test_standing_at_destination() {
    let harness = TestHarness::new();
    harness.go_to("-6.2088, 106.8456").unwrap();
    harness.clear_speech();

    harness.walk(DESTINATION);
    harness.walk(DESTINATION);
    harness.walk(DESTINATION);

    assert_eq!(
        harness.spoken(),
        vec!["destination reached", "you are at the destination"]
    );
    assert_eq!(
        harness.coordinator.snapshot().status,
        NavigationStatus::Arrived
    );
}

#[test]
fn test_arrival_announced_again_after_leaving() {
    let harness = TestHarness::new();
    harness.go_to("-6.2088, 106.8456").unwrap();
    harness.clear_speech();

    harness.walk(DESTINATION);
    harness.walk(north_of(DESTINATION, 30.0));
    harness.walk(DESTINATION);

    let spoken = harness.spoken();
    assert_eq!(count(&spoken, "destination reached"), 2);
    assert_eq!(spoken[1], "turn right, 30 meters to destination");
}

#[test]
fn test_jitter_around_arrival_radius() {
    let harness = TestHarness::new();
    harness.go_to("-6.2088, 106.8456").unwrap();

    for meters in [5.0, 15.0, 8.0, 15.0, 8.0, 19.0, 3.0] {
        harness.walk(north_of(DESTINATION, meters));
    }

    assert_eq!(count(&harness.spoken(), "destination reached"), 1);
}

#[test]
fn test_bearing_change_classification() {
    let phrases = Phrasebook::default();
    assert_eq!(
        classify(100.0, 10.0, 0.0, &phrases).kind,
        InstructionKind::Straight
    );
    assert_eq!(
        classify(100.0, 50.0, 0.0, &phrases).kind,
        InstructionKind::Right
    );
    assert_eq!(
        classify(100.0, 310.0, 0.0, &phrases).kind,
        InstructionKind::Left
    );
}

#[test]
fn test_repeated_instruction_spoken_once() {
    let harness = TestHarness::new();
    harness.go_to("-6.2088, 106.8456").unwrap();
    harness.clear_speech();

    // First sample turns onto the bearing, the rest repeat "go straight"
    for _ in 0..4 {
        harness.walk(START);
    }

    assert_eq!(harness.coordinator.update_count(), 4);
    assert_eq!(harness.spoken().len(), 2);
}

#[test]
fn test_disabling_speech_cancels_and_silences() {
    let harness = TestHarness::new();
    harness.go_to("-6.2088, 106.8456").unwrap();
    harness.walk(START);
    harness.clear_speech();

    assert!(!harness.coordinator.toggle_speech());
    assert_eq!(harness.events(), vec![SpeechEvent::Cancel]);

    harness.walk(north_of(DESTINATION, 200.0));
    assert!(harness.spoken().is_empty());
    assert!(!harness.coordinator.snapshot().speech_enabled);
}

#[test]
fn test_out_of_range_position_dropped() {
    let harness = TestHarness::new();
    harness.go_to("-6.2088, 106.8456").unwrap();
    harness.walk(START);
    harness.walk(GeoPoint::new(-6.2, 190.0));

    let state = harness.coordinator.snapshot();
    assert_eq!(state.position, Some(START));
    assert_eq!(state.last_instruction, "invalid position from the stick");
    assert_eq!(harness.coordinator.update_count(), 1);
}

#[test]
fn test_map_tracks_walk() {
    let harness = TestHarness::new();
    harness.walk(START);
    harness.go_to("-6.2088, 106.8456").unwrap();
    harness.walk(north_of(DESTINATION, 100.0));

    let map = harness.map.borrow();
    assert_eq!(map.track().len(), 2);
    assert!(map.view().is_some());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("walk.svg");
    map.save(&path).unwrap();
    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.contains("Jl. Medan Merdeka Selatan"));
}

#[test]
fn test_indonesian_guidance() {
    let harness = TestHarness::with_phrases(Phrasebook::new(Language::Indonesian));
    harness.go_to("-6.2088, 106.8456").unwrap();
    harness.clear_speech();
    harness.walk(DESTINATION);

    assert_eq!(
        harness.spoken(),
        vec!["Tujuan tercapai! Anda telah sampai di lokasi tujuan."]
    );
}

#[test]
fn test_teardown_detaches_sources() {
    let TestHarness {
        positions,
        destinations,
        coordinator,
        ..
    } = TestHarness::new();
    assert_eq!(positions.subscriber_count(), 1);

    coordinator.teardown();
    assert_eq!(positions.subscriber_count(), 0);
    assert_eq!(destinations.subscriber_count(), 0);
}
