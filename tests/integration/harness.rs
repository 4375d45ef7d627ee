//! Test harness: coordinator wired to in-process sources and recording sinks.

use std::cell::RefCell;
use std::rc::Rc;

use disha_nav::destination::{self, ResolvedDestination};
use disha_nav::speech::{RecordingSpeech, SpeechEvent, SpeechLog};
use disha_nav::{
    GeoPoint, GeocodeError, Geocoder, GuidanceSession, Phrasebook,
    ResolvedPlace, SpeechDispatcher, SvgTrackMap, Topic, UpdateCoordinator,
};

/// Geocoder answering from a fixed table.
pub struct FakeGeocoder {
    pub places: Vec<(String, ResolvedPlace)>,
    pub reverse_label: Option<String>,
    pub forward_calls: RefCell<Vec<String>>,
}

impl FakeGeocoder {
    pub fn jakarta() -> Self {
        Self {
            places: vec![(
                "Monas Jakarta".to_string(),
                ResolvedPlace {
                    point: GeoPoint::new(-6.1754, 106.8272),
                    formatted_address: "Monumen Nasional, Gambir, Jakarta Pusat".to_string(),
                },
            )],
            reverse_label: Some("Jl. Medan Merdeka Selatan, Jakarta".to_string()),
            forward_calls: RefCell::new(Vec::new()),
        }
    }
}

impl Geocoder for FakeGeocoder {
    fn resolve_address(&self, address: &str) -> Result<ResolvedPlace, GeocodeError> {
        self.forward_calls.borrow_mut().push(address.to_string());
        self.places
            .iter()
            .find(|(name, _)| name == address)
            .map(|(_, place)| place.clone())
            .ok_or_else(|| GeocodeError::NotFound("ZERO_RESULTS".to_string()))
    }

    fn resolve_coordinates(&self, _point: GeoPoint) -> Result<String, GeocodeError> {
        self.reverse_label.clone().ok_or(GeocodeError::NotConfigured)
    }
}

/// Sources, coordinator and observers for one navigation session.
pub struct TestHarness {
    pub positions: Topic<GeoPoint>,
    pub destinations: Topic<GeoPoint>,
    pub coordinator: UpdateCoordinator,
    pub map: Rc<RefCell<SvgTrackMap>>,
    pub geocoder: FakeGeocoder,
    log: SpeechLog,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_phrases(Phrasebook::default())
    }

    pub fn with_phrases(phrases: Phrasebook) -> Self {
        let positions = Topic::new("position");
        let destinations = Topic::new("destination");
        let sink = RecordingSpeech::new();
        let log = sink.log();
        let map = Rc::new(RefCell::new(SvgTrackMap::new()));

        let mut coordinator = UpdateCoordinator::new(
            GuidanceSession::new(phrases),
            SpeechDispatcher::default(),
            Box::new(sink),
        )
        .with_map(Box::new(Rc::clone(&map)));
        coordinator.attach(&positions, &destinations);

        Self {
            positions,
            destinations,
            coordinator,
            map,
            geocoder: FakeGeocoder::jakarta(),
            log,
        }
    }

    /// Resolve, announce and publish a destination.
    pub fn go_to(&self, input: &str) -> disha_nav::Result<ResolvedDestination> {
        destination::set_destination(input, &self.geocoder, &self.destinations, |resolved| {
            self.coordinator.announce_destination(resolved)
        })
    }

    pub fn walk(&self, position: GeoPoint) {
        self.positions.publish(position);
    }

    /// Everything spoken so far, in order.
    pub fn spoken(&self) -> Vec<String> {
        self.log
            .borrow()
            .iter()
            .filter_map(|event| match event {
                SpeechEvent::Speak(text) => Some(text.clone()),
                SpeechEvent::Cancel => None,
            })
            .collect()
    }

    pub fn events(&self) -> Vec<SpeechEvent> {
        self.log.borrow().clone()
    }

    pub fn clear_speech(&self) {
        self.log.borrow_mut().clear();
    }
}

/// Point `meters` due north of `origin`.
pub fn north_of(origin: GeoPoint, meters: f64) -> GeoPoint {
    let dlat = meters / disha_nav::geo::EARTH_RADIUS_M.to_radians();
    GeoPoint::new(origin.latitude + dlat, origin.longitude)
}
