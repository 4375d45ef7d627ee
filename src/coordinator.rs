//! Update coordinator.
//!
//! Joins the position and destination streams, runs the guidance session on
//! every delivery once both are known, and fans the result out to the speech
//! dispatcher, the map renderer and the display snapshot.
//!
//! Source callbacks hold a weak reference to the coordinator state, so once
//! the coordinator is torn down (or dropped) no further update runs even if a
//! source still holds the callback.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::Serialize;

use crate::destination::ResolvedDestination;
use crate::geo::{GeoPoint, distance_meters};
use crate::guidance::{GuidanceSession, InstructionKind, NavigationInstruction, Phrasebook};
use crate::map::MapRenderer;
use crate::source::{PointSource, Subscription};
use crate::speech::{SpeechDispatcher, SpeechSink};
use crate::status::NavigationStatus;

/// What the presentation layer shows.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisplayState {
    pub position: Option<GeoPoint>,
    pub destination: Option<GeoPoint>,
    pub destination_label: Option<String>,
    pub distance: Option<f64>,
    pub status: NavigationStatus,
    pub last_instruction: String,
    pub speech_enabled: bool,
}

struct CoordinatorInner {
    session: GuidanceSession,
    dispatcher: SpeechDispatcher,
    sink: Box<dyn SpeechSink>,
    map: Option<Box<dyn MapRenderer>>,
    position: Option<GeoPoint>,
    destination: Option<GeoPoint>,
    /// Label resolved for a destination point
    destination_label: Option<(GeoPoint, String)>,
    distance: Option<f64>,
    last_instruction: String,
    updates: u64,
}

impl CoordinatorInner {
    fn phrases(&self) -> Phrasebook {
        *self.session.phrases()
    }

    fn on_position(&mut self, position: GeoPoint) {
        if !position.is_valid() {
            tracing::warn!("Dropping out-of-range position sample {}", position);
            let message = self.phrases().invalid_position();
            self.publish(NavigationInstruction::new(
                InstructionKind::Warning,
                message,
                self.distance.unwrap_or(0.0),
            ));
            return;
        }

        tracing::debug!("Position update: {}", position);
        self.position = Some(position);
        if let Some(map) = self.map.as_mut() {
            map.update_position(position);
        }
        self.recompute();
    }

    fn on_destination(&mut self, destination: GeoPoint) {
        if !destination.is_valid() {
            tracing::warn!("Ignoring out-of-range destination {}", destination);
            let message = self.phrases().invalid_destination();
            self.publish(NavigationInstruction::new(
                InstructionKind::Warning,
                message,
                self.distance.unwrap_or(0.0),
            ));
            return;
        }

        if self.destination != Some(destination) {
            tracing::info!("New destination {}, starting guidance episode", destination);
            self.session.begin_episode();
        }
        self.destination = Some(destination);

        let title = self.title_for(destination);
        if let Some(map) = self.map.as_mut() {
            map.set_destination(destination, &title);
            if let Some(position) = self.position {
                map.fit_bounds(position, destination);
            }
        }
        self.recompute();
    }

    fn label_for(&self, destination: GeoPoint) -> Option<String> {
        match &self.destination_label {
            Some((point, label)) if *point == destination => Some(label.clone()),
            _ => None,
        }
    }

    fn title_for(&self, destination: GeoPoint) -> String {
        self.label_for(destination)
            .unwrap_or_else(|| destination.to_string())
    }

    fn recompute(&mut self) {
        let Some(instruction) = self.session.step(self.position, self.destination) else {
            return;
        };
        self.updates += 1;
        self.distance = Some(instruction.distance);
        self.publish(instruction);
    }

    /// Speak `instruction` when new and remember it as the last instruction.
    fn publish(&mut self, instruction: NavigationInstruction) {
        self.dispatcher
            .maybe_speak(&instruction, &self.last_instruction, self.sink.as_mut());
        if instruction.message != self.last_instruction {
            self.last_instruction = instruction.message;
        }
    }

    fn snapshot(&self) -> DisplayState {
        let distance = match (self.position, self.destination) {
            (Some(position), Some(destination)) => Some(
                self.distance
                    .unwrap_or_else(|| distance_meters(position, destination)),
            ),
            _ => None,
        };
        DisplayState {
            position: self.position,
            destination: self.destination,
            destination_label: self.destination.and_then(|d| self.label_for(d)),
            distance,
            status: NavigationStatus::from_distance(distance),
            last_instruction: self.last_instruction.clone(),
            speech_enabled: self.dispatcher.is_enabled(),
        }
    }
}

/// Drives guidance from two push sources.
pub struct UpdateCoordinator {
    inner: Rc<RefCell<CoordinatorInner>>,
    subscriptions: Vec<Subscription>,
}

impl UpdateCoordinator {
    pub fn new(
        session: GuidanceSession,
        dispatcher: SpeechDispatcher,
        sink: Box<dyn SpeechSink>,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CoordinatorInner {
                session,
                dispatcher,
                sink,
                map: None,
                position: None,
                destination: None,
                destination_label: None,
                distance: None,
                last_instruction: String::new(),
                updates: 0,
            })),
            subscriptions: Vec::new(),
        }
    }

    /// Attach a map renderer that follows position and destination.
    pub fn with_map(self, map: Box<dyn MapRenderer>) -> Self {
        self.inner.borrow_mut().map = Some(map);
        self
    }

    /// Subscribe to both sources. Values already present are processed immediately.
    pub fn attach(&mut self, positions: &dyn PointSource, destinations: &dyn PointSource) {
        let weak = Rc::downgrade(&self.inner);
        self.subscriptions
            .push(positions.subscribe_points(Box::new(move |point| {
                with_inner(&weak, |inner| inner.on_position(point));
            })));

        let weak = Rc::downgrade(&self.inner);
        self.subscriptions
            .push(destinations.subscribe_points(Box::new(move |point| {
                with_inner(&weak, |inner| inner.on_destination(point));
            })));

        tracing::info!("Coordinator attached to position and destination sources");
    }

    pub fn snapshot(&self) -> DisplayState {
        self.inner.borrow().snapshot()
    }

    pub fn phrases(&self) -> Phrasebook {
        self.inner.borrow().phrases()
    }

    /// Number of completed recomputations.
    pub fn update_count(&self) -> u64 {
        self.inner.borrow().updates
    }

    pub fn set_speech_enabled(&self, enabled: bool) {
        let mut inner = self.inner.borrow_mut();
        let inner = &mut *inner;
        inner.dispatcher.set_enabled(enabled, inner.sink.as_mut());
    }

    /// Flip speech on or off, returning the new value.
    pub fn toggle_speech(&self) -> bool {
        let mut inner = self.inner.borrow_mut();
        let inner = &mut *inner;
        inner.dispatcher.toggle(inner.sink.as_mut())
    }

    pub fn is_speaking(&self) -> bool {
        self.inner.borrow_mut().sink.is_speaking()
    }

    /// Speak a phrase outside the guidance stream.
    pub fn announce(&self, text: &str) -> bool {
        let mut inner = self.inner.borrow_mut();
        let inner = &mut *inner;
        inner.dispatcher.announce(text, inner.sink.as_mut())
    }

    /// Speak a warning; repeated identical warnings are spoken once.
    pub fn announce_warning(&self, text: &str) {
        let mut inner = self.inner.borrow_mut();
        let message = inner.phrases().warning(text);
        let distance = inner.distance.unwrap_or(0.0);
        inner.publish(NavigationInstruction::new(
            InstructionKind::Warning,
            message,
            distance,
        ));
    }

    /// Label the upcoming destination and announce it.
    ///
    /// Call before persisting the destination so the first instruction
    /// follows the announcement instead of being cut off by it.
    pub fn announce_destination(&self, destination: &ResolvedDestination) {
        let text = {
            let mut inner = self.inner.borrow_mut();
            inner.destination_label = Some((destination.point, destination.label.clone()));
            if inner.destination == Some(destination.point)
                && let Some(map) = inner.map.as_mut()
            {
                map.set_destination(destination.point, &destination.label);
            }
            inner.phrases().destination_set(&destination.label)
        };
        self.announce(&text);
    }

    /// Stop receiving updates from both sources.
    pub fn teardown(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        tracing::info!("Coordinator detached");
    }
}

impl Drop for UpdateCoordinator {
    fn drop(&mut self) {
        self.detach();
    }
}

fn with_inner(weak: &Weak<RefCell<CoordinatorInner>>, f: impl FnOnce(&mut CoordinatorInner)) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    match inner.try_borrow_mut() {
        Ok(mut inner) => f(&mut inner),
        Err(_) => tracing::warn!("Coordinator busy, update skipped"),
    };
}
