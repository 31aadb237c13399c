//! Headless media engine driven by an explicit clock.

use std::cell::{Cell, RefCell};
use std::fmt;

use tracing::debug;

use crate::emitter::Emitter;
use crate::playback::{MediaElement, MediaEvent};

type DurationProbe = Box<dyn Fn(&str) -> Option<f64>>;

/// A [`MediaElement`] with no audio output.
///
/// Metadata arrives either from the duration probe when the first source is appended,
/// or explicitly through [`SimulatedMedia::load_metadata`]. Time only moves on
/// [`SimulatedMedia::advance`].
pub struct SimulatedMedia {
    paused: Cell<bool>,
    duration: Cell<f64>,
    current_time: Cell<f64>,
    sources: RefCell<Vec<Option<String>>>,
    probe: Option<DurationProbe>,
    events: Emitter<MediaEvent>,
}

impl SimulatedMedia {
    pub fn new() -> Self {
        SimulatedMedia {
            paused: Cell::new(true),
            duration: Cell::new(f64::NAN),
            current_time: Cell::new(0.0),
            sources: RefCell::new(Vec::new()),
            probe: None,
            events: Emitter::new(),
        }
    }

    pub fn with_probe(probe: impl Fn(&str) -> Option<f64> + 'static) -> Self {
        SimulatedMedia {
            probe: Some(Box::new(probe)),
            ..Self::new()
        }
    }

    /// Pretends the resource finished loading its metadata.
    pub fn load_metadata(&self, duration: f64) {
        self.duration.set(duration);
        self.events.emit(&MediaEvent::DurationChange);
        self.events.emit(&MediaEvent::LoadedData);
        self.events.emit(&MediaEvent::CanPlay);
    }

    /// Moves the clock forward while playing. Returns `true` when the end was reached.
    pub fn advance(&self, seconds: f64) -> bool {
        let duration = self.duration.get();
        if self.paused.get() || duration.is_nan() {
            return false;
        }

        let time = (self.current_time.get() + seconds).min(duration);
        self.current_time.set(time);
        self.events.emit(&MediaEvent::TimeUpdate);

        if time >= duration {
            self.paused.set(true);
            self.events.emit(&MediaEvent::Pause);
            return true;
        }

        false
    }
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaElement for SimulatedMedia {
    fn play(&self) {
        if self.paused.replace(false) {
            self.events.emit(&MediaEvent::Play);
        }
    }

    fn pause(&self) {
        if !self.paused.replace(true) {
            self.events.emit(&MediaEvent::Pause);
        }
    }

    fn paused(&self) -> bool {
        self.paused.get()
    }

    fn duration(&self) -> f64 {
        self.duration.get()
    }

    fn current_time(&self) -> f64 {
        self.current_time.get()
    }

    fn set_current_time(&self, seconds: f64) {
        let duration = self.duration.get();
        let mut time = seconds.max(0.0);
        if !duration.is_nan() {
            time = time.min(duration);
        }

        self.current_time.set(time);
        self.events.emit(&MediaEvent::TimeUpdate);
    }

    fn append_source(&self, url: Option<String>) {
        let first = self.sources.borrow().is_empty();
        self.sources.borrow_mut().push(url.clone());

        // Like an <audio> element, only the first source is ever selected.
        if !first || !self.duration.get().is_nan() {
            return;
        }

        let probed = url
            .as_deref()
            .and_then(|url| self.probe.as_ref().and_then(|probe| probe(url)));
        if let Some(duration) = probed {
            debug!(?url, duration, "simulated metadata");
            self.load_metadata(duration);
        }
    }

    fn clear_sources(&self) {
        self.sources.borrow_mut().clear();
        self.current_time.set(0.0);
        self.duration.set(f64::NAN);
        self.events.emit(&MediaEvent::DurationChange);
        self.pause();
    }

    fn sources(&self) -> Vec<Option<String>> {
        self.sources.borrow().clone()
    }

    fn events(&self) -> &Emitter<MediaEvent> {
        &self.events
    }
}

impl fmt::Debug for SimulatedMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedMedia")
            .field("paused", &self.paused.get())
            .field("duration", &self.duration.get())
            .field("current_time", &self.current_time.get())
            .field("sources", &self.sources.borrow())
            .finish()
    }
}
