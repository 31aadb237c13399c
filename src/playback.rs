use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::emitter::{Emitter, Subscription};

/// Lifecycle notifications a media engine emits.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum MediaEvent {
    DurationChange,
    TimeUpdate,
    Play,
    Pause,
    LoadedData,
    /// Enough data is buffered to start playback.
    CanPlay,
}

/// The media engine contract consumed by [`PlaybackHandle`].
///
/// `play` and `pause` are fire-and-forget; the engine emits [`MediaEvent::Play`] /
/// [`MediaEvent::Pause`] once the underlying resource has actually transitioned.
/// `duration` is `NaN` until metadata is known.
pub trait MediaElement {
    fn play(&self);
    fn pause(&self);
    fn paused(&self) -> bool;
    fn duration(&self) -> f64;
    fn current_time(&self) -> f64;
    fn set_current_time(&self, seconds: f64);
    /// Appends a source entry. `None` mirrors a source that could not be resolved.
    fn append_source(&self, url: Option<String>);
    /// Drops every source entry and resets position and duration.
    fn clear_sources(&self);
    fn sources(&self) -> Vec<Option<String>>;
    fn events(&self) -> &Emitter<MediaEvent>;
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub enum SourceMode {
    /// Keep earlier source entries (legacy behaviour).
    #[default]
    Append,
    Replace,
}

/// Thin handle over one media engine, owned by a single player.
#[derive(Clone)]
pub struct PlaybackHandle {
    media: Rc<dyn MediaElement>,
}

impl PlaybackHandle {
    pub fn new(media: Rc<dyn MediaElement>) -> Self {
        PlaybackHandle { media }
    }

    pub fn play(&self) {
        self.media.play();
    }

    pub fn pause(&self) {
        self.media.pause();
    }

    pub fn paused(&self) -> bool {
        self.media.paused()
    }

    pub fn duration(&self) -> f64 {
        self.media.duration()
    }

    pub fn duration_known(&self) -> bool {
        !self.media.duration().is_nan()
    }

    pub fn current_time(&self) -> f64 {
        self.media.current_time()
    }

    pub fn set_source(&self, url: Option<String>, mode: SourceMode) {
        debug!(?url, ?mode, "setting media source");
        if mode == SourceMode::Replace {
            self.media.clear_sources();
        }
        self.media.append_source(url);
    }

    pub fn sources(&self) -> Vec<Option<String>> {
        self.media.sources()
    }

    /// Seeks with the overloaded legacy semantics: a value with a fractional part is a
    /// fraction of the duration, a whole number is an absolute offset in seconds.
    ///
    /// `1.5` is therefore read as 150% of the duration, not as one and a half seconds.
    pub fn seek_to(&self, time: f64) {
        let target = if time.fract() != 0.0 {
            let duration = self.media.duration();
            if duration.is_nan() {
                trace!(time, "fractional seek before metadata, ignored");
                return;
            }
            (duration * time).round()
        } else {
            time
        };

        debug!(time, target, "seeking");
        self.media.set_current_time(target);
    }

    pub fn on(&self, event: MediaEvent, listener: impl Fn() + 'static) -> Subscription {
        self.media.events().subscribe(move |e| {
            if *e == event {
                listener();
            }
        })
    }

    pub fn once(&self, event: MediaEvent, listener: impl Fn() + 'static) -> Subscription {
        self.media
            .events()
            .once_if(move |e| *e == event, move |_| listener())
    }

    pub fn off(&self, sub: Subscription) -> bool {
        self.media.events().unsubscribe(sub)
    }

    pub fn media(&self) -> &Rc<dyn MediaElement> {
        &self.media
    }
}

impl fmt::Debug for PlaybackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackHandle")
            .field("paused", &self.media.paused())
            .field("duration", &self.media.duration())
            .field("current_time", &self.media.current_time())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::SimulatedMedia;
    use std::cell::Cell;

    fn handle(duration: f64) -> (Rc<SimulatedMedia>, PlaybackHandle) {
        let media = Rc::new(SimulatedMedia::new());
        media.load_metadata(duration);
        (media.clone(), PlaybackHandle::new(media))
    }

    #[test]
    fn fractional_seek_is_a_share_of_duration() {
        let (media, handle) = handle(100.0);
        handle.seek_to(0.5);
        assert_eq!(media.current_time(), 50.0);
    }

    #[test]
    fn whole_seek_is_absolute_seconds() {
        let (media, handle) = handle(100.0);
        handle.seek_to(10.0);
        assert_eq!(media.current_time(), 10.0);
    }

    #[test]
    fn fractional_seconds_are_read_as_a_fraction() {
        let (media, handle) = handle(100.0);
        handle.seek_to(1.5);
        // 150 clamps to the end of the track.
        assert_eq!(media.current_time(), 100.0);
    }

    #[test]
    fn fractional_seek_without_metadata_is_ignored() {
        let media = Rc::new(SimulatedMedia::new());
        let handle = PlaybackHandle::new(media.clone());
        handle.seek_to(0.25);
        assert_eq!(media.current_time(), 0.0);
    }

    #[test]
    fn replace_drops_earlier_sources() {
        let (_, handle) = handle(10.0);
        handle.set_source(Some("a.mp3".into()), SourceMode::Append);
        handle.set_source(Some("b.mp3".into()), SourceMode::Append);
        assert_eq!(handle.sources().len(), 2);

        handle.set_source(Some("c.mp3".into()), SourceMode::Replace);
        assert_eq!(handle.sources(), vec![Some("c.mp3".to_string())]);
    }

    #[test]
    fn once_listener_only_sees_its_event() {
        let media = Rc::new(SimulatedMedia::new());
        let handle = PlaybackHandle::new(media.clone());
        let hits = Rc::new(Cell::new(0));
        {
            let hits = hits.clone();
            handle.once(MediaEvent::CanPlay, move || hits.set(hits.get() + 1));
        }

        media.play();
        media.load_metadata(5.0);
        media.load_metadata(5.0);

        assert_eq!(hits.get(), 1);
    }
}
