use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::container::{Container, ControlHandle, MEDIA_SLOT, OPTIONS_ATTR, SOURCE_ATTR};
use crate::context::{Context, NowPlaying};
use crate::emitter::{Emitter, Subscription};
use crate::error::{Error, Result};
use crate::options::PlayerOptions;
use crate::playback::{MediaEvent, PlaybackHandle, SourceMode};
use crate::song::Song;

pub const ACTIVE_CLASS: &str = "is-active";
pub const PLAYING_CLASS: &str = "is-playing";
pub const PAUSED_CLASS: &str = "is-paused";

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub struct PlayerId(Uuid);

impl PlayerId {
    fn new() -> Self {
        PlayerId(Uuid::new_v4())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum SessionEvent {
    SongChanged(Song),
    SeekerUpdate(f64),
}

/// Presentation flags mirrored onto the container as classes. `active` is set on
/// the first `loadeddata` and never cleared; `playing` and `paused` exclude each other.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Default)]
pub struct Presentation {
    pub active: bool,
    pub playing: bool,
    pub paused: bool,
}

/// Cheap to clone; clones share the session. Controls hold a [`WeakPlayer`] so the
/// player can be dropped while its media still holds their listeners.
#[derive(Clone)]
pub struct Player {
    inner: Rc<Inner>,
}

#[derive(Clone)]
pub struct WeakPlayer {
    inner: Weak<Inner>,
}

impl WeakPlayer {
    pub fn upgrade(&self) -> Option<Player> {
        self.inner.upgrade().map(|inner| Player { inner })
    }
}

struct Inner {
    id: PlayerId,
    context: Rc<Context>,
    container: Rc<Container>,
    media: RefCell<Option<PlaybackHandle>>,
    ui: RefCell<BTreeMap<String, Vec<ControlHandle>>>,
    options: Cell<PlayerOptions>,
    song: RefCell<Option<Song>>,
    seeking: Cell<bool>,
    initialized: Cell<bool>,
    session: Emitter<SessionEvent>,
    now_playing: Cell<Option<Subscription>>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(sub) = self.now_playing.take() {
            self.context.now_playing().unsubscribe(sub);
        }
    }
}

impl Player {
    pub fn new(context: &Rc<Context>, container: Rc<Container>) -> Self {
        Player {
            inner: Rc::new(Inner {
                id: PlayerId::new(),
                context: context.clone(),
                container,
                media: RefCell::new(None),
                ui: RefCell::new(BTreeMap::new()),
                options: Cell::new(PlayerOptions::default()),
                song: RefCell::new(None),
                seeking: Cell::new(false),
                initialized: Cell::new(false),
                session: Emitter::new(),
                now_playing: Cell::new(None),
            }),
        }
    }

    /// Binds the media element and every declared control, then runs the init hooks.
    /// A second call only warns.
    pub fn init(&self) -> Result<()> {
        if self.inner.initialized.get() {
            warn!(player = %self.id(), "player already initialised, ignoring");
            return Ok(());
        }

        let container = &self.inner.container;
        let element = container.find(MEDIA_SLOT).ok_or_else(|| {
            Error::configuration("missing required media element <audio data-audio>")
        })?;
        let media = match (element.tag(), element.media()) {
            ("audio", Some(media)) => PlaybackHandle::new(media.clone()),
            (tag, _) => {
                return Err(Error::configuration(format!(
                    "wrong element type: data-audio must be a playable <audio>, found <{tag}>"
                )));
            }
        };
        *self.inner.media.borrow_mut() = Some(media.clone());
        self.inner.initialized.set(true);

        for (name, factory) in self.inner.context.registry().entries() {
            let elements = container.find_all(name.as_str());
            if elements.is_empty() {
                continue;
            }

            trace!(control = %name, count = elements.len(), "binding control");
            self.inner
                .ui
                .borrow_mut()
                .insert(name.to_string(), elements.clone());
            for element in &elements {
                factory(self, element)?;
            }
        }

        let options = PlayerOptions::parse(container.get_attr(OPTIONS_ATTR));
        self.inner.options.set(options);

        self.bind_presentation(&media);

        if self.inner.context.is_exclusive() {
            let id = self.id();
            let me = self.downgrade();
            let sub = self.inner.context.now_playing().subscribe(move |event| {
                if event.source == id {
                    return;
                }
                if let Some(player) = me.upgrade() {
                    debug!(player = %id, source = %event.source, "pausing for another player");
                    if let Err(err) = player.pause() {
                        warn!(%err, "exclusive pause failed");
                    }
                }
            });
            self.inner.now_playing.set(Some(sub));
        }

        if options.autoload {
            if let Some(source) = container.get_attr(SOURCE_ATTR) {
                self.load(Some(source), options.autoplay)?;
            }
        }

        for hook in self.inner.context.init_hooks() {
            hook(self)?;
        }

        debug!(player = %self.id(), controls = ?self.control_names(), "player initialised");
        Ok(())
    }

    fn bind_presentation(&self, media: &PlaybackHandle) {
        let container = Rc::downgrade(&self.inner.container);

        let c = container.clone();
        media.on(MediaEvent::LoadedData, move || {
            if let Some(c) = c.upgrade() {
                c.add_class(ACTIVE_CLASS);
            }
        });

        let c = container.clone();
        media.on(MediaEvent::Play, move || {
            if let Some(c) = c.upgrade() {
                c.remove_class(PAUSED_CLASS);
                c.add_class(PLAYING_CLASS);
            }
        });

        media.on(MediaEvent::Pause, move || {
            if let Some(c) = container.upgrade() {
                c.remove_class(PLAYING_CLASS);
                c.add_class(PAUSED_CLASS);
            }
        });
    }

    /// Appends a source to the media. The source is, in order: `source`, the
    /// container's default source, the current song's url. If none resolve an empty
    /// source is still appended.
    pub fn load(&self, source: Option<&str>, autoplay: bool) -> Result<()> {
        self.load_with_mode(source, autoplay, SourceMode::Append)
    }

    pub fn load_with_mode(
        &self,
        source: Option<&str>,
        autoplay: bool,
        mode: SourceMode,
    ) -> Result<()> {
        let media = self.media()?;

        let source = source
            .map(str::to_string)
            .or_else(|| {
                self.inner
                    .container
                    .get_attr(SOURCE_ATTR)
                    .map(str::to_string)
            })
            .or_else(|| self.song().map(|song| song.url().to_string()));

        if autoplay || self.options().autoplay {
            let me = self.downgrade();
            media.once(MediaEvent::CanPlay, move || {
                if let Some(player) = me.upgrade() {
                    if let Err(err) = player.play() {
                        warn!(%err, "autoplay failed");
                    }
                }
            });
        }

        if source.is_none() {
            debug!(player = %self.id(), "no source resolved");
        }
        media.set_source(source, mode);
        Ok(())
    }

    /// Non-record values are ignored; a record without `url` is an error.
    pub fn set_song(&self, song: impl Into<Value>) -> Result<()> {
        let Some(song) = Song::from_value(song.into())? else {
            trace!(player = %self.id(), "ignoring non-record song");
            return Ok(());
        };

        *self.inner.song.borrow_mut() = Some(song.clone());
        debug!(player = %self.id(), url = song.url(), "song changed");
        self.inner.session.emit(&SessionEvent::SongChanged(song));
        Ok(())
    }

    pub fn get_song(&self, query: &str) -> Result<()> {
        let loader = self
            .inner
            .context
            .loader()
            .ok_or_else(|| Error::configuration("no song loader has been registered"))?;

        let me = self.downgrade();
        loader(
            query,
            Box::new(move |value: Value| match me.upgrade() {
                Some(player) => player.set_song(value),
                None => Ok(()),
            }),
        )
    }

    pub fn play(&self) -> Result<()> {
        self.media()?.play();
        if self.inner.context.is_exclusive() {
            self.inner
                .context
                .now_playing()
                .emit(&NowPlaying { source: self.id() });
        }
        Ok(())
    }

    pub fn pause(&self) -> Result<()> {
        self.media()?.pause();
        Ok(())
    }

    pub fn play_toggle(&self) -> Result<()> {
        if self.media()?.paused() {
            self.play()
        } else {
            self.pause()
        }
    }

    /// See [`PlaybackHandle::seek_to`] for how `time` is read.
    pub fn seek(&self, time: f64) -> Result<()> {
        self.media()?.seek_to(time);
        Ok(())
    }

    pub fn seeking(&self) -> bool {
        self.inner.seeking.get()
    }

    pub fn set_seeking(&self, seeking: bool) {
        self.inner.seeking.set(seeking);
    }

    pub fn update_seeker(&self, fraction: f64) {
        self.inner
            .session
            .emit(&SessionEvent::SeekerUpdate(fraction));
    }

    pub fn on_session(&self, listener: impl Fn(&SessionEvent) + 'static) -> Subscription {
        self.inner.session.subscribe(listener)
    }

    pub fn off_session(&self, sub: Subscription) -> bool {
        self.inner.session.unsubscribe(sub)
    }

    pub fn media(&self) -> Result<PlaybackHandle> {
        self.inner
            .media
            .borrow()
            .clone()
            .ok_or_else(|| Error::configuration("player has not been initialised"))
    }

    pub fn song(&self) -> Option<Song> {
        self.inner.song.borrow().clone()
    }

    pub fn options(&self) -> PlayerOptions {
        self.inner.options.get()
    }

    pub fn id(&self) -> PlayerId {
        self.inner.id
    }

    pub fn context(&self) -> &Rc<Context> {
        &self.inner.context
    }

    pub fn container(&self) -> &Rc<Container> {
        &self.inner.container
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.initialized.get()
    }

    pub fn ui(&self, name: &str) -> Vec<ControlHandle> {
        self.inner.ui.borrow().get(name).cloned().unwrap_or_default()
    }

    pub fn control_names(&self) -> Vec<String> {
        self.inner.ui.borrow().keys().cloned().collect()
    }

    pub fn presentation(&self) -> Presentation {
        let c = &self.inner.container;
        Presentation {
            active: c.has_class(ACTIVE_CLASS),
            playing: c.has_class(PLAYING_CLASS),
            paused: c.has_class(PAUSED_CLASS),
        }
    }

    pub fn downgrade(&self) -> WeakPlayer {
        WeakPlayer {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.inner.id)
            .field("initialized", &self.inner.initialized.get())
            .field("song", &self.inner.song.borrow())
            .field("seeking", &self.inner.seeking.get())
            .field("options", &self.inner.options.get())
            .finish()
    }
}
