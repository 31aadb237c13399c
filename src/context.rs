use std::cell::{Cell, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::container::{ControlHandle, Input};
use crate::controls;
use crate::emitter::Emitter;
use crate::error::Result;
use crate::player::{Player, PlayerId};
use crate::playlist::PlaylistCursor;
use crate::registry::{ControlFactory, ModuleRegistry};
use crate::utils::format_time;

pub type SongCallback = Box<dyn FnOnce(Value) -> Result<()>>;

/// Resolves a query (a path, an id, whatever the page uses) into song metadata
/// and reports it through the callback, now or later.
pub type SongLoader = Rc<dyn Fn(&str, SongCallback) -> Result<()>>;

pub type InitHook = Rc<dyn Fn(&Player) -> Result<()>>;

pub type TimeFormat = Rc<dyn Fn(f64) -> String>;

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct NowPlaying {
    pub source: PlayerId,
}

pub struct Context {
    registry: ModuleRegistry,
    playlist: RefCell<PlaylistCursor>,
    loader: RefCell<Option<SongLoader>>,
    exclusive: Cell<bool>,
    init_hooks: RefCell<Vec<InitHook>>,
    now_playing: Emitter<NowPlaying>,
    time_format: RefCell<TimeFormat>,
    playlist_enabled: Cell<bool>,
}

impl Context {
    pub fn new() -> Self {
        Self::with_registry(ModuleRegistry::with_builtins())
    }

    pub fn with_registry(registry: ModuleRegistry) -> Self {
        Context {
            registry,
            playlist: RefCell::new(PlaylistCursor::new()),
            loader: RefCell::new(None),
            exclusive: Cell::new(false),
            init_hooks: RefCell::new(Vec::new()),
            now_playing: Emitter::new(),
            time_format: RefCell::new(Rc::new(format_time)),
            playlist_enabled: Cell::new(false),
        }
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn module(
        &self,
        name: &str,
        factory: impl Fn(&Player, &ControlHandle) -> Result<()> + 'static,
    ) -> Result<()> {
        self.registry.register(name, factory)
    }

    pub fn modules<'a>(
        &self,
        factories: impl IntoIterator<Item = (&'a str, ControlFactory)>,
    ) -> Result<()> {
        self.registry.register_all(factories)
    }

    /// Only affects players initialised afterwards.
    pub fn set_exclusive(&self, exclusive: bool) {
        self.exclusive.set(exclusive);
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive.get()
    }

    pub fn set_loader(&self, loader: impl Fn(&str, SongCallback) -> Result<()> + 'static) {
        *self.loader.borrow_mut() = Some(Rc::new(loader));
    }

    pub fn loader(&self) -> Option<SongLoader> {
        self.loader.borrow().clone()
    }

    /// Makes every target carrying `attr` forward its value into `player.get_song` on click.
    pub fn inline_tracks<'a>(
        &self,
        targets: impl IntoIterator<Item = &'a ControlHandle>,
        attr: &str,
        player: &Player,
    ) {
        for target in targets {
            let Some(query) = target.get_attr(attr).map(str::to_string) else {
                continue;
            };

            let player = player.downgrade();
            target.on_input(move |input| {
                if *input != Input::Click {
                    return;
                }
                if let Some(player) = player.upgrade() {
                    if let Err(err) = player.get_song(&query) {
                        warn!(%err, query = %query, "inline track failed");
                    }
                }
            });
        }
    }

    pub fn on_init(&self, hook: impl Fn(&Player) -> Result<()> + 'static) {
        self.init_hooks.borrow_mut().push(Rc::new(hook));
    }

    pub fn init_hooks(&self) -> Vec<InitHook> {
        self.init_hooks.borrow().clone()
    }

    pub fn playlist(&self) -> Ref<'_, PlaylistCursor> {
        self.playlist.borrow()
    }

    pub fn playlist_mut(&self) -> RefMut<'_, PlaylistCursor> {
        self.playlist.borrow_mut()
    }

    /// Registers the `next`, `prev` and `playlist` controls, plus an init hook that
    /// hands the first playlist song to each new player. Idempotent.
    pub fn enable_playlist(&self) {
        if self.playlist_enabled.replace(true) {
            return;
        }

        controls::register_playlist(&self.registry);
        self.on_init(|player| {
            let first = player.context().playlist().songs().first().cloned();
            match first {
                Some(song) => {
                    debug!(url = song.url(), "loading first playlist song");
                    player.set_song(song)
                }
                None => Ok(()),
            }
        });
    }

    pub fn now_playing(&self) -> &Emitter<NowPlaying> {
        &self.now_playing
    }

    pub fn set_time_format(&self, format: impl Fn(f64) -> String + 'static) {
        *self.time_format.borrow_mut() = Rc::new(format);
    }

    pub fn format_time(&self, seconds: f64) -> String {
        let format = self.time_format.borrow().clone();
        format(seconds)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("registry", &self.registry)
            .field("playlist", &self.playlist.borrow())
            .field("loader", &self.loader.borrow().is_some())
            .field("exclusive", &self.exclusive.get())
            .field("init_hooks", &self.init_hooks.borrow().len())
            .finish()
    }
}
