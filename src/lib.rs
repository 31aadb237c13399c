//! Binds a media engine to pluggable player controls and keeps a playlist cursor.
//!
//! A [`Player`] looks up the controls declared in a [`Container`], instantiates each
//! through the [`ModuleRegistry`] held by a shared [`Context`], and keeps them in sync
//! with playback through synchronous events.

pub mod container;
pub mod context;
pub mod controls;
pub mod emitter;
pub mod error;
pub mod io;
pub mod options;
pub mod playback;
pub mod player;
pub mod playlist;
pub mod registry;
pub mod simulated;
pub mod song;
pub mod utils;

pub use container::{Bounds, Container, ControlHandle, Element, Input, View};
pub use context::{Context, NowPlaying, SongCallback, SongLoader};
pub use emitter::{Emitter, Subscription};
pub use error::{Error, Result};
pub use options::{OptionSet, PLAYER_OPTIONS, PlayerOptions};
pub use playback::{MediaElement, MediaEvent, PlaybackHandle, SourceMode};
pub use player::{Player, PlayerId, Presentation, SessionEvent, WeakPlayer};
pub use playlist::PlaylistCursor;
pub use registry::{ControlFactory, ControlName, ModuleRegistry};
pub use simulated::SimulatedMedia;
pub use song::Song;
pub use utils::format_time;
