mod meta;
mod playlist;
mod seeker;
mod time;
mod transport;

use std::rc::{Rc, Weak};

use tracing::warn;

use crate::container::{ControlHandle, Element, Input};
use crate::error::Result;
use crate::player::{Player, WeakPlayer};
use crate::registry::{ControlName, ModuleRegistry};

pub use meta::meta;
pub use playlist::{next, playlist, prev};
pub use seeker::{seeker, seeker_fill, seeker_jump};
pub use time::{time_current, time_total};
pub use transport::play_toggle;

pub(crate) fn register_builtins(registry: &ModuleRegistry) {
    insert(registry, "play-toggle", play_toggle);
    insert(registry, "time-current", time_current);
    insert(registry, "time-total", time_total);
    insert(registry, "seeker", seeker);
    insert(registry, "seeker-fill", seeker_fill);
    insert(registry, "seeker-jump", seeker_jump);
    insert(registry, "meta", meta);
}

pub(crate) fn register_playlist(registry: &ModuleRegistry) {
    insert(registry, "next", next);
    insert(registry, "prev", prev);
    insert(registry, "playlist", playlist);
}

fn insert(
    registry: &ModuleRegistry,
    name: &'static str,
    factory: fn(&Player, &ControlHandle) -> Result<()>,
) {
    match ControlName::new(name) {
        Ok(name) => registry.insert(name, Rc::new(factory)),
        Err(err) => warn!(%err, "skipping built-in control"),
    }
}

#[derive(Clone)]
struct Binding {
    player: WeakPlayer,
    ui: Weak<Element>,
}

impl Binding {
    fn new(player: &Player, ui: &ControlHandle) -> Self {
        Binding {
            player: player.downgrade(),
            ui: Rc::downgrade(ui),
        }
    }

    fn run(&self, f: impl FnOnce(&Player, &Element) -> Result<()>) {
        let (Some(player), Some(ui)) = (self.player.upgrade(), self.ui.upgrade()) else {
            return;
        };
        if let Err(err) = f(&player, &ui) {
            warn!(%err, "control handler failed");
        }
    }
}

fn on_click(
    player: &Player,
    ui: &ControlHandle,
    action: impl Fn(&Player, &Element) -> Result<()> + 'static,
) {
    let binding = Binding::new(player, ui);
    ui.on_input(move |input| {
        if *input == Input::Click {
            binding.run(&action);
        }
    });
}
