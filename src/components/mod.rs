mod player_controls;
pub mod tracklist;
mod utils;

use color_eyre::Result;

pub use player_controls::PlayerControlsComponent;
pub use tracklist::TracklistComponent;

use crate::event::{EventState, Key};

pub enum ComponentCommand {
    TracklistComponent(tracklist::Command),
}

pub trait Component {
    fn event(&mut self, key: Key) -> Result<EventState>;
}
