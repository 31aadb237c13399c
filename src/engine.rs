use std::rc::Rc;
use std::time::Duration;

use color_eyre::Result;
use crossbeam_channel::Sender;
use mood_player::{MediaElement, SimulatedMedia, io};

#[cfg(feature = "rodio")]
use crate::audio_thread::{AudioThread, RodioMedia};
use crate::event::{AudioMessage, Event};

/// Length given to tracks whose tag carries no duration when nothing decodes audio.
const SILENT_TRACK_SECONDS: f64 = 180.0;

/// The media engine behind the player.
pub enum Engine {
    /// Silent playback on a clock driven by ticks.
    Simulated(Rc<SimulatedMedia>),
    #[cfg(feature = "rodio")]
    Rodio(Rc<RodioMedia>),
}

impl Engine {
    pub fn simulated() -> Self {
        let media = SimulatedMedia::with_probe(|url| {
            io::probe_duration(url).or(Some(SILENT_TRACK_SECONDS))
        });
        Engine::Simulated(Rc::new(media))
    }

    #[cfg(feature = "rodio")]
    pub fn start(event_tx: Sender<Event>) -> Result<Self> {
        let (command_tx, command_rx) = crossbeam_channel::unbounded();
        AudioThread::new(command_rx, event_tx).run()?;
        Ok(Engine::Rodio(Rc::new(RodioMedia::new(command_tx))))
    }

    #[cfg(not(feature = "rodio"))]
    pub fn start(_event_tx: Sender<Event>) -> Result<Self> {
        Ok(Engine::simulated())
    }

    pub fn media(&self) -> Rc<dyn MediaElement> {
        match self {
            Engine::Simulated(media) => media.clone(),
            #[cfg(feature = "rodio")]
            Engine::Rodio(media) => media.clone(),
        }
    }

    pub fn tick(&self, elapsed: Duration) {
        match self {
            Engine::Simulated(media) => {
                media.advance(elapsed.as_secs_f64());
            }
            #[cfg(feature = "rodio")]
            Engine::Rodio(media) => media.request_state(),
        }
    }

    pub fn audio(&self, message: AudioMessage) {
        match self {
            Engine::Simulated(_) => {
                tracing::trace!(?message, "no audio thread, dropping message");
            }
            #[cfg(feature = "rodio")]
            Engine::Rodio(media) => media.handle(message),
        }
    }
}
