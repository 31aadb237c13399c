use crate::container::ControlHandle;
use crate::error::Result;
use crate::player::{Player, SessionEvent};

use super::Binding;

/// Fields the new song lacks leave the previous text in place.
pub fn meta(player: &Player, ui: &ControlHandle) -> Result<()> {
    let binding = Binding::new(player, ui);
    player.on_session(move |event| {
        let SessionEvent::SongChanged(song) = event else {
            return;
        };
        binding.run(|_, ui| {
            let Some(key) = ui.get_data("meta") else {
                return Ok(());
            };
            if let Some(text) = song.text(key) {
                ui.set_text(text);
            }
            Ok(())
        })
    });

    Ok(())
}
