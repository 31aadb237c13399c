use crate::container::ControlHandle;
use crate::error::Result;
use crate::playback::MediaEvent;
use crate::player::{Player, SessionEvent};

use super::Binding;

pub fn time_total(player: &Player, ui: &ControlHandle) -> Result<()> {
    ui.set_text(player.context().format_time(0.0));

    let media = player.media()?;
    let binding = Binding::new(player, ui);
    media.on(MediaEvent::DurationChange, move || {
        binding.run(|player, ui| {
            let duration = player.media()?.duration();
            ui.set_text(player.context().format_time(duration));
            Ok(())
        })
    });

    Ok(())
}

pub fn time_current(player: &Player, ui: &ControlHandle) -> Result<()> {
    ui.set_text(player.context().format_time(0.0));

    let media = player.media()?;
    let binding = Binding::new(player, ui);
    {
        let binding = binding.clone();
        media.on(MediaEvent::TimeUpdate, move || {
            binding.run(|player, ui| {
                if !player.seeking() {
                    let time = player.media()?.current_time();
                    ui.set_text(player.context().format_time(time));
                }
                Ok(())
            })
        });
    }

    player.on_session(move |event| {
        let SessionEvent::SeekerUpdate(fraction) = *event else {
            return;
        };
        binding.run(|player, ui| {
            let media = player.media()?;
            if media.duration_known() {
                ui.set_text(player.context().format_time(media.duration() * fraction));
            }
            Ok(())
        })
    });

    Ok(())
}
