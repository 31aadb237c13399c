use tracing::warn;

use crate::container::{ControlHandle, Input};
use crate::error::Result;
use crate::playback::MediaEvent;
use crate::player::{Player, SessionEvent};

use super::{Binding, on_click};

/// Drag target for seeking. Pointer down starts a drag, moves report the drag
/// position to the other controls, and release seeks to it.
pub fn seeker(player: &Player, ui: &ControlHandle) -> Result<()> {
    let binding = Binding::new(player, ui);
    ui.on_input(move |input| {
        let input = *input;
        binding.run(|player, ui| {
            match input {
                Input::PointerDown { .. } => player.set_seeking(true),
                Input::PointerMove { x } if player.seeking() => {
                    player.update_seeker(ui.bounds().fraction(x));
                }
                Input::PointerUp { x } if player.seeking() => {
                    let result = player.seek(ui.bounds().fraction(x));
                    player.set_seeking(false);
                    result?;
                }
                _ => {}
            }
            Ok(())
        })
    });

    Ok(())
}

pub fn seeker_fill(player: &Player, ui: &ControlHandle) -> Result<()> {
    let media = player.media()?;
    let binding = Binding::new(player, ui);
    {
        let binding = binding.clone();
        media.on(MediaEvent::TimeUpdate, move || {
            binding.run(|player, ui| {
                let media = player.media()?;
                let duration = media.duration();
                if !player.seeking() && duration > 0.0 {
                    ui.set_fill(round3(media.current_time() / duration));
                }
                Ok(())
            })
        });
    }

    player.on_session(move |event| {
        let SessionEvent::SeekerUpdate(fraction) = *event else {
            return;
        };
        binding.run(|_, ui| {
            ui.set_fill(fraction);
            Ok(())
        })
    });

    Ok(())
}

/// Jumps by the signed number of seconds in `data-seeker-jump`, clamped to the track.
pub fn seeker_jump(player: &Player, ui: &ControlHandle) -> Result<()> {
    let raw = ui.get_data("seeker-jump").unwrap_or_default();
    let Ok(offset) = raw.trim().parse::<i64>() else {
        warn!(value = raw, "seeker-jump needs a whole number of seconds");
        return Ok(());
    };

    on_click(player, ui, move |player, _| {
        let media = player.media()?;
        if !media.duration_known() {
            return Ok(());
        }

        // Whole seconds only: a fractional value would be read as a share of the duration.
        let target = (media.current_time() + offset as f64)
            .clamp(0.0, media.duration())
            .floor();
        player.seek(target)
    });

    Ok(())
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
