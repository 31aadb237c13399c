use crate::container::ControlHandle;
use crate::error::Result;
use crate::player::Player;

use super::on_click;

pub fn play_toggle(player: &Player, ui: &ControlHandle) -> Result<()> {
    on_click(player, ui, |player, _| player.play_toggle());
    Ok(())
}
