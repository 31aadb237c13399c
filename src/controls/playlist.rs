use crate::container::ControlHandle;
use crate::error::Result;
use crate::playback::SourceMode;
use crate::player::Player;
use crate::playlist::PlaylistCursor;

use super::on_click;

pub fn next(player: &Player, ui: &ControlHandle) -> Result<()> {
    on_click(player, ui, |player, _| step(player, PlaylistCursor::next));
    Ok(())
}

pub fn prev(player: &Player, ui: &ControlHandle) -> Result<()> {
    on_click(player, ui, |player, _| step(player, PlaylistCursor::prev));
    Ok(())
}

pub fn playlist(player: &Player, ui: &ControlHandle) -> Result<()> {
    let items = player.context().playlist().render()?;
    ui.set_items(items);
    Ok(())
}

/// Moves the cursor and, if it moved, swaps the new song into the player,
/// keeping playback going if it was.
fn step(player: &Player, advance: fn(&mut PlaylistCursor)) -> Result<()> {
    let song = {
        let mut cursor = player.context().playlist_mut();
        let before = cursor.position();
        advance(&mut *cursor);
        if cursor.position() == before {
            return Ok(());
        }
        cursor.current().cloned()
    };
    let Some(song) = song else {
        return Ok(());
    };

    let was_playing = !player.media()?.paused();
    let url = song.url().to_string();
    player.set_song(song)?;
    player.load_with_mode(Some(&url), was_playing, SourceMode::Replace)
}
