use std::cell::Cell;

use mood_player::{Bounds, Input, Player};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Widget};

use crate::event::Pointer;

/// Now-playing line, seek bar and transport state, all read back from the
/// player's controls.
pub struct PlayerControlsComponent {
    seeker_area: Cell<Option<Rect>>,
}

impl PlayerControlsComponent {
    pub fn new() -> Self {
        PlayerControlsComponent {
            seeker_area: Cell::new(None),
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, player: &Player) {
        let area = {
            let border = Block::bordered();
            let a = border.inner(area);
            border.render(area, buf);
            a
        };

        let [name_area, progress_area, control_area] = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ],
        )
        .areas(area);

        let [current_area, progress_area, total_area] = Layout::new(
            Direction::Horizontal,
            [
                Constraint::Fill(1),
                Constraint::Fill(8),
                Constraint::Fill(1),
            ],
        )
        .areas(progress_area);

        let meta = ["title", "artist", "album"]
            .iter()
            .filter_map(|key| {
                player
                    .ui("meta")
                    .into_iter()
                    .find(|ui| ui.get_data("meta") == Some(*key))
                    .and_then(|ui| ui.text())
            })
            .collect::<Vec<_>>();
        let name = if meta.is_empty() {
            "No song".to_string()
        } else {
            meta.join(" - ")
        };
        Line::raw(name).centered().render(name_area, buf);

        let text = |name: &str| {
            player
                .ui(name)
                .first()
                .and_then(|ui| ui.text())
                .unwrap_or_default()
        };
        Line::raw(text("time-current"))
            .centered()
            .render(current_area, buf);
        Line::raw(text("time-total"))
            .centered()
            .render(total_area, buf);

        let fill = player
            .ui("seeker-fill")
            .first()
            .and_then(|ui| ui.fill())
            .unwrap_or(0.0);
        let done = (f64::from(progress_area.width) * fill).round() as u16;
        for i in 0..progress_area.width {
            if let Some(cell) = buf.cell_mut((i + progress_area.x, progress_area.y)) {
                cell.set_char(if i < done { '#' } else { '-' });
            }
        }

        // Pointer columns map onto the seeker through these bounds.
        for seeker in player.ui("seeker") {
            seeker.set_bounds(Bounds::new(
                f64::from(progress_area.x),
                f64::from(progress_area.width),
            ));
        }
        self.seeker_area.set(Some(progress_area));

        let state = if player.presentation().playing {
            "playing"
        } else {
            "paused"
        };
        Line::raw(format!(
            "{state}  [space] play/pause  [h/l] prev/next  [ctrl-h/l] -/+10s"
        ))
        .centered()
        .render(control_area, buf);
    }

    /// Forwards mouse activity to the seeker. A drag only starts on the bar but
    /// moves and releases are delivered wherever they land.
    pub fn pointer(&self, player: &Player, pointer: Pointer) {
        let Some(area) = self.seeker_area.get() else {
            return;
        };

        let input = match pointer {
            Pointer::Down { column, row } => {
                if !area.contains(Position::new(column, row)) {
                    return;
                }
                Input::PointerDown { x: column.into() }
            }
            Pointer::Drag { column, .. } => Input::PointerMove { x: column.into() },
            Pointer::Up { column, .. } => Input::PointerUp { x: column.into() },
        };

        for seeker in player.ui("seeker") {
            seeker.dispatch(input);
        }
    }
}
