use color_eyre::Result;
use crossbeam_channel::Sender;
use mood_player::Player;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph, Widget};

use super::utils::VerticalScroll;
use super::{Component, ComponentCommand};
use crate::config::KeyConfig;
use crate::event::{EventState, Key};

pub struct TracklistComponent {
    len: usize,
    scroll: VerticalScroll,
    key_config: KeyConfig,
    app_cmd_tx: Sender<ComponentCommand>,
}

pub enum Command {
    PlayTrack { index: usize },
}

impl TracklistComponent {
    pub fn new(len: usize, key_config: KeyConfig, app_cmd_tx: Sender<ComponentCommand>) -> Self {
        Self {
            len,
            scroll: VerticalScroll::new(),
            key_config,
            app_cmd_tx,
        }
    }

    fn play_selected(&mut self) -> Result<()> {
        if self.len == 0 {
            return Ok(());
        }
        self.send_command(Command::PlayTrack {
            index: self.scroll.pos(),
        })
    }

    fn send_command(&self, cmd: Command) -> Result<()> {
        self.app_cmd_tx
            .send(ComponentCommand::TracklistComponent(cmd))?;
        Ok(())
    }

    /// Draws the rendered `playlist` control, marking the cursor's song.
    pub fn render(&self, area: Rect, buf: &mut Buffer, player: &Player) {
        let area = {
            let border = Block::bordered().title(" playlist ");
            let a = border.inner(area);
            border.render(area, buf);
            a
        };

        let items = player
            .ui("playlist")
            .first()
            .map(|ui| ui.items())
            .unwrap_or_default();
        let current = player.context().playlist().position();

        self.scroll.update(area.height as usize, items.len());
        let offset = self.scroll.y_offset();

        let rows = items
            .iter()
            .enumerate()
            .skip(offset)
            .take(area.height as usize)
            .map(|(i, item)| {
                let mark = if i == current { '>' } else { ' ' };
                format!("{mark} {item}")
            })
            .collect::<Vec<String>>();

        Paragraph::new(rows.join("\n")).render(area, buf);

        if !items.is_empty() {
            let y = area.y + (self.scroll.pos() - offset) as u16;
            for x in area.x..area.x + area.width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_bg(Color::Blue);
                }
            }
        }
        if current < items.len() && (offset..offset + area.height as usize).contains(&current) {
            let y = area.y + (current - offset) as u16;
            for x in area.x..area.x + area.width {
                if let Some(cell) = buf.cell_mut((x, y)) {
                    cell.set_style(Style::new().add_modifier(Modifier::BOLD));
                }
            }
        }
    }
}

impl Component for TracklistComponent {
    fn event(&mut self, key: Key) -> Result<EventState> {
        if key == self.key_config.scroll_up {
            self.scroll.move_up();
            Ok(EventState::Consumed)
        } else if key == self.key_config.scroll_down {
            self.scroll.move_down(self.len);
            Ok(EventState::Consumed)
        } else if key == self.key_config.play_audio {
            self.play_selected()?;
            Ok(EventState::Consumed)
        } else {
            Ok(EventState::NotConsumed)
        }
    }
}
