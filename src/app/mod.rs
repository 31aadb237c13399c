use std::rc::Rc;

use color_eyre::Result;
use crossbeam_channel::Receiver;
use mood_player::container::OPTIONS_ATTR;
use mood_player::{
    ControlHandle, Container, Context, Element, MediaElement, Player, Song, SourceMode, io,
};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tracing::{info, warn};

use crate::components::{Component, ComponentCommand, PlayerControlsComponent, TracklistComponent};
use crate::config::Config;
use crate::engine::Engine;
use crate::event::{AudioMessage, EventState, Key, Pointer};

pub const SEEK_STEP: i64 = 10;

pub struct App {
    context: Rc<Context>,
    player: Player,
    engine: Engine,

    tracklist: TracklistComponent,
    player_controls: PlayerControlsComponent,

    widget_cmd_rx: Receiver<ComponentCommand>,

    pub config: Config,
}

impl App {
    pub fn new(engine: Engine, config: Config) -> Result<Self> {
        let context = Rc::new(Context::new());
        context.set_exclusive(config.exclusive);
        context.set_loader(io::file_loader());

        let songs = load_library(&config)?;
        let len = songs.len();
        {
            let mut playlist = context.playlist_mut();
            for song in songs {
                playlist.add_song(song);
            }
            playlist.template(song_line);
        }
        context.enable_playlist();

        let container = Rc::new(build_container(engine.media(), &config));
        let player = Player::new(&context, container);
        player.init()?;

        // The playlist hook only picks the first song; fetch it unless told not to.
        let options = player.options();
        if options.autoload && player.song().is_some() {
            player.load(None, options.autoplay)?;
        }

        let (app_cmd_tx, app_cmd_rx) = crossbeam_channel::bounded(256);

        Ok(App {
            tracklist: TracklistComponent::new(len, config.key_config.clone(), app_cmd_tx),
            player_controls: PlayerControlsComponent::new(),
            context,
            player,
            engine,
            widget_cmd_rx: app_cmd_rx,
            config,
        })
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        let [main_area, controls_area] = Layout::new(
            Direction::Vertical,
            [Constraint::Fill(1), Constraint::Length(5)],
        )
        .areas(area);

        self.player_controls.render(controls_area, buf, &self.player);
        self.tracklist.render(main_area, buf, &self.player);
    }

    pub fn event(&mut self, key: Key) -> Result<EventState> {
        let res = self.component_event(key);
        self.drain_commands()?;
        res
    }

    pub fn pointer(&mut self, pointer: Pointer) {
        self.player_controls.pointer(&self.player, pointer);
    }

    pub fn tick(&mut self) {
        self.engine.tick(self.config.tick_rate);
    }

    pub fn audio(&mut self, audio_message: AudioMessage) {
        self.engine.audio(audio_message);
    }

    fn component_event(&mut self, key: Key) -> Result<EventState> {
        if self.tracklist.event(key)?.is_consumed() {
            return Ok(EventState::Consumed);
        }

        let keys = &self.config.key_config;
        let control = if key == keys.pause {
            self.control("play-toggle", None)
        } else if key == keys.skip_to_next_audio {
            self.control("next", None)
        } else if key == keys.skip_to_prev_audio {
            self.control("prev", None)
        } else if key == keys.seek_forward {
            self.control("seeker-jump", Some(SEEK_STEP))
        } else if key == keys.seek_backward {
            self.control("seeker-jump", Some(-SEEK_STEP))
        } else {
            return Ok(EventState::NotConsumed);
        };

        if let Some(control) = control {
            control.click();
        }
        Ok(EventState::Consumed)
    }

    /// First bound element of `name`, or the one whose data value is `value`.
    fn control(&self, name: &str, value: Option<i64>) -> Option<ControlHandle> {
        self.player.ui(name).into_iter().find(|ui| match value {
            Some(value) => ui.get_data(name) == Some(value.to_string().as_str()),
            None => true,
        })
    }

    fn drain_commands(&mut self) -> Result<()> {
        while let Ok(cmd) = self.widget_cmd_rx.try_recv() {
            match cmd {
                ComponentCommand::TracklistComponent(cmd) => {
                    use crate::components::tracklist::Command;
                    match cmd {
                        Command::PlayTrack { index } => self.play_track(index)?,
                    }
                }
            }
        }

        Ok(())
    }

    fn play_track(&mut self, index: usize) -> Result<()> {
        let url = {
            let mut playlist = self.context.playlist_mut();
            let Some(url) = playlist.songs().get(index).map(|song| song.url().to_string()) else {
                return Ok(());
            };
            // set_position refuses to leave the last song, so step there instead.
            while playlist.position() > index {
                playlist.prev();
            }
            while playlist.position() < index {
                playlist.next();
            }
            url
        };

        if let Err(err) = self.player.get_song(&url) {
            warn!(%err, %url, "could not read song, playing anyway");
        }
        self.player
            .load_with_mode(Some(&url), true, SourceMode::Replace)?;
        Ok(())
    }
}

fn load_library(config: &Config) -> Result<Vec<Song>> {
    if !config.audio_dir.is_dir() {
        warn!(dir = %config.audio_dir.display(), "audio directory not found");
        return Ok(vec![]);
    }

    let paths = io::get_files(&config.audio_dir, &["mp3", "flac", "wav", "ogg"])?;
    info!(count = paths.len(), dir = %config.audio_dir.display(), "library scanned");

    Ok(paths
        .iter()
        .map(|path| {
            io::read_song(path).unwrap_or_else(|err| {
                warn!(%err, path = %path.display(), "unreadable tag");
                Song::new(path.to_string_lossy())
            })
        })
        .collect())
}

fn song_line(song: &Song) -> String {
    let title = song.text("title").unwrap_or_else(|| song.url().to_string());
    match song.text("artist") {
        Some(artist) => format!("{artist} - {title}"),
        None => title,
    }
}

/// The player markup: the media slot and one element per control the UI draws.
fn build_container(media: Rc<dyn MediaElement>, config: &Config) -> Container {
    Container::new()
        .attr(OPTIONS_ATTR, config.options.clone())
        .child(Element::audio(media))
        .child(Element::new("button").data("play-toggle", ""))
        .child(Element::new("span").data("time-current", ""))
        .child(Element::new("span").data("time-total", ""))
        .child(Element::new("div").data("seeker", ""))
        .child(Element::new("div").data("seeker-fill", ""))
        .child(Element::new("button").data("seeker-jump", (-SEEK_STEP).to_string()))
        .child(Element::new("button").data("seeker-jump", SEEK_STEP.to_string()))
        .child(Element::new("span").data("meta", "title"))
        .child(Element::new("span").data("meta", "artist"))
        .child(Element::new("span").data("meta", "album"))
        .child(Element::new("ul").data("playlist", ""))
        .child(Element::new("button").data("next", ""))
        .child(Element::new("button").data("prev", ""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[allow(irrefutable_let_patterns)]
    fn app(dir: PathBuf) -> (App, Rc<mood_player::SimulatedMedia>) {
        let engine = Engine::simulated();
        let Engine::Simulated(media) = &engine else {
            unreachable!()
        };
        let media = media.clone();
        (App::new(engine, Config::new(dir)).unwrap(), media)
    }

    fn library(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"not really audio").unwrap();
        }
        dir
    }

    #[test]
    fn first_track_is_loaded_at_startup() {
        let dir = library(&["a.mp3", "b.mp3"]);
        let (app, media) = app(dir.path().to_path_buf());

        assert_eq!(app.player.song().unwrap().text("title").as_deref(), Some("a"));
        assert_eq!(media.sources().len(), 1);
        assert!(media.paused());
        assert_eq!(
            app.control("playlist", None).unwrap().items(),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn keys_click_the_matching_controls() {
        let dir = library(&["a.mp3", "b.mp3"]);
        let (mut app, media) = app(dir.path().to_path_buf());
        let keys = app.config.key_config.clone();

        assert!(app.event(keys.pause).unwrap().is_consumed());
        assert!(!media.paused());

        app.event(keys.seek_forward).unwrap();
        assert_eq!(media.current_time(), 10.0);
        app.event(keys.seek_backward).unwrap();
        assert_eq!(media.current_time(), 0.0);

        app.event(keys.skip_to_next_audio).unwrap();
        assert_eq!(app.player.song().unwrap().text("title").as_deref(), Some("b"));
        assert!(!media.paused());

        assert!(!app.event(keys.quit).unwrap().is_consumed());
    }

    #[test]
    fn ticks_move_the_simulated_clock() {
        let dir = library(&["a.mp3"]);
        let (mut app, media) = app(dir.path().to_path_buf());
        media.play();

        app.tick();
        assert_eq!(media.current_time(), app.config.tick_rate.as_secs_f64());
        assert_eq!(
            app.control("time-current", None).unwrap().text().as_deref(),
            Some("0:00")
        );
    }

    #[test]
    fn enter_plays_the_selected_track() {
        let dir = library(&["a.mp3", "b.mp3", "c.mp3"]);
        let (mut app, media) = app(dir.path().to_path_buf());
        let keys = app.config.key_config.clone();

        app.event(keys.scroll_down).unwrap();
        app.event(keys.scroll_down).unwrap();
        app.event(keys.play_audio).unwrap();

        assert_eq!(app.player.song().unwrap().text("title").as_deref(), Some("c"));
        let sources = media.sources();
        assert_eq!(sources.len(), 1);
        assert!(sources[0].as_deref().unwrap().ends_with("c.mp3"));
        assert!(!media.paused());
    }

    #[test]
    fn selecting_an_earlier_track_moves_the_cursor_off_the_last_song() {
        let dir = library(&["a.mp3", "b.mp3", "c.mp3"]);
        let (mut app, media) = app(dir.path().to_path_buf());
        let keys = app.config.key_config.clone();

        app.event(keys.skip_to_next_audio).unwrap();
        app.event(keys.skip_to_next_audio).unwrap();
        assert_eq!(app.context.playlist().position(), 2);

        // The tracklist selection is still on the first row.
        app.event(keys.play_audio).unwrap();
        assert_eq!(app.context.playlist().position(), 0);
        assert_eq!(app.player.song().unwrap().text("title").as_deref(), Some("a"));
        assert!(media.sources()[0].as_deref().unwrap().ends_with("a.mp3"));

        app.event(keys.skip_to_next_audio).unwrap();
        assert_eq!(app.context.playlist().position(), 1);
        assert_eq!(app.player.song().unwrap().text("title").as_deref(), Some("b"));

        app.event(keys.skip_to_prev_audio).unwrap();
        assert_eq!(app.context.playlist().position(), 0);
        assert!(media.sources()[0].as_deref().unwrap().ends_with("a.mp3"));
    }

    #[test]
    fn a_missing_library_starts_empty() {
        let dir = TempDir::new().unwrap();
        let (app, media) = app(dir.path().join("nowhere"));

        assert!(app.player.song().is_none());
        assert!(media.sources().is_empty());
        assert!(app.player.is_initialized());
    }
}
