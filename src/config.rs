use std::path::PathBuf;
use std::time::Duration;

use crate::event::Key;

pub const AUDIO_DIR_VAR: &str = "MOOD_AUDIO_DIR";
pub const OPTIONS_VAR: &str = "MOOD_OPTIONS";
pub const EXCLUSIVE_VAR: &str = "MOOD_EXCLUSIVE";

pub struct Config {
    pub audio_dir: PathBuf,
    /// Value of the player's `data-options` attribute.
    pub options: String,
    pub exclusive: bool,
    pub tick_rate: Duration,
    pub key_config: KeyConfig,
}

impl Config {
    pub fn new(audio_dir: PathBuf) -> Self {
        Config {
            audio_dir,
            ..Config::default()
        }
    }

    pub fn from_env() -> Self {
        let audio_dir = std::env::var_os(AUDIO_DIR_VAR)
            .map(PathBuf::from)
            .or_else(dirs::audio_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut config = Config::new(audio_dir);
        if let Ok(options) = std::env::var(OPTIONS_VAR) {
            config.options = options;
        }
        if let Ok(exclusive) = std::env::var(EXCLUSIVE_VAR) {
            config.exclusive = !matches!(exclusive.as_str(), "" | "0" | "false");
        }

        config
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            audio_dir: PathBuf::from("."),
            options: "autoload".to_string(),
            exclusive: true,
            tick_rate: Duration::from_millis(250),
            key_config: KeyConfig::default(),
        }
    }
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct KeyConfig {
    pub quit: Key,

    pub scroll_up: Key,
    pub scroll_down: Key,

    pub play_audio: Key,

    pub skip_to_next_audio: Key,
    pub skip_to_prev_audio: Key,
    pub seek_forward: Key,
    pub seek_backward: Key,

    pub pause: Key,
}

impl Default for KeyConfig {
    fn default() -> Self {
        KeyConfig {
            quit: Key::Esc,
            scroll_up: Key::Char('k'),
            scroll_down: Key::Char('j'),
            play_audio: Key::Enter,
            skip_to_next_audio: Key::Char('l'),
            skip_to_prev_audio: Key::Char('h'),
            seek_forward: Key::Ctrl('l'),
            seek_backward: Key::Ctrl('h'),
            pause: Key::Char(' '),
        }
    }
}
