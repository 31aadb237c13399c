use std::io::stdout;

use color_eyre::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use tracing_subscriber::EnvFilter;

use crate::{app::App, config::Config, engine::Engine, event::Event, event::spawn_event_emitter};

mod app;
#[cfg(feature = "rodio")]
mod audio_thread;
mod components;
mod config;
mod engine;
mod event;

fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging()?;

    let config = Config::from_env();

    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    spawn_event_emitter(event_tx.clone(), config.tick_rate)?;
    let engine = Engine::start(event_tx)?;

    let mut app = App::new(engine, config)?;

    let mut terminal = ratatui::init();
    crossterm::execute!(stdout(), EnableMouseCapture)?;

    let res = (|| -> Result<()> {
        terminal.draw(|f| app.render(f.area(), f.buffer_mut()))?;
        loop {
            match event_rx.recv()? {
                Event::Input(key) => {
                    if !app.event(key)?.is_consumed() && key == app.config.key_config.quit {
                        break;
                    }
                }
                Event::Pointer(pointer) => {
                    app.pointer(pointer);
                }
                Event::Tick => {
                    app.tick();
                }
                Event::Audio(audio) => {
                    app.audio(audio);
                }
            }

            terminal.draw(|f| app.render(f.area(), f.buffer_mut()))?;
        }
        Ok(())
    })();

    _ = crossterm::execute!(stdout(), DisableMouseCapture);
    ratatui::restore();

    res
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("mood");
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::File::create(dir.join("mood.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
