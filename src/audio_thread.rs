use std::cell::{Cell, RefCell};
use std::fmt;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use color_eyre::Result;
use crossbeam_channel::{Receiver, Sender};
use mood_player::{Emitter, MediaElement, MediaEvent};
use rodio::Source;
use rodio::source::SeekError;
use tracing::{debug, warn};

use crate::event::{AudioMessage, Command, Event};

pub struct AudioThread {
    command_rx: Receiver<Command>,
    event_tx: Sender<Event>,
}

impl AudioThread {
    pub fn new(command_rx: Receiver<Command>, event_tx: Sender<Event>) -> AudioThread {
        AudioThread {
            command_rx,
            event_tx,
        }
    }

    pub fn run(self) -> Result<()> {
        _ = std::thread::spawn(move || -> Result<()> {
            let mut stream_handle = rodio::OutputStreamBuilder::open_default_stream()?;
            stream_handle.log_on_drop(false);
            let sink = rodio::Sink::connect_new(stream_handle.mixer());
            sink.pause();

            loop {
                let reply = match self.command_rx.recv()? {
                    Command::Load(path) => match self.decode(&path) {
                        Ok(source) => {
                            let duration = source.total_duration();
                            sink.append(source);
                            AudioMessage::Loaded { duration }
                        }
                        Err(err) => AudioMessage::Failed(format!("{}: {err}", path.display())),
                    },
                    Command::Clear => {
                        sink.clear();
                        AudioMessage::Paused
                    }
                    Command::Play => {
                        sink.play();
                        AudioMessage::Played
                    }
                    Command::Pause => {
                        sink.pause();
                        AudioMessage::Paused
                    }
                    Command::Seek(pos) => {
                        if let Err(err) = sink.try_seek(pos) {
                            warn!(%err, "seek failed");
                        }
                        AudioMessage::Position(sink.get_pos())
                    }
                    Command::SendState => AudioMessage::Position(sink.get_pos()),
                };

                self.event_tx.send(Event::Audio(reply))?;
            }
        });

        Ok(())
    }

    fn decode(&self, path: &Path) -> Result<Reporting<rodio::Decoder<BufReader<std::fs::File>>>> {
        let file = std::fs::File::open(path)?;
        Ok(Reporting {
            source: rodio::Decoder::new(BufReader::new(file))?,
            event_tx: self.event_tx.clone(),
            ended: false,
        })
    }
}

/// Sends [`AudioMessage::EndOfTrack`] the first time the wrapped source runs dry.
/// Seeking re-arms it.
struct Reporting<S> {
    source: S,
    event_tx: Sender<Event>,
    ended: bool,
}

impl<S: Source> Iterator for Reporting<S> {
    type Item = S::Item;

    fn next(&mut self) -> Option<S::Item> {
        match self.source.next() {
            Some(sample) => Some(sample),
            None if self.ended => None,
            None => {
                self.ended = true;
                _ = self.event_tx.send(Event::Audio(AudioMessage::EndOfTrack));
                None
            }
        }
    }
}

impl<S: Source> Source for Reporting<S> {
    fn current_span_len(&self) -> Option<usize> {
        self.source.current_span_len()
    }

    fn channels(&self) -> rodio::ChannelCount {
        self.source.channels()
    }

    fn sample_rate(&self) -> rodio::SampleRate {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.source.total_duration()
    }

    fn try_seek(&mut self, pos: Duration) -> std::result::Result<(), SeekError> {
        self.source.try_seek(pos)?;
        self.ended = false;
        Ok(())
    }
}

/// The main-thread side of the audio thread. State is whatever the thread last
/// reported; requests go out as [`Command`]s.
pub struct RodioMedia {
    command_tx: Sender<Command>,
    paused: Cell<bool>,
    duration: Cell<f64>,
    current_time: Cell<f64>,
    sources: RefCell<Vec<Option<String>>>,
    events: Emitter<MediaEvent>,
}

impl RodioMedia {
    pub fn new(command_tx: Sender<Command>) -> Self {
        RodioMedia {
            command_tx,
            paused: Cell::new(true),
            duration: Cell::new(f64::NAN),
            current_time: Cell::new(0.0),
            sources: RefCell::new(vec![]),
            events: Emitter::new(),
        }
    }

    pub fn request_state(&self) {
        if !self.paused.get() {
            self.send(Command::SendState);
        }
    }

    pub fn handle(&self, message: AudioMessage) {
        match message {
            AudioMessage::Loaded { duration } => {
                self.duration
                    .set(duration.map_or(f64::NAN, |d| d.as_secs_f64()));
                self.events.emit(&MediaEvent::DurationChange);
                self.events.emit(&MediaEvent::LoadedData);
                self.events.emit(&MediaEvent::CanPlay);
            }
            AudioMessage::Position(pos) => {
                self.current_time.set(pos.as_secs_f64());
                self.events.emit(&MediaEvent::TimeUpdate);
            }
            AudioMessage::Played => self.set_paused(false),
            AudioMessage::Paused => self.set_paused(true),
            AudioMessage::EndOfTrack => {
                if self.duration.get().is_finite() {
                    self.current_time.set(self.duration.get());
                    self.events.emit(&MediaEvent::TimeUpdate);
                }
                self.set_paused(true);
            }
            AudioMessage::Failed(err) => warn!(%err, "audio source failed"),
        }
    }

    fn set_paused(&self, paused: bool) {
        if self.paused.replace(paused) == paused {
            return;
        }
        let event = if paused {
            MediaEvent::Pause
        } else {
            MediaEvent::Play
        };
        self.events.emit(&event);
    }

    fn send(&self, command: Command) {
        if self.command_tx.send(command).is_err() {
            warn!("audio thread is gone");
        }
    }
}

impl MediaElement for RodioMedia {
    fn play(&self) {
        self.send(Command::Play);
    }

    fn pause(&self) {
        self.send(Command::Pause);
    }

    fn paused(&self) -> bool {
        self.paused.get()
    }

    fn duration(&self) -> f64 {
        self.duration.get()
    }

    fn current_time(&self) -> f64 {
        self.current_time.get()
    }

    fn set_current_time(&self, seconds: f64) {
        let duration = self.duration.get();
        let seconds = if duration.is_finite() {
            seconds.clamp(0.0, duration)
        } else {
            seconds.max(0.0)
        };

        match Duration::try_from_secs_f64(seconds) {
            Ok(pos) => self.send(Command::Seek(pos)),
            Err(err) => warn!(%err, seconds, "seek target out of range"),
        }
    }

    fn append_source(&self, url: Option<String>) {
        let first = {
            let mut sources = self.sources.borrow_mut();
            sources.push(url.clone());
            sources.len() == 1
        };

        // Only the first source is ever selected.
        match url {
            Some(url) if first => {
                debug!(%url, "loading source");
                self.send(Command::Load(url.into()));
            }
            _ => {}
        }
    }

    fn clear_sources(&self) {
        self.sources.borrow_mut().clear();
        self.duration.set(f64::NAN);
        self.current_time.set(0.0);
        self.send(Command::Clear);
        self.events.emit(&MediaEvent::DurationChange);
        self.set_paused(true);
    }

    fn sources(&self) -> Vec<Option<String>> {
        self.sources.borrow().clone()
    }

    fn events(&self) -> &Emitter<MediaEvent> {
        &self.events
    }
}

impl fmt::Debug for RodioMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RodioMedia")
            .field("paused", &self.paused.get())
            .field("duration", &self.duration.get())
            .field("current_time", &self.current_time.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn replies_drive_media_events() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let media = RodioMedia::new(tx);
        let seen = Rc::new(RefCell::new(vec![]));
        let sink = seen.clone();
        media.events().subscribe(move |e| sink.borrow_mut().push(*e));

        media.append_source(Some("a.mp3".to_string()));
        media.append_source(Some("b.mp3".to_string()));
        assert!(matches!(rx.try_recv(), Ok(Command::Load(p)) if p == Path::new("a.mp3")));
        assert!(rx.try_recv().is_err());

        media.handle(AudioMessage::Loaded {
            duration: Some(Duration::from_secs(100)),
        });
        media.handle(AudioMessage::Played);
        media.handle(AudioMessage::Played);
        assert_eq!(media.duration(), 100.0);
        assert!(!media.paused());
        assert_eq!(
            *seen.borrow(),
            vec![
                MediaEvent::DurationChange,
                MediaEvent::LoadedData,
                MediaEvent::CanPlay,
                MediaEvent::Play,
            ]
        );
    }

    #[test]
    fn seeks_are_clamped_to_the_track() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let media = RodioMedia::new(tx);

        media.set_current_time(1e300);
        media.set_current_time(f64::INFINITY);
        assert!(rx.try_recv().is_err());

        media.handle(AudioMessage::Loaded {
            duration: Some(Duration::from_secs(100)),
        });
        media.set_current_time(f64::INFINITY);
        assert!(matches!(rx.try_recv(), Ok(Command::Seek(pos)) if pos == Duration::from_secs(100)));
        media.set_current_time(-5.0);
        assert!(matches!(rx.try_recv(), Ok(Command::Seek(pos)) if pos.is_zero()));
    }

    #[test]
    fn end_of_track_is_reported_once() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut source = Reporting {
            source: rodio::buffer::SamplesBuffer::new(1, 44_100, vec![0.0, 0.5]),
            event_tx: tx,
            ended: false,
        };

        assert_eq!(source.by_ref().count(), 2);
        assert!(source.next().is_none());
        assert!(matches!(
            rx.try_recv(),
            Ok(Event::Audio(AudioMessage::EndOfTrack))
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn end_of_track_pauses() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let media = RodioMedia::new(tx);
        media.handle(AudioMessage::Loaded {
            duration: Some(Duration::from_secs(30)),
        });
        media.handle(AudioMessage::Played);
        media.handle(AudioMessage::EndOfTrack);

        assert!(media.paused());
        assert_eq!(media.current_time(), 30.0);
    }
}
