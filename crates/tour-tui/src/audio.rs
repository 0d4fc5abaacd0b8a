//! Audio engine — a dedicated thread that owns the rodio output stream.
//!
//! The stream and its sinks are not `Send`, so all playback lives on one
//! std thread. Commands come in over a std channel; progress, start, finish
//! and failure events go back to the app over a tokio channel (blocking
//! sends, the thread has no runtime). Every command that (re)loads a track
//! carries the session's generation token and the engine echoes it back in
//! every event, so the app can discard output from superseded loads.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use lofty::prelude::*;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tour_core::session::PlaybackEvent;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug)]
pub enum AudioCommand {
    Load {
        path: PathBuf,
        start_at: Option<Duration>,
        paused: bool,
        speed: f32,
        generation: u64,
    },
    Pause,
    Resume,
    Seek(Duration),
    SetSpeed(f32),
    Shutdown,
}

#[derive(Debug, Error)]
enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}

/// Handle held by the app. Dropping it shuts the engine down.
pub struct AudioEngine {
    cmd_tx: Sender<AudioCommand>,
}

impl AudioEngine {
    /// Spawn the engine thread. Fails when no output device can be opened.
    pub fn spawn(event_tx: mpsc::Sender<PlaybackEvent>) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = std::sync::mpsc::channel();
        let (ready_tx, ready_rx) = std::sync::mpsc::channel();

        std::thread::Builder::new()
            .name("audio-engine".into())
            .spawn(move || {
                let stream = match OutputStreamBuilder::from_default_device()
                    .and_then(|b| b.open_stream_or_fallback())
                {
                    Ok(stream) => {
                        let _ = ready_tx.send(Ok(()));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(anyhow::anyhow!("audio device: {e}")));
                        return;
                    }
                };
                engine_loop(stream, cmd_rx, event_tx);
            })?;

        ready_rx.recv()??;
        Ok(Self { cmd_tx })
    }

    pub fn send(&self, cmd: AudioCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("audio engine is gone, command dropped");
        }
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(AudioCommand::Shutdown);
    }
}

/// A loaded track: the sink plus the bookkeeping needed to report position.
struct Track {
    sink: Sink,
    path: PathBuf,
    generation: u64,
    duration: Duration,
    /// Offset of the appended source; rodio reports position from there.
    seek_base: Duration,
    speed: f32,
    paused: bool,
    finished: bool,
}

impl Track {
    fn position(&self) -> Duration {
        self.seek_base + self.sink.get_pos()
    }
}

fn engine_loop(
    stream: OutputStream,
    cmd_rx: Receiver<AudioCommand>,
    event_tx: mpsc::Sender<PlaybackEvent>,
) {
    info!("audio engine started");
    let mut current: Option<Track> = None;

    loop {
        match cmd_rx.recv_timeout(PROGRESS_INTERVAL) {
            Ok(AudioCommand::Load { path, start_at, paused, speed, generation }) => {
                match load_track(&stream, &path, start_at, paused, speed, generation) {
                    Ok(track) => {
                        debug!(
                            "loaded {} ({}s, gen {generation})",
                            path.display(),
                            track.duration.as_secs()
                        );
                        let event = PlaybackEvent::Started {
                            generation,
                            duration: track.duration,
                        };
                        current = Some(track);
                        if event_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("load failed: {e:#}");
                        current = None;
                        let event = PlaybackEvent::Failed {
                            generation,
                            message: e.to_string(),
                        };
                        if event_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                }
            }
            Ok(AudioCommand::Pause) => {
                if let Some(track) = current.as_mut() {
                    track.sink.pause();
                    track.paused = true;
                }
            }
            Ok(AudioCommand::Resume) => {
                if let Some(track) = current.as_mut() {
                    // Resuming a track that ran to completion replays it.
                    if track.finished || track.sink.empty() {
                        replay(&stream, track);
                    }
                    track.sink.play();
                    track.paused = false;
                }
            }
            Ok(AudioCommand::Seek(pos)) => {
                if let Some(track) = current.as_mut() {
                    seek(&stream, track, pos);
                }
            }
            Ok(AudioCommand::SetSpeed(speed)) => {
                if let Some(track) = current.as_mut() {
                    track.speed = speed;
                    track.sink.set_speed(speed);
                }
            }
            Ok(AudioCommand::Shutdown) => break,
            Err(RecvTimeoutError::Timeout) => {
                let Some(track) = current.as_mut() else {
                    continue;
                };
                if track.finished || track.paused {
                    continue;
                }
                if track.sink.empty() {
                    track.finished = true;
                    let event = PlaybackEvent::Finished {
                        generation: track.generation,
                    };
                    if event_tx.blocking_send(event).is_err() {
                        break;
                    }
                } else {
                    let event = PlaybackEvent::Progress {
                        generation: track.generation,
                        position: track.position(),
                    };
                    if event_tx.blocking_send(event).is_err() {
                        break;
                    }
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    info!("audio engine stopped");
}

fn load_track(
    stream: &OutputStream,
    path: &Path,
    start_at: Option<Duration>,
    paused: bool,
    speed: f32,
    generation: u64,
) -> Result<Track, LoadError> {
    let duration = probe_duration(path).unwrap_or(Duration::ZERO);
    let start_at = start_at.unwrap_or(Duration::ZERO).min(duration);

    let sink = build_sink(stream, path, start_at, speed)?;
    if paused {
        sink.pause();
    }

    Ok(Track {
        sink,
        path: path.to_path_buf(),
        generation,
        duration,
        seek_base: start_at,
        speed,
        paused,
        finished: false,
    })
}

/// Open, decode and append the file from `start_at`. Seeking happens on the
/// source before it reaches the sink; `get_pos` then counts from zero and the
/// caller keeps `start_at` as the seek base.
fn build_sink(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    speed: f32,
) -> Result<Sink, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut source =
        Decoder::new(BufReader::new(file)).map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    if !start_at.is_zero() {
        if let Err(e) = source.try_seek(start_at) {
            warn!("seek to {start_at:?} failed, playing from start: {e}");
        }
    }
    let sink = Sink::connect_new(stream.mixer());
    sink.set_speed(speed);
    sink.append(source);
    Ok(sink)
}

/// Seek by rebuilding the sink; decoders cannot seek a source that is already
/// appended.
fn seek(stream: &OutputStream, track: &mut Track, pos: Duration) {
    let pos = pos.min(track.duration);
    track.sink.stop();
    match build_sink(stream, &track.path, pos, track.speed) {
        Ok(sink) => {
            if track.paused {
                sink.pause();
            }
            track.sink = sink;
            track.seek_base = pos;
            track.finished = false;
        }
        Err(e) => warn!("seek rebuild failed: {e:#}"),
    }
}

fn replay(stream: &OutputStream, track: &mut Track) {
    seek(stream, track, Duration::ZERO);
}

/// Track length via lofty's format probe.
fn probe_duration(path: &Path) -> Option<Duration> {
    let tagged = Probe::open(path).ok()?.read().ok()?;
    Some(tagged.properties().duration())
}
