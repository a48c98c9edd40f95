//! External mpv playback engine
//!
//! Spawns mpv in idle mode with an IPC socket, sends it commands, and
//! runs a reader thread that turns IPC traffic into engine events.

use crate::engine::ipc::{encode_command, parse_line, IpcCommand, IpcTracker, OBSERVED_PROPERTIES};
use crate::engine::EventSender;
use crate::player::{EngineEvent, PlaybackEngine, PlaybackState};
use crate::playlist::MediaReference;
use crate::utils::config::EngineConfig;
use crate::utils::error::{IntoPlayerError, PlayerError, Result};

use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Delay between attempts to connect to the IPC socket
const CONNECT_RETRY: Duration = Duration::from_millis(50);

/// Handle to the external mpv process and its IPC connection
pub struct MpvEngine {
    process: Child,
    socket_path: PathBuf,
    commands: CommandWriter<UnixStream>,
    tracker: Arc<Mutex<IpcTracker>>,
    reader: Option<JoinHandle<()>>,
}

impl MpvEngine {
    /// Spawn mpv and connect to its IPC socket
    ///
    /// # Arguments
    ///
    /// * `config` - Executable path, extra arguments and connect timeout
    /// * `events` - Channel the reader thread delivers engine events on
    pub fn spawn(config: &EngineConfig, events: EventSender) -> Result<Self> {
        let socket_path = std::env::temp_dir().join(format!("vidlist-mpv-{}.sock", std::process::id()));
        let _ = std::fs::remove_file(&socket_path);

        let mut cmd = Command::new(&config.mpv_path);
        cmd.arg(format!("--input-ipc-server={}", socket_path.display()))
            .arg("--idle=yes")
            .arg("--force-window=yes")
            .arg("--keep-open=no")
            .arg("--no-terminal");

        if config.fullscreen {
            cmd.arg("--fs=yes");
        }
        cmd.args(&config.extra_args);
        cmd.stdin(Stdio::null()).stdout(Stdio::null());

        info!("Spawning {} with IPC socket {:?}", config.mpv_path, socket_path);
        let mut process = cmd
            .spawn()
            .engine_err(&format!("Failed to start '{}'", config.mpv_path))?;

        let timeout = Duration::from_millis(config.connect_timeout_ms);
        let stream = match connect(&mut process, &socket_path, timeout) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = process.kill();
                let _ = process.wait();
                return Err(e);
            }
        };

        let reader_stream = stream.try_clone()?;
        let tracker = Arc::new(Mutex::new(IpcTracker::default()));

        let reader = {
            let tracker = Arc::clone(&tracker);
            let events = events.clone();
            thread::Builder::new()
                .name("mpv-ipc".to_string())
                .spawn(move || read_loop(BufReader::new(reader_stream), tracker, events))?
        };

        let mut engine = Self {
            process,
            socket_path,
            commands: CommandWriter::new(stream, events),
            tracker,
            reader: Some(reader),
        };

        for (id, property) in OBSERVED_PROPERTIES {
            engine.commands.send(IpcCommand::ObserveProperty(id, property));
        }

        Ok(engine)
    }
}

/// Numbers and writes IPC commands; write failures become engine error events
struct CommandWriter<W: Write> {
    writer: W,
    request_id: u64,
    events: EventSender,
}

impl<W: Write> CommandWriter<W> {
    fn new(writer: W, events: EventSender) -> Self {
        Self {
            writer,
            request_id: 1,
            events,
        }
    }

    fn send(&mut self, command: IpcCommand<'_>) {
        let line = encode_command(self.request_id, &command.args());
        self.request_id += 1;
        debug!("-> mpv {}", line);

        let result = writeln!(self.writer, "{}", line).and_then(|_| self.writer.flush());
        if let Err(e) = result {
            error!("Failed to send command to mpv: {}", e);
            let _ = self
                .events
                .send(EngineEvent::Error(format!("lost connection to mpv: {}", e)));
        }
    }
}

impl PlaybackEngine for MpvEngine {
    fn load(&mut self, media: &MediaReference) {
        for command in IpcCommand::load(media.as_str()) {
            self.commands.send(command);
        }
    }

    fn play(&mut self) {
        self.commands.send(IpcCommand::SetPause(false));
    }

    fn pause(&mut self) {
        self.commands.send(IpcCommand::SetPause(true));
    }

    fn stop(&mut self) {
        self.commands.send(IpcCommand::Stop);
    }

    fn seek(&mut self, position_ms: u64) {
        self.commands.send(IpcCommand::Seek(position_ms));
    }

    fn set_volume(&mut self, fraction: f32) {
        self.commands.send(IpcCommand::SetVolume(fraction));
    }

    fn current_position(&self) -> u64 {
        self.tracker.lock().snapshot().position_ms
    }

    fn current_duration(&self) -> u64 {
        self.tracker.lock().snapshot().duration_ms
    }

    fn state(&self) -> PlaybackState {
        self.tracker.lock().snapshot().state
    }
}

impl Drop for MpvEngine {
    fn drop(&mut self) {
        self.commands.send(IpcCommand::Quit);
        let _ = self.commands.writer.shutdown(std::net::Shutdown::Both);

        // Give mpv a moment to exit on its own before killing it
        let deadline = Instant::now() + Duration::from_millis(500);
        while Instant::now() < deadline {
            match self.process.try_wait() {
                Ok(Some(_)) | Err(_) => break,
                Ok(None) => thread::sleep(CONNECT_RETRY),
            }
        }
        let _ = self.process.kill();
        let _ = self.process.wait();

        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// Poll the socket until mpv has created it or the timeout runs out
fn connect(process: &mut Child, socket_path: &Path, timeout: Duration) -> Result<UnixStream> {
    let deadline = Instant::now() + timeout;

    loop {
        match UnixStream::connect(socket_path) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                if let Some(status) = process.try_wait()? {
                    return Err(PlayerError::engine_error(format!(
                        "mpv exited before opening its IPC socket ({})",
                        status
                    )));
                }
                if Instant::now() >= deadline {
                    return Err(PlayerError::Ipc(format!(
                        "Timed out connecting to {:?}: {}",
                        socket_path, e
                    )));
                }
                thread::sleep(CONNECT_RETRY);
            }
        }
    }
}

fn read_loop(reader: BufReader<UnixStream>, tracker: Arc<Mutex<IpcTracker>>, events: EventSender) {
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("IPC read failed: {}", e);
                break;
            }
        };

        match parse_line(&line) {
            Ok(message) => {
                let produced = tracker.lock().apply(message);
                for event in produced {
                    if events.send(event).is_err() {
                        return;
                    }
                }
            }
            Err(e) => debug!("Ignoring IPC line: {}", e),
        }
    }

    info!("mpv IPC connection closed");
    let _ = events.send(EngineEvent::Error("playback engine exited".to_string()));
}
