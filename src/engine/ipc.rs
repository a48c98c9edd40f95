//! mpv JSON IPC protocol
//!
//! Every message is one JSON object per line. Commands carry a
//! `request_id` and get a reply with an `error` field; unsolicited
//! messages carry an `event` field.

use crate::player::{EngineEvent, PlaybackState};
use crate::utils::error::{IntoPlayerError, Result};
use serde_json::{json, Value};

/// Observed property ids, in registration order
pub const OBSERVED_PROPERTIES: [(u64, &str); 3] = [(1, "time-pos"), (2, "duration"), (3, "pause")];

/// A decoded IPC line
#[derive(Debug, Clone, PartialEq)]
pub enum IpcMessage {
    /// An observed property changed
    PropertyChange { name: String, data: Value },

    /// A file finished loading and is ready to play
    FileLoaded,

    /// The current file was unloaded
    EndFile { reason: String, error: Option<String> },

    /// Reply to one of our commands
    Reply { request_id: Option<u64>, error: String },

    /// Anything we do not track
    Other,
}

/// Commands sent to mpv
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IpcCommand<'a> {
    ObserveProperty(u64, &'a str),
    LoadFile(&'a str),
    SetPause(bool),
    Stop,
    /// Absolute position in milliseconds
    Seek(u64),
    /// Volume as a 0.0 - 1.0 fraction
    SetVolume(f32),
    Quit,
}

impl<'a> IpcCommand<'a> {
    /// Commands that load `path` paused, so playback starts only on `play`
    pub fn load(path: &'a str) -> [IpcCommand<'a>; 2] {
        [IpcCommand::SetPause(true), IpcCommand::LoadFile(path)]
    }

    /// Command arguments as sent on the wire
    pub fn args(&self) -> Vec<Value> {
        match *self {
            IpcCommand::ObserveProperty(id, property) => {
                vec![json!("observe_property"), json!(id), json!(property)]
            }
            IpcCommand::LoadFile(path) => vec![json!("loadfile"), json!(path), json!("replace")],
            IpcCommand::SetPause(paused) => vec![json!("set_property"), json!("pause"), json!(paused)],
            IpcCommand::Stop => vec![json!("stop")],
            IpcCommand::Seek(position_ms) => {
                vec![json!("seek"), json!(position_ms as f64 / 1000.0), json!("absolute")]
            }
            IpcCommand::SetVolume(fraction) => {
                let percent = f64::from(fraction.clamp(0.0, 1.0)) * 100.0;
                vec![json!("set_property"), json!("volume"), json!(percent)]
            }
            IpcCommand::Quit => vec![json!("quit")],
        }
    }
}

/// Serialize a command line, without the trailing newline
pub fn encode_command(request_id: u64, args: &[Value]) -> String {
    json!({
        "command": args,
        "request_id": request_id,
    })
    .to_string()
}

/// Decode one line received from mpv
pub fn parse_line(line: &str) -> Result<IpcMessage> {
    let msg: Value = serde_json::from_str(line).ipc_err("Malformed IPC line")?;

    let message = match msg["event"].as_str() {
        Some("property-change") => IpcMessage::PropertyChange {
            name: msg["name"].as_str().unwrap_or_default().to_string(),
            data: msg["data"].clone(),
        },
        Some("file-loaded") => IpcMessage::FileLoaded,
        Some("end-file") => IpcMessage::EndFile {
            reason: msg["reason"].as_str().unwrap_or_default().to_string(),
            error: msg["file_error"].as_str().map(str::to_string),
        },
        Some(_) => IpcMessage::Other,
        None => match msg["error"].as_str() {
            Some(error) => IpcMessage::Reply {
                request_id: msg["request_id"].as_u64(),
                error: error.to_string(),
            },
            None => IpcMessage::Other,
        },
    };

    Ok(message)
}

/// Values the engine answers queries with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub state: PlaybackState,
    pub position_ms: u64,
    pub duration_ms: u64,
}

/// Folds IPC messages into engine state and emits events on changes
///
/// The state is Stopped unless a file is loaded; a loaded file is Paused
/// or Playing according to mpv's `pause` property.
#[derive(Debug, Default)]
pub struct IpcTracker {
    file_loaded: bool,
    paused: bool,
    snapshot: Snapshot,
}

impl IpcTracker {
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot
    }

    /// Apply one message, returning the events it produces in order
    pub fn apply(&mut self, message: IpcMessage) -> Vec<EngineEvent> {
        let mut events = Vec::new();

        match message {
            IpcMessage::PropertyChange { name, data } => match name.as_str() {
                "time-pos" => {
                    if let Some(ms) = seconds_to_ms(&data) {
                        if ms != self.snapshot.position_ms {
                            self.snapshot.position_ms = ms;
                            events.push(EngineEvent::PositionChanged(ms));
                        }
                    }
                }
                "duration" => {
                    if let Some(ms) = seconds_to_ms(&data) {
                        if ms != self.snapshot.duration_ms {
                            self.snapshot.duration_ms = ms;
                            events.push(EngineEvent::DurationChanged(ms));
                        }
                    }
                }
                "pause" => {
                    if let Some(paused) = data.as_bool() {
                        self.paused = paused;
                        self.update_state(&mut events);
                    }
                }
                _ => {}
            },
            IpcMessage::FileLoaded => {
                self.file_loaded = true;
                self.update_state(&mut events);
            }
            IpcMessage::EndFile { reason, error } => {
                self.file_loaded = false;
                self.update_state(&mut events);
                match reason.as_str() {
                    "eof" => events.push(EngineEvent::EndOfMedia),
                    "error" => events.push(EngineEvent::Error(
                        error.unwrap_or_else(|| "playback failed".to_string()),
                    )),
                    _ => {}
                }
            }
            IpcMessage::Reply { request_id, error } => {
                if error != "success" {
                    events.push(EngineEvent::Error(match request_id {
                        Some(id) => format!("command {} failed: {}", id, error),
                        None => format!("command failed: {}", error),
                    }));
                }
            }
            IpcMessage::Other => {}
        }

        events
    }

    fn update_state(&mut self, events: &mut Vec<EngineEvent>) {
        let state = match (self.file_loaded, self.paused) {
            (false, _) => PlaybackState::Stopped,
            (true, true) => PlaybackState::Paused,
            (true, false) => PlaybackState::Playing,
        };

        if state != self.snapshot.state {
            self.snapshot.state = state;
            events.push(EngineEvent::StateChanged(state));
        }
    }
}

fn seconds_to_ms(data: &Value) -> Option<u64> {
    data.as_f64().map(|secs| (secs.max(0.0) * 1000.0).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(tracker: &mut IpcTracker, lines: &[&str]) -> Vec<EngineEvent> {
        lines
            .iter()
            .flat_map(|line| tracker.apply(parse_line(line).unwrap()))
            .collect()
    }

    #[test]
    fn test_encode_command() {
        let line = encode_command(7, &[json!("seek"), json!(12.5), json!("absolute")]);
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["request_id"], 7);
        assert_eq!(value["command"], json!(["seek", 12.5, "absolute"]));
    }

    #[test]
    fn test_load_is_paused_loadfile() {
        let args: Vec<Vec<Value>> = IpcCommand::load("/videos/a b.mp4").iter().map(IpcCommand::args).collect();
        assert_eq!(
            args,
            vec![
                vec![json!("set_property"), json!("pause"), json!(true)],
                vec![json!("loadfile"), json!("/videos/a b.mp4"), json!("replace")],
            ]
        );
    }

    #[test]
    fn test_transport_command_args() {
        assert_eq!(IpcCommand::SetPause(false).args(), vec![json!("set_property"), json!("pause"), json!(false)]);
        assert_eq!(IpcCommand::Stop.args(), vec![json!("stop")]);
        assert_eq!(IpcCommand::Seek(90_500).args(), vec![json!("seek"), json!(90.5), json!("absolute")]);
        assert_eq!(
            IpcCommand::ObserveProperty(2, "duration").args(),
            vec![json!("observe_property"), json!(2), json!("duration")]
        );
    }

    #[test]
    fn test_volume_is_scaled_to_percent() {
        assert_eq!(IpcCommand::SetVolume(0.25).args()[2], json!(25.0));
        assert_eq!(IpcCommand::SetVolume(1.5).args()[2], json!(100.0));
        assert_eq!(IpcCommand::SetVolume(-1.0).args()[2], json!(0.0));
    }

    #[test]
    fn test_parse_messages() {
        assert_eq!(
            parse_line(r#"{"event":"property-change","id":1,"name":"time-pos","data":1.5}"#).unwrap(),
            IpcMessage::PropertyChange { name: "time-pos".to_string(), data: json!(1.5) }
        );
        assert_eq!(parse_line(r#"{"event":"file-loaded"}"#).unwrap(), IpcMessage::FileLoaded);
        assert_eq!(
            parse_line(r#"{"event":"end-file","reason":"error","file_error":"unrecognized file format"}"#)
                .unwrap(),
            IpcMessage::EndFile {
                reason: "error".to_string(),
                error: Some("unrecognized file format".to_string()),
            }
        );
        assert_eq!(
            parse_line(r#"{"request_id":3,"error":"success","data":null}"#).unwrap(),
            IpcMessage::Reply { request_id: Some(3), error: "success".to_string() }
        );
        assert_eq!(parse_line(r#"{"event":"idle"}"#).unwrap(), IpcMessage::Other);
        assert!(parse_line("not json").is_err());
    }

    #[test]
    fn test_load_and_play_sequence() {
        let mut tracker = IpcTracker::default();
        let events = feed(
            &mut tracker,
            &[
                r#"{"event":"property-change","id":3,"name":"pause","data":false}"#,
                r#"{"event":"file-loaded"}"#,
                r#"{"event":"property-change","id":2,"name":"duration","data":61.25}"#,
                r#"{"event":"property-change","id":1,"name":"time-pos","data":0.0}"#,
                r#"{"event":"property-change","id":1,"name":"time-pos","data":0.5}"#,
            ],
        );

        assert_eq!(
            events,
            vec![
                EngineEvent::StateChanged(PlaybackState::Playing),
                EngineEvent::DurationChanged(61_250),
                EngineEvent::PositionChanged(500),
            ]
        );
        assert_eq!(
            tracker.snapshot(),
            Snapshot { state: PlaybackState::Playing, position_ms: 500, duration_ms: 61_250 }
        );
    }

    #[test]
    fn test_pause_only_matters_with_file_loaded() {
        let mut tracker = IpcTracker::default();
        let idle = feed(&mut tracker, &[r#"{"event":"property-change","id":3,"name":"pause","data":true}"#]);
        assert!(idle.is_empty());

        let loaded = feed(&mut tracker, &[r#"{"event":"file-loaded"}"#]);
        assert_eq!(loaded, vec![EngineEvent::StateChanged(PlaybackState::Paused)]);
    }

    #[test]
    fn test_eof_reports_stop_then_end_of_media() {
        let mut tracker = IpcTracker::default();
        feed(&mut tracker, &[r#"{"event":"file-loaded"}"#]);

        let events = feed(&mut tracker, &[r#"{"event":"end-file","reason":"eof"}"#]);
        assert_eq!(
            events,
            vec![EngineEvent::StateChanged(PlaybackState::Stopped), EngineEvent::EndOfMedia]
        );
    }

    #[test]
    fn test_user_stop_does_not_advance() {
        let mut tracker = IpcTracker::default();
        feed(&mut tracker, &[r#"{"event":"file-loaded"}"#]);

        let events = feed(&mut tracker, &[r#"{"event":"end-file","reason":"stop"}"#]);
        assert_eq!(events, vec![EngineEvent::StateChanged(PlaybackState::Stopped)]);
    }

    #[test]
    fn test_load_failure_reports_error() {
        let mut tracker = IpcTracker::default();
        let events = feed(&mut tracker, &[r#"{"event":"end-file","reason":"error"}"#]);
        assert_eq!(events, vec![EngineEvent::Error("playback failed".to_string())]);
    }

    #[test]
    fn test_failed_reply_reports_error() {
        let mut tracker = IpcTracker::default();
        let events = feed(&mut tracker, &[r#"{"request_id":9,"error":"property unavailable"}"#]);
        assert_eq!(
            events,
            vec![EngineEvent::Error("command 9 failed: property unavailable".to_string())]
        );
    }

    #[test]
    fn test_null_time_pos_is_ignored() {
        let mut tracker = IpcTracker::default();
        let events = feed(&mut tracker, &[r#"{"event":"property-change","id":1,"name":"time-pos","data":null}"#]);
        assert!(events.is_empty());
    }
}
