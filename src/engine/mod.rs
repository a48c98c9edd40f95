//! Playback engine implementations for vidlist
//!
//! Decoding, rendering and audio output are delegated to an external mpv
//! process. This module speaks mpv's JSON IPC protocol and adapts it to
//! the [`PlaybackEngine`](crate::player::PlaybackEngine) trait.

pub mod ipc;
#[cfg(unix)]
mod mpv;

#[cfg(unix)]
pub use mpv::MpvEngine;

use crate::player::EngineEvent;
use tokio::sync::mpsc::UnboundedSender;

/// Channel end engines deliver their events on
pub type EventSender = UnboundedSender<EngineEvent>;
