//! vidlist - a video playlist player
//!
//! The library holds everything except process startup: the playlist
//! model, the transport controller that drives a playback engine, the
//! mpv engine adapter, and the terminal front end.

pub mod console;
pub mod engine;
pub mod media;
pub mod player;
pub mod playlist;
pub mod utils;

pub use player::{EngineEvent, EngineListener, PlaybackEngine, PlaybackState, TransportController};
pub use playlist::{IndexPicker, MediaReference, PlaylistModel, RandomPicker, SequencePicker};
pub use utils::error::{PlayerError, Result};
