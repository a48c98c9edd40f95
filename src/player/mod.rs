//! Player module for vidlist
//!
//! This module defines the contract between the transport controller and
//! the playback engine that does the actual decoding and rendering. The
//! engine receives fire-and-forget commands and reports back through
//! [`EngineEvent`]s delivered on the controller's thread.

mod transport;

pub use transport::TransportController;

use crate::playlist::MediaReference;

/// Playback engine trait defining the commands and queries the controller needs
///
/// Commands never block and never fail synchronously; an engine reports
/// problems later through [`EngineEvent::Error`].
pub trait PlaybackEngine {
    /// Load a media item, replacing whatever is loaded
    ///
    /// # Arguments
    ///
    /// * `media` - Locator of the item to load
    fn load(&mut self, media: &MediaReference);

    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Stop playback and unload the current item
    fn stop(&mut self);

    /// Seek to an absolute position
    ///
    /// # Arguments
    ///
    /// * `position_ms` - Target position in milliseconds
    fn seek(&mut self, position_ms: u64);

    /// Set output volume
    ///
    /// # Arguments
    ///
    /// * `fraction` - Volume level (0.0 to 1.0)
    fn set_volume(&mut self, fraction: f32);

    /// Current position in milliseconds
    fn current_position(&self) -> u64;

    /// Duration of the loaded item in milliseconds
    fn current_duration(&self) -> u64;

    /// Engine-reported playback state
    fn state(&self) -> PlaybackState;
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing playing; no item loaded or playback stopped
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Playback paused
    Paused,
}

/// Asynchronous notification from the playback engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Playback state changed
    StateChanged(PlaybackState),

    /// Duration of the loaded item became known
    DurationChanged(u64),

    /// Position tick
    PositionChanged(u64),

    /// The loaded item played to its end
    EndOfMedia,

    /// Error occurred
    Error(String),
}

impl EngineEvent {
    /// Deliver this event to the matching listener method
    pub fn dispatch(self, listener: &mut dyn EngineListener) {
        match self {
            EngineEvent::StateChanged(state) => listener.on_state_changed(state),
            EngineEvent::DurationChanged(ms) => listener.on_duration_changed(ms),
            EngineEvent::PositionChanged(ms) => listener.on_position_changed(ms),
            EngineEvent::EndOfMedia => listener.on_end_of_media(),
            EngineEvent::Error(message) => listener.on_error(message),
        }
    }
}

/// Receiver of engine events, one method per event type
pub trait EngineListener {
    fn on_state_changed(&mut self, state: PlaybackState);

    fn on_duration_changed(&mut self, duration_ms: u64);

    fn on_position_changed(&mut self, position_ms: u64);

    fn on_end_of_media(&mut self);

    fn on_error(&mut self, message: String);
}
