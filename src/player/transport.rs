//! Transport controller implementation for vidlist
//!
//! The controller owns the playlist, turns user intents (play/pause,
//! next, remove, ...) into engine commands, and mirrors engine events
//! into the state the presentation layer renders.

use crate::playlist::{IndexPicker, MediaReference, PlaylistModel};
use crate::player::{EngineEvent, EngineListener, PlaybackEngine, PlaybackState};
use crate::utils::error::{PlayerError, Result};
use crate::utils::format_time;

use log::{debug, info, warn};

/// Status line shown before anything happens
const READY_STATUS: &str = "Ready";

/// Bridges the playlist to a playback engine
pub struct TransportController<E: PlaybackEngine> {
    /// Engine receiving commands
    engine: E,

    /// Queued media and cursor
    playlist: PlaylistModel,

    /// Last state reported by the engine
    playback_state: PlaybackState,

    /// Last position reported by the engine, for display only
    position_ms: u64,

    /// Last duration reported by the engine, for display only
    duration_ms: u64,

    /// Volume in percent as set through the volume control
    volume_percent: u8,

    /// Human-readable result of the last operation
    status: String,
}

impl<E: PlaybackEngine> TransportController<E> {
    /// Create a controller with an empty playlist
    ///
    /// # Arguments
    ///
    /// * `engine` - Playback engine receiving commands
    /// * `picker` - Index source used by shuffle mode
    pub fn new(engine: E, picker: Box<dyn IndexPicker>) -> Self {
        Self {
            engine,
            playlist: PlaylistModel::with_picker(picker),
            playback_state: PlaybackState::Stopped,
            position_ms: 0,
            duration_ms: 0,
            volume_percent: 100,
            status: READY_STATUS.to_string(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn items(&self) -> &[MediaReference] {
        self.playlist.items()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.playlist.current_index()
    }

    pub fn current(&self) -> Option<&MediaReference> {
        self.playlist.current()
    }

    pub fn is_shuffled(&self) -> bool {
        self.playlist.is_shuffled()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback_state
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn volume_percent(&self) -> u8 {
        self.volume_percent
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Time label in the form `position / duration`
    pub fn time_label(&self) -> String {
        format!("{} / {}", format_time(self.position_ms), format_time(self.duration_ms))
    }

    /// Queue media at the end of the playlist
    ///
    /// # Returns
    ///
    /// Number of items added
    pub fn add<I>(&mut self, media: I) -> usize
    where
        I: IntoIterator<Item = MediaReference>,
    {
        let mut added = 0;
        for item in media {
            debug!("Queued {}", item);
            self.playlist.append(item);
            added += 1;
        }

        if added > 0 {
            info!("Added {} item(s), playlist now holds {}", added, self.playlist.len());
            self.set_status(format!("Added {} video(s)", added));
        }
        added
    }

    /// Pause when playing, resume when paused, otherwise load and play the current item
    pub fn toggle_play_pause(&mut self) -> Result<()> {
        if self.playlist.is_empty() {
            self.set_status(PlayerError::EmptyPlaylist.status_message());
            return Err(PlayerError::EmptyPlaylist);
        }

        if self.playlist.current().is_none() {
            self.playlist.select(0)?;
        }

        match self.engine.state() {
            PlaybackState::Playing => self.engine.pause(),
            PlaybackState::Paused => self.engine.play(),
            PlaybackState::Stopped => self.start_current(),
        }

        Ok(())
    }

    /// Stop playback; the cursor stays where it is
    pub fn stop(&mut self) {
        self.engine.stop();
        self.position_ms = 0;
        self.set_status("Stopped");
    }

    /// Move to the next item and start it, whatever the current state
    pub fn next(&mut self) {
        let shuffled = self.playlist.is_shuffled();
        if self.playlist.advance(shuffled).is_some() {
            self.start_current();
        }
    }

    /// Move to the previous item and start it, whatever the current state
    pub fn previous(&mut self) {
        let shuffled = self.playlist.is_shuffled();
        if self.playlist.retreat(shuffled).is_some() {
            self.start_current();
        }
    }

    /// Flip shuffle mode
    ///
    /// # Returns
    ///
    /// The new shuffle flag
    pub fn toggle_shuffle(&mut self) -> bool {
        let shuffled = !self.playlist.is_shuffled();
        self.playlist.set_shuffled(shuffled);
        self.set_status(if shuffled {
            "Shuffle mode enabled"
        } else {
            "Shuffle mode disabled"
        });
        shuffled
    }

    /// Remove the item at `index`, stopping the engine first if it is the current one
    pub fn remove_selected(&mut self, index: usize) -> Result<MediaReference> {
        if index >= self.playlist.len() {
            return Err(PlayerError::OutOfRange {
                index,
                len: self.playlist.len(),
            });
        }

        // The engine must release the item before the cursor moves off it
        if self.playlist.current_index() == Some(index) {
            self.engine.stop();
            self.position_ms = 0;
        }

        let removed = self.playlist.remove_at(index)?;
        info!("Removed {} from playlist", removed);
        self.set_status("Video removed from playlist");
        Ok(removed)
    }

    /// Stop playback and empty the playlist
    pub fn clear(&mut self) {
        self.engine.stop();
        self.playlist.clear();
        self.position_ms = 0;
        self.duration_ms = 0;
        info!("Playlist cleared");
        self.set_status("Playlist cleared");
    }

    /// Jump to `index` and start playing it
    pub fn play_at(&mut self, index: usize) -> Result<()> {
        self.playlist.select(index)?;
        self.start_current();
        Ok(())
    }

    /// Set volume from the 0 - 100 control, scaled linearly to the engine range
    pub fn set_volume(&mut self, percent: u8) {
        let percent = percent.min(100);
        self.volume_percent = percent;
        self.engine.set_volume(f32::from(percent) / 100.0);
        debug!("Volume set to {}%", percent);
    }

    /// Forward a seek to the engine; the engine validates the range
    pub fn seek_to(&mut self, position_ms: u64) {
        debug!("Seeking to {}", format_time(position_ms));
        self.engine.seek(position_ms);
    }

    /// Route an engine event to the matching listener method
    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        event.dispatch(self);
    }

    fn start_current(&mut self) {
        if let Some(media) = self.playlist.current().cloned() {
            info!(
                "Playing item {} of {}: {}",
                self.playlist.current_index().map_or(0, |i| i + 1),
                self.playlist.len(),
                media
            );
            self.engine.load(&media);
            self.engine.play();
        }
    }

    fn set_status<S: Into<String>>(&mut self, message: S) {
        self.status = message.into();
    }
}

impl<E: PlaybackEngine> EngineListener for TransportController<E> {
    fn on_state_changed(&mut self, state: PlaybackState) {
        info!("Playback state changed to: {:?}", state);
        self.playback_state = state;
        self.set_status(match state {
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
        });
    }

    fn on_duration_changed(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }

    fn on_position_changed(&mut self, position_ms: u64) {
        self.position_ms = position_ms;
    }

    fn on_end_of_media(&mut self) {
        debug!("End of media, advancing");
        self.next();
    }

    fn on_error(&mut self, message: String) {
        warn!("Engine error: {}", message);
        self.set_status(PlayerError::Engine(message).status_message());
    }
}
