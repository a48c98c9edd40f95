//! Error types for vidlist
//!
//! This module defines the error taxonomy shared by the playlist, the
//! transport controller and the mpv engine. We use thiserror for the
//! library error type and anyhow for application-level error handling.

use thiserror::Error;

/// Main error type for vidlist
#[derive(Error, Debug)]
pub enum PlayerError {
    /// Playlist index outside `[0, len)`
    #[error("Index {index} out of range for playlist of {len} item(s)")]
    OutOfRange { index: usize, len: usize },

    /// Play/advance requested on an empty playlist
    #[error("No videos in playlist")]
    EmptyPlaylist,

    /// Opaque message reported by the playback engine
    #[error("Engine error: {0}")]
    Engine(String),

    /// IPC protocol errors talking to the engine process
    #[error("IPC error: {0}")]
    Ipc(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("File error: {0}")]
    FileIO(#[from] std::io::Error),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Feature not available on this platform
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),
}

impl PlayerError {
    /// Create an engine error from string
    pub fn engine_error<S: Into<String>>(msg: S) -> Self {
        PlayerError::Engine(msg.into())
    }

    /// Text shown on the status line when this error surfaces to the user
    pub fn status_message(&self) -> String {
        match self {
            PlayerError::EmptyPlaylist => "No videos in playlist".to_string(),
            PlayerError::Engine(msg) => format!("Error: {}", msg),
            other => other.to_string(),
        }
    }
}

/// Convenience type alias for Results in vidlist
pub type Result<T> = std::result::Result<T, PlayerError>;

/// Extension trait for converting other errors to PlayerError
pub trait IntoPlayerError<T> {
    /// Convert this error into a PlayerError with the given context
    fn config_err(self, context: &str) -> Result<T>;
    fn engine_err(self, context: &str) -> Result<T>;
    fn ipc_err(self, context: &str) -> Result<T>;
}

impl<T, E: std::fmt::Display> IntoPlayerError<T> for std::result::Result<T, E> {
    fn config_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Config(format!("{}: {}", context, e)))
    }

    fn engine_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Engine(format!("{}: {}", context, e)))
    }

    fn ipc_err(self, context: &str) -> Result<T> {
        self.map_err(|e| PlayerError::Ipc(format!("{}: {}", context, e)))
    }
}
