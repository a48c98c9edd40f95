//! Utility module for vidlist
//!
//! This module provides common utilities used throughout the application:
//! - Error handling with custom error types
//! - Configuration management
//! - Time formatting for the transport display

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::{Config, EngineConfig, GeneralConfig, LibraryConfig, PlaybackConfig};
pub use error::{IntoPlayerError, PlayerError, Result};

/// Initialize the application configuration
///
/// Loads configuration from:
/// 1. Default values
/// 2. System configuration file
/// 3. User configuration file
/// 4. Environment variables
pub fn load_config() -> Result<Config> {
    Config::load()
}

/// Format a millisecond offset for the time label
///
/// # Returns
///
/// `MM:SS` below one hour, `H:MM:SS` at or above it (hours are not padded)
pub fn format_time(milliseconds: u64) -> String {
    let seconds = (milliseconds / 1000) % 60;
    let minutes = (milliseconds / 60_000) % 60;
    let hours = milliseconds / 3_600_000;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Parse a user-typed time offset into milliseconds
///
/// Accepts `SS`, `M:SS` or `H:MM:SS`; fractional seconds are allowed in
/// the last component.
pub fn parse_time(input: &str) -> Result<u64> {
    let invalid = || PlayerError::InvalidInput(format!("Invalid time '{}'", input));

    let parts: Vec<&str> = input.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(invalid());
    }

    let (last, leading) = parts.split_last().ok_or_else(invalid)?;
    let seconds: f64 = last.parse().map_err(|_| invalid())?;
    if !seconds.is_finite() || seconds < 0.0 || (!leading.is_empty() && seconds >= 60.0) {
        return Err(invalid());
    }

    let seconds_ms = (seconds * 1000.0).round();
    if seconds_ms >= u64::MAX as f64 {
        return Err(invalid());
    }

    let mut total_ms = seconds_ms as u64;
    let mut unit_ms: u64 = 60_000;
    for part in leading.iter().rev() {
        let value: u64 = part.parse().map_err(|_| invalid())?;
        total_ms = value
            .checked_mul(unit_ms)
            .and_then(|ms| total_ms.checked_add(ms))
            .ok_or_else(invalid)?;
        unit_ms = unit_ms.checked_mul(60).ok_or_else(invalid)?;
    }

    Ok(total_ms)
}
