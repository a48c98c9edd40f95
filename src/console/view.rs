//! Text rendering of controller state

use crate::player::{PlaybackEngine, PlaybackState, TransportController};
use std::fmt::Write;

/// One line per entry, the current entry marked with `>`
pub fn render_playlist<E: PlaybackEngine>(controller: &TransportController<E>) -> String {
    if controller.items().is_empty() {
        return "Playlist is empty".to_string();
    }

    let width = controller.items().len().to_string().len();
    let mut out = String::new();
    for (index, item) in controller.items().iter().enumerate() {
        let marker = if controller.current_index() == Some(index) { '>' } else { ' ' };
        let _ = writeln!(out, "{} {:>width$}. {}", marker, index + 1, item.display_name(), width = width);
    }
    out.pop();
    out
}

/// Button label, time label, shuffle flag, volume and status on one line
pub fn render_transport<E: PlaybackEngine>(controller: &TransportController<E>) -> String {
    let button = match controller.playback_state() {
        PlaybackState::Playing => "Pause",
        PlaybackState::Paused | PlaybackState::Stopped => "Play",
    };

    format!(
        "[{}] {} | Shuffle: {} | Vol {}% | {}",
        button,
        controller.time_label(),
        if controller.is_shuffled() { "On" } else { "Off" },
        controller.volume_percent(),
        controller.status()
    )
}
