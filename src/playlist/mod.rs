//! Playlist module for vidlist
//!
//! This module owns the ordered list of queued media and the cursor that
//! selects the active item. It has no knowledge of the playback engine;
//! the transport controller is responsible for stopping playback before
//! the active item is removed.

mod picker;

pub use picker::{IndexPicker, RandomPicker, SequencePicker};

use crate::utils::error::{PlayerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Opaque locator of a playable item (file path or URL)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaReference(String);

impl MediaReference {
    /// Create a reference from any locator string
    pub fn new<S: Into<String>>(locator: S) -> Self {
        Self(locator.into())
    }

    /// Create a reference from a local path
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    /// The raw locator handed to the engine
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name shown in the playlist: the last path component
    pub fn display_name(&self) -> &str {
        self.0
            .rsplit(['/', '\\'])
            .find(|part| !part.is_empty())
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for MediaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered media queue with a cursor
///
/// `current` is `None` exactly when the playlist is empty: the first
/// append selects item 0 and removals re-clamp the cursor instead of
/// leaving it dangling.
pub struct PlaylistModel {
    /// Queued items in insertion order
    items: Vec<MediaReference>,

    /// Cursor into `items`
    current: Option<usize>,

    /// Shuffle mode; never reorders `items`
    shuffled: bool,

    /// Index source for shuffle mode
    picker: Box<dyn IndexPicker>,
}

impl PlaylistModel {
    /// Create an empty playlist with a randomly seeded shuffle picker
    pub fn new() -> Self {
        Self::with_picker(Box::new(RandomPicker::new()))
    }

    /// Create an empty playlist with the given shuffle picker
    pub fn with_picker(picker: Box<dyn IndexPicker>) -> Self {
        Self {
            items: Vec::new(),
            current: None,
            shuffled: false,
            picker,
        }
    }

    pub fn items(&self) -> &[MediaReference] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Set the shuffle mode flag
    pub fn set_shuffled(&mut self, shuffled: bool) {
        self.shuffled = shuffled;
    }

    /// Append an item; the first item of an empty cursor becomes current
    pub fn append(&mut self, media: MediaReference) {
        self.items.push(media);
        if self.current.is_none() {
            self.current = Some(0);
        }
    }

    /// Remove the item at `index`, keeping the cursor on the same logical item
    ///
    /// When the current item itself is removed the cursor stays on the
    /// same position (now the following item), clamped to the new end.
    pub fn remove_at(&mut self, index: usize) -> Result<MediaReference> {
        if index >= self.items.len() {
            return Err(PlayerError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }

        let removed = self.items.remove(index);

        self.current = match self.current {
            _ if self.items.is_empty() => None,
            Some(current) if index < current => Some(current - 1),
            Some(current) if current >= self.items.len() => Some(self.items.len() - 1),
            other => other,
        };

        Ok(removed)
    }

    /// Remove every item and reset the cursor
    pub fn clear(&mut self) {
        self.items.clear();
        self.current = None;
    }

    /// Item under the cursor
    pub fn current(&self) -> Option<&MediaReference> {
        self.current.and_then(|index| self.items.get(index))
    }

    /// Move the cursor onto `index`
    pub fn select(&mut self, index: usize) -> Result<&MediaReference> {
        if index >= self.items.len() {
            return Err(PlayerError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.current = Some(index);
        Ok(&self.items[index])
    }

    /// Step forward with wraparound, or pick at random when `shuffled`
    ///
    /// No-op returning `None` on an empty playlist. Shuffle may pick the
    /// current index again.
    pub fn advance(&mut self, shuffled: bool) -> Option<&MediaReference> {
        self.step(shuffled, 1)
    }

    /// Step backward with wraparound, or pick at random when `shuffled`
    pub fn retreat(&mut self, shuffled: bool) -> Option<&MediaReference> {
        let back = self.items.len().saturating_sub(1);
        self.step(shuffled, back)
    }

    fn step(&mut self, shuffled: bool, offset: usize) -> Option<&MediaReference> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }

        let next = if shuffled {
            self.picker.pick(len)
        } else {
            (self.current.unwrap_or(0) + offset) % len
        };

        self.current = Some(next);
        self.items.get(next)
    }
}

impl Default for PlaylistModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlaylistModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaylistModel")
            .field("items", &self.items)
            .field("current", &self.current)
            .field("shuffled", &self.shuffled)
            .finish_non_exhaustive()
    }
}
