//! Media file discovery
//!
//! Files are accepted by extension only; whether the engine can actually
//! decode them is reported later through engine errors.

use crate::playlist::MediaReference;
use log::warn;
use std::path::{Path, PathBuf};

/// Check whether `path` carries one of the accepted extensions (case-insensitive)
pub fn is_video_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|accepted| accepted.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Result of scanning user-supplied paths
#[derive(Debug, Default)]
pub struct Collected {
    /// Accepted media, in the order found
    pub media: Vec<MediaReference>,

    /// Paths that were missing or filtered out
    pub skipped: usize,
}

/// Expand files and directories into playable references
///
/// Directories are scanned one level deep with entries sorted by name.
pub fn collect_media<P: AsRef<Path>>(paths: &[P], extensions: &[String]) -> Collected {
    let mut collected = Collected::default();

    for path in paths {
        let path = path.as_ref();

        if path.is_dir() {
            match read_sorted(path) {
                Ok(entries) => {
                    for entry in entries {
                        if entry.is_file() && is_video_file(&entry, extensions) {
                            collected.media.push(MediaReference::from_path(&entry));
                        }
                    }
                }
                Err(e) => {
                    warn!("Cannot read directory {:?}: {}", path, e);
                    collected.skipped += 1;
                }
            }
        } else if path.is_file() && is_video_file(path, extensions) {
            collected.media.push(MediaReference::from_path(path));
        } else {
            warn!("Skipping {:?}: not a supported video file", path);
            collected.skipped += 1;
        }
    }

    collected
}

fn read_sorted(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}
