//! Integration test utilities for vidlist
//!
//! This module provides common utilities for integration testing including:
//! - A mockall playback engine
//! - A temporary media directory fixture

use anyhow::Result;
use mockall::mock;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use vidlist::{MediaReference, PlaybackEngine, PlaybackState, SequencePicker, TransportController};

mock! {
    pub Engine {}

    impl PlaybackEngine for Engine {
        fn load(&mut self, media: &MediaReference);
        fn play(&mut self);
        fn pause(&mut self);
        fn stop(&mut self);
        fn seek(&mut self, position_ms: u64);
        fn set_volume(&mut self, fraction: f32);
        fn current_position(&self) -> u64;
        fn current_duration(&self) -> u64;
        fn state(&self) -> PlaybackState;
    }
}

/// Controller over `engine` holding the given items, shuffle script `[0]`
pub fn controller_with(engine: MockEngine, names: &[&str]) -> TransportController<MockEngine> {
    let mut controller = TransportController::new(engine, Box::new(SequencePicker::new(vec![0])));
    controller.add(names.iter().map(|name| MediaReference::new(*name)));
    controller
}

/// Test fixture holding a directory of fake media files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub videos: Vec<PathBuf>,
    pub others: Vec<PathBuf>,
}

impl TestFixture {
    /// Create a directory with three videos and two non-video files
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;

        let mut videos = Vec::new();
        for name in ["intro.mp4", "main.MKV", "outro.webm"] {
            let path = temp_dir.path().join(name);
            std::fs::write(&path, b"not really a video")?;
            videos.push(path);
        }

        let mut others = Vec::new();
        for name in ["cover.jpg", "notes.txt"] {
            let path = temp_dir.path().join(name);
            std::fs::write(&path, b"")?;
            others.push(path);
        }

        Ok(Self {
            temp_dir,
            videos,
            others,
        })
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}
