//! Integration tests covering the pieces the binary wires together:
//! media discovery, config loading, and event delivery over the
//! engine channel.

use anyhow::Result;
use serial_test::serial;
use tokio::sync::mpsc;
use vidlist::engine::ipc::{parse_line, IpcTracker};
use vidlist::media::collect_media;
use vidlist::utils::{Config, LibraryConfig};
use vidlist::{EngineEvent, MediaReference, PlaybackState, PlayerError};
use vidlist_integration_tests::{controller_with, MockEngine, TestFixture};

#[test]
fn test_directory_scan_feeds_playlist() -> Result<()> {
    let fixture = TestFixture::new()?;
    let extensions = LibraryConfig::default().extensions;

    let collected = collect_media(&[fixture.path()], &extensions);
    assert_eq!(collected.media.len(), fixture.videos.len());

    let mut controller = controller_with(MockEngine::new(), &[]);
    let added = controller.add(collected.media);
    assert_eq!(added, 3);
    assert_eq!(controller.status(), "Added 3 video(s)");
    assert_eq!(controller.current().map(MediaReference::display_name), Some("intro.mp4"));

    Ok(())
}

#[test]
fn test_explicit_non_video_files_are_skipped() -> Result<()> {
    let fixture = TestFixture::new()?;
    let extensions = LibraryConfig::default().extensions;

    let collected = collect_media(fixture.others.as_slice(), &extensions);
    assert!(collected.media.is_empty());
    assert_eq!(collected.skipped, fixture.others.len());

    Ok(())
}

#[test]
#[serial]
fn test_env_overrides_config_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[playback]\nvolume = 20\nshuffle = false\n")?;

    std::env::set_var("VIDLIST_VOLUME", "65");
    std::env::set_var("VIDLIST_SHUFFLE", "true");
    let loaded = Config::load_from(&path);
    std::env::remove_var("VIDLIST_VOLUME");
    std::env::remove_var("VIDLIST_SHUFFLE");

    let config = loaded?;
    assert_eq!(config.playback.volume, 65);
    assert!(config.playback.shuffle);

    Ok(())
}

#[test]
#[serial]
fn test_invalid_env_override_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "")?;

    std::env::set_var("VIDLIST_VOLUME", "loud");
    let loaded = Config::load_from(&path);
    std::env::remove_var("VIDLIST_VOLUME");

    assert!(matches!(loaded, Err(PlayerError::Config(_))));
    Ok(())
}

#[tokio::test]
async fn test_ipc_events_drive_controller_through_channel() {
    let (tx, mut rx) = mpsc::unbounded_channel::<EngineEvent>();

    // Engine side: what mpv sends while a file plays to its end
    let producer = tokio::task::spawn_blocking(move || {
        let mut tracker = IpcTracker::default();
        let lines = [
            r#"{"event":"property-change","id":3,"name":"pause","data":false}"#,
            r#"{"event":"file-loaded"}"#,
            r#"{"event":"property-change","id":2,"name":"duration","data":12.0}"#,
            r#"{"event":"property-change","id":1,"name":"time-pos","data":11.9}"#,
            r#"{"event":"end-file","reason":"eof"}"#,
        ];
        for line in lines {
            for event in tracker.apply(parse_line(line).unwrap()) {
                tx.send(event).unwrap();
            }
        }
    });
    producer.await.unwrap();

    let mut engine = MockEngine::new();
    engine
        .expect_load()
        .withf(|media: &MediaReference| media.as_str() == "second.mkv")
        .times(1)
        .return_const(());
    engine.expect_play().times(1).return_const(());

    let mut controller = controller_with(engine, &["first.mp4", "second.mkv"]);
    let mut states = Vec::new();
    while let Some(event) = rx.recv().await {
        if let EngineEvent::StateChanged(state) = event {
            states.push(state);
        }
        controller.handle_engine_event(event);
    }

    assert_eq!(states, vec![PlaybackState::Playing, PlaybackState::Stopped]);
    assert_eq!(controller.duration_ms(), 12_000);
    assert_eq!(controller.position_ms(), 11_900);
    assert_eq!(controller.current_index(), Some(1));
}
