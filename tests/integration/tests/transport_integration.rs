//! Integration tests for the transport controller against a mock engine
//!
//! These tests verify the command traffic the controller sends for the
//! user-facing playlist scenarios, including command ordering.

use mockall::predicate::eq;
use mockall::Sequence;
use vidlist::{EngineEvent, MediaReference, PlaybackState, PlayerError};
use vidlist_integration_tests::{controller_with, MockEngine};

fn expect_start(engine: &mut MockEngine, seq: &mut Sequence, name: &'static str) {
    engine
        .expect_load()
        .withf(move |media: &MediaReference| media.as_str() == name)
        .times(1)
        .in_sequence(seq)
        .return_const(());
    engine.expect_play().times(1).in_sequence(seq).return_const(());
}

#[test]
fn test_empty_playlist_sends_nothing() {
    // No expectations: any engine call fails the test
    let mut controller = controller_with(MockEngine::new(), &[]);

    let result = controller.toggle_play_pause();
    assert!(matches!(result, Err(PlayerError::EmptyPlaylist)));
    assert_eq!(controller.status(), "No videos in playlist");

    controller.next();
    controller.previous();
    assert_eq!(controller.current_index(), None);
}

#[test]
fn test_next_wraps_through_playlist() {
    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();
    expect_start(&mut engine, &mut seq, "B");
    expect_start(&mut engine, &mut seq, "C");
    expect_start(&mut engine, &mut seq, "A");

    let mut controller = controller_with(engine, &["A", "B", "C"]);
    assert_eq!(controller.current_index(), Some(0));

    controller.next();
    controller.next();
    assert_eq!(controller.current().map(MediaReference::as_str), Some("C"));

    controller.next();
    assert_eq!(controller.current().map(MediaReference::as_str), Some("A"));
}

#[test]
fn test_toggle_loads_only_from_stopped() {
    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();

    engine
        .expect_state()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(PlaybackState::Stopped);
    expect_start(&mut engine, &mut seq, "A");
    engine
        .expect_state()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(PlaybackState::Playing);
    engine.expect_pause().times(1).in_sequence(&mut seq).return_const(());
    engine
        .expect_state()
        .times(1)
        .in_sequence(&mut seq)
        .return_const(PlaybackState::Paused);
    engine.expect_play().times(1).in_sequence(&mut seq).return_const(());

    let mut controller = controller_with(engine, &["A", "B"]);
    controller.toggle_play_pause().unwrap();
    controller.toggle_play_pause().unwrap();
    controller.toggle_play_pause().unwrap();
}

#[test]
fn test_removing_playing_item_stops_engine() {
    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();
    engine.expect_state().return_const(PlaybackState::Stopped);
    expect_start(&mut engine, &mut seq, "A");
    engine.expect_stop().times(1).in_sequence(&mut seq).return_const(());

    let mut controller = controller_with(engine, &["A", "B", "C"]);
    controller.toggle_play_pause().unwrap();
    controller.handle_engine_event(EngineEvent::StateChanged(PlaybackState::Playing));

    controller.remove_selected(0).unwrap();
    assert_eq!(controller.current_index(), Some(0));
    assert_eq!(controller.current().map(MediaReference::as_str), Some("B"));
}

#[test]
fn test_removing_earlier_item_keeps_current() {
    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();
    expect_start(&mut engine, &mut seq, "B");

    let mut controller = controller_with(engine, &["A", "B", "C"]);
    controller.play_at(1).unwrap();

    controller.remove_selected(0).unwrap();
    assert_eq!(controller.current_index(), Some(0));
    assert_eq!(controller.current().map(MediaReference::as_str), Some("B"));
}

#[test]
fn test_end_of_media_chains_to_next_item() {
    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();
    expect_start(&mut engine, &mut seq, "B");

    let mut controller = controller_with(engine, &["A", "B"]);
    controller.handle_engine_event(EngineEvent::StateChanged(PlaybackState::Playing));
    controller.handle_engine_event(EngineEvent::StateChanged(PlaybackState::Stopped));
    controller.handle_engine_event(EngineEvent::EndOfMedia);

    assert_eq!(controller.current_index(), Some(1));
    assert_eq!(controller.playback_state(), PlaybackState::Stopped);
}

#[test]
fn test_shuffle_may_replay_same_item() {
    let mut engine = MockEngine::new();
    let mut seq = Sequence::new();
    expect_start(&mut engine, &mut seq, "A");
    expect_start(&mut engine, &mut seq, "A");

    let mut controller = controller_with(engine, &["A", "B", "C"]);
    controller.toggle_shuffle();
    controller.handle_engine_event(EngineEvent::EndOfMedia);
    controller.handle_engine_event(EngineEvent::EndOfMedia);

    assert_eq!(controller.current_index(), Some(0));
}

#[test]
fn test_volume_and_seek_forwarding() {
    let mut engine = MockEngine::new();
    engine.expect_set_volume().with(eq(0.25f32)).times(1).return_const(());
    engine.expect_seek().with(eq(90_000u64)).times(1).return_const(());

    let mut controller = controller_with(engine, &["A"]);
    controller.set_volume(25);
    controller.seek_to(90_000);
    assert_eq!(controller.volume_percent(), 25);
}

#[test]
fn test_engine_error_is_non_fatal() {
    let mut controller = controller_with(MockEngine::new(), &["A"]);
    controller.handle_engine_event(EngineEvent::Error("file not found".to_string()));

    assert_eq!(controller.status(), "Error: file not found");
    assert_eq!(controller.items().len(), 1);
    assert_eq!(controller.current_index(), Some(0));
}
