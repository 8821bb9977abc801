use super::*;
use crate::config::{ExhaustedPolicy, Settings, TagEntry, TrackOrder};
use crate::dispatch::{Dispatcher, shuffle_all};
use crate::scanner::ScanEvent;
use crate::session::PlaybackSession;
use crate::testing::RecordingAudio;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

/// `music/rock/{01,02,10}.flac` plus `music/jazz/b.flac` with A1B2 → rock.
fn library() -> TempDir {
    let dir = tempdir().unwrap();
    let rock = dir.path().join("rock");
    let jazz = dir.path().join("jazz");
    fs::create_dir_all(&rock).unwrap();
    fs::create_dir_all(&jazz).unwrap();
    for name in ["10.flac", "01.flac", "02.flac"] {
        fs::write(rock.join(name), b"x").unwrap();
    }
    fs::write(jazz.join("b.flac"), b"x").unwrap();
    dir
}

fn settings(root: &Path) -> Settings {
    let mut s = Settings::default();
    s.global_config.audio_folder = root.to_path_buf();
    s.global_config.library.recursive = true;
    s.global_config.playback.rescan_window_ms = Some(30_000);
    s.tags = [(
        "A1B2".to_string(),
        TagEntry {
            folder: PathBuf::from("rock"),
            order: Some(TrackOrder::TrackNumber),
        },
    )]
    .into_iter()
    .collect();
    s
}

fn controller(settings: &Settings) -> Controller<RecordingAudio> {
    let g = &settings.global_config;
    let mut dispatcher = Dispatcher::new(RecordingAudio::default(), g.library.clone())
        .with_rng(StdRng::seed_from_u64(7));
    if g.playback.on_exhausted == ExhaustedPolicy::ShuffleAll {
        dispatcher = dispatcher.with_on_exhausted(shuffle_all(g.all_songs_folder(), g.playback.track_order));
    }
    Controller::new(ModeSelector::new(settings), dispatcher, &g.playback)
}

fn tag(id: &str) -> ScanEvent {
    ScanEvent::Tag(id.to_string())
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

fn last_started(c: &Controller<RecordingAudio>) -> Vec<String> {
    names(c.dispatcher().backend().last_started().expect("a list was started"))
}

#[test]
fn first_scan_plays_in_track_order_and_repeat_shuffles() {
    let dir = library();
    let mut c = controller(&settings(dir.path()));
    let t0 = Instant::now();

    assert!(c.handle_event(tag("A1B2"), t0));
    assert_eq!(last_started(&c), vec!["01.flac", "02.flac", "10.flac"]);
    assert_eq!(c.session().count, 1);

    assert!(c.handle_event(tag("A1B2"), t0 + Duration::from_secs(5)));
    let mut shuffled = last_started(&c);
    assert_eq!(c.session().count, 2);
    shuffled.sort();
    assert_eq!(shuffled, vec!["01.flac", "02.flac", "10.flac"]);

    assert!(c.handle_event(tag("A1B2"), t0 + Duration::from_secs(10)));
    assert_eq!(last_started(&c), vec!["01.flac", "02.flac", "10.flac"]);
    assert_eq!(c.session().count, 1);
}

#[test]
fn repeat_after_the_window_starts_over() {
    let dir = library();
    let mut c = controller(&settings(dir.path()));
    let t0 = Instant::now();

    c.handle_event(tag("A1B2"), t0);
    c.handle_event(tag("A1B2"), t0 + Duration::from_secs(31));
    assert_eq!(c.session().count, 1);
    assert_eq!(last_started(&c), vec!["01.flac", "02.flac", "10.flac"]);
}

#[test]
fn unknown_tag_plays_the_all_songs_folder() {
    let dir = library();
    let mut c = controller(&settings(dir.path()));

    assert!(c.handle_event(tag("FFFF"), Instant::now()));
    let started = last_started(&c);
    assert_eq!(started.len(), 4);
    assert!(started.contains(&"b.flac".to_string()));
}

#[test]
fn every_scan_stops_before_starting() {
    let dir = library();
    let mut c = controller(&settings(dir.path()));
    let t0 = Instant::now();

    c.handle_event(tag("A1B2"), t0);
    c.handle_event(tag("FFFF"), t0 + Duration::from_secs(1));

    use crate::testing::AudioCall::*;
    let kinds: Vec<bool> = c
        .dispatcher()
        .backend()
        .calls
        .iter()
        .map(|call| matches!(call, StopAll))
        .collect();
    assert_eq!(kinds, vec![true, false, true, false]);
}

#[test]
fn switching_tags_resets_the_cycle() {
    let dir = library();
    let mut s = settings(dir.path());
    s.tags = [
        ("A1B2".to_string(), TagEntry::new("rock")),
        ("C3D4".to_string(), TagEntry::new("jazz")),
    ]
    .into_iter()
    .collect();
    let mut c = controller(&s);
    let t0 = Instant::now();

    c.handle_event(tag("A1B2"), t0);
    c.handle_event(tag("C3D4"), t0 + Duration::from_secs(1));
    c.handle_event(tag("A1B2"), t0 + Duration::from_secs(2));
    assert_eq!(c.session().count, 1);
    assert_eq!(c.session().last_id.as_deref(), Some("A1B2"));
}

#[test]
fn gate_stops_playback_and_forgets_the_session() {
    let dir = library();
    let mut c = controller(&settings(dir.path()));
    let t0 = Instant::now();

    c.handle_event(tag("A1B2"), t0);
    assert!(c.dispatcher().is_active());

    assert!(!c.handle_event(ScanEvent::Gated, t0 + Duration::from_secs(1)));
    assert!(!c.dispatcher().is_active());
    assert_eq!(c.session(), &PlaybackSession::default());

    // The same tag after the gate is a fresh first scan.
    c.handle_event(tag("A1B2"), t0 + Duration::from_secs(2));
    assert_eq!(c.session().count, 1);
}

#[test]
fn empty_folder_keeps_player_idle_but_records_scan() {
    let dir = library();
    fs::create_dir_all(dir.path().join("empty")).unwrap();
    let mut s = settings(dir.path());
    s.tags = [("E000".to_string(), TagEntry::new("empty"))].into_iter().collect();
    let mut c = controller(&s);

    assert!(!c.handle_event(tag("E000"), Instant::now()));
    assert!(!c.dispatcher().is_active());
    assert_eq!(c.session().last_id.as_deref(), Some("E000"));
}

#[test]
fn finished_list_goes_idle_by_default() {
    let dir = library();
    let mut c = controller(&settings(dir.path()));

    c.handle_event(tag("A1B2"), Instant::now());
    c.dispatcher_mut().backend_mut().finish_all();
    c.tick();
    assert!(!c.dispatcher().is_active());
    assert_eq!(c.dispatcher().backend().started().len(), 1);
}

#[test]
fn finished_list_falls_back_to_shuffle_all() {
    let dir = library();
    let mut s = settings(dir.path());
    s.global_config.playback.on_exhausted = ExhaustedPolicy::ShuffleAll;
    let mut c = controller(&s);

    c.handle_event(tag("A1B2"), Instant::now());
    c.dispatcher_mut().backend_mut().finish_all();
    c.tick();

    assert!(c.dispatcher().is_active());
    let mut all = last_started(&c);
    all.sort();
    assert_eq!(all, vec!["01.flac", "02.flac", "10.flac", "b.flac"]);
}

#[test]
fn wait_for_end_ignores_scans_while_playing() {
    let dir = library();
    let mut s = settings(dir.path());
    s.global_config.playback.wait_for_end = true;
    let mut c = controller(&s);
    let t0 = Instant::now();

    assert!(c.handle_event(tag("A1B2"), t0));
    assert!(!c.handle_event(tag("FFFF"), t0 + Duration::from_secs(1)));
    assert_eq!(c.dispatcher().backend().started().len(), 1);
    assert_eq!(c.session().last_id.as_deref(), Some("A1B2"));

    c.dispatcher_mut().backend_mut().finish_all();
    assert!(c.handle_event(tag("FFFF"), t0 + Duration::from_secs(2)));
    assert_eq!(c.dispatcher().backend().started().len(), 2);
}

#[test]
fn wait_for_end_still_honours_the_gate() {
    let dir = library();
    let mut s = settings(dir.path());
    s.global_config.playback.wait_for_end = true;
    let mut c = controller(&s);

    c.handle_event(tag("A1B2"), Instant::now());
    c.handle_event(ScanEvent::Gated, Instant::now());
    assert!(!c.dispatcher().is_active());
}

#[test]
fn run_serves_events_until_the_scanner_hangs_up() {
    let dir = library();
    let mut s = settings(dir.path());
    s.global_config.playback.tick_ms = 5;
    let mut c = controller(&s);

    let (tx, rx) = mpsc::channel();
    tx.send(tag("A1B2")).unwrap();
    tx.send(tag("A1B2")).unwrap();
    drop(tx);
    c.run(&rx);

    assert_eq!(c.session().count, 2);
    assert_eq!(c.dispatcher().backend().started().len(), 2);
    // Shutting down stops the last list.
    assert!(!c.dispatcher().is_active());
}

#[test]
fn wait_for_end_accepts_scans_once_the_album_ends_despite_fallback() {
    let dir = library();
    let mut s = settings(dir.path());
    s.global_config.playback.wait_for_end = true;
    s.global_config.playback.on_exhausted = ExhaustedPolicy::ShuffleAll;
    let mut c = controller(&s);
    let t0 = Instant::now();

    assert!(c.handle_event(tag("A1B2"), t0));
    for round in 1..=3u64 {
        c.dispatcher_mut().backend_mut().finish_all();
        c.tick();
        // The shuffle-all fallback is playing; a scan still starts the album.
        assert!(c.dispatcher().is_active());
        assert!(c.handle_event(tag("A1B2"), t0 + Duration::from_secs(60 * round)));
        assert_eq!(last_started(&c), vec!["01.flac", "02.flac", "10.flac"]);
    }
}

#[test]
fn wait_for_end_scan_after_unnoticed_end_skips_the_fallback() {
    let dir = library();
    let mut s = settings(dir.path());
    s.global_config.playback.wait_for_end = true;
    s.global_config.playback.on_exhausted = ExhaustedPolicy::ShuffleAll;
    let mut c = controller(&s);
    let t0 = Instant::now();

    c.handle_event(tag("A1B2"), t0);
    c.dispatcher_mut().backend_mut().finish_all();
    assert!(c.handle_event(tag("A1B2"), t0 + Duration::from_secs(60)));

    // Album, then album again; no shuffle-all list in between.
    assert_eq!(c.dispatcher().backend().started().len(), 2);
    assert_eq!(last_started(&c), vec!["01.flac", "02.flac", "10.flac"]);
}
