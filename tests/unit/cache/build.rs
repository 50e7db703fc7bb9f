use super::*;
use crate::cache::format::DotRecord;
use crate::foundation::core::Resolution;
use crate::progress::NoProgress;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "pianoreel_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn settings(fps: u32, dps: f64, rounding: Rounding) -> RenderSettings {
    let mut s = RenderSettings::new(Resolution::new(520, 100).unwrap(), fps);
    s.effects.smoke.dots = true;
    s.effects.smoke.dps = dps;
    s.effects.smoke.dot_rounding = rounding;
    s
}

fn two_notes() -> NoteList {
    NoteList::new(vec![
        NoteEvent::new(60, 0.0, 1.0),
        NoteEvent::new(64, 1.0, 3.0),
    ])
    .unwrap()
}

fn header(note: u8, start: f32, end: f32, dots: u32) -> Vec<u8> {
    let mut b = vec![note];
    b.extend_from_slice(&start.to_le_bytes());
    b.extend_from_slice(&end.to_le_bytes());
    b.extend_from_slice(&dots.to_le_bytes());
    b
}

#[test]
fn dot_count_scales_duration_by_dots_per_frame() {
    let s = settings(30, 10.0, Rounding::Floor);
    let inc = dot_time_increment(&s.effects.smoke, s.fps().unwrap());
    assert!((inc - 1.0 / 3.0).abs() < 1e-12);

    let notes = two_notes();
    let floor: Vec<u32> = notes.iter().map(|e| dot_count(e, inc, Rounding::Floor)).collect();
    let nearest: Vec<u32> = notes
        .iter()
        .map(|e| dot_count(e, inc, Rounding::Nearest))
        .collect();
    assert_eq!(floor, [0, 0]);
    assert_eq!(nearest, [0, 1]);
}

#[test]
fn build_writes_index_and_records_byte_for_byte() {
    let dir = temp_dir("cache_bytes");
    let summary = build(
        &settings(30, 10.0, Rounding::Floor),
        &two_notes(),
        &dir,
        &mut NoProgress,
    )
    .unwrap()
    .unwrap();
    assert_eq!(summary.events, 2);
    assert_eq!(summary.dots, 0);
    assert_eq!(summary.dir, dir);

    let mut index = 0u32.to_le_bytes().to_vec();
    index.extend_from_slice(&1u32.to_le_bytes());
    assert_eq!(std::fs::read(dir.join("info.bin")).unwrap(), index);
    assert_eq!(
        std::fs::read(dir.join("0.bin")).unwrap(),
        header(60, 0.0, 1.0, 0)
    );
    assert_eq!(
        std::fs::read(dir.join("1.bin")).unwrap(),
        header(64, 1.0, 3.0, 0)
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn nearest_rounding_emits_one_dot_for_the_long_note() {
    let dir = temp_dir("cache_nearest");
    let summary = build(
        &settings(30, 10.0, Rounding::Nearest),
        &two_notes(),
        &dir,
        &mut NoProgress,
    )
    .unwrap()
    .unwrap();
    assert_eq!(summary.dots, 1);

    let bytes = std::fs::read(dir.join("1.bin")).unwrap();
    assert_eq!(bytes.len(), 13 + 20);
    assert_eq!(&bytes[9..13], &1u32.to_le_bytes());
    // first dot is emitted at the note start
    assert_eq!(&bytes[13..17], &1.0f32.to_le_bytes());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn disabled_smoke_touches_nothing() {
    let dir = temp_dir("cache_disabled");
    let mut s = settings(30, 10.0, Rounding::Floor);
    s.effects.smoke.dots = false;
    let out = build(&s, &two_notes(), &dir, &mut NoProgress).unwrap();
    assert!(out.is_none());
    assert!(!dir.exists());
}

#[test]
fn empty_note_list_writes_empty_index() {
    let dir = temp_dir("cache_empty");
    let notes = NoteList::new(Vec::new()).unwrap();
    let summary = build(&settings(30, 10.0, Rounding::Floor), &notes, &dir, &mut NoProgress)
        .unwrap()
        .unwrap();
    assert_eq!(summary.events, 0);
    assert_eq!(std::fs::read(dir.join("info.bin")).unwrap(), Vec::<u8>::new());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn rebuild_with_fewer_events_removes_stale_records() {
    let dir = temp_dir("cache_stale");
    let s = settings(30, 10.0, Rounding::Floor);
    let three = NoteList::new(vec![
        NoteEvent::new(60, 0.0, 1.0),
        NoteEvent::new(62, 0.0, 1.0),
        NoteEvent::new(64, 0.0, 1.0),
    ])
    .unwrap();
    build(&s, &three, &dir, &mut NoProgress).unwrap();
    assert!(dir.join("2.bin").exists());
    std::fs::write(dir.join("notes.txt"), b"keep").unwrap();
    std::fs::write(dir.join("007.bin"), b"keep").unwrap();
    std::fs::write(dir.join("+3.bin"), b"keep").unwrap();

    let one = NoteList::new(vec![NoteEvent::new(72, 0.5, 0.75)]).unwrap();
    build(&s, &one, &dir, &mut NoProgress).unwrap();
    assert!(dir.join("0.bin").exists());
    assert!(!dir.join("1.bin").exists());
    assert!(!dir.join("2.bin").exists());
    assert!(dir.join("notes.txt").exists());
    assert!(dir.join("007.bin").exists());
    assert!(dir.join("+3.bin").exists());
    assert_eq!(
        std::fs::read(dir.join("info.bin")).unwrap(),
        0u32.to_le_bytes()
    );
    assert_eq!(
        std::fs::read(dir.join("0.bin")).unwrap(),
        header(72, 0.5, 0.75, 0)
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn note_off_the_keyboard_reports_its_position() {
    let dir = temp_dir("cache_off_keyboard");
    let notes = NoteList::new(vec![
        NoteEvent::new(60, 0.0, 1.0),
        NoteEvent::new(10, 0.0, 1.0),
    ])
    .unwrap();
    let err = build(&settings(30, 10.0, Rounding::Floor), &notes, &dir, &mut NoProgress)
        .unwrap_err();
    assert!(matches!(err, ReelError::CacheEvent { position: 1, .. }));
    assert!(!dir.exists());
}

#[test]
fn invalid_settings_are_rejected_before_any_io() {
    let dir = temp_dir("cache_invalid");
    let s = settings(30, -1.0, Rounding::Floor);
    let err = build(&s, &two_notes(), &dir, &mut NoProgress).unwrap_err();
    assert!(matches!(err, ReelError::Config(_)));
    assert!(!dir.exists());
}

struct FixedKeys;

impl KeyGeometry for FixedKeys {
    fn key_span(&self, note: u8) -> Option<KeySpan> {
        Some(KeySpan {
            x: f64::from(note),
            width: 2.0,
        })
    }
}

#[derive(Default)]
struct Recorder {
    seeds: Vec<DotSeed>,
}

impl Trajectory for Recorder {
    fn simulate(&mut self, seed: &DotSeed) -> DotRecord {
        self.seeds.push(*seed);
        DotRecord {
            time: seed.time as f32,
            x: seed.origin.x as f32,
            y: seed.origin.y as f32,
            vx: 0.0,
            vy: 0.0,
        }
    }
}

#[test]
fn dots_are_spread_evenly_over_the_event() {
    let dir = temp_dir("cache_spacing");
    // 30 dps at 30 fps: one dot per second of note
    let s = settings(30, 30.0, Rounding::Floor);
    let notes = NoteList::new(vec![NoteEvent::new(40, 2.0, 6.0)]).unwrap();
    let mut rec = Recorder::default();
    let summary = build_with(&s, &notes, &dir, &FixedKeys, &mut rec, &mut NoProgress)
        .unwrap()
        .unwrap();
    assert_eq!(summary.dots, 4);

    let times: Vec<f64> = rec.seeds.iter().map(|s| s.time).collect();
    assert_eq!(times, [2.0, 3.0, 4.0, 5.0]);
    let idx: Vec<u32> = rec.seeds.iter().map(|s| s.index).collect();
    assert_eq!(idx, [0, 1, 2, 3]);
    for seed in &rec.seeds {
        assert_eq!(seed.note_id, 40);
        assert_eq!(seed.origin, Point::new(41.0, 50.0));
        assert_eq!(seed.key_width, 2.0);
    }
    let _ = std::fs::remove_dir_all(&dir);
}

#[derive(Default)]
struct Counted {
    updates: Vec<(u64, u64)>,
    finished: usize,
}

impl Progress for Counted {
    fn update(&mut self, done: u64, total: u64) {
        self.updates.push((done, total));
    }

    fn finish(&mut self, _message: &str) {
        self.finished += 1;
    }
}

#[test]
fn progress_reports_each_event() {
    let dir = temp_dir("cache_progress");
    let mut progress = Counted::default();
    build(&settings(30, 10.0, Rounding::Floor), &two_notes(), &dir, &mut progress).unwrap();
    assert_eq!(progress.updates, [(1, 2), (2, 2)]);
    assert_eq!(progress.finished, 1);
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn only_canonical_record_names_are_positions() {
    assert_eq!(parse_position("0"), Some(0));
    assert_eq!(parse_position("12"), Some(12));
    assert_eq!(parse_position("007"), None);
    assert_eq!(parse_position("+3"), None);
    assert_eq!(parse_position("info"), None);
}
