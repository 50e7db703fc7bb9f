use crate::cache::format::{CacheRecord, index_path, record_path};
use crate::cache::simulate::{DotSeed, RisingDrift, Trajectory};
use crate::foundation::core::{Fps, Point, Rounding};
use crate::foundation::error::{ReelError, ReelResult};
use crate::model::keyboard::{KeyGeometry, KeySpan, PianoLayout};
use crate::model::notes::{NoteEvent, NoteList};
use crate::model::settings::{RenderSettings, SmokeSettings};
use crate::progress::Progress;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Result of a cache build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheSummary {
    pub dir: PathBuf,
    /// Record files written (one per note event).
    pub events: usize,
    /// Dots written across all records.
    pub dots: u64,
}

/// Dots per output frame: `dps / fps`.
pub fn dot_time_increment(smoke: &SmokeSettings, fps: Fps) -> f64 {
    smoke.dps / fps.as_f64()
}

/// Dot count of one event: `duration * increment`, made integral by `rounding`.
pub fn dot_count(event: &NoteEvent, increment: f64, rounding: Rounding) -> u32 {
    rounding.apply_count(event.duration() * increment)
}

/// Build the smoke dot cache with the default keyboard layout and trajectory.
///
/// See [`build_with`].
pub fn build(
    settings: &RenderSettings,
    notes: &NoteList,
    cache_dir: &Path,
    progress: &mut dyn Progress,
) -> ReelResult<Option<CacheSummary>> {
    let layout = PianoLayout::new(f64::from(settings.output.resolution.width));
    let mut trajectory = RisingDrift::new(settings.fps()?, &settings.effects.smoke);
    build_with(settings, notes, cache_dir, &layout, &mut trajectory, progress)
}

/// Precompute one record per note event into `cache_dir`.
///
/// Returns `Ok(None)` without touching the filesystem when `effects.smoke.dots` is off. Otherwise
/// writes `info.bin` and `<i>.bin` for every event in input order, overwriting earlier files and
/// removing records left over from a build with more events.
#[tracing::instrument(skip_all, fields(dir = %cache_dir.display(), events = notes.len()))]
pub fn build_with(
    settings: &RenderSettings,
    notes: &NoteList,
    cache_dir: &Path,
    geometry: &dyn KeyGeometry,
    trajectory: &mut dyn Trajectory,
    progress: &mut dyn Progress,
) -> ReelResult<Option<CacheSummary>> {
    settings.validate()?;
    let smoke = &settings.effects.smoke;
    if !smoke.dots {
        tracing::debug!("smoke dots disabled, skipping cache build");
        return Ok(None);
    }

    let fps = settings.fps()?;
    let increment = dot_time_increment(smoke, fps);
    let key_line = settings.keyboard_top_px();
    let spans = resolve_spans(notes, geometry)?;
    let total = notes.len();
    tracing::info!(increment, "caching smoke dots for {total} notes");

    std::fs::create_dir_all(cache_dir)
        .map_err(|e| ReelError::io_at("create cache directory", cache_dir, e))?;

    let idx_path = index_path(cache_dir);
    let idx_file =
        File::create(&idx_path).map_err(|e| ReelError::io_at("create cache index", &idx_path, e))?;
    let mut index = BufWriter::new(idx_file);

    let mut dots_written = 0u64;
    for (i, (event, span)) in notes.iter().zip(&spans).enumerate() {
        let position = u32::try_from(i)
            .map_err(|_| ReelError::config("too many note events for a u32 cache index"))?;
        index
            .write_all(&position.to_le_bytes())
            .map_err(|e| ReelError::at_event(i, ReelError::io_at("append to", &idx_path, e)))?;

        let record = simulate_event(
            event,
            span,
            key_line,
            increment,
            smoke.dot_rounding,
            trajectory,
        );
        write_record(&record_path(cache_dir, i), &record)
            .map_err(|e| ReelError::at_event(i, e))?;

        dots_written += u64::from(record.dot_count());
        tracing::debug!(position = i, dots = record.dot_count(), "cached note");
        progress.update(i as u64 + 1, total as u64);
    }
    index
        .flush()
        .map_err(|e| ReelError::io_at("flush cache index", &idx_path, e))?;
    drop(index);

    remove_stale_records(cache_dir, total)?;
    progress.finish(&format!("finished caching {total} smoke dot records"));

    Ok(Some(CacheSummary {
        dir: cache_dir.to_path_buf(),
        events: total,
        dots: dots_written,
    }))
}

fn resolve_spans(notes: &NoteList, geometry: &dyn KeyGeometry) -> ReelResult<Vec<KeySpan>> {
    notes
        .iter()
        .enumerate()
        .map(|(i, ev)| {
            geometry.key_span(ev.note_id).ok_or_else(|| {
                ReelError::at_event(
                    i,
                    ReelError::config(format!("note {} is not on the keyboard", ev.note_id)),
                )
            })
        })
        .collect()
}

// Dots are emitted at evenly spaced times across the event.
fn simulate_event(
    event: &NoteEvent,
    span: &KeySpan,
    key_line: f64,
    increment: f64,
    rounding: Rounding,
    trajectory: &mut dyn Trajectory,
) -> CacheRecord {
    let count = dot_count(event, increment, rounding);
    let origin = Point::new(span.center(), key_line);
    let spacing = if count == 0 {
        0.0
    } else {
        event.duration() / f64::from(count)
    };
    let dots = (0..count)
        .map(|j| {
            trajectory.simulate(&DotSeed {
                note_id: event.note_id,
                index: j,
                time: f64::from(event.start) + spacing * f64::from(j),
                origin,
                key_width: span.width,
            })
        })
        .collect();
    CacheRecord {
        note_id: event.note_id,
        start: event.start,
        end: event.end,
        dots,
    }
}

fn write_record(path: &Path, record: &CacheRecord) -> ReelResult<()> {
    let file = File::create(path).map_err(|e| ReelError::io_at("create cache record", path, e))?;
    let mut w = BufWriter::new(file);
    record
        .write_to(&mut w)
        .and_then(|()| w.flush())
        .map_err(|e| ReelError::io_at("write cache record", path, e))
}

fn remove_stale_records(dir: &Path, count: usize) -> ReelResult<()> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| ReelError::io_at("list cache directory", dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ReelError::io_at("list cache directory", dir, e))?;
        let name = entry.file_name();
        let Some(position) = name
            .to_str()
            .and_then(|n| n.strip_suffix(".bin"))
            .and_then(parse_position)
        else {
            continue;
        };
        if position >= count {
            let path = entry.path();
            std::fs::remove_file(&path)
                .map_err(|e| ReelError::io_at("remove stale cache record", &path, e))?;
        }
    }
    Ok(())
}

// Only names `record_path` could have produced: no sign, no leading zeros.
fn parse_position(stem: &str) -> Option<usize> {
    let position = stem.parse::<usize>().ok()?;
    (position.to_string() == stem).then_some(position)
}

#[cfg(test)]
#[path = "../../tests/unit/cache/build.rs"]
mod tests;
