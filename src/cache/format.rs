//! On-disk layout of the effect cache.
//!
//! A cache directory holds one index file plus one record file per note event:
//!
//! - `info.bin`: `u32` positions, little-endian, in event input order.
//! - `<position>.bin`: `note_id: u8 | start: f32 | end: f32 | dot_count: u32 | dot_count x dot`,
//!   little-endian, where each dot is `time: f32 | x: f32 | y: f32 | vx: f32 | vy: f32`.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Name of the index file inside a cache directory.
pub const INDEX_FILE: &str = "info.bin";
/// Bytes before the first dot record.
pub const RECORD_HEADER_LEN: usize = 1 + 4 + 4 + 4;
/// Bytes per dot record.
pub const DOT_RECORD_LEN: usize = 5 * 4;

// Upper bound for preallocating dots from an untrusted count.
const MAX_PREALLOC_DOTS: usize = 4096;

/// One simulated dot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotRecord {
    /// Emission time in seconds.
    pub time: f32,
    /// Emission position in pixels.
    pub x: f32,
    pub y: f32,
    /// Velocity in pixels per second.
    pub vx: f32,
    pub vy: f32,
}

impl DotRecord {
    pub fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        for v in [self.time, self.x, self.y, self.vx, self.vy] {
            w.write_all(&v.to_le_bytes())?;
        }
        Ok(())
    }

    pub fn read_from(r: &mut impl Read) -> io::Result<Self> {
        Ok(Self {
            time: read_f32(r)?,
            x: read_f32(r)?,
            y: read_f32(r)?,
            vx: read_f32(r)?,
            vy: read_f32(r)?,
        })
    }
}

/// Precomputed data for one note event.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheRecord {
    pub note_id: u8,
    pub start: f32,
    pub end: f32,
    pub dots: Vec<DotRecord>,
}

impl CacheRecord {
    /// Declared dot count; always the number of stored dots.
    pub fn dot_count(&self) -> u32 {
        self.dots.len() as u32
    }

    pub fn encoded_len(&self) -> usize {
        RECORD_HEADER_LEN + self.dots.len() * DOT_RECORD_LEN
    }

    pub fn write_to(&self, w: &mut impl Write) -> io::Result<()> {
        let count = u32::try_from(self.dots.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many dots"))?;
        w.write_all(&[self.note_id])?;
        w.write_all(&self.start.to_le_bytes())?;
        w.write_all(&self.end.to_le_bytes())?;
        w.write_all(&count.to_le_bytes())?;
        for dot in &self.dots {
            dot.write_to(w)?;
        }
        Ok(())
    }

    /// Decode one record. Trailing bytes after the declared dots are not inspected.
    pub fn read_from(r: &mut impl Read) -> io::Result<Self> {
        let mut note = [0u8; 1];
        r.read_exact(&mut note)?;
        let start = read_f32(r)?;
        let end = read_f32(r)?;
        let count = read_u32(r)? as usize;
        let mut dots = Vec::with_capacity(count.min(MAX_PREALLOC_DOTS));
        for _ in 0..count {
            dots.push(DotRecord::read_from(r)?);
        }
        Ok(Self {
            note_id: note[0],
            start,
            end,
            dots,
        })
    }
}

/// Path of the record file for the event at `position`.
pub fn record_path(dir: &Path, position: usize) -> PathBuf {
    dir.join(format!("{position}.bin"))
}

pub fn index_path(dir: &Path) -> PathBuf {
    dir.join(INDEX_FILE)
}

pub(crate) fn read_u32(r: &mut impl Read) -> io::Result<u32> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b)?;
    Ok(u32::from_le_bytes(b))
}

fn read_f32(r: &mut impl Read) -> io::Result<f32> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b)?;
    Ok(f32::from_le_bytes(b))
}

#[cfg(test)]
#[path = "../../tests/unit/cache/format.rs"]
mod tests;
