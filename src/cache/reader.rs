use crate::cache::format::{CacheRecord, index_path, read_u32, record_path};
use crate::foundation::error::{ReelError, ReelResult};
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

/// Read-only view of a built cache directory.
///
/// Records are decoded on demand; the layout is trusted, so a truncated file only surfaces as an
/// I/O error from the short read.
#[derive(Clone, Debug)]
pub struct DotCache {
    dir: PathBuf,
    index: Vec<u32>,
}

impl DotCache {
    /// Open `dir` and load its index.
    pub fn open(dir: impl Into<PathBuf>) -> ReelResult<Self> {
        let dir = dir.into();
        let index = read_index(&dir)?;
        Ok(Self { dir, index })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Indexed event positions, in input order.
    pub fn positions(&self) -> &[u32] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Decode the record of the `nth` indexed event.
    pub fn record(&self, nth: usize) -> ReelResult<CacheRecord> {
        let position = *self.index.get(nth).ok_or(ReelError::MissingEvent {
            position: nth,
            len: self.index.len(),
        })?;
        let path = record_path(&self.dir, position as usize);
        let f = File::open(&path).map_err(|e| ReelError::io_at("open cache record", &path, e))?;
        CacheRecord::read_from(&mut BufReader::new(f))
            .map_err(|e| ReelError::io_at("read cache record", &path, e))
    }

    /// Decode every record in index order.
    pub fn records(&self) -> ReelResult<Vec<CacheRecord>> {
        (0..self.index.len()).map(|i| self.record(i)).collect()
    }
}

/// Read the `u32` positions of `dir`'s index file.
pub fn read_index(dir: &Path) -> ReelResult<Vec<u32>> {
    let path = index_path(dir);
    let f = File::open(&path).map_err(|e| ReelError::io_at("open cache index", &path, e))?;
    let mut r = BufReader::new(f);
    let mut out = Vec::new();
    loop {
        match read_u32(&mut r) {
            Ok(v) => out.push(v),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(ReelError::io_at("read cache index", &path, e)),
        }
    }
    Ok(out)
}
