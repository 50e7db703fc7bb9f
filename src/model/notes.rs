use crate::foundation::error::{ReelError, ReelResult};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One timed note.
///
/// Deserializes from either the compact `[note, start, end]` tuple form or an object with
/// `note_id`, `start` and `end` keys.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "NoteRepr")]
pub struct NoteEvent {
    /// MIDI note number.
    pub note_id: u8,
    /// Start time in seconds.
    pub start: f32,
    /// End time in seconds.
    pub end: f32,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum NoteRepr {
    Tuple(u8, f32, f32),
    Object {
        #[serde(alias = "note")]
        note_id: u8,
        start: f32,
        end: f32,
    },
}

impl From<NoteRepr> for NoteEvent {
    fn from(r: NoteRepr) -> Self {
        match r {
            NoteRepr::Tuple(note_id, start, end) | NoteRepr::Object {
                note_id,
                start,
                end,
            } => Self::new(note_id, start, end),
        }
    }
}

impl NoteEvent {
    pub const fn new(note_id: u8, start: f32, end: f32) -> Self {
        Self {
            note_id,
            start,
            end,
        }
    }

    /// Length in seconds; never negative.
    pub fn duration(&self) -> f64 {
        (f64::from(self.end) - f64::from(self.start)).max(0.0)
    }

    /// `true` while `t` (seconds) lies in `[start, end)`.
    pub fn is_sounding(&self, t: f64) -> bool {
        f64::from(self.start) <= t && t < f64::from(self.end)
    }

    fn validate(&self, position: usize) -> ReelResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(ReelError::config(format!(
                "note {position}: start and end must be finite"
            )));
        }
        if self.start < 0.0 {
            return Err(ReelError::config(format!(
                "note {position}: start must be >= 0, got {}",
                self.start
            )));
        }
        if self.end < self.start {
            return Err(ReelError::config(format!(
                "note {position}: end {} is before start {}",
                self.end, self.start
            )));
        }
        Ok(())
    }
}

/// Immutable, input-ordered collection of [`NoteEvent`]s.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoteList {
    events: Vec<NoteEvent>,
}

impl NoteList {
    /// Validate and wrap `events`, keeping their order.
    pub fn new(events: Vec<NoteEvent>) -> ReelResult<Self> {
        for (i, ev) in events.iter().enumerate() {
            ev.validate(i)?;
        }
        Ok(Self { events })
    }

    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        let events: Vec<NoteEvent> = serde_json::from_reader(r)
            .map_err(|e| ReelError::config(format!("parse notes JSON: {e}")))?;
        Self::new(events)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| ReelError::io_at("open notes", path, e))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NoteEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Latest end time in seconds, or 0 when empty.
    pub fn end_time(&self) -> f64 {
        self.events
            .iter()
            .map(|e| f64::from(e.end))
            .fold(0.0, f64::max)
    }
}

impl<'a> IntoIterator for &'a NoteList {
    type Item = &'a NoteEvent;
    type IntoIter = std::slice::Iter<'a, NoteEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/notes.rs"]
mod tests;
