//! Horizontal key geometry of the on-screen keyboard.

/// Lowest MIDI note on an 88-key piano (A0).
pub const LOWEST_NOTE: u8 = 21;
/// Highest MIDI note on an 88-key piano (C8).
pub const HIGHEST_NOTE: u8 = 108;
const WHITE_KEY_COUNT: u32 = 52;
const BLACK_KEY_RATIO: f64 = 0.6;

/// Horizontal extent of one key, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeySpan {
    pub x: f64,
    pub width: f64,
}

impl KeySpan {
    pub fn center(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Maps a note to its key position on screen.
pub trait KeyGeometry {
    /// `None` when the note is not on the keyboard.
    fn key_span(&self, note: u8) -> Option<KeySpan>;
}

/// Standard 88-key layout stretched across the output width.
#[derive(Clone, Copy, Debug)]
pub struct PianoLayout {
    white_width: f64,
}

impl PianoLayout {
    pub fn new(output_width: f64) -> Self {
        Self {
            white_width: output_width / f64::from(WHITE_KEY_COUNT),
        }
    }

    pub fn white_width(&self) -> f64 {
        self.white_width
    }

    pub fn black_width(&self) -> f64 {
        self.white_width * BLACK_KEY_RATIO
    }

    /// All notes on the keyboard, lowest first.
    pub fn notes() -> impl Iterator<Item = u8> {
        LOWEST_NOTE..=HIGHEST_NOTE
    }
}

pub fn is_black(note: u8) -> bool {
    matches!(note % 12, 1 | 3 | 6 | 8 | 10)
}

/// White keys strictly below `note`, counted from the bottom of the keyboard.
fn white_keys_below(note: u8) -> u32 {
    (LOWEST_NOTE..note).filter(|n| !is_black(*n)).count() as u32
}

impl KeyGeometry for PianoLayout {
    fn key_span(&self, note: u8) -> Option<KeySpan> {
        if !(LOWEST_NOTE..=HIGHEST_NOTE).contains(&note) {
            return None;
        }
        let boundary = f64::from(white_keys_below(note)) * self.white_width;
        if is_black(note) {
            let width = self.black_width();
            Some(KeySpan {
                x: boundary - width / 2.0,
                width,
            })
        } else {
            Some(KeySpan {
                x: boundary,
                width: self.white_width,
            })
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/keyboard.rs"]
mod tests;
