use crate::foundation::core::{Rect, Rgb8};
use crate::model::keyboard::{KeyGeometry, KeySpan, PianoLayout, is_black};
use crate::model::notes::{NoteEvent, NoteList};
use crate::model::settings::RenderSettings;
use crate::render::context::RenderContext;
use crate::stage::registry::Operation;

const BLACK_KEY_LENGTH: f64 = 0.6;
const KEY_GAP_PX: f64 = 1.0;

/// Piano keyboard below the keyboard line; sounding keys take the block color.
pub struct Keyboard {
    white: Vec<(u8, KeySpan)>,
    black: Vec<(u8, KeySpan)>,
    notes: Vec<NoteEvent>,
    top: f64,
    bottom: f64,
    pressed: Rgb8,
}

impl Keyboard {
    pub const NAME: &'static str = "keyboard";

    /// Keys missing from `geometry` are not drawn.
    pub fn new(settings: &RenderSettings, notes: &NoteList, geometry: &dyn KeyGeometry) -> Self {
        let (black, white): (Vec<_>, Vec<_>) = PianoLayout::notes()
            .filter_map(|n| Some((n, geometry.key_span(n)?)))
            .partition(|(n, _)| is_black(*n));
        Self {
            white,
            black,
            notes: notes.events().to_vec(),
            top: settings.keyboard_top_px(),
            bottom: f64::from(settings.output.resolution.height),
            pressed: settings.blocks.color,
        }
    }

    fn is_pressed(&self, note: u8, t: f64) -> bool {
        self.notes
            .iter()
            .any(|ev| ev.note_id == note && ev.is_sounding(t))
    }
}

impl Operation for Keyboard {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&mut self, ctx: &mut RenderContext) -> anyhow::Result<()> {
        let t = ctx.time_secs();
        let black_bottom = self.top + (self.bottom - self.top) * BLACK_KEY_LENGTH;
        let image = ctx.image_mut();
        for (note, span) in &self.white {
            let color = if self.is_pressed(*note, t) {
                self.pressed
            } else {
                Rgb8::WHITE
            };
            let rect = Rect::new(span.x, self.top, span.x + span.width - KEY_GAP_PX, self.bottom);
            image.fill_rect(rect, color);
        }
        for (note, span) in &self.black {
            let color = if self.is_pressed(*note, t) {
                self.pressed.mix(Rgb8::BLACK, 0.4)
            } else {
                Rgb8::BLACK
            };
            let rect = Rect::new(span.x, self.top, span.x + span.width, black_bottom);
            image.fill_rect(rect, color);
        }
        Ok(())
    }
}
