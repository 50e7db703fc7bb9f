use crate::foundation::core::{Rect, Rgb8};
use crate::model::keyboard::{KeyGeometry, KeySpan};
use crate::model::notes::NoteList;
use crate::model::settings::RenderSettings;
use crate::render::context::RenderContext;
use crate::stage::registry::Operation;

struct Block {
    span: KeySpan,
    start: f64,
    end: f64,
}

/// Falling note blocks above the keyboard line.
///
/// A block's lower edge reaches the keyboard when its note starts and its upper edge when it
/// ends.
pub struct NoteBlocks {
    blocks: Vec<Block>,
    key_line: f64,
    px_per_sec: f64,
    color: Rgb8,
}

impl NoteBlocks {
    pub const NAME: &'static str = "note_blocks";

    /// Notes that are not on the keyboard are left out.
    pub fn new(settings: &RenderSettings, notes: &NoteList, geometry: &dyn KeyGeometry) -> Self {
        let blocks = notes
            .iter()
            .filter_map(|ev| {
                let span = geometry.key_span(ev.note_id)?;
                Some(Block {
                    span,
                    start: f64::from(ev.start),
                    end: f64::from(ev.end),
                })
            })
            .collect();
        Self {
            blocks,
            key_line: settings.keyboard_top_px(),
            px_per_sec: settings.blocks.speed * f64::from(settings.output.resolution.height),
            color: settings.blocks.color,
        }
    }

    /// Vertical extent of a block at time `t`, clipped to the area above the keyboard.
    fn extent(&self, block: &Block, t: f64) -> Option<(f64, f64)> {
        let bottom = self.key_line - (block.start - t) * self.px_per_sec;
        let top = self.key_line - (block.end - t) * self.px_per_sec;
        let (top, bottom) = (top.max(0.0), bottom.min(self.key_line));
        (bottom > top).then_some((top, bottom))
    }
}

impl Operation for NoteBlocks {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&mut self, ctx: &mut RenderContext) -> anyhow::Result<()> {
        let t = ctx.time_secs();
        let image = ctx.image_mut();
        for block in &self.blocks {
            if let Some((top, bottom)) = self.extent(block, t) {
                let x0 = block.span.x;
                let x1 = block.span.x + block.span.width;
                image.fill_rect(Rect::new(x0, top, x1, bottom), self.color);
            }
        }
        Ok(())
    }
}
