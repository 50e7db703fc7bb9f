//! Built-in render operations.
//!
//! Each one is an ordinary [`Operation`](crate::stage::registry::Operation); externally supplied
//! operations register the same way.

pub mod blocks;
pub mod keyboard;
pub mod smoke;

pub use blocks::NoteBlocks;
pub use keyboard::Keyboard;
pub use smoke::SmokeDots;

use crate::cache::reader::DotCache;
use crate::foundation::error::ReelResult;
use crate::model::keyboard::PianoLayout;
use crate::model::notes::NoteList;
use crate::render::context::RenderContext;
use crate::stage::phase::Phase;

/// Register the built-in operations enabled in the context's settings.
///
/// - [`NoteBlocks`] in `frame`
/// - [`Keyboard`] in `frame_deinit`
/// - [`SmokeDots`] in `modifiers`, only when smoke dots are on and `smoke_cache` is given
pub fn register_builtin(
    ctx: &mut RenderContext,
    notes: &NoteList,
    smoke_cache: Option<&DotCache>,
) -> ReelResult<()> {
    let settings = ctx.shared_settings();
    let layout = PianoLayout::new(f64::from(ctx.resolution.width));

    if settings.blocks.enabled {
        ctx.stages
            .register(Phase::Frame, NoteBlocks::new(&settings, notes, &layout));
    }
    if settings.keyboard.visible {
        ctx.stages
            .register(Phase::FrameDeinit, Keyboard::new(&settings, notes, &layout));
    }
    if settings.effects.smoke.dots {
        match smoke_cache {
            Some(cache) => ctx.stages.register(
                Phase::Modifiers,
                SmokeDots::new(cache, &settings.effects.smoke)?,
            ),
            None => tracing::warn!("smoke dots enabled but no cache given, skipping"),
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/ops/builtin.rs"]
mod tests;
