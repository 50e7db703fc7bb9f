//! Per-dot trajectory simulation used when building the cache.

use crate::cache::format::DotRecord;
use crate::foundation::core::{Fps, Point};
use crate::model::settings::SmokeSettings;

/// Where and when a dot is emitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DotSeed {
    pub note_id: u8,
    /// Index of the dot within its event.
    pub index: u32,
    /// Emission time in seconds.
    pub time: f64,
    /// Key centre on the keyboard line.
    pub origin: Point,
    pub key_width: f64,
}

/// Pluggable dot simulation. Implementations must be deterministic for a given seed.
pub trait Trajectory {
    fn simulate(&mut self, seed: &DotSeed) -> DotRecord;
}

/// Default trajectory: dots rise from the key with a slow sideways sway.
///
/// The sway is `sin(note_id + emission_frame / 10)`; it offsets the emission point by up to a
/// quarter key width and sets the horizontal velocity to `sway * spread`.
#[derive(Clone, Copy, Debug)]
pub struct RisingDrift {
    fps: f64,
    rise_speed: f64,
    spread: f64,
}

impl RisingDrift {
    pub fn new(fps: Fps, smoke: &SmokeSettings) -> Self {
        Self {
            fps: fps.as_f64(),
            rise_speed: smoke.rise_speed,
            spread: smoke.spread,
        }
    }
}

impl Trajectory for RisingDrift {
    fn simulate(&mut self, seed: &DotSeed) -> DotRecord {
        let frame = seed.time * self.fps;
        let sway = (f64::from(seed.note_id) + frame / 10.0).sin();
        DotRecord {
            time: seed.time as f32,
            x: (seed.origin.x + sway * seed.key_width / 4.0) as f32,
            y: seed.origin.y as f32,
            vx: (sway * self.spread) as f32,
            vy: (-self.rise_speed) as f32,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/simulate.rs"]
mod tests;
