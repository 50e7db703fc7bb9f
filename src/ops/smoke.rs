use crate::cache::format::{CacheRecord, DotRecord};
use crate::cache::reader::DotCache;
use crate::foundation::core::{Point, Rgb8};
use crate::foundation::error::ReelResult;
use crate::model::settings::SmokeSettings;
use crate::render::context::RenderContext;
use crate::stage::registry::Operation;

/// Replays cached smoke dots. Nothing is simulated at render time.
///
/// A dot's velocity decays by `air_resist` per second, so after `age` seconds it has moved
/// `v * (1 - k^age) / ln(1 / k)` pixels along each axis.
pub struct SmokeDots {
    records: Vec<CacheRecord>,
    max_age: f64,
    air_resist: f64,
    intensity: f64,
}

impl SmokeDots {
    pub const NAME: &'static str = "smoke_dots";

    /// Load every record of `cache` up front.
    pub fn new(cache: &DotCache, smoke: &SmokeSettings) -> ReelResult<Self> {
        Ok(Self::from_records(cache.records()?, smoke))
    }

    pub fn from_records(records: Vec<CacheRecord>, smoke: &SmokeSettings) -> Self {
        Self {
            records,
            max_age: smoke.max_age,
            air_resist: smoke.air_resist,
            intensity: smoke.intensity,
        }
    }

    /// Position and brightness of `dot` at time `t`, or `None` when it is not alive.
    pub fn dot_at(&self, dot: &DotRecord, t: f64) -> Option<(Point, f64)> {
        let age = t - f64::from(dot.time);
        if !(0.0..self.max_age).contains(&age) {
            return None;
        }
        let travel = self.travel_secs(age);
        let pos = Point::new(
            f64::from(dot.x) + f64::from(dot.vx) * travel,
            f64::from(dot.y) + f64::from(dot.vy) * travel,
        );
        // Fades slowly at first, then drops off.
        let value = 1.0 - (age / self.max_age).powi(2);
        Some((pos, value))
    }

    // Integral of k^s over [0, age]: seconds of undamped flight covering the same distance.
    fn travel_secs(&self, age: f64) -> f64 {
        let k = self.air_resist;
        if k >= 1.0 {
            return age;
        }
        (1.0 - k.powf(age)) / (1.0 / k).ln()
    }
}

impl Operation for SmokeDots {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn run(&mut self, ctx: &mut RenderContext) -> anyhow::Result<()> {
        let t = ctx.time_secs();
        let image = ctx.image_mut();
        for record in &self.records {
            if t < f64::from(record.start) || t >= f64::from(record.end) + self.max_age {
                continue;
            }
            for dot in &record.dots {
                let Some((pos, value)) = self.dot_at(dot, t) else {
                    continue;
                };
                let shade = (255.0 * value).round() as u8;
                let color = Rgb8::new(shade, shade, shade);
                let (x, y) = (pos.x.floor() as i64, pos.y.floor() as i64);
                image.blend_pixel(x, y, color, self.intensity);
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        image.blend_pixel(x + dx, y + dy, color, self.intensity / 3.0);
                    }
                }
            }
        }
        Ok(())
    }
}
