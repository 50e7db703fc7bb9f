use crate::foundation::core::{Fps, Resolution, Rgb8, Rounding};
use crate::foundation::error::{ReelError, ReelResult};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read-only render configuration.
///
/// Loaded once (usually from JSON) and validated before any cache or frame work starts. Nothing in
/// the pipeline mutates it afterwards.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderSettings {
    pub output: OutputSettings,
    #[serde(default)]
    pub timeline: TimelineSettings,
    #[serde(default)]
    pub keyboard: KeyboardSettings,
    #[serde(default)]
    pub blocks: BlockSettings,
    #[serde(default)]
    pub effects: EffectSettings,
    /// Free-form parameters for externally registered operations.
    #[serde(default)]
    pub addons: BTreeMap<String, serde_json::Value>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    pub resolution: Resolution,
    /// Integer frames per second.
    pub fps: u32,
    #[serde(default)]
    pub background: Rgb8,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimelineSettings {
    /// Seconds of pre-roll before the first note.
    pub pause_start: f64,
    /// Seconds of tail after the last note ends.
    pub pause_end: f64,
    pub frame_rounding: Rounding,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            pause_start: 1.0,
            pause_end: 1.0,
            frame_rounding: Rounding::TowardZero,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyboardSettings {
    /// Fraction of the output height at which the keyboard starts.
    pub top: f64,
    pub visible: bool,
}

impl Default for KeyboardSettings {
    fn default() -> Self {
        Self {
            top: 0.5,
            visible: true,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockSettings {
    pub enabled: bool,
    /// Fall speed as a fraction of the output height per second.
    pub speed: f64,
    pub color: Rgb8,
}

impl Default for BlockSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 0.25,
            color: Rgb8::new(200, 220, 255),
        }
    }
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectSettings {
    pub smoke: SmokeSettings,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SmokeSettings {
    /// Toggle for the precomputed smoke dots.
    pub dots: bool,
    /// Dots per second.
    pub dps: f64,
    pub dot_rounding: Rounding,
    /// Upward speed in pixels per second.
    pub rise_speed: f64,
    /// Horizontal drift amplitude in pixels per second.
    pub spread: f64,
    /// Seconds a dot stays visible.
    pub max_age: f64,
    /// Fraction of a dot's velocity left after one second of flight; 1 disables damping.
    pub air_resist: f64,
    pub intensity: f64,
}

impl Default for SmokeSettings {
    fn default() -> Self {
        Self {
            dots: false,
            dps: 10.0,
            dot_rounding: Rounding::Floor,
            rise_speed: 100.0,
            spread: 10.0,
            max_age: 8.0,
            air_resist: 0.95,
            intensity: 0.6,
        }
    }
}

impl RenderSettings {
    /// Minimal settings for the given output; every other section takes its defaults.
    pub fn new(resolution: Resolution, fps: u32) -> Self {
        Self {
            output: OutputSettings {
                resolution,
                fps,
                background: Rgb8::BLACK,
            },
            timeline: TimelineSettings::default(),
            keyboard: KeyboardSettings::default(),
            blocks: BlockSettings::default(),
            effects: EffectSettings::default(),
            addons: BTreeMap::new(),
        }
    }

    /// Parse settings from a JSON reader and validate them.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        let settings: Self = serde_json::from_reader(r)
            .map_err(|e| ReelError::config(format!("parse settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a JSON file on disk and validate them.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| ReelError::io_at("open settings", path, e))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> ReelResult<()> {
        self.output.resolution.validate()?;
        if self.output.fps == 0 {
            return Err(ReelError::config("output.fps must be > 0"));
        }
        check_non_negative("timeline.pause_start", self.timeline.pause_start)?;
        check_non_negative("timeline.pause_end", self.timeline.pause_end)?;
        if !(0.0..=1.0).contains(&self.keyboard.top) {
            return Err(ReelError::config("keyboard.top must be within [0, 1]"));
        }
        check_non_negative("blocks.speed", self.blocks.speed)?;

        let smoke = &self.effects.smoke;
        check_non_negative("effects.smoke.dps", smoke.dps)?;
        check_non_negative("effects.smoke.rise_speed", smoke.rise_speed)?;
        check_non_negative("effects.smoke.spread", smoke.spread)?;
        if !smoke.max_age.is_finite() || smoke.max_age <= 0.0 {
            return Err(ReelError::config("effects.smoke.max_age must be > 0"));
        }
        if !smoke.air_resist.is_finite() || smoke.air_resist <= 0.0 || smoke.air_resist > 1.0 {
            return Err(ReelError::config(
                "effects.smoke.air_resist must be within (0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&smoke.intensity) {
            return Err(ReelError::config(
                "effects.smoke.intensity must be within [0, 1]",
            ));
        }
        Ok(())
    }

    pub fn fps(&self) -> ReelResult<Fps> {
        Fps::new(self.output.fps, 1)
    }

    /// Pixel row of the keyboard's top edge.
    pub fn keyboard_top_px(&self) -> f64 {
        f64::from(self.output.resolution.height) * self.keyboard.top
    }

    /// Resolve a dotted key (`"glow.radius"`) inside the `addons` section.
    pub fn lookup(&self, key: &str) -> Option<&serde_json::Value> {
        let mut parts = key.split('.');
        let mut cur = self.addons.get(parts.next()?)?;
        for part in parts {
            cur = cur.get(part)?;
        }
        Some(cur)
    }
}

fn check_non_negative(key: &str, v: f64) -> ReelResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(ReelError::config(format!(
            "{key} must be a finite value >= 0, got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/model/settings.rs"]
mod tests;
