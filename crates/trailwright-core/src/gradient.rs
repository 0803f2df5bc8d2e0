//! Color/alpha gradient over the normalized ribbon length.
//!
//! Color and alpha are keyed independently, each with at most
//! [`MAX_GRADIENT_KEYS`] stops, and combined into one RGBA sample.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrailError};

pub const MAX_GRADIENT_KEYS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientMode {
    /// Linear blend between neighbouring keys.
    #[default]
    Blend,
    /// Step: the first key at or after `t` wins.
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorKey {
    pub time: f32,
    pub color: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlphaKey {
    pub time: f32,
    pub alpha: f32,
}

impl ColorKey {
    pub fn new(time: f32, color: Vec3) -> Self {
        Self { time, color }
    }
}

impl AlphaKey {
    pub fn new(time: f32, alpha: f32) -> Self {
        Self { time, alpha }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GradientDef", into = "GradientDef")]
pub struct Gradient {
    mode: GradientMode,
    color_keys: Vec<ColorKey>,
    alpha_keys: Vec<AlphaKey>,
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct GradientDef {
    mode: GradientMode,
    color_keys: Vec<ColorKey>,
    alpha_keys: Vec<AlphaKey>,
}

impl Default for GradientDef {
    fn default() -> Self {
        Gradient::default().into()
    }
}

impl Gradient {
    pub fn new(
        mode: GradientMode,
        mut color_keys: Vec<ColorKey>,
        mut alpha_keys: Vec<AlphaKey>,
    ) -> Result<Self> {
        if color_keys.len() > MAX_GRADIENT_KEYS {
            return Err(TrailError::TooManyColorKeys {
                len: color_keys.len(),
                max: MAX_GRADIENT_KEYS,
            });
        }
        if alpha_keys.len() > MAX_GRADIENT_KEYS {
            return Err(TrailError::TooManyAlphaKeys {
                len: alpha_keys.len(),
                max: MAX_GRADIENT_KEYS,
            });
        }
        if color_keys.iter().any(|k| !k.time.is_finite() || !k.color.is_finite())
            || alpha_keys.iter().any(|k| !k.time.is_finite() || !k.alpha.is_finite())
        {
            return Err(TrailError::invalid("color_gradient", "keys must be finite"));
        }
        color_keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        alpha_keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self {
            mode,
            color_keys,
            alpha_keys,
        })
    }

    /// Two-stop gradient from `start` to `end`, both RGBA.
    pub fn two_stop(start: Vec4, end: Vec4) -> Self {
        Self {
            mode: GradientMode::Blend,
            color_keys: vec![
                ColorKey::new(0.0, start.truncate()),
                ColorKey::new(1.0, end.truncate()),
            ],
            alpha_keys: vec![AlphaKey::new(0.0, start.w), AlphaKey::new(1.0, end.w)],
        }
    }

    pub fn mode(&self) -> GradientMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: GradientMode) {
        self.mode = mode;
    }

    pub fn color_keys(&self) -> &[ColorKey] {
        &self.color_keys
    }

    pub fn alpha_keys(&self) -> &[AlphaKey] {
        &self.alpha_keys
    }

    /// RGBA at `t`. Missing color keys read as white, missing alpha keys as opaque.
    pub fn evaluate(&self, t: f32) -> Vec4 {
        let rgb = match sample(&self.color_keys, t, self.mode, |k| k.time) {
            Some(Sample { lo, hi, f }) => {
                self.color_keys[lo].color.lerp(self.color_keys[hi].color, f)
            }
            None => Vec3::ONE,
        };
        let alpha = match sample(&self.alpha_keys, t, self.mode, |k| k.time) {
            Some(Sample { lo, hi, f }) => {
                let a = self.alpha_keys[lo].alpha;
                a + (self.alpha_keys[hi].alpha - a) * f
            }
            None => 1.0,
        };
        rgb.extend(alpha)
    }

    pub(crate) fn clear(&mut self) {
        self.color_keys = Vec::new();
        self.alpha_keys = Vec::new();
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::two_stop(Vec4::ONE, Vec4::ONE)
    }
}

impl TryFrom<GradientDef> for Gradient {
    type Error = TrailError;

    fn try_from(def: GradientDef) -> Result<Self> {
        Self::new(def.mode, def.color_keys, def.alpha_keys)
    }
}

impl From<Gradient> for GradientDef {
    fn from(g: Gradient) -> Self {
        Self {
            mode: g.mode,
            color_keys: g.color_keys,
            alpha_keys: g.alpha_keys,
        }
    }
}

struct Sample {
    lo: usize,
    hi: usize,
    f: f32,
}

fn sample<K>(keys: &[K], t: f32, mode: GradientMode, time: impl Fn(&K) -> f32) -> Option<Sample> {
    let last = keys.len().checked_sub(1)?;
    let pin = |i: usize| Some(Sample { lo: i, hi: i, f: 0.0 });
    if t.is_nan() || t <= time(&keys[0]) {
        return pin(0);
    }
    if t >= time(&keys[last]) {
        return pin(last);
    }
    match mode {
        GradientMode::Fixed => pin(keys.partition_point(|k| time(k) < t)),
        GradientMode::Blend => {
            let hi = keys.partition_point(|k| time(k) <= t);
            let lo = hi - 1;
            let span = time(&keys[hi]) - time(&keys[lo]);
            if span <= f32::EPSILON {
                return pin(hi);
            }
            Some(Sample {
                lo,
                hi,
                f: (t - time(&keys[lo])) / span,
            })
        }
    }
}
