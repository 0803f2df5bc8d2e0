//! Width-over-length curve.
//!
//! A small, bounded list of `(time, value)` keyframes evaluated with
//! piecewise-linear interpolation. Parameters outside the keyed range clamp
//! to the first/last keyframe.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrailError};

/// Upper bound on keyframes in a [`WidthCurve`].
pub const MAX_WIDTH_KEYFRAMES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatKeyframe {
    pub time: f32,
    pub value: f32,
}

impl FloatKeyframe {
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Keyframes are always sorted by `time`; construction goes through
/// [`WidthCurve::new`] so the length bound holds for every instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FloatKeyframe>", into = "Vec<FloatKeyframe>")]
pub struct WidthCurve {
    keys: Vec<FloatKeyframe>,
}

impl WidthCurve {
    /// Validates and sorts `keys`.
    ///
    /// Fails with [`TrailError::WidthCurveTooLong`] for more than
    /// [`MAX_WIDTH_KEYFRAMES`] entries and [`TrailError::NonFiniteKeyframe`]
    /// when any time or value is NaN or infinite.
    pub fn new(mut keys: Vec<FloatKeyframe>) -> Result<Self> {
        if keys.len() > MAX_WIDTH_KEYFRAMES {
            return Err(TrailError::WidthCurveTooLong {
                len: keys.len(),
                max: MAX_WIDTH_KEYFRAMES,
            });
        }
        if let Some((index, key)) = keys
            .iter()
            .enumerate()
            .find(|(_, k)| !k.time.is_finite() || !k.value.is_finite())
        {
            return Err(TrailError::NonFiniteKeyframe {
                index,
                time: key.time,
                value: key.value,
            });
        }
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Ok(Self { keys })
    }

    /// A flat curve returning `value` everywhere.
    pub fn constant(value: f32) -> Self {
        Self {
            keys: vec![FloatKeyframe::new(0.0, value), FloatKeyframe::new(1.0, value)],
        }
    }

    /// Linear ramp from `start` at `t = 0` to `end` at `t = 1`.
    pub fn linear(start: f32, end: f32) -> Self {
        Self {
            keys: vec![FloatKeyframe::new(0.0, start), FloatKeyframe::new(1.0, end)],
        }
    }

    pub fn keys(&self) -> &[FloatKeyframe] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Evaluates the curve at `t`. An empty curve evaluates to `1.0`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 1.0,
        };
        if t.is_nan() || t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }
        // first.time < t < last.time, so the bracket is interior
        let upper = self.keys.partition_point(|k| k.time <= t);
        let a = self.keys[upper - 1];
        let b = self.keys[upper];
        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return b.value;
        }
        let f = (t - a.time) / span;
        a.value + (b.value - a.value) * f
    }

    pub(crate) fn clear(&mut self) {
        self.keys = Vec::new();
    }
}

impl Default for WidthCurve {
    fn default() -> Self {
        Self::constant(1.0)
    }
}

impl TryFrom<Vec<FloatKeyframe>> for WidthCurve {
    type Error = TrailError;

    fn try_from(keys: Vec<FloatKeyframe>) -> Result<Self> {
        Self::new(keys)
    }
}

impl From<WidthCurve> for Vec<FloatKeyframe> {
    fn from(curve: WidthCurve) -> Self {
        curve.keys
    }
}
