use crate::core::DVec3;

/// Linearly remap `value` from `[old_min, old_max]` into
/// `[new_min, new_max]`, truncating toward zero.
///
/// A degenerate input range (`old_max == old_min`) maps everything to
/// `new_min`. Inputs outside the old range are not clamped and land
/// outside the new range; staying in range is the caller's invariant
/// (the value came from the same scan that produced the bounds).
pub fn remap(value: f64, old_min: f64, old_max: f64, new_min: f64, new_max: f64) -> i64 {
    if old_max == old_min {
        return new_min as i64;
    }
    let ratio = (value - old_min) / (old_max - old_min);
    (new_min + ratio * (new_max - new_min)) as i64
}

/// Quantize one delta channel into a texture byte.
///
/// The clamp narrows out-of-contract inputs instead of wrapping them;
/// in-range values are untouched (`value == max` lands exactly on 255
/// before the clamp).
pub fn quantize_channel(value: f64, min: f64, max: f64) -> u8 {
    remap(value, min, max, 0.0, 255.0).clamp(0, 255) as u8
}

/// Invert [`quantize_channel`]: the contract a runtime decoder applies
/// to the texture, `min + pixel/255 * (max - min)`.
pub fn dequantize_channel(pixel: u8, min: f64, max: f64) -> f64 {
    min + f64::from(pixel) / 255.0 * (max - min)
}

/// Per-axis min/max accumulated over every computed delta frame.
#[derive(Clone, Copy, Debug)]
pub struct DeltaRange {
    pub min: DVec3,
    pub max: DVec3,
}

impl DeltaRange {
    pub fn empty() -> Self {
        Self {
            min: DVec3::INFINITY,
            max: DVec3::NEG_INFINITY,
        }
    }

    pub fn observe(&mut self, delta: DVec3) {
        self.min = self.min.min(delta);
        self.max = self.max.max(delta);
    }

    pub fn observe_all<'a>(&mut self, deltas: impl IntoIterator<Item = &'a DVec3>) {
        for d in deltas {
            self.observe(*d);
        }
    }
}
