use crate::error::{VatError, VatResult};

pub use glam::DVec3;

/// Inclusive timeline span, Maya-style: frame numbers are plain `i32`
/// and both endpoints are sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameSpan {
    pub start: i32,
    pub end: i32,
}

impl FrameSpan {
    pub fn new(start: i32, end: i32) -> VatResult<Self> {
        if start > end {
            return Err(VatError::config("FrameSpan start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn total_frames(self) -> u32 {
        (i64::from(self.end) - i64::from(self.start) + 1) as u32
    }

    pub fn contains(self, frame: i32) -> bool {
        self.start <= frame && frame <= self.end
    }

    pub fn frames(self) -> impl Iterator<Item = i32> {
        self.start..=self.end
    }
}

/// Coordinate space a mesh is sampled in. Normals are always sampled
/// in object space regardless of this setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Space {
    World,
    Object,
}

impl Space {
    pub fn as_str(self) -> &'static str {
        match self {
            Space::World => "world",
            Space::Object => "object",
        }
    }
}
