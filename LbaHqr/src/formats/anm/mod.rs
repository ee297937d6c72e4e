//! ANM skeletal animation format
//!
//! An 8-byte header followed by `num_keyframes` keyframes. Every keyframe
//! carries a root offset and exactly `num_boneframes` per-bone poses, one for
//! each of the first `num_boneframes` bones of the body.
//!
//! - [`reader`] decodes entries
//! - [`playback`] unwraps angles and expands keyframes into per-bone tracks
//! - [`timeline`] lays several animations out as named clips

pub mod playback;
pub mod reader;
pub mod timeline;

pub use playback::{TrackKey, unwrap_angle, unwrap_angles};
pub use reader::parse_animation;
pub use timeline::{Clip, ClipTimeline};

use glam::Vec3;
use serde::Serialize;

/// Degrees per raw rotation unit (a full turn is 4096 units)
pub const DEGREES_PER_UNIT: f32 = 360.0 / 4096.0;

/// Size of the animation header
pub const HEADER_SIZE: usize = 8;

/// Pose of one bone within a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Boneframe {
    /// Raw bone type 0: Euler rotation in degrees
    Rotation { degrees: Vec3 },
    /// Any other bone type: offset in scaled model units
    Translation { bone_type: i16, offset: Vec3 },
}

impl Boneframe {
    #[must_use]
    pub fn bone_type(&self) -> i16 {
        match self {
            Self::Rotation { .. } => 0,
            Self::Translation { bone_type, .. } => *bone_type,
        }
    }

    /// The stored vector: degrees for a rotation, units for a translation
    #[must_use]
    pub fn vector(&self) -> Vec3 {
        match self {
            Self::Rotation { degrees } => *degrees,
            Self::Translation { offset, .. } => *offset,
        }
    }

    #[must_use]
    pub fn is_rotation(&self) -> bool {
        matches!(self, Self::Rotation { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyframe {
    /// Duration in milliseconds
    pub length: u16,
    /// Root displacement, scaled
    pub offset: Vec3,
    /// Set when any boneframe is a translation
    pub can_fall: bool,
    pub boneframes: Vec<Boneframe>,
}

/// A decoded ANM animation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Animation {
    pub num_keyframes: u16,
    pub num_boneframes: u16,
    /// Keyframe that playback returns to after the last one
    pub loop_frame: u16,
    pub unk1: u16,
    pub keyframes: Vec<Keyframe>,
}

impl Animation {
    /// Sum of all keyframe lengths in milliseconds
    #[must_use]
    pub fn total_length(&self) -> u32 {
        self.keyframes.iter().map(|k| u32::from(k.length)).sum()
    }

    #[must_use]
    pub fn can_fall(&self) -> bool {
        self.keyframes.iter().any(|k| k.can_fall)
    }
}
