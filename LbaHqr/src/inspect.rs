//! Summaries of decoded bodies and animations
//!
//! Small serializable views used for listings and JSON reports.

use serde::Serialize;

use crate::formats::anm::Animation;
use crate::formats::lm2::{BodyFlags, BoundingBox, Model};

/// Counts and flags of a decoded body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub flags: BodyFlags,
    pub bounding_box: BoundingBox,
    pub bones: usize,
    pub vertices: usize,
    pub normals: usize,
    pub polygons: usize,
    pub textured_polygons: usize,
    pub lines: usize,
    pub spheres: usize,
    pub uv_groups: usize,
    /// Distinct colour indices, in first-use order
    pub colours: Vec<u8>,
}

impl ModelInfo {
    #[must_use]
    pub fn from_model(model: &Model) -> Self {
        Self {
            flags: model.flags(),
            bounding_box: model.header.bounding_box,
            bones: model.bones.len(),
            vertices: model.vertices.len(),
            normals: model.normals.len(),
            polygons: model.polygons.len(),
            textured_polygons: model.polygons.iter().filter(|p| p.is_textured()).count(),
            lines: model.lines.len(),
            spheres: model.spheres.len(),
            uv_groups: model.uv_groups.len(),
            colours: model.used_colours(),
        }
    }
}

/// Header values and timing of a decoded animation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimationInfo {
    pub keyframes: u16,
    pub boneframes: u16,
    pub loop_frame: u16,
    /// Sum of keyframe lengths in milliseconds
    pub total_length_ms: u32,
    /// Playback duration including the trailing loop frame; `None` if the
    /// loop frame is invalid
    pub duration_ms: Option<u32>,
    pub can_fall: bool,
}

impl AnimationInfo {
    #[must_use]
    pub fn from_animation(anim: &Animation) -> Self {
        Self {
            keyframes: anim.num_keyframes,
            boneframes: anim.num_boneframes,
            loop_frame: anim.loop_frame,
            total_length_ms: anim.total_length(),
            duration_ms: anim.duration_ms().ok(),
            can_fall: anim.can_fall(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::anm::parse_animation;

    #[test]
    fn test_animation_info() {
        let mut data = Vec::new();
        for v in [2u16, 1, 1, 0] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        for (length, bone_type) in [(40u16, 0i16), (60, 2)] {
            data.extend_from_slice(&length.to_le_bytes());
            data.extend_from_slice(&[0; 6]);
            data.extend_from_slice(&bone_type.to_le_bytes());
            data.extend_from_slice(&[0; 6]);
        }
        let info = AnimationInfo::from_animation(&parse_animation(&data).unwrap());

        assert_eq!(info.keyframes, 2);
        assert_eq!(info.total_length_ms, 100);
        assert_eq!(info.duration_ms, Some(60));
        assert!(info.can_fall);
    }
}
