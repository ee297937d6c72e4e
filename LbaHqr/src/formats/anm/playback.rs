//! Animation playback helpers
//!
//! Keyframes store absolute Euler angles in `[-180, 180]`. Interpolating
//! those directly spins a bone the long way round whenever an angle crosses
//! the wrap point, so tracks are built from unwrapped angles: each value is
//! moved by a multiple of 360 to stay within 180 degrees of the previous one.

use glam::Vec3;
use serde::Serialize;

use super::Animation;
use crate::error::{Error, Result};

/// Unwrap one angle (degrees) against the previous absolute angle
#[must_use]
pub fn unwrap_angle(prev: f32, new: f32) -> f32 {
    let mut diff = new - prev;
    if diff < -180.0 {
        diff += 360.0;
    } else if diff > 180.0 {
        diff -= 360.0;
    }
    prev + diff
}

/// [`unwrap_angle`] applied per axis
#[must_use]
pub fn unwrap_angles(prev: Vec3, new: Vec3) -> Vec3 {
    Vec3::new(
        unwrap_angle(prev.x, new.x),
        unwrap_angle(prev.y, new.y),
        unwrap_angle(prev.z, new.z),
    )
}

/// One sample of a bone track
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackKey {
    /// Milliseconds since the start of the animation
    pub time_ms: u32,
    /// Unwrapped rotation in degrees
    pub rotation: Option<Vec3>,
    /// Translation relative to the bone's bind position
    pub translation: Option<Vec3>,
    /// Last key of the track: hold the value instead of interpolating out
    pub hold: bool,
}

impl Animation {
    /// Number of frames played, including the trailing loop frame if any
    ///
    /// When the loop frame is not the last keyframe, a copy of it is played
    /// after the last keyframe so the transition back is animated.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        let n = usize::from(self.num_keyframes);
        if usize::from(self.loop_frame) + 1 == n { n } else { n + 1 }
    }

    /// Keyframe index played at each frame; the last is always the loop frame
    ///
    /// # Errors
    /// Returns [`Error::InvalidLoopFrame`] if the loop frame is not a keyframe.
    pub fn frame_sequence(&self) -> Result<Vec<usize>> {
        let loop_frame = usize::from(self.loop_frame);
        if loop_frame >= self.keyframes.len() {
            return Err(Error::InvalidLoopFrame {
                loop_frame: self.loop_frame,
                num_keyframes: self.num_keyframes,
            });
        }
        let count = self.frame_count();
        Ok((0..count)
            .map(|d| if d + 1 == count { loop_frame } else { d })
            .collect())
    }

    /// Start time of each frame of [`frame_sequence`](Self::frame_sequence) in milliseconds
    ///
    /// The first frame starts at 0; every later frame adds the length of the
    /// keyframe it plays.
    ///
    /// # Errors
    /// Returns [`Error::InvalidLoopFrame`] if the loop frame is not a keyframe.
    pub fn frame_times(&self) -> Result<Vec<u32>> {
        let sequence = self.frame_sequence()?;
        let mut time = 0u32;
        Ok(sequence
            .iter()
            .enumerate()
            .map(|(d, &index)| {
                if d != 0 {
                    time += u32::from(self.keyframes[index].length);
                }
                time
            })
            .collect())
    }

    /// Time of the last frame in milliseconds
    ///
    /// # Errors
    /// Returns [`Error::InvalidLoopFrame`] if the loop frame is not a keyframe.
    pub fn duration_ms(&self) -> Result<u32> {
        Ok(self.frame_times()?.last().copied().unwrap_or(0))
    }

    /// Time at which the looping part starts, if the animation has an intro
    ///
    /// `None` when playback loops from the first frame.
    ///
    /// # Errors
    /// Returns [`Error::InvalidLoopFrame`] if the loop frame is not a keyframe.
    pub fn loop_start_ms(&self) -> Result<Option<u32>> {
        let times = self.frame_times()?;
        let loop_frame = usize::from(self.loop_frame);
        Ok((loop_frame != 0).then(|| times[loop_frame]))
    }

    /// Keyed samples for one bone across [`frame_sequence`](Self::frame_sequence)
    ///
    /// Rotation frames produce unwrapped rotations, translation frames
    /// produce translations. Bone 0 always gets a rotation plus the root
    /// displacement accumulated over the keyframe offsets. Bones without
    /// boneframes get an empty track.
    ///
    /// # Errors
    /// Returns [`Error::InvalidLoopFrame`] if the loop frame is not a keyframe.
    pub fn bone_track(&self, bone: usize) -> Result<Vec<TrackKey>> {
        if bone >= usize::from(self.num_boneframes) {
            return Ok(Vec::new());
        }
        let sequence = self.frame_sequence()?;
        let times = self.frame_times()?;

        let mut prev = Vec3::ZERO;
        let mut root = Vec3::ZERO;
        let mut keys = Vec::with_capacity(sequence.len());
        for (d, (&index, &time_ms)) in sequence.iter().zip(&times).enumerate() {
            let keyframe = &self.keyframes[index];
            let boneframe = keyframe.boneframes[bone];
            let (rotation, translation) = if bone == 0 {
                root += keyframe.offset;
                (Some(boneframe.vector()), Some(root))
            } else if boneframe.is_rotation() {
                (Some(boneframe.vector()), None)
            } else {
                (None, Some(boneframe.vector()))
            };
            let rotation = rotation.map(|r| {
                prev = unwrap_angles(prev, r);
                prev
            });

            keys.push(TrackKey {
                time_ms,
                rotation,
                translation,
                hold: d + 1 == sequence.len(),
            });
        }
        Ok(keys)
    }
}
