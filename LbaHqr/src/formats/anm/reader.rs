//! ANM parsing

use glam::Vec3;

use super::{Animation, Boneframe, DEGREES_PER_UNIT, Keyframe};
use crate::error::Result;
use crate::formats::WORLD_SCALE;
use crate::formats::reader::EntryReader;

/// Parse a decoded `ANIM.HQR` entry
///
/// The loop frame is stored as read; it is checked when the animation is
/// played back.
///
/// # Errors
/// Returns [`crate::Error::Truncated`] if the entry is shorter than its
/// header announces.
pub fn parse_animation(data: &[u8]) -> Result<Animation> {
    let mut r = EntryReader::new(data);
    let num_keyframes = r.u16()?;
    let num_boneframes = r.u16()?;
    let loop_frame = r.u16()?;
    let unk1 = r.u16()?;
    tracing::debug!(
        "ANM: {} keyframes x {} boneframes, loop frame {}",
        num_keyframes,
        num_boneframes,
        loop_frame
    );

    let mut keyframes = Vec::with_capacity(usize::from(num_keyframes).min(r.remaining()));
    for _ in 0..num_keyframes {
        keyframes.push(read_keyframe(&mut r, num_boneframes)?);
    }

    Ok(Animation {
        num_keyframes,
        num_boneframes,
        loop_frame,
        unk1,
        keyframes,
    })
}

fn read_keyframe(r: &mut EntryReader<'_>, num_boneframes: u16) -> Result<Keyframe> {
    let length = r.u16()?;
    let offset = read_vec3(r)? * WORLD_SCALE;

    let mut boneframes = Vec::with_capacity(usize::from(num_boneframes).min(r.remaining()));
    for _ in 0..num_boneframes {
        boneframes.push(read_boneframe(r)?);
    }
    let can_fall = boneframes.iter().any(|b| !b.is_rotation());

    Ok(Keyframe {
        length,
        offset,
        can_fall,
        boneframes,
    })
}

fn read_boneframe(r: &mut EntryReader<'_>) -> Result<Boneframe> {
    let bone_type = r.i16()?;
    let vector = read_vec3(r)?;
    Ok(if bone_type == 0 {
        Boneframe::Rotation {
            degrees: vector * DEGREES_PER_UNIT,
        }
    } else {
        Boneframe::Translation {
            bone_type,
            offset: vector * WORLD_SCALE,
        }
    })
}

fn read_vec3(r: &mut EntryReader<'_>) -> Result<Vec3> {
    let x = r.i16()?;
    let y = r.i16()?;
    let z = r.i16()?;
    Ok(Vec3::new(f32::from(x), f32::from(y), f32::from(z)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;

    /// Encode an animation; boneframes are `(bone_type, [x, y, z])` raw values
    pub(crate) fn encode(
        loop_frame: u16,
        keyframes: &[(u16, [i16; 3], Vec<(i16, [i16; 3])>)],
    ) -> Vec<u8> {
        let num_boneframes = keyframes.first().map_or(0, |k| k.2.len());
        let mut data = Vec::new();
        for v in [keyframes.len() as u16, num_boneframes as u16, loop_frame, 0] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        for (length, offset, boneframes) in keyframes {
            data.extend_from_slice(&length.to_le_bytes());
            for c in offset {
                data.extend_from_slice(&c.to_le_bytes());
            }
            for (bone_type, v) in boneframes {
                data.extend_from_slice(&bone_type.to_le_bytes());
                for c in v {
                    data.extend_from_slice(&c.to_le_bytes());
                }
            }
        }
        data
    }

    #[test]
    fn test_parse_rotation_and_translation() {
        let data = encode(
            0,
            &[
                (100, [20, 0, -20], vec![(0, [1024, 0, -2048]), (1, [0, 40, 0])]),
                (250, [0, 0, 0], vec![(0, [0, 0, 0]), (0, [4096, 0, 0])]),
            ],
        );
        let anim = parse_animation(&data).unwrap();

        assert_eq!(anim.num_keyframes, 2);
        assert_eq!(anim.num_boneframes, 2);
        assert_eq!(anim.keyframes[0].length, 100);
        assert!(anim.keyframes[0].offset.abs_diff_eq(Vec3::new(3.0, 0.0, -3.0), 1e-4));
        assert_eq!(
            anim.keyframes[0].boneframes[0],
            Boneframe::Rotation {
                degrees: Vec3::new(90.0, 0.0, -180.0)
            }
        );
        assert_eq!(anim.keyframes[0].boneframes[1].bone_type(), 1);
        assert!(anim.keyframes[0].boneframes[1]
            .vector()
            .abs_diff_eq(Vec3::new(0.0, 6.0, 0.0), 1e-4));
        assert!(anim.keyframes[0].can_fall);
        assert!(!anim.keyframes[1].can_fall);
        assert_eq!(anim.keyframes[1].boneframes[1].vector().x, 360.0);
        assert_eq!(anim.total_length(), 350);
    }

    #[test]
    fn test_truncated_keyframe() {
        let mut data = encode(0, &[(10, [0, 0, 0], vec![(0, [1, 2, 3])])]);
        data.truncate(data.len() - 1);
        assert!(matches!(
            parse_animation(&data).unwrap_err(),
            Error::Truncated { .. }
        ));
    }

    #[test]
    fn test_out_of_range_loop_frame_still_parses() {
        let data = encode(7, &[(10, [0, 0, 0], vec![(0, [0, 0, 0])])]);
        assert_eq!(parse_animation(&data).unwrap().loop_frame, 7);
    }
}
