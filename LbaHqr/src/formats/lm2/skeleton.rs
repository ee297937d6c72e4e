//! Bone chain validation and vertex accumulation

use glam::Vec3;

use super::{Bone, Vertex};
use crate::error::{Error, Result};

/// Validate every bone and return its depth below its root
///
/// Fails if a parent or vertex index is out of range, or if a chain does not
/// reach a root within `bones.len()` steps.
pub(super) fn bone_depths(bones: &[Bone], vertex_count: usize) -> Result<Vec<usize>> {
    bones
        .iter()
        .enumerate()
        .map(|(start, bone)| {
            check_vertex(bone, vertex_count)?;
            let mut depth = 0;
            let mut current = *bone;
            while let Some(parent) = current.parent() {
                depth += 1;
                if depth >= bones.len() {
                    return Err(Error::BoneChainCycle { bone: start });
                }
                current = *bones.get(parent).ok_or(Error::IndexOutOfRange {
                    kind: "parent bone",
                    index: parent,
                    len: bones.len(),
                })?;
            }
            Ok(depth)
        })
        .collect()
}

fn check_vertex(bone: &Bone, vertex_count: usize) -> Result<()> {
    let index = usize::from(bone.vertex_index);
    if index >= vertex_count {
        return Err(Error::IndexOutOfRange {
            kind: "bone vertex",
            index,
            len: vertex_count,
        });
    }
    Ok(())
}

/// Move every vertex from bone-relative into model-root space
///
/// Each vertex gains the offset vertex of every bone along its chain. Offsets
/// come from the positions as read, not from already accumulated ones.
/// Bones must have passed [`bone_depths`].
pub(super) fn accumulate(bones: &[Bone], vertices: &mut [Vertex]) -> Result<()> {
    let snapshot: Vec<Vec3> = vertices.iter().map(|v| v.position).collect();

    for vertex in vertices.iter_mut() {
        let start = usize::from(vertex.bone_index);
        let mut bone = bones.get(start).ok_or(Error::IndexOutOfRange {
            kind: "bone",
            index: start,
            len: bones.len(),
        })?;

        // depth checks guarantee the walk ends within bones.len() steps
        for _ in 0..bones.len() {
            vertex.position += snapshot[usize::from(bone.vertex_index)];
            match bone.parent() {
                Some(parent) => bone = &bones[parent],
                None => break,
            }
        }
    }
    Ok(())
}

/// For each bone, the indices of the vertices bound to it
pub(super) fn vertex_groups(bone_count: usize, vertices: &[Vertex]) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); bone_count];
    for (i, vertex) in vertices.iter().enumerate() {
        if let Some(group) = groups.get_mut(usize::from(vertex.bone_index)) {
            group.push(i);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: u16 = 0xFFFF;

    fn bone(parent_index: u16, vertex_index: u16) -> Bone {
        Bone {
            parent_index,
            vertex_index,
            unk1: 0,
            unk2: 0,
        }
    }

    fn vertex(x: f32, y: f32, z: f32, bone_index: u16) -> Vertex {
        Vertex {
            position: Vec3::new(x, y, z),
            bone_index,
        }
    }

    #[test]
    fn test_depths() {
        let bones = [bone(ROOT, 0), bone(0, 1), bone(1, 2), bone(0, 0)];
        assert_eq!(bone_depths(&bones, 3).unwrap(), vec![0, 1, 2, 1]);
    }

    #[test]
    fn test_parent_threshold_is_exclusive() {
        // 1001 is a root, 1000 is a (missing) parent index
        let bones = [bone(1001, 0)];
        assert_eq!(bone_depths(&bones, 1).unwrap(), vec![0]);

        let bones = [bone(ROOT, 0), bone(1000, 0)];
        assert!(matches!(
            bone_depths(&bones, 1).unwrap_err(),
            Error::IndexOutOfRange { index: 1000, .. }
        ));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let bones = [bone(1, 0), bone(0, 0)];
        let err = bone_depths(&bones, 1).unwrap_err();
        assert!(matches!(err, Error::BoneChainCycle { bone: 0 }));
        assert!(err.is_format_error());

        let bones = [bone(ROOT, 0), bone(1, 0)];
        assert!(matches!(
            bone_depths(&bones, 1).unwrap_err(),
            Error::BoneChainCycle { bone: 1 }
        ));
    }

    #[test]
    fn test_bone_vertex_out_of_range() {
        let bones = [bone(ROOT, 4)];
        assert!(matches!(
            bone_depths(&bones, 4).unwrap_err(),
            Error::IndexOutOfRange { kind: "bone vertex", index: 4, len: 4 }
        ));
    }

    #[test]
    fn test_accumulate_uses_unmodified_offsets() {
        // root at v0 (0,1,0); child bone 1 offset by v1 (0,2,0)
        let bones = [bone(ROOT, 0), bone(0, 1)];
        let mut vertices = vec![
            vertex(0.0, 1.0, 0.0, 0),
            vertex(0.0, 2.0, 0.0, 0),
            vertex(1.0, 0.0, 0.0, 1),
        ];
        accumulate(&bones, &mut vertices).unwrap();

        assert_eq!(vertices[0].position, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(vertices[1].position, Vec3::new(0.0, 3.0, 0.0));
        // v2 + v1 + v0 from the snapshot, not the accumulated v1
        assert_eq!(vertices[2].position, Vec3::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn test_accumulate_unknown_bone() {
        let bones = [bone(ROOT, 0)];
        let mut vertices = vec![vertex(0.0, 0.0, 0.0, 3)];
        assert!(matches!(
            accumulate(&bones, &mut vertices).unwrap_err(),
            Error::IndexOutOfRange { kind: "bone", index: 3, len: 1 }
        ));
    }

    #[test]
    fn test_vertex_groups() {
        let vertices = [
            vertex(0.0, 0.0, 0.0, 1),
            vertex(0.0, 0.0, 0.0, 0),
            vertex(0.0, 0.0, 0.0, 1),
        ];
        assert_eq!(vertex_groups(3, &vertices), vec![vec![1], vec![0, 2], vec![]]);
    }
}
