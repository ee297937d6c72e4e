//! LM2 body parsing

use glam::Vec3;

use super::{
    BoundingBox, Bone, HEADER_SIZE, Line, Lm2Header, Model, Normal, Section, Sphere,
    UnknownRecord, UvGroup, Vertex, colour_index, polygon, skeleton,
};
use crate::error::{Error, Result};
use crate::formats::WORLD_SCALE;
use crate::formats::reader::EntryReader;

/// Parse the fixed LM2 header
///
/// # Errors
/// Returns [`Error::Truncated`] if `data` is shorter than the header.
pub fn parse_header(data: &[u8]) -> Result<Lm2Header> {
    let mut r = EntryReader::new(data);
    read_header(&mut r)
}

fn read_header(r: &mut EntryReader<'_>) -> Result<Lm2Header> {
    let body_flag = r.i32()?;
    let reserved = r.i32()?;

    let mut bounds = [0i32; 6];
    for value in &mut bounds {
        *value = r.i32()?;
    }
    let [x_min, x_max, y_min, y_max, z_min, z_max] = bounds;
    let bounding_box = BoundingBox {
        min: [x_min, y_min, z_min],
        max: [x_max, y_max, z_max],
    };

    let mut sections = [Section::default(); 8];
    for section in &mut sections {
        section.count = r.u32()?;
        section.offset = r.u32()?;
    }
    let [bones, vertices, normals, unknowns, polygons, lines, spheres, uv_groups] = sections;

    debug_assert_eq!(r.position(), HEADER_SIZE);
    Ok(Lm2Header {
        body_flag,
        reserved,
        bounding_box,
        bones,
        vertices,
        normals,
        unknowns,
        polygons,
        lines,
        spheres,
        uv_groups,
    })
}

/// Parse a decoded `BODY.HQR` entry
///
/// Vertex positions are returned in model-root space, scaled by
/// [`WORLD_SCALE`].
///
/// # Errors
/// Returns [`Error::Truncated`] if a section runs past the entry,
/// [`Error::InvalidPolygonBlock`] for a malformed polygon block,
/// [`Error::BoneChainCycle`] or [`Error::IndexOutOfRange`] for broken
/// skeleton or vertex references.
pub fn parse_model(data: &[u8]) -> Result<Model> {
    let mut r = EntryReader::new(data);
    let header = read_header(&mut r)?;
    tracing::debug!(
        "LM2 v{}: {} bones, {} vertices, {} normals, {} lines, {} spheres",
        header.flags().version,
        header.bones.count,
        header.vertices.count,
        header.normals.count,
        header.lines.count,
        header.spheres.count
    );

    let bones = read_section(&mut r, header.bones, |r| {
        Ok(Bone {
            parent_index: r.u16()?,
            vertex_index: r.u16()?,
            unk1: r.u16()?,
            unk2: r.u16()?,
        })
    })?;

    let mut vertices = read_section(&mut r, header.vertices, |r| {
        Ok(Vertex {
            position: read_scaled_vec3(r)?,
            bone_index: r.u16()?,
        })
    })?;

    let normals = read_section(&mut r, header.normals, |r| {
        Ok(Normal {
            vector: read_scaled_vec3(r)?,
            unk1: r.u16()?,
        })
    })?;

    let unknowns = read_section(&mut r, header.unknowns, |r| {
        Ok(UnknownRecord {
            values: [r.u16()?, r.u16()?, r.u16()?, r.u16()?],
        })
    })?;

    let polygon_start = header.polygons.offset as usize;
    let polygon_end = if header.lines.offset >= header.polygons.offset {
        (header.lines.offset as usize).min(data.len())
    } else {
        data.len()
    };
    let polygons = polygon::read_polygons(&mut r, polygon_start, polygon_end)?;

    let lines = read_section(&mut r, header.lines, |r| {
        Ok(Line {
            unk1: r.u16()?,
            colour: colour_index(r.u16()?),
            vertices: [r.u16()?, r.u16()?],
        })
    })?;

    let spheres = read_section(&mut r, header.spheres, |r| {
        Ok(Sphere {
            unk1: r.u16()?,
            colour: colour_index(r.u16()?),
            vertex: r.u16()?,
            size: r.u16()?,
        })
    })?;

    let uv_groups = read_section(&mut r, header.uv_groups, |r| {
        Ok(UvGroup {
            x: r.u8()?,
            y: r.u8()?,
            w: r.u8()?,
            h: r.u8()?,
        })
    })?;

    let bone_depths = skeleton::bone_depths(&bones, vertices.len())?;
    skeleton::accumulate(&bones, &mut vertices)?;
    let vertex_groups = skeleton::vertex_groups(bones.len(), &vertices);

    let model = Model {
        header,
        bones,
        vertices,
        normals,
        unknowns,
        polygons,
        lines,
        spheres,
        uv_groups,
        vertex_groups,
        bone_depths,
    };
    check_vertex_references(&model)?;
    Ok(model)
}

fn read_section<'a, T>(
    r: &mut EntryReader<'a>,
    section: Section,
    mut read: impl FnMut(&mut EntryReader<'a>) -> Result<T>,
) -> Result<Vec<T>> {
    r.seek_forward(section.offset as usize)?;
    // cap the reservation by what the entry could possibly hold
    let mut records = Vec::with_capacity((section.count as usize).min(r.remaining()));
    for _ in 0..section.count {
        records.push(read(r)?);
    }
    Ok(records)
}

fn read_scaled_vec3(r: &mut EntryReader<'_>) -> Result<Vec3> {
    let x = r.i16()?;
    let y = r.i16()?;
    let z = r.i16()?;
    Ok(Vec3::new(f32::from(x), f32::from(y), f32::from(z)) * WORLD_SCALE)
}

fn check_vertex_references(model: &Model) -> Result<()> {
    let len = model.vertices.len();
    let references = model
        .polygons
        .iter()
        .flat_map(|p| p.vertices.iter().map(|&v| ("polygon vertex", v)))
        .chain(
            model
                .lines
                .iter()
                .flat_map(|l| l.vertices.iter().map(|&v| ("line vertex", v))),
        )
        .chain(model.spheres.iter().map(|s| ("sphere vertex", s.vertex)));

    for (kind, index) in references {
        let index = usize::from(index);
        if index >= len {
            return Err(Error::IndexOutOfRange { kind, index, len });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Builds an LM2 entry section by section, filling in the header
    #[derive(Default)]
    struct BodyBuilder {
        bones: Vec<[u16; 4]>,
        vertices: Vec<([i16; 3], u16)>,
        polygons: Vec<u8>,
        lines: Vec<[u16; 4]>,
        spheres: Vec<[u16; 4]>,
    }

    impl BodyBuilder {
        fn build(&self) -> Vec<u8> {
            let mut body = Vec::new();
            let mut sections = Vec::new();
            let mut push = |count: usize, bytes: Vec<u8>, body: &mut Vec<u8>| {
                sections.push((count as u32, (HEADER_SIZE + body.len()) as u32));
                body.extend(bytes);
            };

            push(self.bones.len(), words(self.bones.iter().flatten().copied()), &mut body);
            let mut verts = Vec::new();
            for (pos, bone) in &self.vertices {
                for c in pos {
                    verts.extend_from_slice(&c.to_le_bytes());
                }
                verts.extend_from_slice(&bone.to_le_bytes());
            }
            push(self.vertices.len(), verts, &mut body);
            push(0, Vec::new(), &mut body);
            push(0, Vec::new(), &mut body);
            push(0, self.polygons.clone(), &mut body);
            push(self.lines.len(), words(self.lines.iter().flatten().copied()), &mut body);
            push(self.spheres.len(), words(self.spheres.iter().flatten().copied()), &mut body);
            push(0, Vec::new(), &mut body);

            let mut data = Vec::new();
            data.extend_from_slice(&0x0000_0101i32.to_le_bytes());
            data.extend_from_slice(&0i32.to_le_bytes());
            for b in [-10i32, 10, -20, 20, -30, 30] {
                data.extend_from_slice(&b.to_le_bytes());
            }
            for (count, offset) in sections {
                data.extend_from_slice(&count.to_le_bytes());
                data.extend_from_slice(&offset.to_le_bytes());
            }
            data.extend(body);
            data
        }
    }

    fn words(values: impl Iterator<Item = u16>) -> Vec<u8> {
        values.flat_map(u16::to_le_bytes).collect()
    }

    fn triangle_block(v: [u16; 3], colour_word: u16) -> Vec<u8> {
        let mut b = words([0u16, 1, 20, 0].into_iter());
        b.extend(words([v[0], v[1], v[2], 0, colour_word, 0].into_iter()));
        b.extend_from_slice(&[0; 8]);
        b
    }

    fn two_bone_body() -> BodyBuilder {
        BodyBuilder {
            bones: vec![[0xFFFF, 0, 0, 0], [0, 1, 0, 0]],
            vertices: vec![([0, 20, 0], 0), ([0, 0, 40], 0), ([20, 0, 0], 1)],
            polygons: triangle_block([0, 1, 2], 0x40),
            lines: vec![[0, 0x10, 0, 2]],
            spheres: vec![[0, 0x50, 1, 100]],
        }
    }

    #[test]
    fn test_header() {
        let header = parse_header(&two_bone_body().build()).unwrap();
        let flags = header.flags();
        assert_eq!(flags.version, 1);
        assert!(flags.has_animation);
        assert!(!flags.no_sort);
        assert_eq!(header.bounding_box.min, [-10, -20, -30]);
        assert_eq!(header.bounding_box.max, [10, 20, 30]);
        assert_eq!(header.bones.count, 2);
        assert_eq!(header.bones.offset, HEADER_SIZE as u32);
    }

    #[test]
    fn test_parse_two_bone_body() {
        let model = parse_model(&two_bone_body().build()).unwrap();

        assert_eq!(model.bones.len(), 2);
        let close = |i: usize, expected: Vec3| model.vertices[i].position.abs_diff_eq(expected, 1e-4);
        assert!(close(0, Vec3::new(0.0, 6.0, 0.0)));
        assert!(close(1, Vec3::new(0.0, 3.0, 6.0)));
        // (20,0,0) + v1 (0,0,40) + v0 (0,20,0), scaled
        assert!(close(2, Vec3::new(3.0, 3.0, 6.0)));
        assert_eq!(model.vertex_groups, vec![vec![0, 1], vec![2]]);

        assert_eq!(model.polygons.len(), 1);
        assert_eq!(model.polygons[0].colour, 4);
        assert_eq!(model.lines[0].vertices, [0, 2]);
        assert_eq!(model.lines[0].colour, 1);
        assert!((model.spheres[0].radius() - 15.0).abs() < 1e-4);
        assert_eq!(model.used_colours(), vec![4, 5, 1]);
    }

    #[test]
    fn test_joints_are_parent_first() {
        let mut body = two_bone_body();
        body.bones = vec![[1, 2, 0, 0], [0xFFFF, 0, 0, 0]];
        let model = parse_model(&body.build()).unwrap();

        let joints = model.joints();
        assert_eq!(joints.len(), 2);
        assert_eq!(joints[0].bone, 1);
        assert_eq!(joints[0].parent, None);
        assert_eq!(joints[1].bone, 0);
        assert_eq!(joints[1].parent, Some(1));
        assert_eq!(joints[1].position, model.vertices[2].position);
    }

    #[test]
    fn test_cyclic_skeleton_fails() {
        let mut body = two_bone_body();
        body.bones = vec![[1, 0, 0, 0], [0, 1, 0, 0]];
        assert!(matches!(
            parse_model(&body.build()).unwrap_err(),
            Error::BoneChainCycle { .. }
        ));
    }

    #[test]
    fn test_sentinel_first_block_yields_no_polygons() {
        let mut body = two_bone_body();
        body.polygons = vec![0; 8];
        let model = parse_model(&body.build()).unwrap();
        assert!(model.polygons.is_empty());
        assert_eq!(model.lines.len(), 1);
    }

    #[test]
    fn test_dangling_polygon_vertex() {
        let mut body = two_bone_body();
        body.polygons = triangle_block([0, 1, 7], 0);
        assert!(matches!(
            parse_model(&body.build()).unwrap_err(),
            Error::IndexOutOfRange { kind: "polygon vertex", index: 7, len: 3 }
        ));
    }

    #[test]
    fn test_truncated_section() {
        let mut data = two_bone_body().build();
        // claim a thousand spheres
        data[0x20 + 6 * 8..0x20 + 6 * 8 + 4].copy_from_slice(&1000u32.to_le_bytes());
        assert!(matches!(parse_model(&data).unwrap_err(), Error::Truncated { .. }));
    }
}
