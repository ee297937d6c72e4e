//! LM2 body (3D model) format
//!
//! A fixed 0x60-byte header holds a body flag word, a bounding box and eight
//! `(count, offset)` section descriptors. Section records reference vertices
//! and bones by index.
//!
//! Vertex coordinates are stored relative to their bone; [`parse_model`]
//! returns them in model-root space.

mod polygon;
mod reader;
mod skeleton;

pub use reader::{parse_header, parse_model};

use glam::Vec3;
use serde::Serialize;

/// Size of the fixed LM2 header
pub const HEADER_SIZE: usize = 0x60;

/// Parent indices above this value mark a root bone
pub const ROOT_PARENT_THRESHOLD: u16 = 1000;

// ============================================================================
// Header
// ============================================================================

/// Flags decoded from the header's body flag word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BodyFlags {
    /// Format version (low byte)
    pub version: u8,
    pub has_animation: bool,
    pub no_sort: bool,
    pub has_transparency: bool,
}

impl BodyFlags {
    #[must_use]
    pub fn from_i32(flag: i32) -> Self {
        Self {
            version: (flag & 0xFF) as u8,
            has_animation: flag & (1 << 8) != 0,
            no_sort: flag & (1 << 9) != 0,
            has_transparency: flag & (1 << 10) != 0,
        }
    }
}

/// Bounding box in raw (unscaled) model units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BoundingBox {
    pub min: [i32; 3],
    pub max: [i32; 3],
}

/// Location of one section: number of records and absolute offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Section {
    pub count: u32,
    pub offset: u32,
}

/// The LM2 header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Lm2Header {
    pub body_flag: i32,
    pub reserved: i32,
    pub bounding_box: BoundingBox,
    pub bones: Section,
    pub vertices: Section,
    pub normals: Section,
    pub unknowns: Section,
    pub polygons: Section,
    pub lines: Section,
    pub spheres: Section,
    pub uv_groups: Section,
}

impl Lm2Header {
    #[must_use]
    pub fn flags(&self) -> BodyFlags {
        BodyFlags::from_i32(self.body_flag)
    }
}

// ============================================================================
// Records
// ============================================================================

/// A skeleton bone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bone {
    /// Parent bone, or a value above [`ROOT_PARENT_THRESHOLD`] for a root
    pub parent_index: u16,
    /// Vertex holding the bone's offset from its parent
    pub vertex_index: u16,
    pub unk1: u16,
    pub unk2: u16,
}

impl Bone {
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_index > ROOT_PARENT_THRESHOLD
    }

    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        (!self.is_root()).then_some(usize::from(self.parent_index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vertex {
    /// Scaled position; model-root space once the model is parsed
    pub position: Vec3,
    pub bone_index: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Normal {
    pub vector: Vec3,
    pub unk1: u16,
}

/// Fixed-size record of the unidentified section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnknownRecord {
    pub values: [u16; 4],
}

/// Texture mapping of a textured polygon
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolygonTexture {
    pub texture_id: u8,
    /// One `(u, v)` pair per polygon vertex
    pub uvs: Vec<[u8; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Polygon {
    pub render_type: u16,
    /// Three or four vertex indices
    pub vertices: Vec<u16>,
    /// 4-bit palette ramp index
    pub colour: u8,
    pub intensity: i16,
    pub has_extra: bool,
    pub has_transparency: bool,
    pub texture: Option<PolygonTexture>,
}

impl Polygon {
    #[must_use]
    pub fn is_quad(&self) -> bool {
        self.vertices.len() == 4
    }

    #[must_use]
    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Line {
    pub unk1: u16,
    pub colour: u8,
    pub vertices: [u16; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sphere {
    pub unk1: u16,
    pub colour: u8,
    pub vertex: u16,
    /// Radius in raw model units
    pub size: u16,
}

impl Sphere {
    /// Radius in the same scaled units as vertex positions
    #[must_use]
    pub fn radius(&self) -> f32 {
        f32::from(self.size) * crate::formats::WORLD_SCALE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UvGroup {
    pub x: u8,
    pub y: u8,
    pub w: u8,
    pub h: u8,
}

/// A skeleton joint for rigging: bone index, parent and bind position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Joint {
    pub bone: usize,
    pub parent: Option<usize>,
    pub position: Vec3,
}

// ============================================================================
// Model
// ============================================================================

/// A decoded LM2 body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Model {
    pub header: Lm2Header,
    pub bones: Vec<Bone>,
    pub vertices: Vec<Vertex>,
    pub normals: Vec<Normal>,
    pub unknowns: Vec<UnknownRecord>,
    pub polygons: Vec<Polygon>,
    pub lines: Vec<Line>,
    pub spheres: Vec<Sphere>,
    pub uv_groups: Vec<UvGroup>,
    /// For each bone, the vertices bound to it
    pub vertex_groups: Vec<Vec<usize>>,
    /// Chain length from each bone to its root (0 for roots)
    bone_depths: Vec<usize>,
}

impl Model {
    #[must_use]
    pub fn flags(&self) -> BodyFlags {
        self.header.flags()
    }

    /// Skeleton joints, parents before children
    ///
    /// A joint sits at the root-space position of its bone's vertex.
    #[must_use]
    pub fn joints(&self) -> Vec<Joint> {
        let mut order: Vec<usize> = (0..self.bones.len()).collect();
        order.sort_by_key(|&i| self.bone_depths[i]);
        order
            .into_iter()
            .map(|i| {
                let bone = &self.bones[i];
                Joint {
                    bone: i,
                    parent: bone.parent(),
                    position: self.vertices[usize::from(bone.vertex_index)].position,
                }
            })
            .collect()
    }

    /// Distinct colour indices used by polygons, spheres and lines, in first-use order
    #[must_use]
    pub fn used_colours(&self) -> Vec<u8> {
        let mut colours = Vec::new();
        let all = self
            .polygons
            .iter()
            .map(|p| p.colour)
            .chain(self.spheres.iter().map(|s| s.colour))
            .chain(self.lines.iter().map(|l| l.colour));
        for colour in all {
            if !colours.contains(&colour) {
                colours.push(colour);
            }
        }
        colours
    }
}

/// Decode the colour index stored in the low byte of a colour word
#[must_use]
pub fn colour_index(word: u16) -> u8 {
    ((word & 0x00FF) / 16) as u8
}
