//! Resource directory (body/animation table) format
//!
//! One entry of `RESS.HQR` lists, per resource, which `BODY.HQR` entries are
//! its bodies and which `ANIM.HQR` entries are its animations.

mod reader;

pub use reader::parse_resource_directory;

use serde::Serialize;

/// Index of the resource directory entry in `RESS.HQR`
pub const RESOURCE_DIRECTORY_ENTRY: usize = 44;

/// Op-code introducing a body descriptor; anything else is an animation
pub const OP_BODY: u8 = 1;

/// Collision box payload following a body descriptor with the flag set
pub const COLLISION_BOX_SIZE: usize = 13;

/// Body record of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BodyDescriptor {
    pub index: u8,
    pub data_size: u8,
    /// Entry index in `BODY.HQR`
    pub real_index: i16,
    pub has_collision_box: bool,
}

/// Animation record of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnimDescriptor {
    pub index: u16,
    pub data_size: u8,
    /// Entry index in `ANIM.HQR`
    pub real_index: u16,
}

/// One record of a resource's descriptor stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Descriptor {
    Body(BodyDescriptor),
    Anim(AnimDescriptor),
}

/// A resource: the bodies and animations that belong together
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resource {
    /// Offset of the descriptor stream within the directory entry
    pub offset: i32,
    pub bodies: Vec<BodyDescriptor>,
    pub animations: Vec<AnimDescriptor>,
}

impl Resource {
    fn push(&mut self, descriptor: Descriptor) {
        match descriptor {
            Descriptor::Body(body) => self.bodies.push(body),
            Descriptor::Anim(anim) => self.animations.push(anim),
        }
    }

    /// Whether one of this resource's bodies is `BODY.HQR` entry `body_index`
    #[must_use]
    pub fn has_body(&self, body_index: usize) -> bool {
        self.bodies
            .iter()
            .any(|b| i64::from(b.real_index) == body_index as i64)
    }
}

/// Decoded resource directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceDirectory {
    pub resources: Vec<Resource>,
}

impl ResourceDirectory {
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Resource> {
        self.resources.iter()
    }

    /// Animations to play on `BODY.HQR` entry `body_index`
    ///
    /// Returns the animation list of the first resource that uses the body
    /// and has at least one animation.
    #[must_use]
    pub fn animations_for_body(&self, body_index: usize) -> Option<&[AnimDescriptor]> {
        self.resources
            .iter()
            .find(|r| r.has_body(body_index) && !r.animations.is_empty())
            .map(|r| r.animations.as_slice())
    }
}

impl<'a> IntoIterator for &'a ResourceDirectory {
    type Item = &'a Resource;
    type IntoIter = std::slice::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}
