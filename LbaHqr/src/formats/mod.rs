//! Decoders for the sub-formats stored in HQR entries
//!
//! Every decoder takes the decompressed bytes of one entry (see
//! [`crate::hqr`]) and reads them front to back with [`EntryReader`].

pub mod anm;
pub mod lm2;
pub mod palette;
pub mod reader;
pub mod ress;

/// Scale applied to every fixed-point coordinate read from model and animation data
pub const WORLD_SCALE: f32 = 0.15;

pub use anm::{Animation, Boneframe, Clip, ClipTimeline, Keyframe, TrackKey, parse_animation};
pub use lm2::{Model, parse_model};
pub use palette::{Palette, Rgb};
pub use reader::EntryReader;
pub use ress::{ResourceDirectory, parse_resource_directory};
