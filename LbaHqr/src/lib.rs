#![allow(non_snake_case)]
//! # LbaHqr
//!
//! A pure-Rust library for reading Little Big Adventure 2 asset archives.
//!
//! ## Supported Formats
//!
//! - **HQR archives** - Indexed entries, stored or LZ-compressed
//! - **Resource directory** - Which bodies and animations belong together
//! - **LM2 bodies** - Skeleton, vertices, polygons, lines and spheres
//! - **ANM animations** - Keyframes of per-bone rotations and translations
//! - **Palette** - The 256-colour game palette
//!
//! ## Quick Start
//!
//! ### Reading Archive Entries
//!
//! ```no_run
//! use lbahqr::hqr::Hqr;
//! use lbahqr::formats::parse_model;
//!
//! let body = Hqr::new("BODY.HQR");
//! println!("{} entries", body.entry_count()?);
//!
//! let model = parse_model(&body.read_entry(0)?)?;
//! println!("{} bones", model.bones.len());
//! # Ok::<(), lbahqr::Error>(())
//! ```
//!
//! ### Opening a Game Directory
//!
//! ```no_run
//! use lbahqr::prelude::*;
//!
//! let session = Session::open("/games/LBA2", SessionConfig::default())?;
//! let animations = session.load_body_animations(0)?;
//! let timeline = ClipTimeline::build(&animations, 30.0)?;
//! println!("{}", timeline.to_csv());
//! # Ok::<(), lbahqr::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `lbahqr` command-line binary

pub mod compression;
pub mod error;
pub mod formats;
pub mod hqr;
pub mod inspect;
pub mod session;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};

    pub use crate::hqr::{BatchExtractResult, EntryHeader, Hqr, extract_all};

    pub use crate::formats::anm::{
        Animation, Boneframe, Clip, ClipTimeline, Keyframe, TrackKey, unwrap_angles,
    };
    pub use crate::formats::lm2::{Joint, Model};
    pub use crate::formats::palette::{Palette, Rgb};
    pub use crate::formats::ress::{AnimDescriptor, BodyDescriptor, Resource, ResourceDirectory};
    pub use crate::formats::{
        EntryReader, WORLD_SCALE, parse_animation, parse_model, parse_resource_directory,
    };

    pub use crate::inspect::{AnimationInfo, ModelInfo};
    pub use crate::session::{Session, SessionConfig};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
