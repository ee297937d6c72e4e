//! Game directory session
//!
//! A [`Session`] locates the body, animation and resource archives of an
//! installation once, loads the palette and resource directory, and then
//! decodes bodies and animations on demand.
//!
//! # Example
//!
//! ```no_run
//! use lbahqr::session::{Session, SessionConfig};
//!
//! let session = Session::open("/games/LBA2", SessionConfig::default())?;
//! let model = session.load_model(0)?;
//! let animations = session.load_body_animations(0)?;
//! println!("{} vertices, {} animations", model.vertices.len(), animations.len());
//! # Ok::<(), lbahqr::Error>(())
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::formats::anm::{Animation, parse_animation};
use crate::formats::lm2::{Model, parse_model};
use crate::formats::palette::{PALETTE_ENTRY, Palette};
use crate::formats::ress::{
    AnimDescriptor, RESOURCE_DIRECTORY_ENTRY, ResourceDirectory, parse_resource_directory,
};
use crate::hqr::Hqr;

/// Where a [`Session`] finds its data
///
/// # Example
///
/// ```
/// use lbahqr::session::SessionConfig;
///
/// let config = SessionConfig::new()
///     .with_body_archive("body.hqr")
///     .with_resource_entry(45);
/// assert_eq!(config.palette_entry, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// File name of the body archive
    pub body_archive: String,
    /// File name of the animation archive
    pub anim_archive: String,
    /// File name of the resource archive
    pub resource_archive: String,
    /// Palette entry in the resource archive
    pub palette_entry: usize,
    /// Resource directory entry in the resource archive
    pub resource_entry: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            body_archive: "BODY.HQR".to_string(),
            anim_archive: "ANIM.HQR".to_string(),
            resource_archive: "RESS.HQR".to_string(),
            palette_entry: PALETTE_ENTRY,
            resource_entry: RESOURCE_DIRECTORY_ENTRY,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_body_archive(mut self, name: impl Into<String>) -> Self {
        self.body_archive = name.into();
        self
    }

    #[must_use]
    pub fn with_anim_archive(mut self, name: impl Into<String>) -> Self {
        self.anim_archive = name.into();
        self
    }

    #[must_use]
    pub fn with_resource_archive(mut self, name: impl Into<String>) -> Self {
        self.resource_archive = name.into();
        self
    }

    #[must_use]
    pub fn with_palette_entry(mut self, index: usize) -> Self {
        self.palette_entry = index;
        self
    }

    #[must_use]
    pub fn with_resource_entry(mut self, index: usize) -> Self {
        self.resource_entry = index;
        self
    }
}

/// An opened game installation
#[derive(Debug, Clone)]
pub struct Session {
    root: PathBuf,
    body: Hqr,
    anim: Hqr,
    resources: Hqr,
    palette: Palette,
    directory: ResourceDirectory,
}

impl Session {
    /// Locate the archives under `game_dir` and load the palette and resource directory
    ///
    /// # Errors
    /// Returns [`Error::ArchiveNotFound`] if an archive is missing, or any
    /// decode error from the palette or resource directory entries.
    pub fn open<P: AsRef<Path>>(game_dir: P, config: SessionConfig) -> Result<Self> {
        let root = game_dir.as_ref().to_path_buf();
        let body = Hqr::new(find_archive(&root, &config.body_archive)?);
        let resources = Hqr::new(find_archive(&root, &config.resource_archive)?);
        let anim = Hqr::new(find_archive(&root, &config.anim_archive)?);

        let palette = Palette::parse(&resources.read_entry(config.palette_entry)?)?;
        let directory = parse_resource_directory(&resources.read_entry(config.resource_entry)?)?;
        tracing::info!(
            "Opened {}: {} resources",
            root.display(),
            directory.len()
        );

        Ok(Self {
            root,
            body,
            anim,
            resources,
            palette,
            directory,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn body_archive(&self) -> &Hqr {
        &self.body
    }

    #[must_use]
    pub fn anim_archive(&self) -> &Hqr {
        &self.anim
    }

    #[must_use]
    pub fn resource_archive(&self) -> &Hqr {
        &self.resources
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[must_use]
    pub fn resource_directory(&self) -> &ResourceDirectory {
        &self.directory
    }

    /// Decode body `index` of the body archive
    ///
    /// # Errors
    /// Returns an error if the entry cannot be read or is not a valid LM2 body.
    pub fn load_model(&self, index: usize) -> Result<Model> {
        parse_model(&self.body.read_entry(index)?)
    }

    /// Decode animation `index` of the animation archive
    ///
    /// # Errors
    /// Returns an error if the entry cannot be read or is truncated.
    pub fn load_animation(&self, index: usize) -> Result<Animation> {
        parse_animation(&self.anim.read_entry(index)?)
    }

    /// Animation descriptors for body `body_index`, empty if it has none
    #[must_use]
    pub fn animations_for_body(&self, body_index: usize) -> &[AnimDescriptor] {
        self.directory
            .animations_for_body(body_index)
            .unwrap_or_default()
    }

    /// Decode every animation of body `body_index`, in directory order
    ///
    /// # Errors
    /// Returns the first error from reading or decoding an animation.
    pub fn load_body_animations(&self, body_index: usize) -> Result<Vec<Animation>> {
        self.animations_for_body(body_index)
            .iter()
            .map(|a| self.load_animation(usize::from(a.real_index)))
            .collect()
    }
}

/// Find `name` below `root`, matching case-insensitively
///
/// The shallowest match wins.
fn find_archive(root: &Path, name: &str) -> Result<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| {
            e.file_type().is_file()
                && e.file_name()
                    .to_str()
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
        .min_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.path().cmp(b.path())))
        .map(|e| e.into_path())
        .ok_or_else(|| Error::ArchiveNotFound {
            name: name.to_string(),
            root: root.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.body_archive, "BODY.HQR");
        assert_eq!(config.anim_archive, "ANIM.HQR");
        assert_eq!(config.resource_archive, "RESS.HQR");
        assert_eq!(config.resource_entry, 44);
    }

    #[test]
    fn test_config_json_fills_missing_fields() {
        let config: SessionConfig = serde_json::from_str(r#"{"resource_entry": 12}"#).unwrap();
        assert_eq!(config.resource_entry, 12);
        assert_eq!(config.body_archive, "BODY.HQR");
    }

    #[test]
    fn test_find_archive_prefers_shallow_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("a/b")).unwrap();
        std::fs::write(dir.path().join("a/b/BODY.HQR"), b"").unwrap();
        std::fs::write(dir.path().join("a/body.hqr"), b"").unwrap();

        let found = find_archive(dir.path(), "BODY.HQR").unwrap();
        assert_eq!(found, dir.path().join("a/body.hqr"));
    }

    #[test]
    fn test_missing_archive() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_archive(dir.path(), "ANIM.HQR").unwrap_err();
        assert!(matches!(err, Error::ArchiveNotFound { ref name, .. } if name == "ANIM.HQR"));
    }
}
