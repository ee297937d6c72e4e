//! CLI command definitions

use clap::Subcommand;
use std::path::PathBuf;

use crate::formats::anm::timeline::DEFAULT_FPS;
use crate::formats::ress::RESOURCE_DIRECTORY_ENTRY;

#[derive(Subcommand)]
pub enum Commands {
    /// List the entries of an HQR archive
    Info {
        /// HQR archive
        archive: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a single entry
    Entry {
        /// HQR archive
        archive: PathBuf,

        /// Entry index
        index: usize,

        /// Write the decoded bytes to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode every entry of an archive into a directory
    Extract {
        /// HQR archive
        archive: PathBuf,

        /// Output directory
        destination: PathBuf,

        /// Suppress progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Inspect an LM2 body
    Model {
        /// Body archive (BODY.HQR)
        archive: PathBuf,

        /// Entry index
        index: usize,

        /// Write the full decoded model as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Inspect an ANM animation
    Anim {
        /// Animation archive (ANIM.HQR)
        archive: PathBuf,

        /// Entry index
        index: usize,

        /// Write the full decoded animation as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// List the resource directory
    Resources {
        /// Resource archive (RESS.HQR)
        archive: PathBuf,

        /// Entry holding the directory
        #[arg(long, default_value_t = RESOURCE_DIRECTORY_ENTRY)]
        entry: usize,

        /// Only list resources using this body
        #[arg(long)]
        body: Option<usize>,
    },

    /// Print the animation clip list of a body as CSV
    Clips {
        /// Game installation directory
        game_dir: PathBuf,

        /// Body index in BODY.HQR
        body: usize,

        /// Frames per second of the timeline
        #[arg(long, default_value_t = DEFAULT_FPS)]
        fps: f32,

        /// Write the CSV to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
