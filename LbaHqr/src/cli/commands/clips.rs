//! CLI command for building a body's animation clip list

use std::path::Path;

use crate::cli::progress::{FILM, LOOKING_GLASS, print_step};
use crate::formats::anm::ClipTimeline;
use crate::session::{Session, SessionConfig};

pub fn execute(game_dir: &Path, body: usize, fps: f32, output: Option<&Path>) -> anyhow::Result<()> {
    // keep stdout clean when the CSV goes there
    let verbose = output.is_some();

    if verbose {
        print_step(1, 2, LOOKING_GLASS, "Opening game directory...");
    }
    let session = Session::open(game_dir, SessionConfig::default())?;

    let descriptors = session.animations_for_body(body);
    if descriptors.is_empty() {
        anyhow::bail!("body {body} has no animations in the resource directory");
    }

    if verbose {
        print_step(2, 2, FILM, &format!("Decoding {} animations...", descriptors.len()));
    }
    let animations = session.load_body_animations(body)?;
    let timeline = ClipTimeline::build(&animations, fps)?;
    let csv = timeline.to_csv();

    match output {
        Some(path) => {
            std::fs::write(path, &csv)?;
            println!("{} clips written to {}", timeline.len(), path.display());
        }
        None => println!("{csv}"),
    }
    Ok(())
}
