//! CLI command for inspecting ANM animations

use std::path::Path;

use crate::formats::anm::parse_animation;
use crate::hqr::Hqr;
use crate::inspect::AnimationInfo;

pub fn inspect(source: &Path, index: usize, json: Option<&Path>) -> anyhow::Result<()> {
    let anim = parse_animation(&Hqr::new(source).read_entry(index)?)?;
    let info = AnimationInfo::from_animation(&anim);

    println!("ANM Animation {index}");
    println!("===============");
    println!("Keyframes:   {}", info.keyframes);
    println!("Boneframes:  {}", info.boneframes);
    println!("Loop frame:  {}", info.loop_frame);
    println!("Length:      {} ms", info.total_length_ms);
    match info.duration_ms {
        Some(ms) => println!("Playback:    {ms} ms"),
        None => println!("Playback:    invalid loop frame"),
    }
    println!("Can fall:    {}", info.can_fall);

    if let Ok(sequence) = anim.frame_sequence() {
        println!("Frames:      {sequence:?}");
    }

    if let Some(path) = json {
        std::fs::write(path, serde_json::to_string_pretty(&anim)?)?;
        println!();
        println!("Animation written to {}", path.display());
    }
    Ok(())
}
