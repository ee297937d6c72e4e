//! CLI command for inspecting LM2 bodies

use std::path::Path;

use crate::formats::lm2::parse_model;
use crate::hqr::Hqr;
use crate::inspect::ModelInfo;

pub fn inspect(source: &Path, index: usize, json: Option<&Path>) -> anyhow::Result<()> {
    let model = parse_model(&Hqr::new(source).read_entry(index)?)?;
    let info = ModelInfo::from_model(&model);

    println!("LM2 Body {index}");
    println!("==========");
    println!("Version:     {}", info.flags.version);
    println!(
        "Flags:       animated={} no_sort={} transparent={}",
        info.flags.has_animation, info.flags.no_sort, info.flags.has_transparency
    );
    println!(
        "Bounds:      {:?} .. {:?}",
        info.bounding_box.min, info.bounding_box.max
    );
    println!("Bones:       {}", info.bones);
    println!("Vertices:    {}", info.vertices);
    println!("Normals:     {}", info.normals);
    println!(
        "Polygons:    {} ({} textured)",
        info.polygons, info.textured_polygons
    );
    println!("Lines:       {}", info.lines);
    println!("Spheres:     {}", info.spheres);
    println!("UV groups:   {}", info.uv_groups);
    println!("Colours:     {:?}", info.colours);

    if !model.bones.is_empty() {
        println!();
        println!("Skeleton:");
        for joint in model.joints() {
            let parent = joint
                .parent
                .map_or_else(|| "root".to_string(), |p| p.to_string());
            println!(
                "  [{:2}] parent {:>4}  at ({:.2}, {:.2}, {:.2})",
                joint.bone, parent, joint.position.x, joint.position.y, joint.position.z
            );
        }
    }

    if let Some(path) = json {
        std::fs::write(path, serde_json::to_string_pretty(&model)?)?;
        println!();
        println!("Model written to {}", path.display());
    }
    Ok(())
}
