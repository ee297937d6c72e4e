//! CLI command for listing the resource directory

use std::path::Path;

use crate::formats::ress::parse_resource_directory;
use crate::hqr::Hqr;

pub fn list(source: &Path, entry: usize, body: Option<usize>) -> anyhow::Result<()> {
    let directory = parse_resource_directory(&Hqr::new(source).read_entry(entry)?)?;

    let mut shown = 0;
    for (i, resource) in directory.iter().enumerate() {
        if body.is_some_and(|b| !resource.has_body(b)) {
            continue;
        }
        shown += 1;

        let bodies: Vec<String> = resource
            .bodies
            .iter()
            .map(|b| {
                if b.has_collision_box {
                    format!("{}*", b.real_index)
                } else {
                    b.real_index.to_string()
                }
            })
            .collect();
        let anims: Vec<String> = resource
            .animations
            .iter()
            .map(|a| a.real_index.to_string())
            .collect();

        println!(
            "{:>4}  bodies [{}]  animations [{}]",
            i,
            bodies.join(", "),
            anims.join(", ")
        );
    }

    println!();
    println!("{shown} of {} resources (* = collision box)", directory.len());
    Ok(())
}
