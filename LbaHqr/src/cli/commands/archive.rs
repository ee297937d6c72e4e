//! CLI commands for raw HQR archive access

use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{DISK, LOOKING_GLASS, PACKAGE, print_done, print_step, simple_bar};
use crate::hqr::{Compression, Hqr, extract_all};

/// Format byte size for human-readable output
fn format_size(bytes: u32) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1}M", f64::from(bytes) / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1}K", f64::from(bytes) / 1024.0)
    } else {
        format!("{bytes}")
    }
}

pub fn info(source: &Path, json: bool) -> anyhow::Result<()> {
    let hqr = Hqr::new(source);
    let entries = hqr.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!(
        "{:>5}  {:>10}  {:>10}  {:>10}  {:>7}",
        "INDEX", "OFFSET", "SIZE", "STORED", "TYPE"
    );
    for entry in &entries {
        match &entry.header {
            Ok(header) => {
                let kind = match header.compression() {
                    Compression::Stored => "stored".to_string(),
                    Compression::Lz { length_bias } => format!("lz/{length_bias}"),
                };
                println!(
                    "{:>5}  {:>10}  {:>10}  {:>10}  {:>7}",
                    entry.index,
                    header.offset,
                    format_size(header.size_full),
                    format_size(header.size_compressed),
                    kind
                );
            }
            Err(e) => println!("{:>5}  error: {}", entry.index, e),
        }
    }

    let total_full: u64 = entries
        .iter()
        .filter_map(|e| e.header.as_ref().ok())
        .map(|h| u64::from(h.size_full))
        .sum();
    println!();
    println!("{} entries, {} bytes decoded", entries.len(), total_full);
    Ok(())
}

pub fn entry(source: &Path, index: usize, output: Option<&Path>) -> anyhow::Result<()> {
    let hqr = Hqr::new(source);
    let header = hqr.entry_header(index)?;
    let data = hqr.read_entry(index)?;

    match output {
        Some(path) => {
            std::fs::write(path, &data)?;
            println!("Wrote {} bytes to {}", data.len(), path.display());
        }
        None => {
            println!("Entry {index}");
            println!("  Offset:      {}", header.offset);
            println!("  Compression: {}", header.compression().as_str());
            println!("  Stored size: {} bytes", header.size_compressed);
            println!("  Full size:   {} bytes", header.size_full);
            if let Some(ratio) = header.compression_ratio() {
                println!("  Ratio:       {ratio:.2}x");
            }
        }
    }
    Ok(())
}

pub fn extract(source: &Path, destination: &Path, quiet: bool) -> anyhow::Result<()> {
    let start = Instant::now();
    let hqr = Hqr::new(source);

    if !quiet {
        print_step(1, 2, LOOKING_GLASS, "Reading offset table...");
    }
    let total = hqr.entry_count()?;

    if !quiet {
        print_step(2, 2, PACKAGE, &format!("Decoding {total} entries..."));
    }
    let result = if quiet {
        extract_all(&hqr, destination, |_, _| {})?
    } else {
        let pb = simple_bar(total as u64, "Extracting");
        let result = extract_all(&hqr, destination, |done, _| pb.set_position(done as u64))?;
        pb.finish_with_message("done");
        result
    };

    for (index, error) in &result.errors {
        eprintln!("Entry {index}: {error}");
    }
    if !quiet {
        println!(
            "{}{} written, {} failed",
            DISK,
            result.success_count(),
            result.fail_count()
        );
        print_done(start.elapsed());
    }
    Ok(())
}
