//! sheetviz - extract anchored images and shapes from a workbook, resolve
//! their pixel geometry, and flatten detected overlays into composites.
//!
//! Per sheet, in document order: sizes and drawing objects are read, every
//! image's raw bytes are written under its resolved cell-range name, overlap
//! classification pairs overlays with base images, and each base with
//! overlays is rendered into a `_with_overlays.jpg` composite.
//!
//! Only two failures abort a run: an unreadable workbook and an unwritable
//! output directory. Everything else degrades per object with a warning.

use anyhow::{Context, Result};
use clap::Parser;
use sheetviz_backend::{extract_sheet, WorkbookReader};
use sheetviz_core::{classify_sheet, CellRef, ObjectContent, VisualObject};
use sheetviz_render::{composite_file_name, render_overlay_set, resolve_font};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sheetviz", version, about)]
struct Args {
    /// Workbook to process (.xlsx)
    input: PathBuf,

    /// Directory receiving extracted images and composites
    #[arg(short, long, default_value = "images_with_positions")]
    output_dir: PathBuf,

    /// Increase log detail (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            args.output_dir.display()
        )
    })?;

    let mut reader = WorkbookReader::open(&args.input)
        .with_context(|| format!("cannot open {}", args.input.display()))?;
    let font = resolve_font();

    let sheet_names = reader.sheet_names().to_vec();
    for (sheet_idx, sheet_name) in sheet_names.iter().enumerate() {
        let objects = extract_sheet(&mut reader, sheet_idx, sheet_name);

        // Raw bytes are written for every image, decodable or not.
        for image in &objects.images {
            let ObjectContent::Image { bytes, .. } = &image.content else {
                continue;
            };
            let path = args.output_dir.join(&image.name);
            fs::write(&path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            print_image_report(sheet_name, image);
        }

        let sets = classify_sheet(&objects.images, &objects.shapes);
        for set in &sets {
            let base = &objects.images[set.base];
            match render_overlay_set(&objects.images, &objects.shapes, set, &font) {
                Ok(bytes) => {
                    let name = composite_file_name(&base.name);
                    let path = args.output_dir.join(&name);
                    fs::write(&path, bytes)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!(
                        "Composite: {name} ({} image overlays, {} shape overlays)",
                        set.image_overlays.len(),
                        set.shape_overlays.len()
                    );
                }
                Err(e) => log::warn!("Skipping composite for {}: {e}", base.name),
            }
        }
    }

    println!("\nAll images saved to: {}", args.output_dir.display());
    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn print_image_report(sheet_name: &str, image: &VisualObject) {
    println!("Sheet: {sheet_name}");
    println!("  Image: {}", image.name);
    println!("  Top-Left Cell: {}", cell_or_unknown(image.top_left));
    println!(
        "  Top-Left Offset (pixels): x={:.1}, y={:.1}",
        image.start_offset.0, image.start_offset.1
    );
    println!("  Bottom-Right Cell: {}", cell_or_unknown(image.bottom_right));
    println!(
        "  Bottom-Right Offset (pixels): x={:.1}, y={:.1}",
        image.end_offset.0, image.end_offset.1
    );
    println!("{}", "-".repeat(50));
}

fn cell_or_unknown(cell: Option<CellRef>) -> String {
    cell.map_or_else(|| "Unknown".to_string(), |c| c.a1())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_or_unknown() {
        assert_eq!(cell_or_unknown(Some(CellRef::new(7, 2))), "B7");
        assert_eq!(cell_or_unknown(None), "Unknown");
    }
}
