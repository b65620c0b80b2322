//! Pica CLI
//!
//! A headless renderer for testing and debugging: tagged text in, layout
//! summary and PNG out.

use anyhow::{Context, Result};
use pica_layout::MonospaceMeasurer;
use pica_style::StyleSheet;
use pica_text::{FontMeasurer, SoftwareSurface, TaggedText};
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: pica-cli <file.txt> [--styles styles.json] [--out out.png]");
        eprintln!("       pica-cli --text '<b>hello</b> world' [--styles ...] [--out ...]");
        std::process::exit(1);
    }

    let mut text: Option<String> = None;
    let mut styles_path: Option<PathBuf> = None;
    let mut out_path = PathBuf::from("out.png");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--text" => {
                i += 1;
                let value = args.get(i).context("--text requires a string argument")?;
                text = Some(value.clone());
            }
            "--styles" => {
                i += 1;
                let value = args.get(i).context("--styles requires a path argument")?;
                styles_path = Some(PathBuf::from(value));
            }
            "--out" => {
                i += 1;
                let value = args.get(i).context("--out requires a path argument")?;
                out_path = PathBuf::from(value);
            }
            path => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("failed to read text file '{path}'"))?;
                text = Some(content.trim_end_matches('\n').to_string());
            }
        }
        i += 1;
    }

    let text = text.context("no input text given")?;

    let styles = match styles_path {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("failed to read style sheet '{}'", path.display()))?;
            serde_json::from_str::<StyleSheet>(&json)
                .with_context(|| format!("failed to parse style sheet '{}'", path.display()))?
        }
        None => StyleSheet::new(),
    };

    let mut node = TaggedText::new(text, styles);

    match FontMeasurer::from_system_fonts() {
        Ok(measurer) => {
            node.update(&measurer);
            print_summary(&node)?;

            let layout = node.layout()?;
            let mut surface = SoftwareSurface::new(layout);
            surface.render(layout, &measurer);
            surface.save(&out_path)?;
            println!("\nSaved render to {}", out_path.display());
        }
        Err(e) => {
            // Still useful without a font: lay out with fixed-advance
            // measurement and print the summary.
            eprintln!("Warning: {e}. Rendering skipped; summary uses fixed-advance metrics.");
            let measurer = MonospaceMeasurer::default();
            node.update(&measurer);
            print_summary(&node)?;
        }
    }

    Ok(())
}

/// Print a per-line, per-instruction layout summary.
fn print_summary(node: &TaggedText) -> Result<()> {
    let layout = node.layout()?;

    println!("=== Layout ===");
    println!("{} line(s)", layout.lines.len());
    for (i, line) in layout.lines.iter().enumerate() {
        println!(
            "  line {i}: width {:.1}, extent [{:.1}, {:.1}]",
            line.width, line.y_min, line.y_max
        );
    }

    println!("\n=== Draw instructions ===");
    for inst in &layout.instructions {
        println!(
            "  <{}> {:?} at ({:.1}, {:.1}) width {:.1}",
            inst.tag.name, inst.text, inst.x, inst.y, inst.width
        );
    }

    println!("\n=== Canvas ===");
    println!(
        "{:.1} x {:.1}",
        layout.canvas.width, layout.canvas.height
    );

    Ok(())
}
