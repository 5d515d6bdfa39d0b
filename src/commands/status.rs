//! exm status コマンド

use crate::config::MirrorConfig;
use crate::index;
use crate::store::ArtifactStore;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use owo_colors::OwoColorize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
pub struct Args {
    /// Config file path (defaults to ./mirror.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub async fn run(args: Args) -> Result<(), String> {
    let config = MirrorConfig::load(args.config.as_deref()).map_err(|e| e.to_string())?;

    let records = match index::load_local_index(&config.index_file) {
        Some(records) => records,
        None => {
            println!(
                "No local index found at {}. Run `exm sync` first.",
                config.index_file.display()
            );
            return Ok(());
        }
    };

    let store = ArtifactStore::new(&config.output_dir);
    let mut missing = 0;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Package", "Version", "Artifact"]);

    for record in &records {
        let filename = record.artifact_filename();
        let (artifact, color) = if store.contains(&filename) {
            ("present".to_string(), Color::Green)
        } else {
            missing += 1;
            ("missing".to_string(), Color::Red)
        };

        table.add_row(vec![
            Cell::new(&record.name),
            Cell::new(&record.pkg),
            Cell::new(&record.version),
            Cell::new(artifact).fg(color),
        ]);
    }

    println!("{table}");
    println!(
        "{} extension(s) mirrored, {} artifact file(s) missing",
        records.len().green(),
        if missing > 0 {
            missing.red().to_string()
        } else {
            missing.green().to_string()
        }
    );

    Ok(())
}
