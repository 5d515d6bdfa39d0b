//! exm sources コマンド

use crate::config::MirrorConfig;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use std::path::PathBuf;

#[derive(Debug, Parser)]
pub struct Args {
    /// Config file path (defaults to ./mirror.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub async fn run(args: Args) -> Result<(), String> {
    let config = MirrorConfig::load(args.config.as_deref()).map_err(|e| e.to_string())?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Manifest URL", "Mode", "Keywords", "Blacklist"]);

    for source in &config.sources {
        let mode = if source.keywords.is_empty() {
            "all"
        } else {
            "whitelist"
        };

        table.add_row(vec![
            Cell::new(&source.name),
            Cell::new(&source.url),
            Cell::new(mode),
            Cell::new(source.keywords.join(", ")),
            Cell::new(source.blacklist.join(", ")),
        ]);
    }

    println!("{table}");
    println!("Mirror base URL: {}", config.mirror_base_url);

    Ok(())
}
