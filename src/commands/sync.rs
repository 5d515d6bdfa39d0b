//! exm sync コマンド

use crate::config::MirrorConfig;
use crate::mirror::{self, MirrorReport};
use crate::output::CommandSummary;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use owo_colors::OwoColorize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
pub struct Args {
    /// Config file path (defaults to ./mirror.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Fetch and plan only, without downloading or writing
    #[arg(long)]
    pub dry_run: bool,

    /// Override the artifact output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Override the index file path
    #[arg(long)]
    pub index_file: Option<PathBuf>,
}

pub async fn run(args: Args) -> Result<(), String> {
    let mut config = MirrorConfig::load(args.config.as_deref()).map_err(|e| e.to_string())?;

    if let Some(output_dir) = args.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(index_file) = args.index_file {
        config.index_file = index_file;
    }

    let report = mirror::run(&config, args.dry_run)
        .await
        .map_err(|e| e.to_string())?;

    print_report(&report);

    // ソース・レコード単位の失敗は部分成功として扱う（終了コード0）
    Ok(())
}

fn print_report(report: &MirrorReport) {
    println!();

    // ソース別の内訳
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Source", "Entries", "Kept", "Status"]);

    for source in &report.sources {
        let (status, color) = match &source.skipped {
            Some(reason) => (format!("skipped: {}", reason), Color::Red),
            None => ("ok".to_string(), Color::Green),
        };

        table.add_row(vec![
            Cell::new(&source.name),
            Cell::new(source.fetched),
            Cell::new(source.kept),
            Cell::new(status).fg(color),
        ]);
    }

    println!("{table}");
    println!();

    if report.dry_run {
        println!(
            "Dry run: {} to download, {} up to date",
            report.planned.cyan(),
            report.reused.green()
        );
        return;
    }

    println!(
        "Downloaded: {}  Reused: {}  Dropped: {}",
        report.downloaded.green(),
        report.reused.green(),
        report.dropped.len().red()
    );

    if !report.reaped.is_empty() {
        println!("Reaped {} stale file(s):", report.reaped.len().yellow());
        for filename in &report.reaped {
            println!("  - {}", filename);
        }
    }

    let elapsed = (report.finished_at - report.started_at).num_seconds();
    let skipped_sources = report
        .sources
        .iter()
        .filter(|s| s.skipped.is_some())
        .count();

    let summary = CommandSummary::format(report.published, report.dropped.len() + skipped_sources);
    println!("{} {} ({}s)", summary.prefix, summary.message, elapsed);
}
