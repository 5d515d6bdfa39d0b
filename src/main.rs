mod cli;
mod commands;
mod config;
mod error;
mod http;
mod index;
mod matcher;
mod mirror;
mod output;
mod store;
mod version;

use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Ctrl-C は致命エラーと区別して静かに抜ける。
    // インデックスはダウンロード完了後にしか書かれないため、
    // 中断で書きかけのファイルが残ることはない。
    tokio::select! {
        result = commands::dispatch(cli) => {
            if let Err(err) = result {
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted.");
            std::process::exit(130);
        }
    }
}
