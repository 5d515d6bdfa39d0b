//! サブコマンド実装

use crate::cli::Command;

pub mod sources;
pub mod status;
pub mod sync;

pub async fn dispatch(cli: crate::cli::Cli) -> Result<(), String> {
    match cli.command {
        Command::Sync(args) => sync::run(args).await,
        Command::Sources(args) => sources::run(args).await,
        Command::Status(args) => status::run(args).await,
    }
}
