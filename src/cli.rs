use clap::{Parser, Subcommand};

use crate::commands::{sources, status, sync};

#[derive(Debug, Parser)]
#[command(name = "exm")]
#[command(about = "Extension Mirror CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the mirror pipeline
    Sync(sync::Args),

    /// List configured upstream sources
    Sources(sources::Args),

    /// Show the state of the local mirror
    Status(status::Args),
}
