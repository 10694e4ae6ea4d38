// Copyright 2026 Pagesift Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use pagesift::cli::{doctor, scrape_cmd, serve};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pagesift",
    about = "Pagesift: adaptive scraper turning web pages into labeled sections",
    version,
    after_help = "Run 'pagesift <command> --help' for details on each command."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, short, default_value = "8000")]
        port: u16,
    },
    /// Scrape one URL and print the result as JSON
    Scrape {
        /// URL to scrape (must start with http:// or https://)
        url: String,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        /// Write the result to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let result = match args.command {
        Commands::Serve { port } => serve::run(port).await,
        Commands::Scrape {
            url,
            pretty,
            output,
        } => scrape_cmd::run(&url, pretty, output.as_deref()).await,
        Commands::Doctor => doctor::run().await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pagesift", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    result
}
