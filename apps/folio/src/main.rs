use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod contact;
mod settings;
mod typing;

use contact::{ContactArgs, FieldArgs};

#[derive(Parser, Debug)]
#[command(name = "folio", about = "Portfolio typing banner and contact form")]
struct Cli {
    /// Settings file; `folio.toml` in the working directory is used when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the phrase animation.
    Typing {
        /// Stop after this many phrases instead of running until Ctrl-C.
        #[arg(long)]
        phrases: Option<usize>,
    },
    /// Fill in and send the contact form.
    Contact(ContactArgs),
    /// Check contact fields without sending.
    Validate(FieldArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Typing { phrases } => {
            let settings = settings::load_settings(cli.config.as_deref())?;
            typing::run(&settings, phrases).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Contact(args) => {
            let settings = settings::load_settings(cli.config.as_deref())?;
            contact::run(&settings, args).await
        }
        Command::Validate(args) => contact::validate(&args),
    }
}
