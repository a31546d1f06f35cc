//! # bindery CLI
//!
//! Mount a template against JSON data and print the result.

mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bindery")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by every command
#[derive(Args)]
struct MountArgs {
    /// Markup template to mount
    #[arg(long)]
    template: PathBuf,

    /// JSON object holding the initial data
    #[arg(long)]
    data: PathBuf,

    /// Path to configuration file
    #[arg(long, env = "BINDERY_CONFIG")]
    config: Option<PathBuf>,

    /// Root selector (overrides the configuration)
    #[arg(long)]
    selector: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount the template, apply writes, print the rendered markup
    Render {
        #[command(flatten)]
        mount: MountArgs,

        /// Write a top-level key after mounting (`key=<json>`), repeatable
        #[arg(long = "set", value_name = "KEY=JSON")]
        sets: Vec<String>,
    },

    /// List the bindings discovered in the template
    Bindings {
        #[command(flatten)]
        mount: MountArgs,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so rendered markup stays clean on stdout
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Render { mount, sets } => {
            let opts = commands::MountOptions::from(mount);
            commands::render(&opts, &sets)
        }
        Commands::Bindings { mount, json } => {
            let opts = commands::MountOptions::from(mount);
            commands::list_bindings(&opts, json)
        }
    }
}

impl From<MountArgs> for commands::MountOptions {
    fn from(args: MountArgs) -> Self {
        Self {
            template: args.template,
            data: args.data,
            config: args.config,
            selector: args.selector,
        }
    }
}
