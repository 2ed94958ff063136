use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;
use vibespecs_cli::commands::{self, GenerateOutput};
use vibespecs_config::Config;

#[derive(Parser)]
#[command(name = "vibespecs")]
#[command(about = "VibeSpecs - turn a rough app idea into a build-ready PRD")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate a PRD from an idea without starting the server
    Generate {
        /// The raw app idea
        idea: String,
        /// Directory to write the markdown export into
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
        /// Print the document as JSON instead of writing markdown
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            vibespecs_cli::run_server(config).await
        }
        Commands::Generate { idea, output, json } => {
            let output = if json {
                GenerateOutput::Json
            } else {
                GenerateOutput::Markdown(output)
            };
            commands::generate(&config, &idea, output).await
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
