use anyhow::Result;
use clap::{Parser, Subcommand};
use repowiki::commands::validators;
use repowiki::commands::*;
use repowiki::config::IndexerConfig;
use repowiki::constants;
use repowiki::logging::Logger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "repowiki")]
#[command(about = "Index source repositories into searchable chunks and documentation outlines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index one or more repositories and write their documentation
    Index {
        /// Repository directories, processed in the order given
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Configuration file path
        #[arg(short, long, default_value = constants::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Directory the documentation is written to
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Print the batch summary as JSON
        #[arg(long)]
        json: bool,

        /// Skip the text-generation endpoint and write placeholder sections
        #[arg(long)]
        no_generate: bool,
    },

    /// Scan a repository and print what the scanner keeps
    Scan {
        /// Repository directory
        path: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = constants::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Output in JSON format for machine consumption
        #[arg(long)]
        json: bool,
    },

    /// Print the structural facts extracted from a repository
    Analyze {
        /// Repository directory
        path: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = constants::config::DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Output in JSON format for machine consumption
        #[arg(long)]
        json: bool,
    },

    /// Write a configuration file populated with the defaults
    Init {
        /// Output file name
        #[arg(short, long, default_value = constants::config::DEFAULT_CONFIG_FILE)]
        output: PathBuf,

        /// Overwrite existing file if it exists
        #[arg(long)]
        overwrite: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            paths,
            config,
            output_dir,
            json,
            no_generate,
        } => {
            validators::validate_repository_paths(&paths)?;
            validators::validate_output_directory(&output_dir)?;

            let mut config = IndexerConfig::load_or_default(&config)?;
            let output_dir = output_dir
                .or(config.output_dir.take())
                .unwrap_or_else(|| PathBuf::from(constants::config::DEFAULT_OUTPUT_DIR));
            let config = config.with_output_dir(Some(output_dir));

            let context = CommandContext::new(config, logger_for(json));
            IndexCommand {
                paths,
                json,
                generate: !no_generate,
            }
            .execute(&context)
            .await?;
        }
        Commands::Scan { path, config, json } => {
            let context =
                CommandContext::new(IndexerConfig::load_or_default(&config)?, logger_for(json));
            ScanCommand { path, json }.execute(&context).await?;
        }
        Commands::Analyze { path, config, json } => {
            let context =
                CommandContext::new(IndexerConfig::load_or_default(&config)?, logger_for(json));
            AnalyzeCommand { path, json }.execute(&context).await?;
        }
        Commands::Init { output, overwrite } => {
            InitCommand { output, overwrite }
                .execute(&CommandContext::default())
                .await?;
        }
    }

    Ok(())
}

/// JSON output keeps stdout clean, so progress lines are dropped
fn logger_for(json: bool) -> Logger {
    if json { Logger::quiet() } else { Logger::default() }
}
