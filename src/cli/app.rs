//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::output::{Output, OutputFormat};
use super::{build_cmd, outline_cmd, project_cmd};
use crate::storage::Settings;

#[derive(Parser)]
#[command(name = "crossdocs")]
#[command(author, version, about = "Documentation projects built from shared input files")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Doxygen executable (overrides settings)
    #[arg(long, global = true, env = "CROSSDOCS_DOXYGEN")]
    pub doxygen: Option<String>,

    /// Build timeout in seconds (overrides settings)
    #[arg(long, global = true, env = "CROSSDOCS_BUILD_TIMEOUT")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the documents of a project
    Docs {
        /// Project config file
        project: PathBuf,
    },

    /// Print the structural outline of a project
    Outline {
        /// Project config file
        project: PathBuf,

        /// Only this document
        #[arg(long)]
        doc: Option<String>,
    },

    /// Dump the sections of a config file
    Sections {
        /// Any project or document config file
        file: PathBuf,
    },

    /// Load a project and report problems
    Check {
        /// Project config file
        project: PathBuf,
    },

    /// Build one document
    Build {
        /// Project config file
        project: PathBuf,

        /// Tag of the document to build
        doc: String,

        /// Output directory (defaults to the document's own)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("crossdocs=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("crossdocs=warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

/// Settings file merged with command-line overrides
fn effective_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load()?;
    if let Some(program) = &cli.doxygen {
        settings.doxygen_path = program.clone();
    }
    if let Some(secs) = cli.timeout {
        settings.build_timeout_secs = secs;
    }
    Ok(settings)
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let output = Output::new(cli.format);

    debug!("CrossDocs starting");

    match &cli.command {
        Commands::Docs { project } => project_cmd::docs(&output, project)?,
        Commands::Outline { project, doc } => {
            outline_cmd::outline(&output, project, doc.as_deref())?
        }
        Commands::Sections { file } => project_cmd::sections(&output, file)?,
        Commands::Check { project } => project_cmd::check(&output, project)?,
        Commands::Build { project, doc, out } => {
            let settings = effective_settings(&cli)?;
            build_cmd::build(&output, &settings, project, doc, out.as_deref())?
        }
    }

    Ok(())
}
