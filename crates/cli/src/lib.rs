mod cat;
mod list;
mod lookup;

use artiscope_core::config::artiscope_home;
use artiscope_runtime::ArtifactConfig;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "artiscope",
    version,
    about = "Inspect what an isolated artifact exposes to other artifacts",
    long_about = "Artiscope assembles an artifact from its configuration (classpath, exported \
                  packages and resources, exported services) and answers lookups through the \
                  same filtering loader other artifacts would see."
)]
pub struct Cli {
    /// Artifact configuration file (JSON)
    #[arg(long, global = true, value_name = "FILE", default_value = "artifact.json")]
    pub config: PathBuf,

    /// Directory for generated service descriptors. Defaults to ~/.artiscope/services/<artifact>.
    #[arg(long, global = true, value_name = "DIR")]
    pub descriptor_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a class through the filtering loader
    LoadClass {
        /// Fully-qualified class name, e.g. com.example.Api
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Resolve the first visible resource with this name
    Resource {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Resolve every visible resource with this name
    Resources {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Look a resource up in the artifact itself, ignoring export rules
    FindResource {
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// List classpath entries and whether each one is exported
    List {
        /// Only show exported entries
        #[arg(long)]
        exported: bool,
    },
    /// Print the contents of a visible resource
    Cat {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _guard = artiscope_runtime::init_logging("cli", true);

    let config = ArtifactConfig::load(&cli.config)?;
    let descriptor_dir = cli
        .descriptor_dir
        .clone()
        .unwrap_or_else(|| default_descriptor_dir(&config.artifact_id));
    let artifact = artiscope_runtime::build_filtering_loader(&config, &descriptor_dir)?;

    let result = match cli.command {
        Commands::LoadClass { name } => lookup::load_class(&artifact, &name, cli.json),
        Commands::Resource { name } => lookup::resource(&artifact, &name, cli.json),
        Commands::Resources { name } => lookup::resources(&artifact, &name, cli.json),
        Commands::FindResource { name } => lookup::find_resource(&artifact, &name, cli.json),
        Commands::List { exported } => list::run(&artifact, exported, cli.json),
        Commands::Cat { name } => cat::run(&artifact, &name),
    };

    artifact.dispose();
    result
}

fn default_descriptor_dir(artifact_id: &str) -> PathBuf {
    let sanitized: String = artifact_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect();
    artiscope_home().join("services").join(sanitized)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
