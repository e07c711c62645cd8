//! Topology builder CLI
//!
//! Reads a domain/subscription configuration document, builds the declaration
//! set, and writes it as pretty-printed JSON for the deployment engine. Exits
//! non-zero on the first unresolved reference.

use clap::Parser;
use std::path::PathBuf;
use topology_builder::{BuilderSettings, TopologyBuilder, TopologyConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "topology", about = "Build messaging topology declarations")]
struct Args {
    /// Topology configuration document (JSON or YAML)
    #[arg(long, default_value = "config/topology.json")]
    config: PathBuf,

    /// Write declarations to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Stack base name used to scope export names
    #[arg(long, default_value = "Topology")]
    stack_name: String,

    /// Deployment environment suffix (Dev, Stg, Prod)
    #[arg(long, default_value = "Dev")]
    suffix: String,

    /// Deployment version surfaced as a stack output
    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    version: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = TopologyConfig::from_file(&args.config)?;
    info!(
        "loaded {} domains from {}",
        config.domains.len(),
        args.config.display()
    );

    let builder = TopologyBuilder::new(BuilderSettings {
        stack_name: args.stack_name.clone(),
        stack_suffix: args.suffix.clone(),
        version: args.version.clone(),
        ..Default::default()
    });
    let topology = builder.build(&config)?;

    let rendered = serde_json::to_string_pretty(&topology)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, rendered + "\n")?;
            info!("wrote declarations to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    info!(
        "emitted {} topics, {} queues, {} policies, {} subscriptions",
        topology.topics.len(),
        topology.queues.len(),
        topology.policies.len(),
        topology.subscriptions.len()
    );
    Ok(())
}
