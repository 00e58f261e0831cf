//! Vireo CLI — run the demo scene and inspect the component factories.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vireo")]
#[command(version, about = "Vireo — scene-graph simulation scheduler")]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the demo pendulum scene.
    Simulate {
        /// Path to simulation config (TOML). Defaults apply when omitted.
        #[arg(short, long)]
        config: Option<String>,

        /// Number of steps (overrides the config).
        #[arg(short, long)]
        steps: Option<u32>,

        /// Print step reports as JSON lines.
        #[arg(long)]
        json: bool,
    },

    /// Print the factory registration log.
    FactoryLog,

    /// Validate a simulation config.
    Validate {
        /// Path to config file (TOML).
        path: String,
    },
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("vireo_scene=debug,vireo_factory=debug,vireo_components=debug,info")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Simulate { config, steps, json } => commands::simulate(config.as_deref(), steps, json),
        Commands::FactoryLog => commands::factory_log(),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
