//! desmaps - effective number density tables for survey depth maps
//!
//! Builds N(m) from a catalog magnitude column and tabulates the
//! completeness-weighted effective number against depth limit, for later
//! interpolation onto a per-pixel depth map.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::CatalogArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Completeness-corrected number densities for survey maps")]
struct Args {
    /// TOML parameter file; defaults are used for anything it omits
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log per-integration detail
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bin catalog magnitudes into an N(m) table
    Nofm {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output N(m) table
        #[arg(long)]
        output: PathBuf,
    },

    /// Tabulate neff against depth limit from an N(m) table
    Neff {
        /// N(m) table written by `nofm`
        #[arg(long)]
        nofm: PathBuf,

        /// Output neff-vs-maglim table
        #[arg(long)]
        output: PathBuf,
    },

    /// Run both steps from a catalog
    Run {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output N(m) table
        #[arg(long, default_value = "mag-auto-i-hist.csv")]
        nofm_output: PathBuf,

        /// Output neff-vs-maglim table
        #[arg(long, default_value = "neff-vs-maglim.csv")]
        neff_output: PathBuf,
    },

    /// Print the effective parameters as TOML
    Params,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(args) {
        tracing::error!(error = %e, "desmaps failed");
        return Err(e);
    }
    Ok(())
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = commands::load_config(args.config.as_deref())?;

    match args.command {
        Command::Nofm { catalog, output } => {
            commands::make_nofm_file(&catalog, &output, &config)?;
        }
        Command::Neff { nofm, output } => {
            commands::make_neff_file(&nofm, &output, &config)?;
        }
        Command::Run {
            catalog,
            nofm_output,
            neff_output,
        } => {
            commands::make_nofm_file(&catalog, &nofm_output, &config)?;
            commands::make_neff_file(&nofm_output, &neff_output, &config)?;
        }
        Command::Params => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
