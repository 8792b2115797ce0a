mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "roster",
    about = "Flight roster engine: crew selection, seat allocation, and one roster per flight",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .roster/)
    #[arg(long, global = true, env = "ROSTER_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .roster/ with a default config and an empty directory file
    Init,

    /// Inspect and validate the engine configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// List flights known to the directory
    Flights,

    /// Generate (or fully rebuild) the roster for a flight
    Generate {
        flight: String,
        /// Pilot ids to fly instead of automatic selection
        #[arg(long = "pilot", value_delimiter = ',')]
        pilots: Vec<u64>,
        /// Attendant ids to serve instead of automatic selection
        #[arg(long = "attendant", value_delimiter = ',')]
        attendants: Vec<u64>,
    },

    /// Show the current roster for a flight
    Show { flight: String },

    /// Assign a seat to a passenger
    Seat { flight: String, passenger: u64 },

    /// Replace the pilots on an existing roster
    Pilots {
        flight: String,
        #[arg(required = true, value_delimiter = ',')]
        pilot_ids: Vec<u64>,
    },

    /// List crew eligible for manual selection on a flight
    Crew {
        #[arg(required_unless_present = "all")]
        flight: Option<String>,
        /// List the whole crew directory instead
        #[arg(long, conflicts_with = "flight")]
        all: bool,
    },

    /// Show crew and stored roster counts
    Stats,

    /// List stored roster records
    List,

    /// Delete the stored roster for a flight
    Delete { flight: String },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
        Commands::Flights => cmd::flight::list(&root, cli.json),
        Commands::Generate {
            flight,
            pilots,
            attendants,
        } => cmd::roster::generate(&root, &flight, pilots, attendants, cli.json),
        Commands::Show { flight } => cmd::roster::show(&root, &flight, cli.json),
        Commands::Seat { flight, passenger } => {
            cmd::seat::assign(&root, &flight, passenger, cli.json)
        }
        Commands::Pilots { flight, pilot_ids } => {
            cmd::roster::pilots(&root, &flight, &pilot_ids, cli.json)
        }
        Commands::Crew { flight, all } => match flight {
            Some(flight) if !all => cmd::flight::crew(&root, &flight, cli.json),
            _ => cmd::flight::all_crew(&root, cli.json),
        },
        Commands::Stats => cmd::roster::stats(&root, cli.json),
        Commands::List => cmd::roster::list(&root, cli.json),
        Commands::Delete { flight } => cmd::roster::delete(&root, &flight, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
