use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use chrono::{DateTime, Utc};
use council_roles::config::Config;
use council_roles::dates::parse_datetime;
use council_roles::legistar::{person_name, roles_from_person, LegistarCache, LegistarDump, LegistarLookup};
use council_roles::{logging, metrics, RawRole, RoleSanitizer, StaticData};

#[derive(Parser)]
#[command(name = "council_roles")]
#[command(about = "Sanitize scraped council roles against static override data")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to $COUNCIL_ROLES_CONFIG, then ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print Prometheus metrics to stderr when done
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sanitize one person's roles read from a JSON array
    Sanitize {
        /// Person name as it appears in the static data file
        #[arg(long)]
        person: String,
        /// JSON file holding an array of scraped roles
        #[arg(long)]
        roles: PathBuf,
        /// Static override file (overrides the config file setting)
        #[arg(long)]
        static_data: Option<PathBuf>,
        /// Moment used for the "currently active" check (defaults to now)
        #[arg(long)]
        now: Option<String>,
        /// Print dropped and truncated roles along with the output
        #[arg(long)]
        report: bool,
    },
    /// Sanitize every person in a Legistar export
    SanitizeLegistar {
        /// JSON export with bodies, persons and office_records
        #[arg(long)]
        dump: PathBuf,
        #[arg(long)]
        static_data: Option<PathBuf>,
        #[arg(long)]
        now: Option<String>,
    },
    /// Load a static override file and summarize it
    CheckStatic {
        #[arg(long)]
        static_data: Option<PathBuf>,
    },
}

fn load_static_data(cli_path: Option<PathBuf>, config: &Config) -> Result<Option<StaticData>> {
    match cli_path.or_else(|| config.static_data.path.clone()) {
        Some(path) => {
            let data = StaticData::load(&path)
                .with_context(|| format!("Failed to load static data from {}", path.display()))?;
            info!(
                persons = data.persons.len(),
                primary_bodies = data.primary_bodies.len(),
                "Loaded static data"
            );
            Ok(Some(data))
        }
        None => Ok(None),
    }
}

fn resolve_now(now: Option<String>) -> Result<DateTime<Utc>> {
    match now {
        Some(text) => match parse_datetime(&text) {
            Some(now) => Ok(now),
            None => bail!("--now '{}' is not a timestamp", text),
        },
        None => Ok(Utc::now()),
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let metrics_handle = if cli.metrics { metrics::init_metrics() } else { None };

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let sanitizer = RoleSanitizer::new(&config.sanitizer);

    match cli.command {
        Commands::Sanitize {
            person,
            roles,
            static_data,
            now,
            report,
        } => {
            let static_data = load_static_data(static_data, &config)?;
            let now = resolve_now(now)?;
            let raw_roles: Vec<RawRole> = serde_json::from_str(&read_file(&roles)?)
                .with_context(|| format!("Failed to parse roles in {}", roles.display()))?;

            let result = sanitizer.sanitize_with_report(&person, &raw_roles, static_data.as_ref(), now);
            let output = if report {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string_pretty(&result.roles)?
            };
            println!("{}", output);
        }
        Commands::SanitizeLegistar { dump, static_data, now } => {
            let static_data = load_static_data(static_data, &config)?;
            let now = resolve_now(now)?;
            let dump = LegistarDump::from_json_str(&read_file(&dump)?)
                .with_context(|| format!("Failed to parse Legistar export {}", dump.display()))?;

            let mut cache = LegistarCache::new();
            let mut lookup = LegistarLookup::new(&dump, &mut cache);
            let mut sanitized = BTreeMap::new();

            for person_id in dump.person_ids() {
                let Some(person) = lookup.get_person(person_id)? else {
                    warn!(person_id, "Person listed but not found");
                    continue;
                };
                let Some(name) = person_name(&person) else {
                    warn!(person_id, "Person has no name, skipping");
                    continue;
                };
                let roles = roles_from_person(&person);
                let clean = sanitizer.sanitize(&name, &roles, static_data.as_ref(), now);
                sanitized.insert(name, clean);
            }

            println!("{}", serde_json::to_string_pretty(&sanitized)?);
        }
        Commands::CheckStatic { static_data } => {
            let Some(data) = load_static_data(static_data, &config)? else {
                bail!("No static data file given (use --static-data or [static_data] path)");
            };

            println!("Primary bodies:");
            for name in data.primary_bodies.keys() {
                println!("   - {}", name);
            }
            println!("Seats: {}", data.seats.len());
            println!("Persons:");
            for (name, person) in &data.persons {
                let seat = person.seat.as_ref().map(|s| s.name.as_str()).unwrap_or("<no seat>");
                println!("   - {} ({}): {} roles", name, seat, data.person_roles(name).len());
            }
        }
    }

    if let Some(handle) = metrics_handle {
        eprintln!("{}", handle.render());
    }

    Ok(())
}
