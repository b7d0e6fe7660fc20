//! nametag CLI
//!
//! Usage:
//!   nametag [OPTIONS] [FILE]
//!
//! Options:
//!   -k, --key <KEY>        Only print the name filed under this key
//!   -c, --config <FILE>    Cache configuration (TOML format)
//!   -h, --help             Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nametag::{CacheConfig, Entity, Interner, NameError, Roster};

#[derive(Parser)]
#[command(name = "nametag")]
#[command(about = "Compute the names of entities listed in a TOML roster")]
struct Cli {
    /// Roster file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Only print the name filed under this key
    #[arg(short, long)]
    key: Option<String>,

    /// Cache configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match CacheConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => CacheConfig::default(),
    };

    let interner = match Interner::new(&config) {
        Ok(i) => Arc::new(i),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let roster = match Roster::from_str(&source, interner) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(key) = &cli.key {
        if !roster.has_key(key) {
            eprintln!("Error: no entity has a name under '{}'", key);
            std::process::exit(1);
        }
    }

    let mut failed = false;
    for entity in roster.entities() {
        failed |= !print_entity(entity, cli.key.as_deref());
    }
    if failed {
        std::process::exit(1);
    }
}

/// Print the computed names of `entity`; returns false if any failed
fn print_entity(entity: &Entity, only: Option<&str>) -> bool {
    let mut ok = true;
    for (key, value) in entity.computed() {
        if only.is_some_and(|only| only != key.as_str()) {
            continue;
        }
        match value {
            Ok(text) => println!("{}.{} = {}", entity.id, key, text),
            Err(NameError::Compile(e)) => {
                eprint!("{}", e.format(&format!("{}.{}", entity.id, key)));
                ok = false;
            }
            Err(e) => {
                eprintln!("Error in {}.{}: {}", entity.id, key, e);
                ok = false;
            }
        }
    }
    ok
}
