//! Diagram Resolver CLI
//!
//! Usage:
//!   diagram-resolver [OPTIONS] [FILE]
//!
//! Options:
//!   -s, --style <FILE>       Style or page document (TOML), repeatable
//!   -d, --debug              Print the resolved model to stderr as well
//!   --max-passes <N>         Bound on resolution passes
//!   --namespaces <LIST>      Comma-separated namespace order
//!   --log-level <LEVEL>      off, error, warn, info, debug, trace
//!   -h, --help               Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;
use log::{debug, info, LevelFilter};

use diagram_resolver::{
    parse_records, resolve_with_config, RenderConfig, ResolveConfig, StyleDocument,
};

#[derive(Parser, Debug)]
#[command(name = "diagram-resolver")]
#[command(about = "Resolve diagram element records into positions, sizes and styles")]
struct Cli {
    /// Element record file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Style or page document (TOML), merged in the order given
    #[arg(short, long = "style")]
    styles: Vec<PathBuf>,

    /// Debug mode: also print the resolved model to stderr
    #[arg(short, long)]
    debug: bool,

    /// Maximum number of resolution passes
    #[arg(long)]
    max_passes: Option<usize>,

    /// Namespace order, most generic first (comma-separated)
    #[arg(long, value_delimiter = ',')]
    namespaces: Option<Vec<String>>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting diagram-resolver");
    debug!(cli:?; "Parsed arguments");

    match run(&cli) {
        Ok(dump) => print!("{dump}"),
        Err(message) => {
            eprintln!("Error: {message}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("reading file '{}': {}", path.display(), e))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("reading from stdin: {e}"))?;
            buffer
        }
    };

    let decls = parse_records(&source).map_err(|e| e.to_string())?;

    let mut documents = Vec::with_capacity(cli.styles.len());
    for path in &cli.styles {
        let document = StyleDocument::from_file(path)
            .map_err(|e| format!("loading style '{}': {}", path.display(), e))?;
        documents.push(document);
    }

    let mut resolve = ResolveConfig::new();
    if let Some(passes) = cli.max_passes {
        resolve = resolve.with_max_passes(passes);
    }
    let mut config = RenderConfig::new()
        .with_resolve(resolve)
        .with_debug(cli.debug);
    if let Some(namespaces) = &cli.namespaces {
        config = config.with_namespaces(namespaces.iter().cloned());
    }

    let diagram = resolve_with_config(decls, documents, &config).map_err(|e| e.to_string())?;
    info!(elements = diagram.elements.len(), colors = diagram.colors.len(); "Resolved diagram");
    Ok(diagram.dump())
}
