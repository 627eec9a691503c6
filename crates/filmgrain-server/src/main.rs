//! filmgrain CLI - apply the filmgrain look to a remote image
//!
//! Runs the same request path as the service: fetch, decode, grain, blur,
//! posterize, encode PNG.

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use filmgrain_server::{load_config, ConfigError, HttpFetcher, ServerConfig, Service};

/// Fetch an image and return it with film grain, blur and a warm posterized tint.
#[derive(Parser, Debug)]
#[command(name = "filmgrain")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    filmgrain https://example.com/cat.jpg -o cat.png
    filmgrain https://example.com/cat.jpg --grain 0 --radius 4 > soft.png
    filmgrain https://example.com/cat.jpg --config look.json -v")]
struct Args {
    /// Image URL (http or https)
    #[arg(value_name = "URL")]
    url: String,

    /// Output PNG path (stdout when omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override noise amplitude
    #[arg(long)]
    grain: Option<f64>,

    /// Override blur radius
    #[arg(long)]
    radius: Option<u32>,

    /// Override fetch timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Verbose output with timing
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = build_config(args)?;

    let fetcher = HttpFetcher::new(&config.fetch)?;
    let service = Service::new(fetcher, &config)?;

    let response = service.respond(Some(&args.url));
    if !response.is_success() {
        return Err(format!(
            "{} ({})",
            String::from_utf8_lossy(&response.body),
            response.status
        )
        .into());
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &response.body)?;
            info!("wrote {} bytes to {}", response.body.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&response.body)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn build_config(args: &Args) -> Result<ServerConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    if let Some(grain) = args.grain {
        config.pipeline.grain = grain;
    }
    if let Some(radius) = args.radius {
        config.pipeline.blur_radius = radius;
    }
    if let Some(timeout) = args.timeout {
        config.fetch.timeout_secs = timeout;
    }
    config.validate()?;
    Ok(config)
}
