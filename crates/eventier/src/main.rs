mod demo;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use eventier_core::{CancellationPolicy, DispatcherConfig};
use tracing_subscriber::EnvFilter;

/// Eventier: dispatch a greeting through priority-ordered listeners
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Dispatcher settings file (.json, .yaml, .yml or .toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log every handler invocation and event mutation
    #[arg(long)]
    trace: bool,

    /// Run listen_cancelled handlers for cancelled greetings
    #[arg(long)]
    honor_listen_cancelled: bool,

    /// Dispatch the greeting already cancelled
    #[arg(long)]
    cancel: bool,

    /// Greeting text
    #[arg(long, default_value = "hi")]
    message: String,
}

impl CliArgs {
    /// File settings first, then command-line flags on top
    fn dispatcher_config(&self) -> eventier_core::Result<DispatcherConfig> {
        let mut config = match &self.config {
            Some(path) => DispatcherConfig::load(path)?,
            None => DispatcherConfig::default(),
        };
        if self.trace {
            config.trace = true;
        }
        if self.honor_listen_cancelled {
            config.cancellation_policy = CancellationPolicy::HonorListenCancelled;
        }
        Ok(config)
    }
}

fn init_logging(trace: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default_directives = if trace { "warn,eventier::dispatch=trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match args.dispatcher_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load dispatcher configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(config.trace) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    log::debug!("Dispatcher configuration: {:?}", config);

    let greet = demo::run(config, &args.message, args.cancel);
    println!("result: {}", greet.message);
    ExitCode::SUCCESS
}
