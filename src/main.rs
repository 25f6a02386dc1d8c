use anyhow::Result;
use clap::Parser;
use comphost::config::LoggingConfig;
use comphost::{
    ComphostConfig, EventBusError, EventScript, LifecycleOrchestrator, NoticeFilter, ReplaySummary,
};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser, Debug)]
#[command(name = "comphost")]
#[command(about = "Lifecycle state machine for service components deployed on cluster hosts")]
#[command(version)]
#[command(long_about = "Tracks the install/start/stop/uninstall/wipeout lifecycle of service \
components on cluster hosts. Registers the component hosts listed in the configuration file, \
replays an optional script of lifecycle events through them and prints the resulting states \
as JSON.")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "comphost.toml", help = "Path to TOML configuration file")]
    config: String,

    /// Event script to replay
    #[arg(short, long, value_name = "FILE", help = "TOML script of lifecycle events to replay")]
    events: Option<PathBuf>,

    /// Exit non-zero when any scripted event is rejected
    #[arg(long, help = "Exit with status 1 if any replayed event is rejected")]
    strict: bool,

    /// Enable debug logging (most verbose)
    #[arg(short, long, help = "Enable debug level logging")]
    debug: bool,

    /// Enable verbose logging (info level)
    #[arg(short, long, help = "Enable verbose info level logging")]
    verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(short, long, help = "Enable quiet mode - only log errors")]
    quiet: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration file and exit")]
    validate_config: bool,

    /// Print default configuration and exit
    #[arg(long, help = "Print default configuration in TOML format and exit")]
    print_config: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT", help = "Log output format: json, pretty, or compact")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    let config = ComphostConfig::load_from_file(&args.config)?;
    let guard = init_logging(&args, &config.logging)?;

    info!("Starting comphost v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", args.config);

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        if args.validate_config {
            eprintln!("✗ Configuration validation failed: {}", e);
            std::process::exit(1);
        }
        return Err(e.into());
    }

    if args.validate_config {
        info!("Configuration validation successful");
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let orchestrator = LifecycleOrchestrator::from_config(&config).map_err(|e| {
        error!("Failed to register component hosts: {}", e);
        e
    })?;

    let mut receiver =
        orchestrator.subscribe(NoticeFilter::NoticeTypes(vec!["transitioned"]), "cli");
    let watcher = tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(notice) => info!("{}", notice.description()),
                Err(EventBusError::Lagged { skipped }) => {
                    warn!("Notice log skipped {} transitions", skipped)
                }
                Err(_) => break,
            }
        }
    });

    let summary = match &args.events {
        Some(path) => {
            let script = EventScript::load_from_file(path).map_err(|e| {
                error!("Failed to load event script {}: {}", path.display(), e);
                e
            })?;
            orchestrator.dispatch_all(script.into_events())
        }
        None => ReplaySummary::default(),
    };

    let report = serde_json::json!({
        "applied": summary.applied,
        "rejected": summary.rejected,
        "hosts": orchestrator.statuses(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    // Closing the bus lets the watcher drain and exit
    drop(orchestrator);
    if let Err(e) = watcher.await {
        warn!("Notice logging task failed: {}", e);
    }

    if args.strict && !summary.is_clean() {
        error!("{} events were rejected", summary.rejected.len());
        drop(guard);
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(args: &Args, logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Determine log level based on flags
    let log_level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("comphost={}", log_level)));

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed(),
        Some("compact") => fmt::layer()
            .compact()
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .boxed(),
        Some("pretty") | None => fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(args.debug)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .with_writer(std::io::stderr)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .boxed()
        }
    };

    // Rolling file output alongside stderr when a log directory is configured
    let (file_layer, guard) = match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(file_layer)
        .with(env_filter)
        .init();

    Ok(guard)
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    println!("# Comphost Configuration File");
    println!("# This is the default configuration with all available options");
    println!();
    print!("{}", toml::to_string_pretty(&ComphostConfig::default())?);
    println!();
    println!("# Component hosts to register at startup:");
    println!("# [[hosts]]");
    println!("# component = \"datanode\"");
    println!("# host = \"h1\"");
    println!("# client = false");
    Ok(())
}
