//! Alarm monitor exporter - main entry point
//!
//! Serves appliance monitoring state as Prometheus metrics, or prints a single poll.

use alarm_monitor_exporter::{
    logging::{init_logging, LogConfig},
    monitoring::{CollectorConfig, MetricsCollector},
    server, ExporterSettings, MonitoringHttpClient, Result,
};

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use url::Url;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "alarm-monitor-exporter")]
#[command(about = "Prometheus exporter for alarm appliance monitoring endpoints")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true, env = "ALARM_MONITOR_CONFIG")]
    config: Option<PathBuf>,

    /// Appliance base URL
    #[arg(long, global = true, env = "ALARM_MONITOR_URL")]
    url: Option<Url>,

    /// Access key sent in the Authorization header
    #[arg(long, global = true, env = "ALARM_MONITOR_ACCESS_KEY", hide_env_values = true)]
    access_key: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve metrics over HTTP (default)
    Serve {
        /// Listen address, overrides the configured one
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },
    /// Poll the appliance once and print the metrics
    Poll,
}

impl Cli {
    /// Command line values take precedence over file and environment settings
    fn apply_to(&self, settings: &mut ExporterSettings) {
        if let Some(url) = &self.url {
            settings.appliance.url = url.clone();
        }
        if let Some(access_key) = &self.access_key {
            settings.appliance.access_key = access_key.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match ExporterSettings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    cli.apply_to(&mut settings);

    let mut log_config = LogConfig::from_settings(&settings.logging);
    log_config.apply_env();
    if let Err(e) = init_logging(log_config.with_debug(cli.debug)) {
        eprintln!("Failed to initialize logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = settings.validate() {
        error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let client = MonitoringHttpClient::new(&settings.appliance)?;
    info!("Polling appliance at {}", client.display_url());

    let collector = Arc::new(MetricsCollector::new(
        Arc::new(client),
        CollectorConfig::from(&settings.exporter),
    ));

    match cli.command.unwrap_or(Command::Serve { listen: None }) {
        Command::Serve { listen } => {
            let listen = listen.unwrap_or(settings.exporter.listen);
            let app = server::router(collector, &settings.exporter.metrics_path);
            server::serve(listen, app).await?;
        }
        Command::Poll => {
            print!("{}", collector.render().await);
        }
    }

    Ok(())
}
