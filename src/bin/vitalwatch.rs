//! Vitalwatch CLI
//!
//! Commands:
//! - watch: run a monitoring session against the configured feed
//! - classify: one-shot zone check for a single value

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vitalwatch::{
    FeedConfig, HttpTelemetryFeed, LogChannel, MonitorError, MonitorSink, MonitoringSession,
    PermissionState, Reading, TelemetryFeed, ThresholdConfig, VitalKind, ZoneClassifier,
    VITALWATCH_VERSION,
};

/// Vitalwatch - vital-sign telemetry monitoring and threshold alerting
#[derive(Parser)]
#[command(name = "vitalwatch")]
#[command(version = VITALWATCH_VERSION)]
#[command(about = "Monitor vital-sign telemetry and alert on zone transitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll the configured feed and print readings until interrupted
    Watch {
        /// Seconds between poll cycles
        #[arg(long, default_value = "10")]
        interval_secs: u64,

        /// Only print alerts and errors, not every reading
        #[arg(long)]
        quiet: bool,
    },

    /// Classify a single value and print its zone
    Classify {
        /// Which vital the value belongs to
        #[arg(value_enum)]
        kind: KindArg,

        /// The numeric reading
        value: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    /// Oxygen saturation, percent
    Spo2,
    /// Body temperature, celsius
    Temp,
    /// Heart rate, bpm
    HeartRate,
}

impl From<KindArg> for VitalKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Spo2 => VitalKind::Spo2,
            KindArg::Temp => VitalKind::BodyTemperature,
            KindArg::HeartRate => VitalKind::HeartRate,
        }
    }
}

/// Sink that renders session events to stdout.
struct ConsoleSink {
    quiet: bool,
}

impl MonitorSink for ConsoleSink {
    fn on_reading(&self, reading: &Reading) {
        if self.quiet {
            return;
        }
        match reading.value {
            Some(value) => println!(
                "{:<18} {:>7} {}",
                reading.kind.label(),
                value,
                reading.kind.unit()
            ),
            None => println!("{:<18} no data", reading.kind.label()),
        }
    }

    fn on_error(&self, message: &str) {
        eprintln!("feed error: {message}");
    }

    fn on_permission_change(&self, state: PermissionState) {
        println!("notifications: {}", state.as_str());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitalwatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            interval_secs,
            quiet,
        } => watch(Duration::from_secs(interval_secs), quiet).await,
        Commands::Classify { kind, value } => classify(kind.into(), value),
    }
}

async fn watch(interval: Duration, quiet: bool) -> ExitCode {
    // Missing feed configuration is not fatal: the session still runs and
    // serves no-data state, it just never polls.
    let feed: Option<Arc<dyn TelemetryFeed>> = match FeedConfig::from_env() {
        Ok(config) => match HttpTelemetryFeed::new(config) {
            Ok(feed) => Some(Arc::new(feed)),
            Err(e) => {
                tracing::error!(error = %e, "failed to build feed client");
                None
            }
        },
        Err(MonitorError::MissingConfig(name)) => {
            tracing::warn!(variable = name, "feed not configured; running in no-data mode");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "invalid feed configuration");
            None
        }
    };

    let mut session = MonitoringSession::start_with(
        feed,
        Some(Arc::new(LogChannel)),
        Arc::new(ConsoleSink { quiet }),
        ThresholdConfig::default(),
        interval,
    );

    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to listen for shutdown signal");
        session.shutdown();
        return ExitCode::FAILURE;
    }

    session.shutdown();
    ExitCode::SUCCESS
}

fn classify(kind: VitalKind, value: f64) -> ExitCode {
    if !value.is_finite() {
        eprintln!("value must be a finite number");
        return ExitCode::FAILURE;
    }

    let classifier = ZoneClassifier::default();
    let zone = classifier.classify(kind, value);
    println!(
        "{} {} {} -> {}",
        kind.label(),
        value,
        kind.unit(),
        zone.as_str()
    );

    if zone.is_abnormal() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
