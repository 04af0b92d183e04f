//! Glue Data Catalog table version cleanup.
//!
//! One binary, two jobs:
//! - `planner` enumerates catalog tables and enqueues one work item per table
//! - `cleanup` consumes work items and deletes all but the newest versions
//!
//! The job is the first command-line argument, or the `_HANDLER` setting when
//! hosted on Lambda. Under Lambda the job serves invocations until the runtime
//! shuts the process down; anywhere else it runs once (the cleanup job reads
//! its queue event from stdin).

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::{error, info};

use audit_ledger::{
    AuditTrail, DynamoLedger, LedgerConfig, CLEANUP_LEDGER_DEFAULTS, PLANNER_LEDGER_DEFAULTS,
};
use cleanup_core::Settings;
use glue_catalog::{CatalogConfig, GlueCatalog};
use sqs_queue::{QueueConfig, QueueEvent, SqsProducer};
use telemetry::{init_tracing_from_env, log_metrics_snapshot};
use worker::{
    CleanupSettings, CleanupWorker, Planner, PlannerSettings, CLEANUP_SUCCESS, PLANNER_SUCCESS,
};

/// Optional settings file layered under the environment.
const SETTINGS_FILE: &str = "config/default";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Job {
    Planner,
    Cleanup,
}

impl Job {
    /// Accepts `planner`/`cleanup`, or a Lambda handler string ending in one.
    fn parse(raw: &str) -> Result<Self> {
        let name = raw.trim().rsplit('.').next().unwrap_or_default();
        if name.eq_ignore_ascii_case("planner") {
            Ok(Self::Planner)
        } else if name.eq_ignore_ascii_case("cleanup") {
            Ok(Self::Cleanup)
        } else {
            bail!("unknown job {:?}, expected \"planner\" or \"cleanup\"", raw)
        }
    }

    fn select() -> Result<Self> {
        let raw = std::env::args()
            .nth(1)
            .or_else(|| std::env::var("_HANDLER").ok())
            .context("No job given: pass \"planner\" or \"cleanup\"")?;
        Self::parse(&raw)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    let job = Job::select()?;
    info!(job = ?job, "Starting table version cleanup v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load(SETTINGS_FILE).context("Failed to load settings")?;
    let sdk_config = load_sdk_config(&settings).await?;
    let on_lambda = std::env::var_os("AWS_LAMBDA_RUNTIME_API").is_some();

    match job {
        Job::Planner => {
            let planner = Arc::new(build_planner(&settings, &sdk_config)?);
            if on_lambda {
                serve_planner(planner).await
            } else {
                let message = run_planner(&planner).await?;
                info!("{}", message);
                Ok(())
            }
        }
        Job::Cleanup => {
            let cleanup = Arc::new(build_cleanup(&settings, &sdk_config)?);
            if on_lambda {
                serve_cleanup(cleanup).await
            } else {
                let event = read_event_from_stdin().await?;
                let message = run_cleanup(&cleanup, &event).await?;
                info!("{}", message);
                Ok(())
            }
        }
    }
}

/// Shared AWS configuration, with the optional `region` override applied.
async fn load_sdk_config(settings: &Settings) -> Result<SdkConfig> {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = settings.optional("region")? {
        loader = loader.region(Region::new(region));
    }
    Ok(loader.load().await)
}

fn build_planner(settings: &Settings, sdk_config: &SdkConfig) -> Result<Planner> {
    let queue_config = QueueConfig::from_settings(settings).context("Invalid queue settings")?;
    let ledger_config = LedgerConfig::from_settings(settings, PLANNER_LEDGER_DEFAULTS)
        .context("Invalid planner ledger settings")?;
    let planner_settings =
        PlannerSettings::from_settings(settings).context("Invalid planner settings")?;
    let catalog_config = CatalogConfig::from_settings(settings).context("Invalid catalog settings")?;

    let ledger = DynamoLedger::new(sdk_config, ledger_config.endpoint_url.as_deref());

    Ok(Planner::new(
        Arc::new(GlueCatalog::new(sdk_config, catalog_config)),
        Arc::new(SqsProducer::new(sdk_config, queue_config)),
        AuditTrail::new(Arc::new(ledger), ledger_config),
        planner_settings,
    ))
}

fn build_cleanup(settings: &Settings, sdk_config: &SdkConfig) -> Result<CleanupWorker> {
    let ledger_config = LedgerConfig::from_settings(settings, CLEANUP_LEDGER_DEFAULTS)
        .context("Invalid cleanup ledger settings")?;
    let cleanup_settings =
        CleanupSettings::from_settings(settings).context("Invalid cleanup settings")?;
    let catalog_config = CatalogConfig::from_settings(settings).context("Invalid catalog settings")?;

    let ledger = DynamoLedger::new(sdk_config, ledger_config.endpoint_url.as_deref());

    Ok(CleanupWorker::new(
        Arc::new(GlueCatalog::new(sdk_config, catalog_config)),
        AuditTrail::new(Arc::new(ledger), ledger_config),
        cleanup_settings,
    ))
}

async fn run_planner(planner: &Planner) -> Result<&'static str> {
    let result = planner.run().await;
    log_metrics_snapshot();
    result.context("Planner execution failed")?;
    Ok(PLANNER_SUCCESS)
}

async fn run_cleanup(cleanup: &CleanupWorker, event: &QueueEvent) -> Result<&'static str> {
    let result = cleanup.handle(event).await;
    log_metrics_snapshot();
    result.context("Cleanup execution failed")?;
    Ok(CLEANUP_SUCCESS)
}

async fn serve_planner(planner: Arc<Planner>) -> Result<()> {
    // The planner ignores its invocation payload.
    lambda_runtime::run(service_fn(move |_event: LambdaEvent<Value>| {
        let planner = planner.clone();
        async move {
            run_planner(&planner)
                .await
                .map(str::to_string)
                .map_err(lambda_runtime::Error::from)
        }
    }))
    .await
    .map_err(|e| anyhow!(e))
}

async fn serve_cleanup(cleanup: Arc<CleanupWorker>) -> Result<()> {
    lambda_runtime::run(service_fn(move |event: LambdaEvent<QueueEvent>| {
        let cleanup = cleanup.clone();
        async move {
            run_cleanup(&cleanup, &event.payload)
                .await
                .map(str::to_string)
                .map_err(lambda_runtime::Error::from)
        }
    }))
    .await
    .map_err(|e| anyhow!(e))
}

async fn read_event_from_stdin() -> Result<QueueEvent> {
    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .context("Failed to read queue event from stdin")?;

    serde_json::from_str(&raw).map_err(|e| {
        error!(error = %e, "Queue event is not valid JSON");
        anyhow!(e).context("Invalid queue event")
    })
}
