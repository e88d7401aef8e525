//! Steward Runner
//!
//! Submits a Spark job to a cluster through the control plane, making sure
//! only one instance of it is active, waits for it to finish and restarts it
//! when it stops, until too many attempts fail in a row.
//!
//! Architecture:
//! - Configuration: command line with environment fallbacks
//! - Repository: control-plane access behind a trait
//! - Services: active-job lookup, submission, completion waiting
//! - Scheduler: one orchestration attempt and the retry supervisor around it

mod config;
mod error;
mod repository;
mod scheduler;
mod service;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::repository::{HttpJobRepository, JobRepository};
use crate::scheduler::{JobOrchestrator, RetrySupervisor};
use steward_client::ControlPlaneClient;

#[derive(Parser)]
#[command(name = "steward")]
#[command(about = "Run a Spark job on a cluster and keep it alive", long_about = None)]
struct Cli {
    /// Cluster to run the job on
    #[arg(long, env = "STEWARD_CLUSTER_ID")]
    cluster_id: String,

    /// Bucket holding the submit script, modules and applications
    #[arg(long, env = "STEWARD_ARTIFACT_BUCKET")]
    artifact_bucket: String,

    /// Job to run: batch or streaming
    #[arg(long)]
    job_type: String,

    #[arg(long)]
    executor_memory: String,

    #[arg(long)]
    executor_cores: u32,

    #[arg(long)]
    driver_memory: String,

    #[arg(long, default_value_t = 1)]
    driver_cores: u32,

    #[arg(long, default_value_t = 1)]
    executor_number: u32,

    /// Process available data once and stop (disables retries)
    #[arg(long)]
    trigger_once: bool,

    /// Consecutive failed attempts tolerated before giving up
    #[arg(long, default_value_t = 3)]
    max_consecutive_errors: u32,

    /// Seconds to wait after a failed attempt
    #[arg(long, default_value_t = 30)]
    restart_delay_secs: u64,

    /// Give up waiting for a job after this many seconds
    #[arg(long)]
    max_wait_secs: Option<u64>,

    /// Database the batch job reads from
    #[arg(long, default_value = "localhost")]
    db_url: String,

    #[arg(long, env = "STEWARD_DB_PASS", hide_env_values = true)]
    db_pass: Option<String>,

    /// Control-plane URL
    #[arg(
        long,
        env = "STEWARD_CONTROL_PLANE_URL",
        default_value = "http://localhost:8080"
    )]
    control_plane_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    request_timeout_secs: u64,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            cluster_id: cli.cluster_id,
            control_plane_url: cli.control_plane_url,
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            job_type: cli.job_type,
            artifact_bucket: cli.artifact_bucket,
            executor_memory: cli.executor_memory,
            executor_cores: cli.executor_cores,
            driver_memory: cli.driver_memory,
            driver_cores: cli.driver_cores,
            executor_number: cli.executor_number,
            trigger_once: cli.trigger_once,
            max_consecutive_errors: cli.max_consecutive_errors,
            restart_delay: Duration::from_secs(cli.restart_delay_secs),
            max_wait: cli.max_wait_secs.map(Duration::from_secs),
            db_url: cli.db_url,
            db_pass: cli.db_pass,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steward_runner=info,steward_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from(Cli::parse());
    config.validate().context("Invalid configuration")?;
    let job_type = config.job_type()?;

    let retry_policy = config.retry_policy();
    info!(
        "Starting {} job on cluster {} (control plane: {})",
        job_type, config.cluster_id, config.control_plane_url
    );
    info!(
        "Max consecutive errors: {}, restart delay: {:?}, max wait: {:?}",
        retry_policy.max_consecutive_errors, retry_policy.delay, config.max_wait
    );

    let client =
        ControlPlaneClient::with_timeout(&config.control_plane_url, config.request_timeout)
            .context("Failed to build control-plane client")?;
    let jobs: Arc<dyn JobRepository> = Arc::new(HttpJobRepository::new(client));

    let orchestrator = JobOrchestrator::new(
        jobs,
        config.cluster_id.clone(),
        job_type,
        config.job_spec(),
        config.polling_schedule(),
    );
    let supervisor = RetrySupervisor::new(retry_policy);

    match supervisor.run(|| orchestrator.run_once()).await {
        Ok(summary) => {
            info!(
                "{} job runner finished after {} attempt(s)",
                job_type, summary.attempts
            );
            Ok(())
        }
        Err(e) => {
            error!("{} job runner stopped: {}", job_type, e);
            Err(e).context(format!("Failed to keep {} job running", job_type))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from([
            "steward",
            "--cluster-id",
            "j-1",
            "--artifact-bucket",
            "jobs-bucket",
            "--job-type",
            "streaming",
            "--executor-memory",
            "4g",
            "--executor-cores",
            "2",
            "--driver-memory",
            "2g",
        ])
        .unwrap();

        let config = Config::from(cli);
        assert_eq!(config.driver_cores, 1);
        assert_eq!(config.executor_number, 1);
        assert!(!config.trigger_once);
        assert_eq!(config.max_consecutive_errors, 3);
        assert_eq!(config.restart_delay, Duration::from_secs(30));
        assert_eq!(config.max_wait, None);
        assert_eq!(config.db_url, "localhost");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_trigger_once() {
        let cli = Cli::try_parse_from([
            "steward",
            "--cluster-id",
            "j-1",
            "--artifact-bucket",
            "jobs-bucket",
            "--job-type",
            "streaming",
            "--executor-memory",
            "4g",
            "--executor-cores",
            "2",
            "--driver-memory",
            "2g",
            "--trigger-once",
            "--max-wait-secs",
            "600",
        ])
        .unwrap();

        let config = Config::from(cli);
        assert!(config.trigger_once);
        assert_eq!(config.retry_policy().max_consecutive_errors, 0);
        assert_eq!(config.max_wait, Some(Duration::from_secs(600)));
    }
}
