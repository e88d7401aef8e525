//! Runner configuration
//!
//! Typed settings for one invocation: which cluster and control plane to
//! talk to, what to launch and how hard to try. Built from the command line
//! (with environment fallbacks) and validated before any request is made.

use std::time::Duration;

use steward_core::domain::job::JobType;
use steward_core::domain::launch::{ArtifactLocation, DataSource, JobSpec};
use steward_core::polling::PollingSchedule;

use crate::error::{Result, RunError};
use crate::scheduler::RetryPolicy;

/// Runner configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Cluster the job runs on
    pub cluster_id: String,

    /// Control-plane base URL (e.g., "http://localhost:8080")
    pub control_plane_url: String,

    /// Timeout applied to every control-plane request
    pub request_timeout: Duration,

    /// Job type discriminator as given by the caller
    pub job_type: String,

    /// Bucket (or s3:// prefix) holding the job artifacts
    pub artifact_bucket: String,

    pub executor_memory: String,
    pub executor_cores: u32,
    pub driver_memory: String,
    pub driver_cores: u32,
    pub executor_number: u32,

    /// Run the streaming job once; also disables retries
    pub trigger_once: bool,

    /// Consecutive failures tolerated before giving up
    pub max_consecutive_errors: u32,

    /// Pause after a failed attempt
    pub restart_delay: Duration,

    /// Upper bound on the time spent waiting for one job, unbounded if unset
    pub max_wait: Option<Duration>,

    pub db_url: String,
    pub db_pass: Option<String>,
}

impl Config {
    /// Parses the job type discriminator
    pub fn job_type(&self) -> Result<JobType> {
        Ok(self.job_type.parse()?)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        let job_type = self.job_type()?;

        if self.cluster_id.trim().is_empty() {
            return invalid("cluster_id cannot be empty");
        }

        if self.artifact_bucket.trim().trim_start_matches("s3://").is_empty() {
            return invalid("artifact_bucket cannot be empty");
        }

        if !self.control_plane_url.starts_with("http://")
            && !self.control_plane_url.starts_with("https://")
        {
            return invalid("control_plane_url must start with http:// or https://");
        }

        if self.request_timeout.is_zero() {
            return invalid("request_timeout must be greater than 0");
        }

        if self.executor_memory.trim().is_empty() || self.driver_memory.trim().is_empty() {
            return invalid("executor_memory and driver_memory cannot be empty");
        }

        if self.executor_cores == 0 || self.driver_cores == 0 || self.executor_number == 0 {
            return invalid("executor_cores, driver_cores and executor_number must be at least 1");
        }

        if job_type == JobType::Batch && self.data_source().is_none() {
            return invalid("batch jobs require --db-pass");
        }

        Ok(())
    }

    fn data_source(&self) -> Option<DataSource> {
        self.db_pass
            .as_ref()
            .filter(|pass| !pass.is_empty())
            .map(|pass| DataSource {
                url: self.db_url.clone(),
                password: pass.clone(),
            })
    }

    /// Launch resources for the job
    pub fn job_spec(&self) -> JobSpec {
        JobSpec {
            artifacts: ArtifactLocation::new(&self.artifact_bucket),
            executor_memory: self.executor_memory.clone(),
            executor_cores: self.executor_cores,
            driver_memory: self.driver_memory.clone(),
            driver_cores: self.driver_cores,
            executor_number: self.executor_number,
            trigger_once: self.trigger_once,
            data_source: self.data_source(),
        }
    }

    /// Retry budget; `trigger_once` forces a single attempt
    pub fn retry_policy(&self) -> RetryPolicy {
        let max_consecutive_errors = if self.trigger_once {
            0
        } else {
            self.max_consecutive_errors
        };
        RetryPolicy::new(max_consecutive_errors, self.restart_delay)
    }

    /// Status polling pace, capped by `max_wait` when set
    pub fn polling_schedule(&self) -> PollingSchedule {
        let schedule = PollingSchedule::default();
        match self.max_wait {
            Some(max_wait) => schedule.with_max_total(max_wait),
            None => schedule,
        }
    }
}

fn invalid<T>(message: &str) -> Result<T> {
    Err(RunError::Configuration(message.to_string()))
}
