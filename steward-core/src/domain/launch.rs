//! Launch specification for a job run
//!
//! A [`JobSpec`] carries everything needed to start one Spark application on
//! the cluster. It is turned into a control-plane [`JobDefinition`] that runs
//! the submit script through the script-runner jar.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::job::JobType;
use crate::dto::job::{ActionOnFailure, JarStep, JobDefinition};

/// Jar that executes an arbitrary script as a cluster step
pub const SCRIPT_RUNNER_JAR: &str =
    "s3://us-east-1.elasticmapreduce/libs/script-runner/script-runner.jar";

/// Script (relative to the artifact location) that wraps spark-submit
pub const SUBMIT_SCRIPT: &str = "emr-submit-spark.sh";

/// Python modules shipped alongside every application
pub const PY_FILES: &[&str] = &["utils.zip"];

/// Errors raised while assembling launch arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("{0} jobs require a data source url and password")]
    MissingDataSource(JobType),
}

/// Object-store prefix holding the submit script, modules and applications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactLocation(String);

impl ArtifactLocation {
    /// Accepts either a bare bucket name or a full `s3://` URI
    pub fn new(bucket: impl AsRef<str>) -> Self {
        let bucket = bucket.as_ref().trim().trim_end_matches('/');
        if bucket.starts_with("s3://") {
            Self(bucket.to_string())
        } else {
            Self(format!("s3://{}", bucket))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn join(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Database the batch application reads from
#[derive(Clone, PartialEq, Eq)]
pub struct DataSource {
    pub url: String,
    pub password: String,
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("url", &self.url)
            .field("password", &"***")
            .finish()
    }
}

/// Resources and flags for one job run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub artifacts: ArtifactLocation,
    pub executor_memory: String,
    pub executor_cores: u32,
    pub driver_memory: String,
    pub driver_cores: u32,
    pub executor_number: u32,
    /// Streaming only: process what is available and stop
    pub trigger_once: bool,
    pub data_source: Option<DataSource>,
}

impl JobSpec {
    /// Arguments passed to the application itself, after its path
    pub fn application_args(&self, job_type: JobType) -> Result<Vec<String>, LaunchError> {
        let mut args = vec!["--config".to_string(), "config.yaml".to_string()];

        match job_type {
            JobType::Batch => {
                let source = self
                    .data_source
                    .as_ref()
                    .ok_or(LaunchError::MissingDataSource(job_type))?;
                // Flag spelling is what the batch application parses.
                args.extend([
                    "--db-url".to_string(),
                    source.url.clone(),
                    "-db_pass".to_string(),
                    source.password.clone(),
                ]);
            }
            JobType::Streaming => {
                if self.trigger_once {
                    args.push("--trigger_once".to_string());
                }
            }
        }

        Ok(args)
    }

    /// spark-submit parameters, including the application and its arguments
    pub fn spark_submit_args(&self, job_type: JobType) -> Result<Vec<String>, LaunchError> {
        let py_files = PY_FILES
            .iter()
            .map(|f| self.artifacts.join(f))
            .collect::<Vec<_>>()
            .join(",");

        let mut args = vec![
            "--master".to_string(),
            "yarn".to_string(),
            "--deploy-mode".to_string(),
            "client".to_string(),
            "--executor-memory".to_string(),
            self.executor_memory.clone(),
            "--executor-cores".to_string(),
            self.executor_cores.to_string(),
            "--driver-memory".to_string(),
            self.driver_memory.clone(),
            "--driver-cores".to_string(),
            self.driver_cores.to_string(),
            "--num-executors".to_string(),
            self.executor_number.to_string(),
            "--py-files".to_string(),
            py_files,
            "--conf".to_string(),
            "maximizeResourceAllocation=true".to_string(),
            self.artifacts.join(&format!("{}.py", job_type)),
        ];
        args.extend(self.application_args(job_type)?);

        Ok(args)
    }

    /// Builds the control-plane definition for one run of `job_type`
    pub fn job_definition(&self, job_type: JobType) -> Result<JobDefinition, LaunchError> {
        let spark_args = self.spark_submit_args(job_type)?;

        Ok(JobDefinition {
            name: job_type.to_string(),
            action_on_failure: ActionOnFailure::Continue,
            jar_step: JarStep {
                jar: SCRIPT_RUNNER_JAR.to_string(),
                args: vec![self.artifacts.join(SUBMIT_SCRIPT), spark_args.join(" ")],
            },
        })
    }
}
