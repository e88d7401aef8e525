//! Runner error types
//!
//! Everything that can go wrong during one orchestration attempt ends up as a
//! [`RunError`]. The retry supervisor is the only place that swallows them.

use std::time::Duration;

use steward_client::ClientError;
use steward_core::domain::job::{JobState, JobType, UnknownJobType};
use steward_core::domain::launch::LaunchError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RunError>;

#[derive(Debug, Error)]
pub enum RunError {
    /// Unknown job type or an invalid argument combination
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The control plane did not accept the job
    #[error("failed to instantiate {job_type} job (status {status_code}){}", fmt_message(.message))]
    Submission {
        job_type: JobType,
        status_code: u16,
        message: Option<String>,
    },

    /// The job reached a terminal state other than COMPLETED
    #[error("{job_type} job finished with status: {state}{}", fmt_message(.reason))]
    JobFailed {
        job_type: JobType,
        state: JobState,
        reason: Option<String>,
    },

    /// The polling budget ran out while the job was still active
    #[error(
        "gave up waiting for job {job_id} ({job_name}) after {waited:?}, last state: {last_state}"
    )]
    Timeout {
        job_id: String,
        job_name: String,
        last_state: JobState,
        waited: Duration,
    },

    #[error("control plane request failed: {0}")]
    ControlPlane(#[from] ClientError),

    /// The consecutive failure budget is spent
    #[error("no errors remaining after {attempts} attempt(s), failed to start new job")]
    GivenUp {
        attempts: u64,
        #[source]
        last_error: Option<Box<RunError>>,
    },
}

impl RunError {
    /// Whether the retry supervisor may try again after this error
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Configuration(_) | Self::GivenUp { .. })
    }
}

impl From<UnknownJobType> for RunError {
    fn from(err: UnknownJobType) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<LaunchError> for RunError {
    fn from(err: LaunchError) -> Self {
        Self::Configuration(err.to_string())
    }
}

fn fmt_message(message: &Option<String>) -> String {
    match message {
        Some(m) if !m.is_empty() => format!(": {}", m),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(!RunError::Configuration("unknown job type".to_string()).is_retryable());

        let failed = RunError::JobFailed {
            job_type: JobType::Streaming,
            state: JobState::Failed,
            reason: None,
        };
        assert!(failed.is_retryable());

        let given_up = RunError::GivenUp {
            attempts: 3,
            last_error: Some(Box::new(failed)),
        };
        assert!(!given_up.is_retryable());

        assert!(RunError::ControlPlane(ClientError::api_error(503, "busy")).is_retryable());
    }

    #[test]
    fn test_messages_carry_diagnostics() {
        let failed = RunError::JobFailed {
            job_type: JobType::Batch,
            state: JobState::Cancelled,
            reason: Some("Cancelled by user".to_string()),
        };
        assert_eq!(
            failed.to_string(),
            "batch job finished with status: CANCELLED: Cancelled by user"
        );

        let rejected = RunError::Submission {
            job_type: JobType::Streaming,
            status_code: 400,
            message: None,
        };
        assert_eq!(
            rejected.to_string(),
            "failed to instantiate streaming job (status 400)"
        );
    }
}
