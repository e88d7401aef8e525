//! Job domain types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of data-processing job the runner knows how to launch
///
/// The job type doubles as the job name on the control plane, which is what
/// the active-job lookup matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Batch,
    Streaming,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Batch => "batch",
            JobType::Streaming => "streaming",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a job type discriminator is outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown job type: {0} (expected one of: batch, streaming)")]
pub struct UnknownJobType(pub String);

impl FromStr for JobType {
    type Err = UnknownJobType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "batch" => Ok(JobType::Batch),
            "streaming" => Ok(JobType::Streaming),
            other => Err(UnknownJobType(other.to_string())),
        }
    }
}

/// Job state as reported by the control plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Pending,
    CancelPending,
    Running,
    Completed,
    Cancelled,
    Failed,
    Interrupted,
    /// Any state this version does not recognise. Treated as terminal.
    #[serde(other)]
    Unknown,
}

impl JobState {
    /// States in which a job is still occupying its name on the cluster
    pub const ACTIVE: [JobState; 3] = [
        JobState::Pending,
        JobState::CancelPending,
        JobState::Running,
    ];

    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "PENDING",
            JobState::CancelPending => "CANCEL_PENDING",
            JobState::Running => "RUNNING",
            JobState::Completed => "COMPLETED",
            JobState::Cancelled => "CANCELLED",
            JobState::Failed => "FAILED",
            JobState::Interrupted => "INTERRUPTED",
            JobState::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a job living on the control plane
///
/// Either returned by a submission or discovered by the active-job lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub id: String,
    pub name: String,
}

impl JobHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Why the control plane last moved a job to its current state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChangeReason {
    pub code: Option<String>,
    pub message: Option<String>,
}

/// Lifecycle timestamps of a job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTimeline {
    pub created_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl JobTimeline {
    /// Wall-clock run time, available once the job has both started and ended
    pub fn run_time(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.ended_at) {
            (Some(started), Some(ended)) => Some(ended.signed_duration_since(started)),
            _ => None,
        }
    }
}

/// Snapshot of a job's status, fetched fresh on every poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    #[serde(default)]
    pub state_change_reason: Option<StateChangeReason>,
    #[serde(default)]
    pub timeline: Option<JobTimeline>,
}

impl JobStatus {
    pub fn new(state: JobState) -> Self {
        Self {
            state,
            state_change_reason: None,
            timeline: None,
        }
    }

    /// Human readable reason message, if the control plane gave one
    pub fn reason(&self) -> Option<&str> {
        self.state_change_reason
            .as_ref()
            .and_then(|r| r.message.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_parsing() {
        assert_eq!("batch".parse::<JobType>(), Ok(JobType::Batch));
        assert_eq!("streaming".parse::<JobType>(), Ok(JobType::Streaming));

        let err = "Batch".parse::<JobType>().unwrap_err();
        assert_eq!(err, UnknownJobType("Batch".to_string()));
        assert!("".parse::<JobType>().is_err());
        assert!("stream".parse::<JobType>().is_err());
    }

    #[test]
    fn test_active_states() {
        assert!(JobState::Pending.is_active());
        assert!(JobState::CancelPending.is_active());
        assert!(JobState::Running.is_active());

        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Cancelled.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Interrupted.is_terminal());
        assert!(JobState::Unknown.is_terminal());
    }

    #[test]
    fn test_state_wire_format() {
        let state: JobState = serde_json::from_str("\"CANCEL_PENDING\"").unwrap();
        assert_eq!(state, JobState::CancelPending);
        assert_eq!(state.to_string(), "CANCEL_PENDING");

        let state: JobState = serde_json::from_str("\"TERMINATED_WITH_ERRORS\"").unwrap();
        assert_eq!(state, JobState::Unknown);
    }

    #[test]
    fn test_status_deserializes_without_optional_fields() {
        let status: JobStatus = serde_json::from_str(r#"{"state":"RUNNING"}"#).unwrap();
        assert_eq!(status, JobStatus::new(JobState::Running));
        assert_eq!(status.reason(), None);
    }

    #[test]
    fn test_timeline_run_time() {
        let started = "2024-05-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let ended = "2024-05-01T10:02:30Z".parse::<DateTime<Utc>>().unwrap();

        let timeline = JobTimeline {
            created_at: Some(started),
            started_at: Some(started),
            ended_at: Some(ended),
        };
        assert_eq!(timeline.run_time(), Some(chrono::Duration::seconds(150)));

        let unfinished = JobTimeline {
            ended_at: None,
            ..timeline
        };
        assert_eq!(unfinished.run_time(), None);
    }
}
