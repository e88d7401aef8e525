//! Job DTOs for control-plane communication

use serde::{Deserialize, Serialize};

use crate::domain::job::{JobHandle, JobStatus};

/// What the cluster does with subsequent jobs when this one fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionOnFailure {
    TerminateCluster,
    CancelAndWait,
    Continue,
}

/// Jar invocation backing a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JarStep {
    pub jar: String,
    pub args: Vec<String>,
}

/// Definition of a job to add to a cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDefinition {
    pub name: String,
    pub action_on_failure: ActionOnFailure,
    pub jar_step: JarStep,
}

/// Request to add jobs to a cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobsRequest {
    pub jobs: Vec<JobDefinition>,
}

/// Body returned by the control plane after adding jobs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJobsResponse {
    #[serde(default)]
    pub job_ids: Vec<String>,
}

/// Acknowledgement of a create call
///
/// Carries the response status code so the caller decides what counts as
/// accepted; the client does not interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateJobsAck {
    pub status_code: u16,
    pub job_ids: Vec<String>,
    /// Raw body of a rejected request
    pub message: Option<String>,
}

/// A job as listed or described by the control plane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub name: String,
    pub status: JobStatus,
}

impl JobSummary {
    pub fn handle(&self) -> JobHandle {
        JobHandle::new(self.id.clone(), self.name.clone())
    }
}

/// Response of a job listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListJobsResponse {
    #[serde(default)]
    pub jobs: Vec<JobSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::JobState;

    #[test]
    fn test_list_response_parsing() {
        let body = r#"{
            "jobs": [
                {"id": "s-1", "name": "batch", "status": {"state": "RUNNING"}},
                {"id": "s-2", "name": "streaming", "status": {
                    "state": "PENDING",
                    "timeline": {"created_at": "2024-05-01T10:00:00Z"}
                }}
            ]
        }"#;

        let response: ListJobsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.jobs.len(), 2);
        assert_eq!(response.jobs[0].status.state, JobState::Running);
        assert_eq!(response.jobs[1].handle(), JobHandle::new("s-2", "streaming"));
    }

    #[test]
    fn test_definition_wire_format() {
        let definition = JobDefinition {
            name: "batch".to_string(),
            action_on_failure: ActionOnFailure::Continue,
            jar_step: JarStep {
                jar: "runner.jar".to_string(),
                args: vec!["a".to_string()],
            },
        };

        let json = serde_json::to_value(&definition).unwrap();
        assert_eq!(json["action_on_failure"], "CONTINUE");
        assert_eq!(json["jar_step"]["args"][0], "a");
    }
}
