//! Scripted in-memory control plane for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use steward_client::ClientError;
use steward_core::domain::job::{JobState, JobStatus};
use steward_core::dto::job::{CreateJobsAck, JobDefinition, JobSummary};

use super::JobRepository;

/// Control plane double
///
/// `list_jobs` returns every seeded job regardless of the state filter, so
/// callers are tested against a control plane that filters sloppily.
/// `job_status` walks the scripted states and repeats the last one.
#[derive(Default)]
pub struct FakeJobRepository {
    jobs: Mutex<Vec<JobSummary>>,
    states: Mutex<VecDeque<JobState>>,
    acks: Mutex<VecDeque<CreateJobsAck>>,
    list_failures: Mutex<u32>,
    pub list_calls: Mutex<Vec<Vec<JobState>>>,
    pub created: Mutex<Vec<JobDefinition>>,
    pub status_calls: Mutex<Vec<String>>,
}

impl FakeJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job(self, id: &str, name: &str, state: JobState) -> Self {
        self.jobs.lock().unwrap().push(JobSummary {
            id: id.to_string(),
            name: name.to_string(),
            status: JobStatus::new(state),
        });
        self
    }

    pub fn with_states(self, states: impl IntoIterator<Item = JobState>) -> Self {
        self.states.lock().unwrap().extend(states);
        self
    }

    pub fn with_ack(self, status_code: u16, job_ids: &[&str]) -> Self {
        self.acks.lock().unwrap().push_back(CreateJobsAck {
            status_code,
            job_ids: job_ids.iter().map(|id| id.to_string()).collect(),
            message: (status_code != 200).then(|| "rejected".to_string()),
        });
        self
    }

    /// Makes the next `count` listings fail with a 503
    pub fn with_list_failures(self, count: u32) -> Self {
        *self.list_failures.lock().unwrap() = count;
        self
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn create_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    pub fn status_count(&self) -> usize {
        self.status_calls.lock().unwrap().len()
    }

    pub fn network_calls(&self) -> usize {
        self.list_count() + self.create_count() + self.status_count()
    }
}

#[async_trait]
impl JobRepository for FakeJobRepository {
    async fn list_jobs(
        &self,
        _cluster_id: &str,
        states: &[JobState],
    ) -> Result<Vec<JobSummary>, ClientError> {
        self.list_calls.lock().unwrap().push(states.to_vec());

        let mut failures = self.list_failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(ClientError::api_error(503, "throttled"));
        }

        Ok(self.jobs.lock().unwrap().clone())
    }

    async fn create_job(
        &self,
        _cluster_id: &str,
        definition: JobDefinition,
    ) -> Result<CreateJobsAck, ClientError> {
        let mut created = self.created.lock().unwrap();
        created.push(definition);

        let ack = self
            .acks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| CreateJobsAck {
                status_code: 200,
                job_ids: vec![format!("s-{}", created.len())],
                message: None,
            });
        Ok(ack)
    }

    async fn job_status(&self, _cluster_id: &str, job_id: &str) -> Result<JobStatus, ClientError> {
        self.status_calls.lock().unwrap().push(job_id.to_string());

        let mut states = self.states.lock().unwrap();
        let state = if states.len() > 1 {
            states.pop_front()
        } else {
            states.front().copied()
        };

        state
            .map(JobStatus::new)
            .ok_or_else(|| ClientError::api_error(404, format!("job {} not found", job_id)))
    }
}
