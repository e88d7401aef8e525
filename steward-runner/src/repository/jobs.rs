//! Jobs repository
//!
//! Handles communication with the control plane for job operations:
//! - Listing jobs in a set of states
//! - Creating a job
//! - Reading the status of a job

use async_trait::async_trait;
use steward_client::{ClientError, ControlPlaneClient};
use steward_core::domain::job::{JobState, JobStatus};
use steward_core::dto::job::{CreateJobsAck, JobDefinition, JobSummary};

/// Repository trait for job operations on the control plane
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Lists the jobs of `cluster_id` currently in one of `states`
    async fn list_jobs(
        &self,
        cluster_id: &str,
        states: &[JobState],
    ) -> Result<Vec<JobSummary>, ClientError>;

    /// Creates one job and returns the control plane's acknowledgement
    async fn create_job(
        &self,
        cluster_id: &str,
        definition: JobDefinition,
    ) -> Result<CreateJobsAck, ClientError>;

    /// Reads the current status of a job
    async fn job_status(&self, cluster_id: &str, job_id: &str) -> Result<JobStatus, ClientError>;
}

/// HTTP implementation of JobRepository
pub struct HttpJobRepository {
    client: ControlPlaneClient,
}

impl HttpJobRepository {
    pub fn new(client: ControlPlaneClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobRepository for HttpJobRepository {
    async fn list_jobs(
        &self,
        cluster_id: &str,
        states: &[JobState],
    ) -> Result<Vec<JobSummary>, ClientError> {
        self.client.list_jobs(cluster_id, states).await
    }

    async fn create_job(
        &self,
        cluster_id: &str,
        definition: JobDefinition,
    ) -> Result<CreateJobsAck, ClientError> {
        self.client.create_jobs(cluster_id, vec![definition]).await
    }

    async fn job_status(&self, cluster_id: &str, job_id: &str) -> Result<JobStatus, ClientError> {
        let job = self.client.describe_job(cluster_id, job_id).await?;
        Ok(job.status)
    }
}
