//! Job-related API endpoints

use steward_core::domain::job::JobState;
use steward_core::dto::job::{
    CreateJobsAck, CreateJobsRequest, CreateJobsResponse, JobDefinition, JobSummary,
    ListJobsResponse,
};
use tracing::debug;

use crate::ControlPlaneClient;
use crate::error::{ClientError, Result};

impl ControlPlaneClient {
    /// List the jobs of a cluster that are in one of `states`
    ///
    /// # Arguments
    /// * `cluster_id` - The cluster to query
    /// * `states` - State filter, sent as repeated `state` query parameters
    pub async fn list_jobs(
        &self,
        cluster_id: &str,
        states: &[JobState],
    ) -> Result<Vec<JobSummary>> {
        let url = self.jobs_url(cluster_id);
        let query: Vec<(&str, &str)> = states.iter().map(|s| ("state", s.as_str())).collect();

        debug!("Listing jobs on {} in states {:?}", cluster_id, states);
        let response = self.client.get(&url).query(&query).send().await?;

        let body: ListJobsResponse = self.handle_response(response).await?;
        Ok(body.jobs)
    }

    /// Add jobs to a cluster
    ///
    /// Unlike the other calls a rejected request is not an error here: the
    /// acknowledgement carries the status code and body for the caller to
    /// judge. Only transport failures and unreadable success bodies fail.
    ///
    /// # Arguments
    /// * `cluster_id` - The cluster to add the jobs to
    /// * `jobs` - Job definitions, started in order
    pub async fn create_jobs(
        &self,
        cluster_id: &str,
        jobs: Vec<JobDefinition>,
    ) -> Result<CreateJobsAck> {
        let url = self.jobs_url(cluster_id);
        let response = self
            .client
            .post(&url)
            .json(&CreateJobsRequest { jobs })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Ok(CreateJobsAck {
                status_code: status.as_u16(),
                job_ids: Vec::new(),
                message: Some(message),
            });
        }

        let body: CreateJobsResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))?;

        Ok(CreateJobsAck {
            status_code: status.as_u16(),
            job_ids: body.job_ids,
            message: None,
        })
    }

    /// Describe a single job
    ///
    /// # Arguments
    /// * `cluster_id` - The cluster the job runs on
    /// * `job_id` - The job identifier
    pub async fn describe_job(&self, cluster_id: &str, job_id: &str) -> Result<JobSummary> {
        let url = format!("{}/{}", self.jobs_url(cluster_id), job_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
