//! Job submission
//!
//! Turns a [`JobSpec`] into exactly one create call on the control plane.
//! Nothing here retries: a rejected submission fails the attempt and the
//! retry supervisor decides what happens next.

use std::sync::Arc;

use steward_core::domain::job::{JobHandle, JobType};
use steward_core::domain::launch::JobSpec;
use tracing::{debug, info, warn};

use crate::error::{Result, RunError};
use crate::repository::JobRepository;

/// Status code the control plane answers an accepted job with
const ACCEPTED: u16 = 200;

pub struct JobSubmitter {
    jobs: Arc<dyn JobRepository>,
    cluster_id: String,
}

impl JobSubmitter {
    pub fn new(jobs: Arc<dyn JobRepository>, cluster_id: impl Into<String>) -> Self {
        Self {
            jobs,
            cluster_id: cluster_id.into(),
        }
    }

    /// Submits one run of `job_type` and returns its handle
    ///
    /// The job type and launch arguments are validated before anything is
    /// sent; both failures are configuration errors.
    pub async fn submit(&self, job_type: &str, spec: &JobSpec) -> Result<JobHandle> {
        let job_type: JobType = job_type.parse()?;
        let definition = spec.job_definition(job_type)?;
        debug!(
            "Submitting {} job to cluster {} via {}",
            job_type, self.cluster_id, definition.jar_step.jar
        );

        let ack = self.jobs.create_job(&self.cluster_id, definition).await?;

        if ack.status_code != ACCEPTED {
            warn!(
                "Control plane rejected {} job (status {}): {:?}",
                job_type, ack.status_code, ack.message
            );
            return Err(RunError::Submission {
                job_type,
                status_code: ack.status_code,
                message: ack.message,
            });
        }

        let job_id = ack
            .job_ids
            .into_iter()
            .next()
            .ok_or_else(|| RunError::Submission {
                job_type,
                status_code: ack.status_code,
                message: Some("acknowledgement carried no job id".to_string()),
            })?;

        info!("Submitted {} job, id: {}", job_type, job_id);
        Ok(JobHandle::new(job_id, job_type.as_str()))
    }
}
