//! Job orchestrator
//!
//! One attempt at getting a job to completion: adopt the active job of the
//! same name if there is one, otherwise submit a new one, then wait for it
//! and classify the terminal state.

use std::sync::Arc;

use steward_core::domain::job::{JobState, JobStatus, JobType};
use steward_core::domain::launch::JobSpec;
use steward_core::polling::PollingSchedule;
use tracing::info;

use crate::error::{Result, RunError};
use crate::repository::JobRepository;
use crate::service::{CompletionWaiter, JobSubmitter, find_active_job};

pub struct JobOrchestrator {
    jobs: Arc<dyn JobRepository>,
    cluster_id: String,
    job_type: JobType,
    spec: JobSpec,
    submitter: JobSubmitter,
    waiter: CompletionWaiter,
}

impl JobOrchestrator {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        cluster_id: impl Into<String>,
        job_type: JobType,
        spec: JobSpec,
        schedule: PollingSchedule,
    ) -> Self {
        let cluster_id = cluster_id.into();
        Self {
            submitter: JobSubmitter::new(Arc::clone(&jobs), cluster_id.clone()),
            waiter: CompletionWaiter::new(Arc::clone(&jobs), cluster_id.clone(), schedule),
            jobs,
            cluster_id,
            job_type,
            spec,
        }
    }

    /// Runs the job once and succeeds only if it ends COMPLETED
    pub async fn run_once(&self) -> Result<JobStatus> {
        let job_type = self.job_type;
        // Launch arguments must be complete before the control plane is touched
        self.spec.job_definition(job_type)?;

        info!("Check whether there is no active {} job", job_type);
        let active = find_active_job(self.jobs.as_ref(), &self.cluster_id, job_type.as_str());

        let handle = match active.await? {
            Some(handle) => {
                info!(
                    "Active {} job found, id: {}. Waiting for it to finish",
                    job_type, handle.id
                );
                handle
            }
            None => {
                info!("Executing new {} job", job_type);
                self.submitter.submit(job_type.as_str(), &self.spec).await?
            }
        };

        let status = self.waiter.wait(&handle).await?;

        if status.state == JobState::Completed {
            match status.timeline.as_ref().and_then(|t| t.run_time()) {
                Some(run_time) => info!(
                    "{} job succeeded after {}s",
                    job_type,
                    run_time.num_seconds()
                ),
                None => info!("{} job succeeded", job_type),
            }
            return Ok(status);
        }

        Err(RunError::JobFailed {
            job_type,
            state: status.state,
            reason: status.reason().map(str::to_string),
        })
    }
}
