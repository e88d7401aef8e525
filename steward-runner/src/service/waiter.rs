//! Completion waiter
//!
//! Polls a job until it leaves the active states, pacing the polls with a
//! [`PollingSchedule`]. A capped schedule that runs out while the job is
//! still active turns into [`RunError::Timeout`].

use std::sync::Arc;

use steward_core::domain::job::{JobHandle, JobStatus};
use steward_core::polling::PollingSchedule;
use tokio::time;
use tracing::debug;

use crate::error::{Result, RunError};
use crate::repository::JobRepository;

pub struct CompletionWaiter {
    jobs: Arc<dyn JobRepository>,
    cluster_id: String,
    schedule: PollingSchedule,
}

impl CompletionWaiter {
    pub fn new(
        jobs: Arc<dyn JobRepository>,
        cluster_id: impl Into<String>,
        schedule: PollingSchedule,
    ) -> Self {
        Self {
            jobs,
            cluster_id: cluster_id.into(),
            schedule,
        }
    }

    /// Waits until `handle` reaches a terminal state and returns that status
    pub async fn wait(&self, handle: &JobHandle) -> Result<JobStatus> {
        let mut intervals = self.schedule.intervals();

        loop {
            let status = self.jobs.job_status(&self.cluster_id, &handle.id).await?;

            if status.state.is_terminal() {
                debug!("Job {} reached {}", handle.id, status.state);
                return Ok(status);
            }

            let Some(delay) = intervals.next() else {
                return Err(RunError::Timeout {
                    job_id: handle.id.clone(),
                    job_name: handle.name.clone(),
                    last_state: status.state,
                    waited: intervals.elapsed(),
                });
            };

            debug!(
                "Job {} is {}, checking again in {:?}",
                handle.id, status.state, delay
            );
            time::sleep(delay).await;
        }
    }
}
