//! Active job lookup
//!
//! Guards against launching a second copy of a job whose previous run is
//! still pending or running. This is a check-then-act on the control plane,
//! so two runners racing on the same cluster can still both submit.

use steward_core::domain::job::{JobHandle, JobState};
use tracing::debug;

use crate::error::Result;
use crate::repository::JobRepository;

/// Returns the first active job on `cluster_id` named exactly `name`
pub async fn find_active_job(
    jobs: &dyn JobRepository,
    cluster_id: &str,
    name: &str,
) -> Result<Option<JobHandle>> {
    let active = jobs.list_jobs(cluster_id, &JobState::ACTIVE).await?;
    debug!("{} active job(s) on cluster {}", active.len(), cluster_id);

    Ok(active
        .iter()
        .find(|job| job.status.state.is_active() && job.name == name)
        .map(|job| job.handle()))
}
