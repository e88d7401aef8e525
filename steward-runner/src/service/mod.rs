//! Service layer
//!
//! The building blocks of one orchestration attempt: looking up an active
//! job, submitting a new one and waiting for a job to finish. Each works
//! through a [`JobRepository`](crate::repository::JobRepository).

mod dedup;
mod submitter;
mod waiter;

pub use dedup::find_active_job;
pub use submitter::JobSubmitter;
pub use waiter::CompletionWaiter;
