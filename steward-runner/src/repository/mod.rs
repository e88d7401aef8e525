//! Repository layer
//!
//! Repositories abstract communication with the cluster control plane behind
//! a trait so the orchestration logic can be exercised against an in-memory
//! double in tests.

mod jobs;

#[cfg(test)]
pub mod fake;

pub use jobs::HttpJobRepository;
pub use jobs::JobRepository;
