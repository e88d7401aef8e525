//! Scheduler layer for the runner
//!
//! Drives a job from "maybe running" to "finished" and decides whether to go
//! again. The orchestrator performs one attempt; the retry supervisor repeats
//! attempts under a consecutive failure budget.

pub mod orchestrator;
pub mod retry;

pub use orchestrator::JobOrchestrator;
pub use retry::{RetryPolicy, RetrySupervisor};
