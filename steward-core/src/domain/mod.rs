//! Core domain types
//!
//! These types describe a data-processing job from the point of view of the
//! runner: what to launch (`JobSpec`), how to refer to it once launched
//! (`JobHandle`) and what the control plane reports about it (`JobStatus`).

pub mod job;
pub mod launch;
