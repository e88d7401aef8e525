//! Data Transfer Objects for control-plane communication
//!
//! Request and response bodies of the cluster control-plane API. They are
//! kept separate from the domain types so the wire format can evolve without
//! touching orchestration code.

pub mod job;
