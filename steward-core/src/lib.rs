//! Steward Core
//!
//! Core types and abstractions shared by the Steward client and runner.
//!
//! This crate contains:
//! - Domain types: job types, launch specs, handles and status snapshots
//! - DTOs: request/response bodies exchanged with the control plane
//! - Polling: the burst/steady interval schedule used while waiting on jobs

pub mod domain;
pub mod dto;
pub mod polling;
