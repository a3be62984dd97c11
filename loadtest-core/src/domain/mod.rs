//! Core domain types
//!
//! Remote resources of the load testing service as returned by its API.
//! Every resource is owned and mutated by the remote service; the local
//! process only ever holds snapshots of them.

pub mod agent;
pub mod config;
pub mod operation;
pub mod report;
