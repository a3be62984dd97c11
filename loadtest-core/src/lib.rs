//! Load Testing Core
//!
//! Core types and primitives shared by the load testing client, the
//! end-to-end suite and the CLI.
//!
//! This crate contains:
//! - Domain types: remote resources (Agent, Config, Test, TableReport, Operation)
//! - DTOs: request bodies sent to the load testing API
//! - Poller: bounded wait for a remote resource to reach a state

pub mod domain;
pub mod dto;
pub mod int64;
pub mod poll;

pub use poll::{PollError, Poller, WaitError};
