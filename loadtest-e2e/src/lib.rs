//! Load Testing End-to-End Suite
//!
//! Drives the cloud load testing service through a complete flow against real
//! infrastructure:
//!
//! - Configuration: explicit [`SuiteConfig`] built once from the environment
//! - Requests: API request bodies derived from the configuration
//! - Waits: bounded polls for agent readiness and test completion
//! - Fixture: an agent provisioned for one flow and verified gone afterwards
//! - Scenarios: agent lifecycle, full load test run
//!
//! The scenarios are exercised by the integration tests of this crate and by
//! the `ltctl` command line tool.

pub mod config;
pub mod fixture;
pub mod requests;
pub mod scenario;
pub mod wait;

pub use config::{SuiteConfig, Timeouts};
pub use scenario::{RunOutcome, agent_lifecycle, load_test_run};
