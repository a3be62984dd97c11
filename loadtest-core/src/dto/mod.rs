//! Data Transfer Objects for the load testing API
//!
//! Request bodies sent to the remote service. Field names follow the JSON
//! mapping of the service contract (camelCase, int64 as strings).

pub mod agent;
pub mod config;
pub mod test;
