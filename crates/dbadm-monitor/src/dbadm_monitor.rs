//! dbadm Monitor - runtime status of broker processes
//!
//! This crate models the status reply a broker sends back:
//! - Brokers arranged in a tree, looked up by name
//! - Apply servers (the worker processes behind a broker)
//! - Queued jobs waiting for an apply server

pub mod broker;

pub use broker::*;
