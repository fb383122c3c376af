//! dbadm Objects - database object models
//!
//! This crate provides the models the administration client keeps for
//! database objects:
//! - Trigger definitions, normalized from DDL, form input or server replies
//! - Trigger validation against a configurable policy
//! - Trigger DDL generation

pub mod trigger;

pub use trigger::*;
