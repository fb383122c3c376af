//! Broker status module
//!
//! Provides the broker status tree and aggregate counters over it.

mod status;


pub use status::*;
