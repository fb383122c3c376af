//! Trigger definitions
//!
//! A [`TriggerDefinition`] is built from loosely formatted field values through
//! [`TriggerDefinitionBuilder`], which canonicalizes the condition, action and
//! priority as they are set. Validation and DDL generation operate on the
//! finished record.

mod action;
mod ddl;
mod definition;
mod priority;
mod validator;
mod vocabulary;


pub use action::*;
pub use ddl::*;
pub use definition::*;
pub use priority::*;
pub use validator::*;
pub use vocabulary::*;
