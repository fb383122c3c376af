//! Typed views over the free-text trigger fields
//!
//! A [`TriggerDefinition`](super::TriggerDefinition) keeps timing, event and
//! status exactly as supplied. These enums give callers a checked
//! interpretation; parsing is case-insensitive and ignores surrounding
//! whitespace.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A field value outside its vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseVocabularyError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseVocabularyError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Normalize for keyword lookup: trimmed, upper case, single spaces
fn keyword(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}

/// When the trigger condition is evaluated
///
/// # Examples
///
/// ```
/// use dbadm_objects::ConditionTime;
///
/// let time: ConditionTime = "deferred".parse().unwrap();
/// assert_eq!(time, ConditionTime::Deferred);
/// assert_eq!(time.as_sql(), "DEFERRED");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTime {
    /// Before the triggering event
    Before,
    /// After the triggering event
    After,
    /// At the end of the transaction
    Deferred,
}

impl ConditionTime {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ConditionTime::Before => "BEFORE",
            ConditionTime::After => "AFTER",
            ConditionTime::Deferred => "DEFERRED",
        }
    }
}

impl FromStr for ConditionTime {
    type Err = ParseVocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match keyword(s).as_str() {
            "BEFORE" => Ok(ConditionTime::Before),
            "AFTER" => Ok(ConditionTime::After),
            "DEFERRED" => Ok(ConditionTime::Deferred),
            _ => Err(ParseVocabularyError::new("condition time", s)),
        }
    }
}

/// When the trigger action executes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTime {
    Before,
    After,
}

impl ActionTime {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ActionTime::Before => "BEFORE",
            ActionTime::After => "AFTER",
        }
    }
}

impl FromStr for ActionTime {
    type Err = ParseVocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match keyword(s).as_str() {
            "BEFORE" => Ok(ActionTime::Before),
            "AFTER" => Ok(ActionTime::After),
            _ => Err(ParseVocabularyError::new("action time", s)),
        }
    }
}

/// The database event that raises the trigger
///
/// # Examples
///
/// ```
/// use dbadm_objects::TriggerEvent;
///
/// let event: TriggerEvent = "statement update".parse().unwrap();
/// assert!(event.is_statement_level());
/// assert_eq!(event.as_sql(), "STATEMENT UPDATE");
/// assert!(!TriggerEvent::Commit.requires_target());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    Insert,
    Update,
    Delete,
    StatementInsert,
    StatementUpdate,
    StatementDelete,
    Commit,
    Rollback,
}

impl TriggerEvent {
    pub fn as_sql(&self) -> &'static str {
        match self {
            TriggerEvent::Insert => "INSERT",
            TriggerEvent::Update => "UPDATE",
            TriggerEvent::Delete => "DELETE",
            TriggerEvent::StatementInsert => "STATEMENT INSERT",
            TriggerEvent::StatementUpdate => "STATEMENT UPDATE",
            TriggerEvent::StatementDelete => "STATEMENT DELETE",
            TriggerEvent::Commit => "COMMIT",
            TriggerEvent::Rollback => "ROLLBACK",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            TriggerEvent::Insert,
            TriggerEvent::Update,
            TriggerEvent::Delete,
            TriggerEvent::StatementInsert,
            TriggerEvent::StatementUpdate,
            TriggerEvent::StatementDelete,
            TriggerEvent::Commit,
            TriggerEvent::Rollback,
        ]
    }

    /// Fires once per statement rather than once per row
    pub fn is_statement_level(&self) -> bool {
        matches!(
            self,
            TriggerEvent::StatementInsert
                | TriggerEvent::StatementUpdate
                | TriggerEvent::StatementDelete
        )
    }

    /// Whether the event is raised on a class (as opposed to a transaction)
    pub fn requires_target(&self) -> bool {
        !matches!(self, TriggerEvent::Commit | TriggerEvent::Rollback)
    }
}

impl FromStr for TriggerEvent {
    type Err = ParseVocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = keyword(s);
        TriggerEvent::all()
            .into_iter()
            .find(|event| event.as_sql() == key)
            .ok_or_else(|| ParseVocabularyError::new("event type", s))
    }
}

impl std::fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// Whether the trigger currently fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerStatus {
    Active,
    Inactive,
}

impl TriggerStatus {
    pub fn as_sql(&self) -> &'static str {
        match self {
            TriggerStatus::Active => "ACTIVE",
            TriggerStatus::Inactive => "INACTIVE",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TriggerStatus::Active)
    }
}

impl FromStr for TriggerStatus {
    type Err = ParseVocabularyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match keyword(s).as_str() {
            "ACTIVE" => Ok(TriggerStatus::Active),
            "INACTIVE" => Ok(TriggerStatus::Inactive),
            _ => Err(ParseVocabularyError::new("status", s)),
        }
    }
}

/// The order in which condition, action and event happen
///
/// Only three pairs of condition time and action time are meaningful:
///
/// | condition time | action time | order |
/// |---|---|---|
/// | before | before | condition, action, event |
/// | before | after | condition, event, action |
/// | deferred | after | event, condition, action |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionOrder {
    ConditionActionEvent,
    ConditionEventAction,
    EventConditionAction,
}

impl ExecutionOrder {
    /// `None` for any pair outside the table above
    pub fn from_timing(condition: ConditionTime, action: ActionTime) -> Option<Self> {
        match (condition, action) {
            (ConditionTime::Before, ActionTime::Before) => {
                Some(ExecutionOrder::ConditionActionEvent)
            }
            (ConditionTime::Before, ActionTime::After) => {
                Some(ExecutionOrder::ConditionEventAction)
            }
            (ConditionTime::Deferred, ActionTime::After) => {
                Some(ExecutionOrder::EventConditionAction)
            }
            _ => None,
        }
    }

    pub fn condition_time(&self) -> ConditionTime {
        match self {
            ExecutionOrder::ConditionActionEvent | ExecutionOrder::ConditionEventAction => {
                ConditionTime::Before
            }
            ExecutionOrder::EventConditionAction => ConditionTime::Deferred,
        }
    }

    pub fn action_time(&self) -> ActionTime {
        match self {
            ExecutionOrder::ConditionActionEvent => ActionTime::Before,
            ExecutionOrder::ConditionEventAction | ExecutionOrder::EventConditionAction => {
                ActionTime::After
            }
        }
    }
}
