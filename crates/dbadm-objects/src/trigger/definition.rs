//! Trigger definition record and builder

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use super::action::{action_statement, parse_action, TriggerAction};
use super::priority::{normalize_priority, parse_priority};
use super::vocabulary::{ActionTime, ConditionTime, ExecutionOrder, TriggerEvent, TriggerStatus};

/// Keyword removed from the front of a condition
const CONDITION_KEYWORD: &str = "if ";

/// Trim a condition and drop a leading `if ` (any case).
///
/// Exactly `CONDITION_KEYWORD.len()` characters are removed, so whitespace
/// after the keyword's single space is kept.
pub fn normalize_condition(condition: &str) -> String {
    let trimmed = condition.trim();
    match trimmed.get(..CONDITION_KEYWORD.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(CONDITION_KEYWORD) => {
            trimmed[CONDITION_KEYWORD.len()..].to_string()
        }
        _ => trimmed.to_string(),
    }
}

/// Accumulates raw trigger fields and produces a [`TriggerDefinition`]
///
/// Every setter accepts `&str` or `Option<&str>`. The condition, action and
/// priority are normalized as they are set; the other fields are stored as
/// given.
///
/// # Examples
///
/// ```
/// use dbadm_objects::{TriggerAction, TriggerDefinition};
///
/// let trigger = TriggerDefinition::builder()
///     .name("check_salary")
///     .event_type("UPDATE")
///     .target_class("employee")
///     .target_attribute("salary")
///     .condition_time("BEFORE")
///     .condition("IF new.salary < 0")
///     .action_time("BEFORE")
///     .action("REJECT")
///     .status("ACTIVE")
///     .priority("1")
///     .build();
///
/// assert_eq!(trigger.condition(), Some("new.salary < 0"));
/// assert_eq!(trigger.action(), TriggerAction::Reject);
/// assert_eq!(trigger.action_text(), None);
/// assert_eq!(trigger.priority(), Some("01.00"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TriggerDefinitionBuilder {
    name: Option<String>,
    condition_time: Option<String>,
    event_type: Option<String>,
    target_class: Option<String>,
    target_attribute: Option<String>,
    condition: Option<String>,
    action_time: Option<String>,
    action: TriggerAction,
    action_text: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    description: Option<String>,
}

fn owned<'a>(value: impl Into<Option<&'a str>>) -> Option<String> {
    value.into().map(str::to_string)
}

impl TriggerDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name<'a>(mut self, name: impl Into<Option<&'a str>>) -> Self {
        self.name = owned(name);
        self
    }

    pub fn condition_time<'a>(mut self, condition_time: impl Into<Option<&'a str>>) -> Self {
        self.condition_time = owned(condition_time);
        self
    }

    pub fn event_type<'a>(mut self, event_type: impl Into<Option<&'a str>>) -> Self {
        self.event_type = owned(event_type);
        self
    }

    pub fn target_class<'a>(mut self, target_class: impl Into<Option<&'a str>>) -> Self {
        self.target_class = owned(target_class);
        self
    }

    pub fn target_attribute<'a>(mut self, target_attribute: impl Into<Option<&'a str>>) -> Self {
        self.target_attribute = owned(target_attribute);
        self
    }

    /// Set the condition. `None` leaves the current condition in place.
    pub fn condition<'a>(mut self, condition: impl Into<Option<&'a str>>) -> Self {
        if let Some(condition) = condition.into() {
            self.condition = Some(normalize_condition(condition));
        }
        self
    }

    pub fn action_time<'a>(mut self, action_time: impl Into<Option<&'a str>>) -> Self {
        self.action_time = owned(action_time);
        self
    }

    /// Classify and set the action; see [`parse_action`](super::parse_action)
    pub fn action<'a>(mut self, action: impl Into<Option<&'a str>>) -> Self {
        let parsed = parse_action(action.into());
        self.action = parsed.kind;
        self.action_text = parsed.text;
        self
    }

    pub fn status<'a>(mut self, status: impl Into<Option<&'a str>>) -> Self {
        self.status = owned(status);
        self
    }

    /// Set the priority, canonicalized to `NN.NN` when numeric
    pub fn priority<'a>(mut self, priority: impl Into<Option<&'a str>>) -> Self {
        self.priority = priority.into().map(normalize_priority);
        self
    }

    /// Set the description. `None` leaves the current description in place.
    pub fn description<'a>(mut self, description: impl Into<Option<&'a str>>) -> Self {
        if let Some(description) = description.into() {
            self.description = Some(description.to_string());
        }
        self
    }

    /// Seal the accumulated fields. Never fails; no field is required.
    pub fn build(self) -> TriggerDefinition {
        tracing::trace!(name = ?self.name, action = %self.action, "building trigger definition");
        TriggerDefinition {
            name: self.name,
            condition_time: self.condition_time,
            event_type: self.event_type,
            target_class: self.target_class,
            target_attribute: self.target_attribute,
            condition: self.condition,
            action_time: self.action_time,
            action: self.action,
            action_text: self.action_text,
            status: self.status,
            priority: self.priority,
            description: RwLock::new(self.description),
        }
    }
}

/// A normalized database trigger
///
/// Identity is the name alone: equality, hashing and ordering ignore every
/// other field. All fields are fixed at construction except the description,
/// which can be replaced through a shared reference with
/// [`set_description`](Self::set_description).
#[derive(Debug, Serialize, Deserialize)]
#[serde(from = "RawTriggerFields", into = "RawTriggerFields")]
pub struct TriggerDefinition {
    name: Option<String>,
    condition_time: Option<String>,
    event_type: Option<String>,
    target_class: Option<String>,
    target_attribute: Option<String>,
    condition: Option<String>,
    action_time: Option<String>,
    action: TriggerAction,
    action_text: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    description: RwLock<Option<String>>,
}

impl TriggerDefinition {
    pub fn builder() -> TriggerDefinitionBuilder {
        TriggerDefinitionBuilder::new()
    }

    /// A builder pre-filled with this definition's canonical fields
    pub fn to_builder(&self) -> TriggerDefinitionBuilder {
        TriggerDefinitionBuilder {
            name: self.name.clone(),
            condition_time: self.condition_time.clone(),
            event_type: self.event_type.clone(),
            target_class: self.target_class.clone(),
            target_attribute: self.target_attribute.clone(),
            condition: self.condition.clone(),
            action_time: self.action_time.clone(),
            action: self.action,
            action_text: self.action_text.clone(),
            status: self.status.clone(),
            priority: self.priority.clone(),
            description: self.description(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn condition_time(&self) -> Option<&str> {
        self.condition_time.as_deref()
    }

    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    pub fn target_class(&self) -> Option<&str> {
        self.target_class.as_deref()
    }

    pub fn target_attribute(&self) -> Option<&str> {
        self.target_attribute.as_deref()
    }

    /// The condition without its `if ` keyword
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn action_time(&self) -> Option<&str> {
        self.action_time.as_deref()
    }

    pub fn action(&self) -> TriggerAction {
        self.action
    }

    /// Message for `PRINT`, statement for other statements, `None` otherwise
    pub fn action_text(&self) -> Option<&str> {
        self.action_text.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    /// Snapshot of the current description
    pub fn description(&self) -> Option<String> {
        self.description.read().clone()
    }

    /// Replace the description, including clearing it with `None`
    pub fn set_description<'a>(&self, description: impl Into<Option<&'a str>>) {
        *self.description.write() = owned(description);
    }

    /// The action rendered as statement text, e.g. `PRINT 'msg'`
    pub fn action_statement(&self) -> Option<String> {
        action_statement(self.action, self.action_text.as_deref())
    }

    pub fn event(&self) -> Option<TriggerEvent> {
        self.event_type.as_deref()?.parse().ok()
    }

    pub fn condition_timing(&self) -> Option<ConditionTime> {
        self.condition_time.as_deref()?.parse().ok()
    }

    pub fn action_timing(&self) -> Option<ActionTime> {
        self.action_time.as_deref()?.parse().ok()
    }

    pub fn trigger_status(&self) -> Option<TriggerStatus> {
        self.status.as_deref()?.parse().ok()
    }

    /// Execution order implied by the condition and action times, if legal
    pub fn execution_order(&self) -> Option<ExecutionOrder> {
        ExecutionOrder::from_timing(self.condition_timing()?, self.action_timing()?)
    }

    pub fn priority_value(&self) -> Option<f64> {
        parse_priority(self.priority.as_deref()?)
    }
}

impl Clone for TriggerDefinition {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            condition_time: self.condition_time.clone(),
            event_type: self.event_type.clone(),
            target_class: self.target_class.clone(),
            target_attribute: self.target_attribute.clone(),
            condition: self.condition.clone(),
            action_time: self.action_time.clone(),
            action: self.action,
            action_text: self.action_text.clone(),
            status: self.status.clone(),
            priority: self.priority.clone(),
            description: RwLock::new(self.description()),
        }
    }
}

impl PartialEq for TriggerDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TriggerDefinition {}

impl Hash for TriggerDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for TriggerDefinition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TriggerDefinition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// Trigger fields as supplied by a form, DDL parser or server reply
///
/// Deserializing a [`TriggerDefinition`] goes through this type and the
/// builder, so incoming values are normalized. Serializing writes the
/// canonical values back, with the action rendered as a statement and the
/// condition prefixed by its `if ` keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTriggerFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RawTriggerFields {
    pub fn build(&self) -> TriggerDefinition {
        TriggerDefinition::builder()
            .name(self.name.as_deref())
            .condition_time(self.condition_time.as_deref())
            .event_type(self.event_type.as_deref())
            .target_class(self.target_class.as_deref())
            .target_attribute(self.target_attribute.as_deref())
            .condition(self.condition.as_deref())
            .action_time(self.action_time.as_deref())
            .action(self.action.as_deref())
            .status(self.status.as_deref())
            .priority(self.priority.as_deref())
            .description(self.description.as_deref())
            .build()
    }
}

impl From<RawTriggerFields> for TriggerDefinition {
    fn from(raw: RawTriggerFields) -> Self {
        raw.build()
    }
}

impl From<TriggerDefinition> for RawTriggerFields {
    fn from(trigger: TriggerDefinition) -> Self {
        let action = trigger.action_statement();
        let condition = trigger.condition.map(condition_statement);
        Self {
            description: trigger.description.into_inner(),
            name: trigger.name,
            condition_time: trigger.condition_time,
            event_type: trigger.event_type,
            target_class: trigger.target_class,
            target_attribute: trigger.target_attribute,
            condition,
            action_time: trigger.action_time,
            action,
            status: trigger.status,
            priority: trigger.priority,
        }
    }
}

/// Prefix a canonical condition with its keyword so that normalizing it again
/// yields the same text. An empty condition has no keyword.
fn condition_statement(condition: String) -> String {
    if condition.is_empty() {
        condition
    } else {
        format!("{CONDITION_KEYWORD}{condition}")
    }
}
