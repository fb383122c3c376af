//! Trigger definition validation
//!
//! The definition model accepts anything; this layer decides what a usable
//! trigger looks like. Structural checks always run, the rest are switched by
//! [`TriggerPolicy`].

use dbadm_core::TriggerSettings;
use thiserror::Error;

use super::action::TriggerAction;
use super::definition::TriggerDefinition;
use super::priority::parse_priority;
use super::vocabulary::{ActionTime, ConditionTime, ExecutionOrder, TriggerEvent, TriggerStatus};

/// A problem found in a trigger definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Trigger name is required")]
    MissingName,
    #[error("Trigger event type is required")]
    MissingEvent,
    #[error("Unknown event type '{0}'")]
    UnknownEvent(String),
    #[error("Event {0} requires a target class")]
    MissingTargetClass(TriggerEvent),
    #[error("Condition time is required")]
    MissingConditionTime,
    #[error("Unknown condition time '{0}'")]
    UnknownConditionTime(String),
    #[error("Unknown action time '{0}'")]
    UnknownActionTime(String),
    #[error("Unknown status '{0}'")]
    UnknownStatus(String),
    #[error("Trigger action is required")]
    MissingAction,
    #[error(
        "Condition time {} with action time {} is not a valid execution order",
        .condition.as_sql(),
        .action.as_sql()
    )]
    IllegalTiming {
        condition: ConditionTime,
        action: ActionTime,
    },
    #[error("Priority '{0}' is not a number")]
    NonNumericPriority(String),
}

/// Which optional checks the validator applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerPolicy {
    pub enforce_timing_combinations: bool,
    pub require_target_class: bool,
    pub canonical_priority: bool,
}

impl TriggerPolicy {
    /// Structural checks only
    pub fn lenient() -> Self {
        Self {
            enforce_timing_combinations: false,
            require_target_class: false,
            canonical_priority: false,
        }
    }
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self::from(&TriggerSettings::default())
    }
}

impl From<&TriggerSettings> for TriggerPolicy {
    fn from(settings: &TriggerSettings) -> Self {
        Self {
            enforce_timing_combinations: settings.enforce_timing_combinations,
            require_target_class: settings.require_target_class,
            canonical_priority: settings.canonical_priority,
        }
    }
}

/// Checks trigger definitions against a policy
///
/// # Examples
///
/// ```
/// use dbadm_objects::{TriggerDefinition, TriggerPolicy, TriggerValidator, ValidationError};
///
/// let trigger = TriggerDefinition::builder()
///     .name("t1")
///     .event_type("INSERT")
///     .target_class("orders")
///     .condition_time("DEFERRED")
///     .action_time("BEFORE")
///     .action("REJECT")
///     .build();
///
/// let strict = TriggerValidator::new(TriggerPolicy::default());
/// assert!(matches!(
///     strict.validate(&trigger).as_slice(),
///     [ValidationError::IllegalTiming { .. }]
/// ));
///
/// let lenient = TriggerValidator::new(TriggerPolicy::lenient());
/// assert!(lenient.is_valid(&trigger));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TriggerValidator {
    policy: TriggerPolicy,
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

impl TriggerValidator {
    pub fn new(policy: TriggerPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> TriggerPolicy {
        self.policy
    }

    /// Collect every problem with `trigger`, in field order
    pub fn validate(&self, trigger: &TriggerDefinition) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if is_blank(trigger.name()) {
            errors.push(ValidationError::MissingName);
        }

        match trigger.event_type() {
            None => errors.push(ValidationError::MissingEvent),
            Some(raw) => match raw.parse::<TriggerEvent>() {
                Ok(event) => {
                    if self.policy.require_target_class
                        && event.requires_target()
                        && is_blank(trigger.target_class())
                    {
                        errors.push(ValidationError::MissingTargetClass(event));
                    }
                }
                Err(_) => errors.push(ValidationError::UnknownEvent(raw.to_string())),
            },
        }

        let condition_time = match trigger.condition_time() {
            None => {
                errors.push(ValidationError::MissingConditionTime);
                None
            }
            Some(raw) => match raw.parse::<ConditionTime>() {
                Ok(time) => Some(time),
                Err(_) => {
                    errors.push(ValidationError::UnknownConditionTime(raw.to_string()));
                    None
                }
            },
        };

        let action_time = match trigger.action_time() {
            None => None,
            Some(raw) => match raw.parse::<ActionTime>() {
                Ok(time) => Some(time),
                Err(_) => {
                    errors.push(ValidationError::UnknownActionTime(raw.to_string()));
                    None
                }
            },
        };

        if self.policy.enforce_timing_combinations {
            if let (Some(condition), Some(action)) = (condition_time, action_time) {
                if ExecutionOrder::from_timing(condition, action).is_none() {
                    errors.push(ValidationError::IllegalTiming { condition, action });
                }
            }
        }

        if trigger.action() == TriggerAction::OtherStatement && is_blank(trigger.action_text()) {
            errors.push(ValidationError::MissingAction);
        }

        if let Some(raw) = trigger.status() {
            if raw.parse::<TriggerStatus>().is_err() {
                errors.push(ValidationError::UnknownStatus(raw.to_string()));
            }
        }

        if self.policy.canonical_priority {
            if let Some(raw) = trigger.priority() {
                if parse_priority(raw).is_none() {
                    errors.push(ValidationError::NonNumericPriority(raw.to_string()));
                }
            }
        }

        if !errors.is_empty() {
            tracing::debug!(
                name = ?trigger.name(),
                error_count = errors.len(),
                "trigger definition failed validation"
            );
        }

        errors
    }

    pub fn is_valid(&self, trigger: &TriggerDefinition) -> bool {
        self.validate(trigger).is_empty()
    }
}
