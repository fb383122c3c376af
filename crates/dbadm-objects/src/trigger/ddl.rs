//! Trigger DDL generation
//!
//! Produces `CREATE TRIGGER`, `DROP TRIGGER` and `ALTER TRIGGER` statements
//! from [`TriggerDefinition`] records.

use thiserror::Error;

use super::action::TriggerAction;
use super::definition::TriggerDefinition;
use super::priority::format_priority;
use super::validator::{TriggerPolicy, TriggerValidator, ValidationError};
use super::vocabulary::{ActionTime, ConditionTime, TriggerEvent, TriggerStatus};

/// Error type for trigger DDL generation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriggerError {
    /// The definition failed validation
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The timing pair has no DDL form
    #[error(
        "{} action cannot follow a {} condition",
        .action.as_sql(),
        .condition.as_sql()
    )]
    UnsupportedTiming {
        condition: ConditionTime,
        action: ActionTime,
    },
    /// Priority is not numeric
    #[error("Priority '{0}' is not a number")]
    InvalidPriority(String),
}

/// Trigger DDL generator
///
/// # Examples
///
/// ```
/// use dbadm_objects::{TriggerDdl, TriggerDefinition};
///
/// let ddl = TriggerDdl::default();
/// let trigger = TriggerDefinition::builder()
///     .name("audit_orders")
///     .event_type("INSERT")
///     .target_class("orders")
///     .condition_time("AFTER")
///     .action_time("AFTER")
///     .action("PRINT 'order added'")
///     .build();
///
/// // AFTER/AFTER is outside the strict timing table
/// assert!(ddl.build_create_trigger(&trigger).is_err());
///
/// let ddl = TriggerDdl::new(dbadm_objects::TriggerPolicy::lenient());
/// let sql = ddl.build_create_trigger(&trigger).unwrap();
/// assert!(sql.starts_with("CREATE TRIGGER audit_orders"));
/// assert!(sql.contains("EXECUTE PRINT 'order added'"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TriggerDdl {
    validator: TriggerValidator,
}

impl TriggerDdl {
    pub fn new(policy: TriggerPolicy) -> Self {
        Self {
            validator: TriggerValidator::new(policy),
        }
    }

    pub fn validator(&self) -> &TriggerValidator {
        &self.validator
    }

    /// Validate a definition, reporting the first problem
    pub fn validate(&self, trigger: &TriggerDefinition) -> Result<(), TriggerError> {
        match self.validator.validate(trigger).into_iter().next() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    /// Build a CREATE TRIGGER statement
    pub fn build_create_trigger(&self, trigger: &TriggerDefinition) -> Result<String, TriggerError> {
        self.validate(trigger)?;

        let name = trigger.name().ok_or(ValidationError::MissingName)?;
        let event = trigger.event().ok_or(ValidationError::MissingEvent)?;
        let condition_time = trigger
            .condition_timing()
            .ok_or(ValidationError::MissingConditionTime)?;

        let mut sql = format!("CREATE TRIGGER {}", quote_identifier(name));

        if let Some(status) = trigger.trigger_status() {
            sql.push_str(&format!("\nSTATUS {}", status.as_sql()));
        }

        if let Some(priority) = trigger.priority() {
            let priority = format_priority(priority)
                .ok_or_else(|| TriggerError::InvalidPriority(priority.to_string()))?;
            sql.push_str(&format!("\nPRIORITY {}", priority));
        }

        sql.push_str(&format!(
            "\n{} {}",
            condition_time.as_sql(),
            event.as_sql()
        ));
        if let Some(target) = self.build_target(trigger, event) {
            sql.push_str(&format!(" ON {}", target));
        }

        if let Some(condition) = trigger.condition().filter(|c| !c.is_empty()) {
            sql.push_str(&format!("\nIF {}", condition));
        }

        let execute = match (condition_time, trigger.action_timing()) {
            (ConditionTime::Before, Some(ActionTime::After)) => "EXECUTE AFTER",
            (ConditionTime::Before, _) | (_, None) | (_, Some(ActionTime::After)) => "EXECUTE",
            (condition, Some(action @ ActionTime::Before)) => {
                return Err(TriggerError::UnsupportedTiming { condition, action });
            }
        };
        sql.push_str(&format!("\n{} {}", execute, self.build_action(trigger)));

        if let Some(description) = trigger.description() {
            sql.push_str(&format!("\nCOMMENT {}", quote_literal(&description)));
        }

        tracing::debug!(name, event = %event, "generated CREATE TRIGGER");
        Ok(sql)
    }

    fn build_target(&self, trigger: &TriggerDefinition, event: TriggerEvent) -> Option<String> {
        if !event.requires_target() {
            return None;
        }
        let class = trigger.target_class().filter(|c| !c.trim().is_empty())?;
        let target = match trigger.target_attribute().filter(|a| !a.trim().is_empty()) {
            Some(attribute) => format!(
                "{}({})",
                quote_identifier(class),
                quote_identifier(attribute)
            ),
            None => quote_identifier(class),
        };
        Some(target)
    }

    fn build_action(&self, trigger: &TriggerDefinition) -> String {
        match trigger.action() {
            TriggerAction::Print => format!(
                "PRINT {}",
                quote_literal(trigger.action_text().unwrap_or_default())
            ),
            TriggerAction::Reject | TriggerAction::InvalidateTransaction => {
                trigger.action().as_text().to_string()
            }
            TriggerAction::OtherStatement => {
                trigger.action_text().unwrap_or_default().trim().to_string()
            }
        }
    }

    /// Build a DROP TRIGGER statement
    pub fn build_drop_trigger(&self, name: &str) -> String {
        format!("DROP TRIGGER {}", quote_identifier(name))
    }

    /// Build an ALTER TRIGGER ... STATUS statement
    pub fn build_alter_status(&self, name: &str, status: TriggerStatus) -> String {
        format!(
            "ALTER TRIGGER {} STATUS {}",
            quote_identifier(name),
            status.as_sql()
        )
    }

    /// Build an ALTER TRIGGER ... PRIORITY statement
    pub fn build_alter_priority(&self, name: &str, priority: &str) -> Result<String, TriggerError> {
        let priority = format_priority(priority)
            .ok_or_else(|| TriggerError::InvalidPriority(priority.to_string()))?;
        Ok(format!(
            "ALTER TRIGGER {} PRIORITY {}",
            quote_identifier(name),
            priority
        ))
    }

    /// Build an ALTER TRIGGER ... COMMENT statement; `None` clears the comment
    pub fn build_alter_comment(&self, name: &str, comment: Option<&str>) -> String {
        format!(
            "ALTER TRIGGER {} COMMENT {}",
            quote_identifier(name),
            quote_literal(comment.unwrap_or_default())
        )
    }

    /// Statements that turn `current` into `edited`.
    ///
    /// Only status, priority and comment can be altered in place; any other
    /// difference means the trigger must be dropped and recreated, which is
    /// what this returns in that case.
    pub fn build_alter_trigger(
        &self,
        current: &TriggerDefinition,
        edited: &TriggerDefinition,
    ) -> Result<Vec<String>, TriggerError> {
        let name = edited.name().ok_or(ValidationError::MissingName)?;

        let in_place = current.name() == edited.name()
            && current.condition_time() == edited.condition_time()
            && current.event_type() == edited.event_type()
            && current.target_class() == edited.target_class()
            && current.target_attribute() == edited.target_attribute()
            && current.condition() == edited.condition()
            && current.action_time() == edited.action_time()
            && current.action() == edited.action()
            && current.action_text() == edited.action_text();

        if !in_place {
            let mut statements = Vec::new();
            if let Some(current_name) = current.name() {
                statements.push(self.build_drop_trigger(current_name));
            }
            statements.push(self.build_create_trigger(edited)?);
            return Ok(statements);
        }

        let mut statements = Vec::new();
        if current.status() != edited.status() {
            if let Some(raw) = edited.status() {
                let status = raw
                    .parse::<TriggerStatus>()
                    .map_err(|_| ValidationError::UnknownStatus(raw.to_string()))?;
                statements.push(self.build_alter_status(name, status));
            }
        }
        if current.priority() != edited.priority() {
            if let Some(priority) = edited.priority() {
                statements.push(self.build_alter_priority(name, priority)?);
            }
        }
        let comment = edited.description();
        if current.description() != comment {
            statements.push(self.build_alter_comment(name, comment.as_deref()));
        }
        Ok(statements)
    }
}

/// Quote an identifier when it is not a plain word
fn quote_identifier(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn needs_quoting(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return true;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return true;
    }
    name.chars().any(|c| !c.is_ascii_alphanumeric() && c != '_')
        || RESERVED_KEYWORDS.contains(&name.to_uppercase().as_str())
}

static RESERVED_KEYWORDS: &[&str] = &[
    "ACTIVE",
    "AFTER",
    "ALTER",
    "BEFORE",
    "CLASS",
    "COMMENT",
    "COMMIT",
    "CREATE",
    "DEFERRED",
    "DELETE",
    "DROP",
    "EXECUTE",
    "FROM",
    "IF",
    "INACTIVE",
    "INSERT",
    "INVALIDATE",
    "ON",
    "PRINT",
    "PRIORITY",
    "REJECT",
    "ROLLBACK",
    "SELECT",
    "STATEMENT",
    "STATUS",
    "TABLE",
    "TRANSACTION",
    "TRIGGER",
    "UPDATE",
    "WHERE",
];
