//! Subcommand bodies, kept free of process I/O except for reading input

use std::io::{self, Read};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use dbadm_monitor::BrokerStatus;
use dbadm_objects::{RawTriggerFields, TriggerDdl, TriggerDefinition, TriggerValidator, ValidationError};

#[cfg(test)]
mod tests;

/// Read a file, or stdin when `path` is absent or `-`
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file: {}", path.display())),
        _ => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("failed to read stdin")?;
            Ok(content)
        }
    }
}

pub fn load_definitions(path: Option<&Path>) -> Result<Vec<TriggerDefinition>> {
    parse_definitions(&read_input(path)?)
}

/// Parse a JSON array of trigger fields into definitions sorted by name
pub fn parse_definitions(content: &str) -> Result<Vec<TriggerDefinition>> {
    let raw: Vec<RawTriggerFields> =
        serde_json::from_str(content).context("failed to parse trigger definitions")?;
    let mut triggers: Vec<TriggerDefinition> = raw.into_iter().map(TriggerDefinition::from).collect();
    triggers.sort();
    tracing::info!(count = triggers.len(), "loaded trigger definitions");
    Ok(triggers)
}

pub fn render_json(triggers: &[TriggerDefinition]) -> Result<String> {
    serde_json::to_string_pretty(triggers).context("failed to serialize trigger definitions")
}

pub fn render_table(triggers: &[TriggerDefinition]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Name", "Status", "Priority", "Timing", "Event", "Target", "Condition", "Action",
        ]);

    for trigger in triggers {
        let timing = match (trigger.condition_time(), trigger.action_time()) {
            (Some(condition), Some(action)) => format!("{condition}/{action}"),
            (Some(condition), None) => condition.to_string(),
            (None, Some(action)) => format!("-/{action}"),
            (None, None) => String::new(),
        };
        let target = match (trigger.target_class(), trigger.target_attribute()) {
            (Some(class), Some(attribute)) => format!("{class}({attribute})"),
            (Some(class), None) => class.to_string(),
            _ => String::new(),
        };
        table.add_row(vec![
            trigger.name().unwrap_or_default().to_string(),
            trigger.status().unwrap_or_default().to_string(),
            trigger.priority().unwrap_or_default().to_string(),
            timing,
            trigger.event_type().unwrap_or_default().to_string(),
            target,
            trigger.condition().unwrap_or_default().to_string(),
            trigger.action_statement().unwrap_or_default(),
        ]);
    }

    table.to_string()
}

/// Triggers with at least one problem, paired with their display name
pub fn validate_definitions(
    validator: &TriggerValidator,
    triggers: &[TriggerDefinition],
) -> Vec<(String, Vec<ValidationError>)> {
    triggers
        .iter()
        .enumerate()
        .filter_map(|(index, trigger)| {
            let errors = validator.validate(trigger);
            if errors.is_empty() {
                return None;
            }
            Some((display_name(trigger, index), errors))
        })
        .collect()
}

pub fn render_findings(findings: &[(String, Vec<ValidationError>)]) -> String {
    let mut output = String::new();
    for (name, errors) in findings {
        output.push_str(&format!("{name}:\n"));
        for error in errors {
            output.push_str(&format!("  - {error}\n"));
        }
    }
    output
}

/// CREATE TRIGGER statements separated by blank lines
pub fn render_ddl(ddl: &TriggerDdl, triggers: &[TriggerDefinition]) -> Result<String> {
    let statements = triggers
        .iter()
        .enumerate()
        .map(|(index, trigger)| {
            ddl.build_create_trigger(trigger)
                .map(|sql| format!("{sql};"))
                .with_context(|| format!("cannot generate DDL for {}", display_name(trigger, index)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(statements.join("\n\n"))
}

pub fn load_broker_status(path: Option<&Path>) -> Result<BrokerStatus> {
    serde_json::from_str(&read_input(path)?).context("failed to parse broker status")
}

pub fn render_broker_summary(status: &BrokerStatus, broker: Option<&str>) -> Result<String> {
    let brokers: Vec<&BrokerStatus> = match broker {
        Some(name) => vec![status
            .sub_broker_by_name(Some(name))
            .or_else(|| status.find(name))
            .ok_or_else(|| anyhow!("broker '{name}' not found"))?],
        None if status.brokers().is_empty() => vec![status],
        None => status.brokers().iter().collect(),
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Broker", "Apply servers", "Busy", "Queries", "Transactions", "Jobs",
    ]);
    for broker in brokers {
        let totals = broker.totals();
        table.add_row(vec![
            broker.name().unwrap_or("-").to_string(),
            totals.apply_servers.to_string(),
            totals.busy_apply_servers.to_string(),
            totals.queries.to_string(),
            totals.transactions.to_string(),
            totals.jobs.to_string(),
        ]);
    }

    Ok(format!(
        "{}\nretrieved at {}",
        table,
        status.retrieved_at().format("%Y-%m-%d %H:%M:%S UTC")
    ))
}

fn display_name(trigger: &TriggerDefinition, index: usize) -> String {
    match trigger.name() {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => format!("<unnamed #{}>", index + 1),
    }
}
