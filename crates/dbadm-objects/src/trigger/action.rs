//! Trigger action classification
//!
//! Action text arrives in many shapes (`PRINT 'msg'` from DDL, a bare
//! `REJECT` from a form, arbitrary statements from a server reply). It is
//! folded into one of four [`TriggerAction`] kinds plus an optional text.

use serde::{Deserialize, Serialize};

/// The action a trigger performs when it fires
///
/// # Examples
///
/// ```
/// use dbadm_objects::TriggerAction;
///
/// assert_eq!(TriggerAction::InvalidateTransaction.as_text(), "INVALIDATE TRANSACTION");
/// assert_eq!(TriggerAction::from_text("PRINT"), Some(TriggerAction::Print));
/// assert_eq!(TriggerAction::from_text("print"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerAction {
    /// Print a message
    Print,
    /// Reject the triggering statement
    Reject,
    /// Mark the current transaction as failed
    InvalidateTransaction,
    /// Any other statement, kept verbatim
    #[default]
    OtherStatement,
}

/// Prefixes are matched in this order; the first hit wins
const PREFIX_ORDER: [TriggerAction; 3] = [
    TriggerAction::Reject,
    TriggerAction::InvalidateTransaction,
    TriggerAction::Print,
];

impl TriggerAction {
    /// Keyword text of this action
    pub fn as_text(&self) -> &'static str {
        match self {
            TriggerAction::Print => "PRINT",
            TriggerAction::Reject => "REJECT",
            TriggerAction::InvalidateTransaction => "INVALIDATE TRANSACTION",
            TriggerAction::OtherStatement => "OTHER STATEMENT",
        }
    }

    /// Exact, case-sensitive lookup by keyword text
    pub fn from_text(text: &str) -> Option<Self> {
        Self::all().into_iter().find(|action| action.as_text() == text)
    }

    pub fn all() -> [Self; 4] {
        [
            TriggerAction::Print,
            TriggerAction::Reject,
            TriggerAction::InvalidateTransaction,
            TriggerAction::OtherStatement,
        ]
    }

    /// Whether this kind carries action text
    pub fn has_text(&self) -> bool {
        matches!(self, TriggerAction::Print | TriggerAction::OtherStatement)
    }
}

impl std::fmt::Display for TriggerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

/// A classified action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAction {
    pub kind: TriggerAction,
    pub text: Option<String>,
}

/// Classify raw action text.
///
/// The trimmed input is checked for `REJECT`, `INVALIDATE TRANSACTION` and
/// `PRINT` in that order. Anything trailing a `REJECT` or
/// `INVALIDATE TRANSACTION` keyword is discarded. For `PRINT`, the remainder is
/// trimmed and exactly one character is removed from each end (the quotes).
/// Unmatched input, including `None`, becomes [`TriggerAction::OtherStatement`]
/// with the input kept untouched.
///
/// ```
/// use dbadm_objects::{parse_action, TriggerAction};
///
/// let parsed = parse_action(Some("PRINT 'row added'"));
/// assert_eq!(parsed.kind, TriggerAction::Print);
/// assert_eq!(parsed.text.as_deref(), Some("row added"));
/// ```
pub fn parse_action(raw: Option<&str>) -> ParsedAction {
    if let Some(raw) = raw {
        let trimmed = raw.trim();
        for kind in PREFIX_ORDER {
            let Some(rest) = trimmed.strip_prefix(kind.as_text()) else {
                continue;
            };
            let text = match kind {
                // Only the leading keyword is dropped, so `PRINT` inside the message survives
                TriggerAction::Print => Some(strip_delimiters(rest.trim()).to_string()),
                _ => None,
            };
            return ParsedAction { kind, text };
        }
        tracing::trace!(action = raw, "no action keyword, keeping statement verbatim");
    }

    ParsedAction {
        kind: TriggerAction::OtherStatement,
        text: raw.map(str::to_string),
    }
}

/// Render an action back into statement text that [`parse_action`] maps to
/// the same kind and text.
pub fn action_statement(kind: TriggerAction, text: Option<&str>) -> Option<String> {
    match kind {
        TriggerAction::Print => Some(format!("PRINT '{}'", text.unwrap_or_default())),
        TriggerAction::Reject | TriggerAction::InvalidateTransaction => {
            Some(kind.as_text().to_string())
        }
        TriggerAction::OtherStatement => text.map(str::to_string),
    }
}

/// Drop one character from each end; shorter input collapses to empty
fn strip_delimiters(message: &str) -> &str {
    let mut chars = message.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}
