//! Trigger priority formatting

/// Format a numeric priority as `NN.NN`.
///
/// The integer part is zero-padded to at least two digits and never
/// truncated; the fraction is rounded to two digits. Returns `None` when the
/// input (after trimming) is not a finite number.
///
/// # Examples
///
/// ```
/// use dbadm_objects::format_priority;
///
/// assert_eq!(format_priority("2").as_deref(), Some("02.00"));
/// assert_eq!(format_priority("12.345").as_deref(), Some("12.35"));
/// assert_eq!(format_priority("150").as_deref(), Some("150.00"));
/// assert_eq!(format_priority("high"), None);
/// ```
pub fn format_priority(priority: &str) -> Option<String> {
    let value = parse_priority(priority)?;

    let digits = format!("{:.2}", value.abs());
    let (integer, fraction) = digits.split_once('.')?;
    let sign = if value.is_sign_negative() { "-" } else { "" };

    Some(format!("{sign}{integer:0>2}.{fraction}"))
}

/// Parse a priority as a finite number
pub fn parse_priority(priority: &str) -> Option<f64> {
    priority
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Canonicalize when possible, otherwise keep the input
pub(crate) fn normalize_priority(priority: &str) -> String {
    match format_priority(priority) {
        Some(formatted) => formatted,
        None => {
            tracing::debug!(priority, "priority is not numeric, keeping raw value");
            priority.to_string()
        }
    }
}
