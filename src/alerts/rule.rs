//! Declarative alert rules: a tagged-variant predicate plus a free evaluator,
//! in place of class-based rule inheritance.

use super::alert::Severity;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComparisonOp {
    GreaterThan,
    LessThan,
}

/// A rule's triggering condition, expressed as data rather than a trait object
/// hierarchy: a threshold crossing, a range exclusion, or an escape hatch for
/// arbitrary predicates.
#[derive(Clone)]
pub enum Condition {
    Threshold { op: ComparisonOp, value: f64 },
    Range { lo: f64, hi: f64 },
    Custom(std::sync::Arc<dyn Fn(f64) -> bool + Send + Sync>),
}

impl std::fmt::Debug for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Threshold { op, value } => {
                f.debug_struct("Threshold").field("op", op).field("value", value).finish()
            }
            Condition::Range { lo, hi } => f.debug_struct("Range").field("lo", lo).field("hi", hi).finish(),
            Condition::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Evaluate a [`Condition`] against a scalar value.
pub fn evaluate(condition: &Condition, value: f64) -> bool {
    match condition {
        Condition::Threshold { op, value: bound } => match op {
            ComparisonOp::GreaterThan => value > *bound,
            ComparisonOp::LessThan => value < *bound,
        },
        Condition::Range { lo, hi } => value < *lo || value > *hi,
        Condition::Custom(predicate) => predicate(value),
    }
}

#[derive(Debug, Clone)]
pub struct AlertRule {
    pub name: String,
    pub condition: Condition,
    pub message_template: String,
    pub severity: Severity,
    pub cooldown_seconds: i64,
}

impl AlertRule {
    pub fn threshold(
        name: impl Into<String>,
        op: ComparisonOp,
        value: f64,
        message_template: impl Into<String>,
        severity: Severity,
        cooldown_seconds: i64,
    ) -> Self {
        Self {
            name: name.into(),
            condition: Condition::Threshold { op, value },
            message_template: message_template.into(),
            severity,
            cooldown_seconds,
        }
    }

    /// Render `message_template`, substituting the literal token `{value}`
    /// with `value` formatted to two decimal places.
    pub fn render_message(&self, value: f64) -> String {
        self.message_template.replace("{value}", &format!("{value:.2}"))
    }
}

/// The four default z-score rules shipped by the engine: `z>2` WARNING/60s,
/// `z<-2` WARNING/60s, `z>3` CRITICAL/120s, `z<-3` CRITICAL/120s.
pub fn default_rules() -> Vec<AlertRule> {
    vec![
        AlertRule::threshold(
            "zscore_high",
            ComparisonOp::GreaterThan,
            2.0,
            "Z-score exceeded upper threshold: {value}",
            Severity::Warning,
            60,
        ),
        AlertRule::threshold(
            "zscore_low",
            ComparisonOp::LessThan,
            -2.0,
            "Z-score exceeded lower threshold: {value}",
            Severity::Warning,
            60,
        ),
        AlertRule::threshold(
            "zscore_critical_high",
            ComparisonOp::GreaterThan,
            3.0,
            "Z-score critically high: {value}",
            Severity::Critical,
            120,
        ),
        AlertRule::threshold(
            "zscore_critical_low",
            ComparisonOp::LessThan,
            -3.0,
            "Z-score critically low: {value}",
            Severity::Critical,
            120,
        ),
    ]
}
