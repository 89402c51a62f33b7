//! Immutable alert records emitted by the rule engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub timestamp: DateTime<Utc>,
    pub rule_name: String,
    pub severity: Severity,
    pub message: String,
    pub value: f64,
    pub symbol: Option<String>,
    pub metadata: HashMap<String, String>,
}
