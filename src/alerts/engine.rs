//! Rule-driven alert engine: evaluates scalar signals against a rule set,
//! respecting per-rule cooldowns, and retains bounded history.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{trace, warn};

use super::alert::{Alert, Severity};
use super::rule::{evaluate, default_rules, AlertRule};
use crate::store::RingBuffer;

const DEFAULT_HISTORY_CAPACITY: usize = 100;

type AlertCallback = Box<dyn Fn(&Alert) + Send + Sync>;

struct Inner {
    rules: Vec<AlertRule>,
    history: RingBuffer<Alert>,
    last_triggered: HashMap<String, DateTime<Utc>>,
}

/// Owns the rule list, cooldown map, and bounded history ring exclusively;
/// callers only ever see copies via [`AlertEngine::history`].
pub struct AlertEngine {
    default_cooldown_seconds: i64,
    inner: Mutex<Inner>,
    callbacks: Mutex<Vec<AlertCallback>>,
}

fn cooldown_key(rule_name: &str, symbol: Option<&str>) -> String {
    format!("{rule_name}_{}", symbol.unwrap_or("all"))
}

impl AlertEngine {
    pub fn new(max_history: usize, default_cooldown_seconds: i64) -> Arc<Self> {
        Arc::new(Self {
            default_cooldown_seconds,
            inner: Mutex::new(Inner {
                rules: default_rules(),
                history: RingBuffer::new(max_history),
                last_triggered: HashMap::new(),
            }),
            callbacks: Mutex::new(Vec::new()),
        })
    }

    pub fn with_default_history() -> Arc<Self> {
        Self::new(DEFAULT_HISTORY_CAPACITY, 60)
    }

    pub fn add_rule(&self, rule: AlertRule) {
        self.inner.lock().rules.push(rule);
    }

    pub fn remove_rule(&self, name: &str) -> bool {
        let mut inner = self.inner.lock();
        let len_before = inner.rules.len();
        inner.rules.retain(|r| r.name != name);
        inner.rules.len() != len_before
    }

    pub fn on_alert<F>(&self, callback: F)
    where
        F: Fn(&Alert) + Send + Sync + 'static,
    {
        self.callbacks.lock().push(Box::new(callback));
    }

    /// Evaluate every rule against `zscore`, in insertion order. Each matching
    /// rule respects its own cooldown independently, so multiple rules may
    /// fire for the same value (e.g. both `z>2` and `z>3`).
    pub fn check_zscore(&self, zscore: f64, symbol: Option<&str>, ts: DateTime<Utc>) -> Vec<Alert> {
        let mut triggered = Vec::new();
        {
            let mut inner = self.inner.lock();
            let rules = inner.rules.clone();
            for rule in &rules {
                if !evaluate(&rule.condition, zscore) {
                    continue;
                }
                let key = cooldown_key(&rule.name, symbol);
                if let Some(last) = inner.last_triggered.get(&key) {
                    if ts - *last < chrono::Duration::seconds(rule.cooldown_seconds) {
                        continue;
                    }
                }

                let alert = Alert {
                    timestamp: ts,
                    rule_name: rule.name.clone(),
                    severity: rule.severity,
                    message: rule.render_message(zscore),
                    value: zscore,
                    symbol: symbol.map(String::from),
                    metadata: HashMap::new(),
                };

                inner.history.push(alert.clone());
                inner.last_triggered.insert(key, ts);
                triggered.push(alert);
            }
        }

        for alert in &triggered {
            self.notify(alert);
        }
        triggered
    }

    /// Evaluate an arbitrary predicate with an explicit cooldown key, outside
    /// the rule list (e.g. for ad hoc correlation-break or spike checks).
    pub fn check_custom(
        &self,
        value: f64,
        condition: impl Fn(f64) -> bool,
        message: String,
        severity: Severity,
        symbol: Option<&str>,
        cooldown_key: Option<&str>,
        ts: DateTime<Utc>,
    ) -> Option<Alert> {
        if !condition(value) {
            return None;
        }

        let alert = {
            let mut inner = self.inner.lock();
            if let Some(key) = cooldown_key {
                if let Some(last) = inner.last_triggered.get(key) {
                    if ts - *last < chrono::Duration::seconds(self.default_cooldown_seconds) {
                        return None;
                    }
                }
            }

            let alert = Alert {
                timestamp: ts,
                rule_name: "custom".to_string(),
                severity,
                message,
                value,
                symbol: symbol.map(String::from),
                metadata: HashMap::new(),
            };
            inner.history.push(alert.clone());
            if let Some(key) = cooldown_key {
                inner.last_triggered.insert(key.to_string(), ts);
            }
            alert
        };

        self.notify(&alert);
        Some(alert)
    }

    fn notify(&self, alert: &Alert) {
        let callbacks = self.callbacks.lock();
        for callback in callbacks.iter() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| callback(alert)));
            if result.is_err() {
                warn!(rule = %alert.rule_name, "alert subscriber panicked, isolating");
            } else {
                trace!(rule = %alert.rule_name, "alert subscriber notified");
            }
        }
    }

    pub fn history(&self, n: Option<usize>) -> Vec<Alert> {
        let mut alerts = self.inner.lock().history.most_recent(None);
        alerts.reverse();
        match n {
            Some(n) => alerts.into_iter().take(n).collect(),
            None => alerts,
        }
    }

    pub fn clear_history(&self) {
        self.inner.lock().history = RingBuffer::new(DEFAULT_HISTORY_CAPACITY);
    }

    pub fn clear_all(&self) {
        let mut inner = self.inner.lock();
        inner.history = RingBuffer::new(DEFAULT_HISTORY_CAPACITY);
        inner.last_triggered.clear();
    }

    pub fn alert_count(&self) -> usize {
        self.inner.lock().history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::rule::ComparisonOp;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn s4_zscore_stream_respects_cooldown_per_rule() {
        let engine = AlertEngine::with_default_history();
        let stream = [0.0, 1.8, 2.1, 2.5, 2.6, 0.3, -2.4];
        let mut all_alerts = Vec::new();
        for (i, &z) in stream.iter().enumerate() {
            let alerts = engine.check_zscore(z, None, ts(i as i64 * 30));
            all_alerts.extend(alerts);
        }

        let warn_high: Vec<_> = all_alerts.iter().filter(|a| a.rule_name == "zscore_high").collect();
        assert_eq!(warn_high.len(), 1, "z>2 warning should fire once then be suppressed by cooldown");
        assert_eq!(warn_high[0].timestamp, ts(60));

        let crit_high: Vec<_> = all_alerts.iter().filter(|a| a.rule_name == "zscore_critical_high").collect();
        assert!(crit_high.is_empty(), "z>3 critical should never fire");

        let warn_low: Vec<_> = all_alerts.iter().filter(|a| a.rule_name == "zscore_low").collect();
        assert_eq!(warn_low.len(), 1);
        assert_eq!(warn_low[0].timestamp, ts(180));
    }

    #[test]
    fn multiple_rules_fire_independently_for_extreme_value() {
        let engine = AlertEngine::with_default_history();
        let alerts = engine.check_zscore(3.5, None, ts(0));
        let names: Vec<_> = alerts.iter().map(|a| a.rule_name.as_str()).collect();
        assert!(names.contains(&"zscore_high"));
        assert!(names.contains(&"zscore_critical_high"));
    }

    #[test]
    fn cooldown_key_is_scoped_per_symbol() {
        let engine = AlertEngine::with_default_history();
        let a = engine.check_zscore(2.5, Some("BTC"), ts(0));
        let b = engine.check_zscore(2.5, Some("ETH"), ts(0));
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn panicking_subscriber_does_not_prevent_others_from_running() {
        let engine = AlertEngine::with_default_history();
        let count = Arc::new(AtomicUsize::new(0));
        let count2 = count.clone();
        engine.on_alert(move |_| panic!("boom"));
        engine.on_alert(move |_| {
            count2.fetch_add(1, Ordering::SeqCst);
        });
        engine.check_zscore(2.5, None, ts(0));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn custom_rule_with_cooldown_key_suppresses_repeats() {
        let engine = AlertEngine::with_default_history();
        let op = ComparisonOp::GreaterThan;
        let cond = move |v: f64| matches!(op, ComparisonOp::GreaterThan) && v > 1.0;
        let first = engine.check_custom(5.0, &cond, "spike".into(), Severity::Info, Some("BTC"), Some("spike_BTC"), ts(0));
        let second = engine.check_custom(5.0, &cond, "spike".into(), Severity::Info, Some("BTC"), Some("spike_BTC"), ts(1));
        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[test]
    fn clear_all_resets_history_and_cooldowns() {
        let engine = AlertEngine::with_default_history();
        engine.check_zscore(2.5, None, ts(0));
        assert_eq!(engine.alert_count(), 1);
        engine.clear_all();
        assert_eq!(engine.alert_count(), 0);
        let alerts = engine.check_zscore(2.5, None, ts(0));
        assert_eq!(alerts.len(), 1, "cooldown should be cleared too");
    }
}
