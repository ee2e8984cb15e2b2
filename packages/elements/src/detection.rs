//! Ordered detection rules for classifying native values.
//!
//! Rules are checked front to back; the first predicate that matches picks
//! the element class.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::class::ElementClassRef;

/// Predicate deciding whether a native value belongs to a class.
pub type DetectionPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A single (predicate, class) pair.
#[derive(Clone)]
pub struct DetectionRule {
    predicate: DetectionPredicate,
    class: ElementClassRef,
}

impl DetectionRule {
    pub fn new(
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
        class: ElementClassRef,
    ) -> Self {
        Self {
            predicate: Arc::new(predicate),
            class,
        }
    }

    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    #[must_use]
    pub fn class(&self) -> &ElementClassRef {
        &self.class
    }
}

impl fmt::Debug for DetectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectionRule")
            .field("class", &self.class.element_name())
            .finish_non_exhaustive()
    }
}

/// Ordered list of detection rules.
#[derive(Debug, Clone, Default)]
pub struct DetectionTable {
    rules: Vec<DetectionRule>,
}

impl DetectionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule so it is checked before all existing rules.
    pub fn prepend(&mut self, rule: DetectionRule) {
        self.rules.insert(0, rule);
    }

    /// Add a rule so it is checked after all existing rules.
    pub fn append(&mut self, rule: DetectionRule) {
        self.rules.push(rule);
    }

    /// Find the class of the first rule matching `value`.
    #[must_use]
    pub fn detect(&self, value: &Value) -> Option<&ElementClassRef> {
        self.rules
            .iter()
            .find(|rule| rule.matches(value))
            .map(DetectionRule::class)
    }

    #[must_use]
    pub fn rules(&self) -> &[DetectionRule] {
        &self.rules
    }

    pub fn clear(&mut self) {
        self.rules.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
