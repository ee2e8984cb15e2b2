//! Element class registry mapping wire names to classes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::class::{BaseElement, ElementClassRef};
use crate::config::BASE_ELEMENT_DISPLAY_NAME;

/// Registry mapping element names to classes.
///
/// Names keep the position of their first registration; re-registering a
/// name replaces its class in place. Lookups of unknown names fall back to
/// the base element class and never fail.
#[derive(Debug, Clone)]
pub struct ElementRegistry {
    classes: HashMap<String, ElementClassRef>,
    order: Vec<String>,
    base: ElementClassRef,
}

impl ElementRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
            order: Vec::new(),
            base: Arc::new(BaseElement),
        }
    }

    /// Register a class under a name. Last registration wins.
    pub fn register(&mut self, name: impl Into<String>, class: ElementClassRef) {
        let name = name.into();
        if self.classes.insert(name.clone(), class).is_none() {
            self.order.push(name);
        }
    }

    /// Remove a name. Absent names are ignored.
    ///
    /// Returns whether the name was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        if self.classes.remove(name).is_some() {
            self.order.retain(|registered| registered != name);
            true
        } else {
            false
        }
    }

    /// Get the class registered for a name, or the base element class.
    #[must_use]
    pub fn get(&self, name: &str) -> ElementClassRef {
        self.classes
            .get(name)
            .map_or_else(|| Arc::clone(&self.base), Arc::clone)
    }

    /// Check if a class is registered for a name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// The fallback class for unknown names.
    #[must_use]
    pub fn base(&self) -> &ElementClassRef {
        &self.base
    }

    /// Registered `(name, class)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElementClassRef)> {
        self.order
            .iter()
            .filter_map(|name| self.classes.get(name).map(|class| (name.as_str(), class)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Build the display-name view: the base class first, then every
    /// registered class under its pascal-cased name.
    ///
    /// A registered name whose display name collides with the base entry
    /// is left out; `BaseElement` always maps to the fallback class.
    #[must_use]
    pub fn elements(&self) -> ElementsView {
        let mut view = ElementsView::default();
        view.insert(BASE_ELEMENT_DISPLAY_NAME.to_string(), Arc::clone(&self.base));
        for (name, class) in self.iter() {
            let display = pascal_case(name);
            if display == BASE_ELEMENT_DISPLAY_NAME {
                tracing::debug!(element = %name, "Display name shadows the base element, skipping");
                continue;
            }
            view.insert(display, Arc::clone(class));
        }
        view
    }
}

impl Default for ElementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only snapshot of a registry keyed by display name.
///
/// Changes to the registry after the snapshot was taken are not reflected.
#[derive(Debug, Clone, Default)]
pub struct ElementsView {
    entries: Vec<(String, ElementClassRef)>,
}

impl ElementsView {
    fn insert(&mut self, name: String, class: ElementClassRef) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = class,
            None => self.entries.push((name, class)),
        }
    }

    /// Get the class for a display name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ElementClassRef> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, class)| class)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Display names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Classes in order.
    pub fn values(&self) -> impl Iterator<Item = &ElementClassRef> {
        self.entries.iter().map(|(_, class)| class)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ElementClassRef)> {
        self.entries.iter().map(|(name, class)| (name.as_str(), class))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Upper-case the first character of a name.
fn pascal_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{same_class, ArrayElement, StringElement};

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = ElementRegistry::new();
        let string: ElementClassRef = Arc::new(StringElement);
        registry.register("string", Arc::clone(&string));

        assert!(registry.contains("string"));
        assert!(same_class(&registry.get("string"), &string));
    }

    #[test]
    fn test_registry_unknown_falls_back_to_base() {
        let registry = ElementRegistry::new();
        assert!(!registry.contains("missing"));
        assert!(same_class(&registry.get("missing"), registry.base()));
    }

    #[test]
    fn test_registry_last_write_wins_keeps_position() {
        let mut registry = ElementRegistry::new();
        let string: ElementClassRef = Arc::new(StringElement);
        let array: ElementClassRef = Arc::new(ArrayElement);
        registry.register("a", Arc::clone(&string));
        registry.register("b", Arc::clone(&string));
        registry.register("a", Arc::clone(&array));

        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(same_class(&registry.get("a"), &array));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registry_unregister_absent_is_noop() {
        let mut registry = ElementRegistry::new();
        assert!(!registry.unregister("missing"));

        registry.register("string", Arc::new(StringElement));
        assert!(registry.unregister("string"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_elements_view_starts_with_base() {
        let mut registry = ElementRegistry::new();
        registry.register("string", Arc::new(StringElement));
        registry.register("array", Arc::new(ArrayElement));

        let view = registry.elements();
        let keys: Vec<&str> = view.keys().collect();
        assert_eq!(keys, vec!["BaseElement", "String", "Array"]);
        assert!(same_class(
            view.get("BaseElement").unwrap(),
            registry.base()
        ));
    }

    #[test]
    fn test_elements_view_keeps_base_for_colliding_name() {
        let mut registry = ElementRegistry::new();
        registry.register("baseElement", Arc::new(StringElement));

        let view = registry.elements();
        assert_eq!(view.len(), 1);
        assert!(same_class(view.get("BaseElement").unwrap(), registry.base()));
        assert!(registry.contains("baseElement"));
    }

    #[test]
    fn test_elements_view_is_a_snapshot() {
        let mut registry = ElementRegistry::new();
        let view = registry.elements();
        registry.register("string", Arc::new(StringElement));

        assert_eq!(view.len(), 1);
        assert_eq!(registry.elements().len(), 2);
    }

    #[test]
    fn test_pascal_case() {
        assert_eq!(pascal_case("string"), "String");
        assert_eq!(pascal_case("Ref"), "Ref");
        assert_eq!(pascal_case("élan"), "Élan");
        assert_eq!(pascal_case(""), "");
    }
}
