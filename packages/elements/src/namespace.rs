//! Namespace: an isolated universe of element classes.
//!
//! A namespace composes the class registry, the detection table, the plugin
//! loader and the refract codec. Namespaces share nothing, so independent
//! vocabularies can coexist in one process.
//!
//! Configuration methods take `&mut self`; conversion only needs `&self`.
//! Configure first, then share the namespace (e.g. behind an `Arc`) for
//! concurrent conversion.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use crate::class::{
    ArrayElement, BooleanElement, ElementClassRef, LinkElement, MemberElement, NullElement,
    NumberElement, ObjectElement, RefElement, StringElement,
};
use crate::codec::{Decoder, WireForm};
use crate::detection::{DetectionRule, DetectionTable};
use crate::element::{Content, Element};
use crate::error::Result;
use crate::plugin::{self, Plugin};
use crate::registry::{ElementRegistry, ElementsView};

/// Options for building a namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NamespaceOptions {
    /// Skip registering the built-in element classes.
    pub no_default: bool,
    /// Default attribute names holding a single refracted element.
    pub attribute_element_keys: Vec<String>,
    /// Default attribute names holding an array of refracted elements.
    pub attribute_element_array_keys: Vec<String>,
}

/// Input accepted by [`Namespace::to_element`].
#[derive(Debug, Clone)]
pub enum ElementInput {
    /// Already an element; passed through unchanged.
    Element(Element),
    /// A native value to classify with the detection rules.
    Value(Value),
}

impl From<Element> for ElementInput {
    fn from(element: Element) -> Self {
        ElementInput::Element(element)
    }
}

impl From<Value> for ElementInput {
    fn from(value: Value) -> Self {
        ElementInput::Value(value)
    }
}

/// Registry of element classes, detection rules and codec defaults.
#[derive(Debug, Clone)]
pub struct Namespace {
    element_map: ElementRegistry,
    element_detection: DetectionTable,
    attribute_element_keys: Vec<String>,
    attribute_element_array_keys: Vec<String>,
}

impl Namespace {
    /// Create a namespace with the built-in element classes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(NamespaceOptions::default())
    }

    /// Create a namespace without any registered classes or detection rules.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_options(NamespaceOptions {
            no_default: true,
            ..NamespaceOptions::default()
        })
    }

    #[must_use]
    pub fn with_options(options: NamespaceOptions) -> Self {
        let mut namespace = Self {
            element_map: ElementRegistry::new(),
            element_detection: DetectionTable::new(),
            attribute_element_keys: options.attribute_element_keys,
            attribute_element_array_keys: options.attribute_element_array_keys,
        };

        if !options.no_default {
            namespace.use_default();
        }

        namespace
    }

    /// Register and detect the built-in element classes.
    ///
    /// Detection rules are appended, so rules added earlier by the caller
    /// keep precedence.
    pub fn use_default(&mut self) -> &mut Self {
        let null: ElementClassRef = Arc::new(NullElement);
        let string: ElementClassRef = Arc::new(StringElement);
        let number: ElementClassRef = Arc::new(NumberElement);
        let boolean: ElementClassRef = Arc::new(BooleanElement);
        let array: ElementClassRef = Arc::new(ArrayElement);
        let object: ElementClassRef = Arc::new(ObjectElement);

        for class in [&null, &string, &number, &boolean, &array, &object] {
            self.register(class.element_name().to_string(), Arc::clone(class));
        }
        for class in [
            Arc::new(MemberElement) as ElementClassRef,
            Arc::new(RefElement) as ElementClassRef,
            Arc::new(LinkElement) as ElementClassRef,
        ] {
            self.register(class.element_name().to_string(), class);
        }

        self.detect_append(Value::is_null, null)
            .detect_append(Value::is_string, string)
            .detect_append(Value::is_number, number)
            .detect_append(Value::is_boolean, boolean)
            .detect_append(Value::is_array, array)
            .detect_append(Value::is_object, object)
    }

    /// Run a plugin against this namespace.
    ///
    /// The plugin's `namespace` hook is preferred over its `load` hook. A
    /// plugin providing neither is ignored.
    pub fn use_plugin(&mut self, plugin: &(impl Plugin + ?Sized)) -> &mut Self {
        plugin::apply(plugin, self);
        self
    }

    /// Register a class under a name, replacing any existing registration.
    pub fn register(&mut self, name: impl Into<String>, class: ElementClassRef) -> &mut Self {
        let name = name.into();
        tracing::debug!(element = %name, class = %class.element_name(), "Registering element class");
        self.element_map.register(name, class);
        self
    }

    /// Remove a registration. Unknown names are ignored.
    pub fn unregister(&mut self, name: &str) -> &mut Self {
        if self.element_map.unregister(name) {
            tracing::debug!(element = %name, "Unregistered element class");
        }
        self
    }

    /// Get the class registered for `name`, or the base element class.
    #[must_use]
    pub fn get_element_class(&self, name: &str) -> ElementClassRef {
        self.element_map.get(name)
    }

    #[must_use]
    pub fn has_element(&self, name: &str) -> bool {
        self.element_map.contains(name)
    }

    /// The fallback class used for unknown element names.
    #[must_use]
    pub fn base_element(&self) -> ElementClassRef {
        Arc::clone(self.element_map.base())
    }

    /// Registered classes in registration order.
    #[must_use]
    pub fn element_map(&self) -> &ElementRegistry {
        &self.element_map
    }

    /// Classes keyed by pascal-cased name, `BaseElement` first.
    ///
    /// Computed on every call; the result does not track later changes.
    #[must_use]
    pub fn elements(&self) -> ElementsView {
        self.element_map.elements()
    }

    /// Add a detection rule checked before all existing rules.
    pub fn detect(
        &mut self,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
        class: ElementClassRef,
    ) -> &mut Self {
        tracing::debug!(class = %class.element_name(), position = "front", "Adding detection rule");
        self.element_detection
            .prepend(DetectionRule::new(predicate, class));
        self
    }

    /// Add a detection rule checked after all existing rules.
    pub fn detect_append(
        &mut self,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
        class: ElementClassRef,
    ) -> &mut Self {
        tracing::debug!(class = %class.element_name(), position = "back", "Adding detection rule");
        self.element_detection
            .append(DetectionRule::new(predicate, class));
        self
    }

    /// Detection rules in the order they are checked.
    #[must_use]
    pub fn detection_rules(&self) -> &[DetectionRule] {
        self.element_detection.rules()
    }

    /// Remove all detection rules.
    pub fn clear_detection(&mut self) -> &mut Self {
        self.element_detection.clear();
        self
    }

    /// Default attribute names refracted as single elements.
    #[must_use]
    pub fn attribute_element_keys(&self) -> &[String] {
        &self.attribute_element_keys
    }

    pub fn attribute_element_keys_mut(&mut self) -> &mut Vec<String> {
        &mut self.attribute_element_keys
    }

    /// Default attribute names refracted as arrays of elements.
    #[must_use]
    pub fn attribute_element_array_keys(&self) -> &[String] {
        &self.attribute_element_array_keys
    }

    pub fn attribute_element_array_keys_mut(&mut self) -> &mut Vec<String> {
        &mut self.attribute_element_array_keys
    }

    /// Create an element of `class` holding `content`.
    ///
    /// The element receives copies of this namespace's default attribute
    /// keys followed by the class's own keys.
    #[must_use]
    pub fn create(&self, class: &ElementClassRef, content: Content) -> Element {
        let mut keys = self.attribute_element_keys.clone();
        extend_unique(&mut keys, class.attribute_element_keys());

        let mut array_keys = self.attribute_element_array_keys.clone();
        extend_unique(&mut array_keys, class.attribute_element_array_keys());

        Element::new(Arc::clone(class), content, keys, array_keys)
    }

    /// Convert a value into an element.
    ///
    /// Elements are returned unchanged. Native values are classified by the
    /// first matching detection rule, or become a base element when no rule
    /// matches.
    ///
    /// # Errors
    /// Returns `ContentMismatch` if the detected class cannot hold the value.
    pub fn to_element(&self, input: impl Into<ElementInput>) -> Result<Element> {
        let value = match input.into() {
            ElementInput::Element(element) => return Ok(element),
            ElementInput::Value(value) => value,
        };

        let class = match self.element_detection.detect(&value) {
            Some(class) => Arc::clone(class),
            None => {
                tracing::trace!("No detection rule matched, using base element");
                self.base_element()
            }
        };

        let content = class.content_from_value(value, self)?;
        Ok(self.create(&class, content))
    }

    /// Decode a full-form refract value.
    ///
    /// # Errors
    /// Returns an error if the value is structurally malformed.
    pub fn from_refract(&self, wire: &Value) -> Result<Element> {
        self.decode(wire, WireForm::Full)
    }

    /// Decode a compact-form refract value.
    ///
    /// # Errors
    /// Returns an error if the value is structurally malformed.
    pub fn from_compact_refract(&self, wire: &Value) -> Result<Element> {
        self.decode(wire, WireForm::Compact)
    }

    /// Decode a refract value in the given wire form.
    ///
    /// # Errors
    /// Returns an error if the value is structurally malformed.
    pub fn decode(&self, wire: &Value, form: WireForm) -> Result<Element> {
        Decoder::new(self, form).decode(wire)
    }

    /// Parse and decode a full-form refract JSON document.
    ///
    /// # Errors
    /// Returns an error if the JSON is invalid or the value is malformed.
    pub fn from_refract_json(&self, json: &str) -> Result<Element> {
        let wire: Value = serde_json::from_str(json)?;
        self.from_refract(&wire)
    }

    /// Parse and decode a compact-form refract JSON document.
    ///
    /// # Errors
    /// Returns an error if the JSON is invalid or the value is malformed.
    pub fn from_compact_refract_json(&self, json: &str) -> Result<Element> {
        let wire: Value = serde_json::from_str(json)?;
        self.from_compact_refract(&wire)
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

fn extend_unique(keys: &mut Vec<String>, extra: &[&str]) {
    for key in extra {
        if !keys.iter().any(|existing| existing == key) {
            keys.push((*key).to_string());
        }
    }
}
