//! Element instances and their refract encoding.
//!
//! An [`Element`] is a typed node: a wire name, meta, attributes and
//! content, plus a handle to the class that produced it. Elements are
//! created through [`crate::Namespace`] and encode themselves into both
//! refract forms without needing the namespace again.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::class::ElementClassRef;
use crate::codec::WireForm;

/// Attributes of an element, keyed by name.
pub type Attributes = BTreeMap<String, AttributeValue>;

/// Key/value content of a member element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValue {
    pub key: Option<Element>,
    pub value: Option<Element>,
}

/// Content of an element, one variant per [`crate::ContentShape`].
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Primitive content, encoded verbatim.
    Value(Value),
    /// A single nested element.
    Element(Box<Element>),
    /// An ordered sequence of nested elements.
    Elements(Vec<Element>),
    /// A key/value pair of elements.
    Pair(Box<KeyValue>),
}

impl From<Value> for Content {
    fn from(value: Value) -> Self {
        Content::Value(value)
    }
}

impl From<Element> for Content {
    fn from(element: Element) -> Self {
        Content::Element(Box::new(element))
    }
}

impl From<Vec<Element>> for Content {
    fn from(elements: Vec<Element>) -> Self {
        Content::Elements(elements)
    }
}

impl From<KeyValue> for Content {
    fn from(pair: KeyValue) -> Self {
        Content::Pair(Box::new(pair))
    }
}

/// Value of a single attribute.
///
/// Attributes named in an element's attribute element keys hold refracted
/// elements; everything else is an opaque JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Value(Value),
    Element(Element),
    Elements(Vec<Element>),
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        AttributeValue::Value(value)
    }
}

impl From<Element> for AttributeValue {
    fn from(element: Element) -> Self {
        AttributeValue::Element(element)
    }
}

impl From<Vec<Element>> for AttributeValue {
    fn from(elements: Vec<Element>) -> Self {
        AttributeValue::Elements(elements)
    }
}

/// A typed node in the element tree.
#[derive(Clone)]
pub struct Element {
    element: String,
    class: ElementClassRef,
    meta: Map<String, Value>,
    attributes: Attributes,
    content: Content,
    attribute_element_keys: Vec<String>,
    attribute_element_array_keys: Vec<String>,
}

impl Element {
    /// Create an element of `class` with the given attribute-shape keys.
    ///
    /// Only the namespace builds elements, so the keys always reflect its
    /// defaults at creation time.
    pub(crate) fn new(
        class: ElementClassRef,
        content: Content,
        attribute_element_keys: Vec<String>,
        attribute_element_array_keys: Vec<String>,
    ) -> Self {
        Self {
            element: class.element_name().to_string(),
            class,
            meta: Map::new(),
            attributes: Attributes::new(),
            content,
            attribute_element_keys,
            attribute_element_array_keys,
        }
    }

    /// Wire name of this element.
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Set the wire name (e.g. when a class is registered under another name).
    pub fn set_element(&mut self, name: impl Into<String>) {
        self.element = name.into();
    }

    /// Class this element was created from.
    #[must_use]
    pub fn class(&self) -> &ElementClassRef {
        &self.class
    }

    #[must_use]
    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.meta
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Get a single attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Set an attribute, returning the previous value if any.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.attributes.insert(name.into(), value.into())
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Content {
        &mut self.content
    }

    pub fn set_content(&mut self, content: impl Into<Content>) {
        self.content = content.into();
    }

    /// Take ownership of the content.
    #[must_use]
    pub fn into_content(self) -> Content {
        self.content
    }

    /// Attribute names refracted as single elements for this instance.
    #[must_use]
    pub fn attribute_element_keys(&self) -> &[String] {
        &self.attribute_element_keys
    }

    /// Attribute names refracted as arrays of elements for this instance.
    #[must_use]
    pub fn attribute_element_array_keys(&self) -> &[String] {
        &self.attribute_element_array_keys
    }

    pub fn attribute_element_keys_mut(&mut self) -> &mut Vec<String> {
        &mut self.attribute_element_keys
    }

    pub fn attribute_element_array_keys_mut(&mut self) -> &mut Vec<String> {
        &mut self.attribute_element_array_keys
    }

    /// Nested elements held directly in content.
    #[must_use]
    pub fn children(&self) -> Vec<&Element> {
        match &self.content {
            Content::Value(_) => Vec::new(),
            Content::Element(element) => vec![element.as_ref()],
            Content::Elements(elements) => elements.iter().collect(),
            Content::Pair(pair) => pair.key.iter().chain(pair.value.iter()).collect(),
        }
    }

    /// Convert this element tree into a native JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        self.class.content_to_value(&self.content)
    }

    /// Encode as a full refract object `{element, meta, attributes, content}`.
    #[must_use]
    pub fn to_refract(&self) -> Value {
        self.encode(WireForm::Full)
    }

    /// Encode as a compact refract array `[element, meta, attributes, content]`.
    #[must_use]
    pub fn to_compact_refract(&self) -> Value {
        self.encode(WireForm::Compact)
    }

    /// Encode in the given wire form.
    #[must_use]
    pub fn encode(&self, form: WireForm) -> Value {
        let element = Value::String(self.element.clone());
        let meta = Value::Object(self.meta.clone());
        let attributes = self.attributes_to_wire(form);
        let content = content_to_wire(&self.content, form);

        match form {
            WireForm::Full => json!({
                "element": element,
                "meta": meta,
                "attributes": attributes,
                "content": content,
            }),
            WireForm::Compact => Value::Array(vec![element, meta, attributes, content]),
        }
    }

    fn attributes_to_wire(&self, form: WireForm) -> Value {
        let attributes = self
            .attributes
            .iter()
            .map(|(name, value)| {
                let wire = match value {
                    AttributeValue::Value(value) => value.clone(),
                    AttributeValue::Element(element) => element.encode(form),
                    AttributeValue::Elements(elements) => elements_to_wire(elements, form),
                };
                (name.clone(), wire)
            })
            .collect();
        Value::Object(attributes)
    }
}

fn elements_to_wire(elements: &[Element], form: WireForm) -> Value {
    Value::Array(elements.iter().map(|element| element.encode(form)).collect())
}

fn content_to_wire(content: &Content, form: WireForm) -> Value {
    match content {
        Content::Value(value) => value.clone(),
        Content::Element(element) => element.encode(form),
        Content::Elements(elements) => elements_to_wire(elements, form),
        Content::Pair(pair) => {
            let mut fields = Map::new();
            if let Some(key) = &pair.key {
                fields.insert("key".to_string(), key.encode(form));
            }
            if let Some(value) = &pair.value {
                fields.insert("value".to_string(), value.encode(form));
            }
            Value::Object(fields)
        }
    }
}

/// Generic native conversion of content, used by classes without their own.
#[must_use]
pub fn content_to_value(content: &Content) -> Value {
    match content {
        Content::Value(value) => value.clone(),
        Content::Element(element) => element.to_value(),
        Content::Elements(elements) => {
            Value::Array(elements.iter().map(Element::to_value).collect())
        }
        Content::Pair(pair) => json!({
            "key": pair.key.as_ref().map_or(Value::Null, Element::to_value),
            "value": pair.value.as_ref().map_or(Value::Null, Element::to_value),
        }),
    }
}

/// Structural equality: name, meta, attributes and content.
///
/// Class identity and the attribute-shape key lists are not compared.
impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
            && self.meta == other.meta
            && self.attributes == other.attributes
            && self.content == other.content
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("element", &self.element)
            .field("class", &self.class.element_name())
            .field("meta", &self.meta)
            .field("attributes", &self.attributes)
            .field("content", &self.content)
            .finish()
    }
}

/// Serializes as the full refract form.
impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_refract().serialize(serializer)
    }
}
