//! Element class contract and built-in classes.
//!
//! An element class describes one kind of element: its default wire name,
//! what shape its content takes, and how native values become content.
//! Classes are shared as [`ElementClassRef`] and compared by identity.

pub mod builtin;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::{content_to_value, Content, KeyValue};
use crate::error::{json_kind, RefractError, Result};
use crate::namespace::Namespace;

pub use builtin::{
    ArrayElement, BaseElement, BooleanElement, LinkElement, MemberElement, NullElement,
    NumberElement, ObjectElement, RefElement, StringElement,
};

/// Shared handle to an element class.
pub type ElementClassRef = Arc<dyn ElementClass>;

/// How an element class stores its content.
///
/// The codec dispatches on this tag to decide whether content is recursed
/// into or copied verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentShape {
    /// Primitive JSON content (strings, numbers, booleans, null).
    Opaque,
    /// A single nested element.
    Element,
    /// An ordered sequence of nested elements.
    Elements,
    /// A key/value pair of elements.
    Pair,
    /// Whatever the wire holds: nested wire values are decoded, anything
    /// else is kept verbatim.
    Any,
}

impl fmt::Display for ContentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            ContentShape::Opaque => "primitive content",
            ContentShape::Element => "a nested element",
            ContentShape::Elements => "an array of elements",
            ContentShape::Pair => "a key/value pair",
            ContentShape::Any => "any content",
        };
        f.write_str(description)
    }
}

/// Trait for element classes.
///
/// Implementors describe a type of element; instances are always built
/// through [`Namespace::create`] so the namespace's attribute defaults are
/// copied onto them.
pub trait ElementClass: fmt::Debug + Send + Sync {
    /// Default wire name for elements of this class.
    fn element_name(&self) -> &str;

    /// Shape of this class's content.
    fn content_shape(&self) -> ContentShape {
        ContentShape::Opaque
    }

    /// Content of a freshly created element with nothing set.
    fn empty_content(&self) -> Content {
        match self.content_shape() {
            ContentShape::Opaque | ContentShape::Element | ContentShape::Any => {
                Content::Value(Value::Null)
            }
            ContentShape::Elements => Content::Elements(Vec::new()),
            ContentShape::Pair => Content::Pair(Box::default()),
        }
    }

    /// Check whether a JSON value is acceptable opaque content.
    ///
    /// Consulted for [`ContentShape::Opaque`] classes, and for native values
    /// given to [`ContentShape::Any`] classes. Default accepts any
    /// non-collection value.
    fn accepts(&self, value: &Value) -> bool {
        !value.is_array() && !value.is_object()
    }

    /// Convert a native value into content for this class.
    ///
    /// Nested native values are turned into elements via
    /// [`Namespace::to_element`].
    ///
    /// # Errors
    /// Returns `ContentMismatch` if the value cannot be content of this class.
    fn content_from_value(&self, value: Value, namespace: &Namespace) -> Result<Content> {
        let mismatch = |value: &Value| RefractError::ContentMismatch {
            element: self.element_name().to_string(),
            expected: self.content_shape(),
            found: json_kind(value),
        };

        match self.content_shape() {
            ContentShape::Opaque | ContentShape::Any => {
                if self.accepts(&value) {
                    Ok(Content::Value(value))
                } else {
                    Err(mismatch(&value))
                }
            }
            ContentShape::Element => {
                if value.is_null() {
                    return Ok(Content::Value(Value::Null));
                }
                let nested = namespace.to_element(value)?;
                Ok(Content::Element(Box::new(nested)))
            }
            ContentShape::Elements => match value {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| namespace.to_element(item))
                    .collect::<Result<Vec<_>>>()
                    .map(Content::Elements),
                other => Err(mismatch(&other)),
            },
            ContentShape::Pair => match value {
                Value::Object(mut fields) => {
                    let key = fields
                        .remove("key")
                        .map(|key| namespace.to_element(key))
                        .transpose()?;
                    let value = fields
                        .remove("value")
                        .map(|value| namespace.to_element(value))
                        .transpose()?;
                    if let Some((field, extra)) = fields.iter().next() {
                        return Err(RefractError::InvalidField {
                            element: self.element_name().to_string(),
                            field: format!("content.{field}"),
                            expected: "only 'key' and 'value'",
                            found: json_kind(extra),
                        });
                    }
                    Ok(Content::Pair(Box::new(KeyValue { key, value })))
                }
                other => Err(mismatch(&other)),
            },
        }
    }

    /// Convert content of this class back into a native value.
    fn content_to_value(&self, content: &Content) -> Value {
        content_to_value(content)
    }

    /// Class-specific attribute names holding a single refracted element.
    fn attribute_element_keys(&self) -> &[&str] {
        &[]
    }

    /// Class-specific attribute names holding an array of refracted elements.
    fn attribute_element_array_keys(&self) -> &[&str] {
        &[]
    }
}

/// Check whether two class handles refer to the same class instance.
#[must_use]
pub fn same_class(a: &ElementClassRef, b: &ElementClassRef) -> bool {
    Arc::ptr_eq(a, b)
}
