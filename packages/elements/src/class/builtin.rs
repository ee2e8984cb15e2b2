//! Built-in element classes.

use serde_json::{Map, Value};

use super::{ContentShape, ElementClass};
use crate::config::BASE_ELEMENT_NAME;
use crate::element::{Content, KeyValue};
use crate::error::{json_kind, RefractError, Result};
use crate::namespace::Namespace;

/// Wire name of the member element, used by [`ObjectElement`] for its entries.
pub const MEMBER_ELEMENT_NAME: &str = "member";

/// Fallback class for element names a namespace does not know.
///
/// Nested wire values in its content are decoded like any other element;
/// other content is kept verbatim, so unknown elements round-trip in both
/// wire forms.
#[derive(Debug, Default)]
pub struct BaseElement;

impl ElementClass for BaseElement {
    fn element_name(&self) -> &str {
        BASE_ELEMENT_NAME
    }

    fn content_shape(&self) -> ContentShape {
        ContentShape::Any
    }

    fn accepts(&self, _value: &Value) -> bool {
        true
    }
}

/// Null element.
#[derive(Debug, Default)]
pub struct NullElement;

impl ElementClass for NullElement {
    fn element_name(&self) -> &str {
        "null"
    }

    fn accepts(&self, value: &Value) -> bool {
        value.is_null()
    }
}

/// String element.
#[derive(Debug, Default)]
pub struct StringElement;

impl ElementClass for StringElement {
    fn element_name(&self) -> &str {
        "string"
    }

    fn empty_content(&self) -> Content {
        Content::Value(Value::String(String::new()))
    }

    fn accepts(&self, value: &Value) -> bool {
        value.is_string() || value.is_null()
    }
}

/// Number element.
#[derive(Debug, Default)]
pub struct NumberElement;

impl ElementClass for NumberElement {
    fn element_name(&self) -> &str {
        "number"
    }

    fn empty_content(&self) -> Content {
        Content::Value(Value::from(0))
    }

    fn accepts(&self, value: &Value) -> bool {
        value.is_number() || value.is_null()
    }
}

/// Boolean element.
#[derive(Debug, Default)]
pub struct BooleanElement;

impl ElementClass for BooleanElement {
    fn element_name(&self) -> &str {
        "boolean"
    }

    fn empty_content(&self) -> Content {
        Content::Value(Value::Bool(false))
    }

    fn accepts(&self, value: &Value) -> bool {
        value.is_boolean() || value.is_null()
    }
}

/// Array element: an ordered sequence of elements.
#[derive(Debug, Default)]
pub struct ArrayElement;

impl ElementClass for ArrayElement {
    fn element_name(&self) -> &str {
        "array"
    }

    fn content_shape(&self) -> ContentShape {
        ContentShape::Elements
    }
}

/// Object element: an ordered sequence of member elements.
#[derive(Debug, Default)]
pub struct ObjectElement;

impl ElementClass for ObjectElement {
    fn element_name(&self) -> &str {
        "object"
    }

    fn content_shape(&self) -> ContentShape {
        ContentShape::Elements
    }

    /// Native objects become one member per entry, keyed by a string element.
    fn content_from_value(&self, value: Value, namespace: &Namespace) -> Result<Content> {
        let fields = match value {
            Value::Object(fields) => fields,
            Value::Array(items) => {
                // Already a list of members (or other elements).
                return items
                    .into_iter()
                    .map(|item| namespace.to_element(item))
                    .collect::<Result<Vec<_>>>()
                    .map(Content::Elements);
            }
            other => {
                return Err(RefractError::ContentMismatch {
                    element: self.element_name().to_string(),
                    expected: self.content_shape(),
                    found: json_kind(&other),
                })
            }
        };

        let member_class = namespace.get_element_class(MEMBER_ELEMENT_NAME);
        let mut members = Vec::with_capacity(fields.len());
        for (key, value) in fields {
            let pair = KeyValue {
                key: Some(namespace.to_element(Value::String(key))?),
                value: Some(namespace.to_element(value)?),
            };
            let mut member = namespace.create(&member_class, Content::Pair(Box::new(pair)));
            member.set_element(MEMBER_ELEMENT_NAME);
            members.push(member);
        }
        Ok(Content::Elements(members))
    }

    fn content_to_value(&self, content: &Content) -> Value {
        let Content::Elements(members) = content else {
            return crate::element::content_to_value(content);
        };

        let mut object = Map::new();
        for member in members {
            if let Content::Pair(pair) = member.content() {
                let key = match pair.key.as_ref().map(|key| key.to_value()) {
                    Some(Value::String(key)) => key,
                    Some(other) => other.to_string(),
                    None => continue,
                };
                let value = pair
                    .value
                    .as_ref()
                    .map_or(Value::Null, |value| value.to_value());
                object.insert(key, value);
            }
        }
        Value::Object(object)
    }
}

/// Member element: a key/value pair, the entries of an object.
#[derive(Debug, Default)]
pub struct MemberElement;

impl ElementClass for MemberElement {
    fn element_name(&self) -> &str {
        MEMBER_ELEMENT_NAME
    }

    fn content_shape(&self) -> ContentShape {
        ContentShape::Pair
    }
}

/// Ref element: content is the id of the referenced element.
#[derive(Debug, Default)]
pub struct RefElement;

impl ElementClass for RefElement {
    fn element_name(&self) -> &str {
        "ref"
    }

    fn empty_content(&self) -> Content {
        Content::Value(Value::String(String::new()))
    }

    fn accepts(&self, value: &Value) -> bool {
        value.is_string() || value.is_null()
    }
}

/// Link element: carries `relation` and `href` as plain attributes.
#[derive(Debug, Default)]
pub struct LinkElement;

impl ElementClass for LinkElement {
    fn element_name(&self) -> &str {
        "link"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_accepts() {
        assert!(StringElement.accepts(&json!("a")));
        assert!(!StringElement.accepts(&json!(1)));
        assert!(NumberElement.accepts(&json!(1.5)));
        assert!(!NumberElement.accepts(&json!("1")));
        assert!(BooleanElement.accepts(&json!(true)));
        assert!(NullElement.accepts(&json!(null)));
        assert!(!NullElement.accepts(&json!(false)));
    }

    #[test]
    fn test_base_element_accepts_anything() {
        assert!(BaseElement.accepts(&json!([1, {"a": 2}])));
        assert!(BaseElement.accepts(&json!({"nested": true})));
    }

    #[test]
    fn test_empty_contents() {
        assert_eq!(StringElement.empty_content(), Content::Value(json!("")));
        assert_eq!(NumberElement.empty_content(), Content::Value(json!(0)));
        assert_eq!(BooleanElement.empty_content(), Content::Value(json!(false)));
        assert_eq!(ArrayElement.empty_content(), Content::Elements(Vec::new()));
        assert_eq!(
            MemberElement.empty_content(),
            Content::Pair(Box::default())
        );
    }

    #[test]
    fn test_object_from_native_value() {
        let namespace = Namespace::new();
        let content = ObjectElement
            .content_from_value(json!({"name": "doc", "count": 2}), &namespace)
            .unwrap();

        let Content::Elements(members) = &content else {
            unreachable!("object content is a list of members");
        };
        assert_eq!(members.len(), 2);
        assert!(members.iter().all(|m| m.element() == "member"));
        assert_eq!(
            ObjectElement.content_to_value(&content),
            json!({"name": "doc", "count": 2})
        );
    }

    #[test]
    fn test_object_rejects_scalar() {
        let namespace = Namespace::new();
        let err = ObjectElement
            .content_from_value(json!("nope"), &namespace)
            .unwrap_err();
        assert!(matches!(err, RefractError::ContentMismatch { found: "string", .. }));
    }

    #[test]
    fn test_base_element_content_shape() {
        assert_eq!(BaseElement.content_shape(), ContentShape::Any);
        let namespace = Namespace::empty();
        let content = BaseElement
            .content_from_value(json!({"kept": [1, 2]}), &namespace)
            .unwrap();
        assert_eq!(content, Content::Value(json!({"kept": [1, 2]})));
    }

    #[test]
    fn test_member_from_native_rejects_extra_fields() {
        let namespace = Namespace::new();
        let err = MemberElement
            .content_from_value(json!({"key": "k", "value": 1, "extra": true}), &namespace)
            .unwrap_err();
        assert!(
            matches!(err, RefractError::InvalidField { ref field, found: "boolean", .. } if field == "content.extra")
        );
    }
}
