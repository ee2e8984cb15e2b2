//! Refract decoder that rebuilds element trees using a namespace.
//!
//! The decoder walks a wire value and dispatches every node to the class
//! registered for its `element` name. Unknown names resolve to the
//! namespace's fallback class so unfamiliar documents still decode.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::class::{ContentShape, ElementClassRef};
use crate::config::MAX_REFRACT_DEPTH;
use crate::element::{AttributeValue, Content, Element, KeyValue};
use crate::error::{json_kind, RefractError, Result};
use crate::namespace::Namespace;

/// Refract wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireForm {
    /// `{ "element": .., "meta": .., "attributes": .., "content": .. }`
    Full,
    /// `[element, meta, attributes, content]`
    Compact,
}

/// Fields of a wire value, borrowed from the input.
struct WireParts<'a> {
    element: &'a str,
    meta: Option<&'a Value>,
    attributes: Option<&'a Value>,
    content: Option<&'a Value>,
}

/// Decoder for one wire form, bound to a namespace.
pub(crate) struct Decoder<'ns> {
    namespace: &'ns Namespace,
    form: WireForm,
}

impl<'ns> Decoder<'ns> {
    #[must_use]
    pub(crate) fn new(namespace: &'ns Namespace, form: WireForm) -> Self {
        Self { namespace, form }
    }

    /// Decode a wire value into an element tree.
    ///
    /// # Errors
    /// Returns an error if the value (or any nested value) is structurally
    /// malformed, or if nesting exceeds [`MAX_REFRACT_DEPTH`].
    pub(crate) fn decode(&self, wire: &Value) -> Result<Element> {
        self.decode_at(wire, 0)
    }

    fn decode_at(&self, wire: &Value, depth: usize) -> Result<Element> {
        if depth > MAX_REFRACT_DEPTH {
            return Err(RefractError::DepthLimitExceeded(MAX_REFRACT_DEPTH));
        }

        let parts = self.split(wire)?;
        tracing::trace!(element = %parts.element, form = ?self.form, depth, "Decoding element");

        let class = self.resolve(parts.element);
        let mut element = self.namespace.create(&class, class.empty_content());
        element.set_element(parts.element);

        if let Some(meta) = object_field(parts.meta, "meta", parts.element)? {
            *element.meta_mut() = meta.clone();
        }

        if let Some(attributes) = object_field(parts.attributes, "attributes", parts.element)? {
            let decoded = self.decode_attributes(&element, attributes, depth)?;
            *element.attributes_mut() = decoded;
        }

        if let Some(content) = parts.content {
            let decoded = self.decode_content(&class, parts.element, content, depth)?;
            element.set_content(decoded);
        }

        Ok(element)
    }

    fn split<'a>(&self, wire: &'a Value) -> Result<WireParts<'a>> {
        match self.form {
            WireForm::Full => {
                let fields = wire
                    .as_object()
                    .ok_or_else(|| RefractError::NotAnObject(json_kind(wire)))?;
                let element = match fields.get("element") {
                    Some(Value::String(name)) => name.as_str(),
                    Some(other) => return Err(RefractError::InvalidElementName(json_kind(other))),
                    None => return Err(RefractError::MissingElementName),
                };
                Ok(WireParts {
                    element,
                    meta: fields.get("meta"),
                    attributes: fields.get("attributes"),
                    content: fields.get("content"),
                })
            }
            WireForm::Compact => {
                let items = wire
                    .as_array()
                    .ok_or_else(|| RefractError::NotAnArray(json_kind(wire)))?;
                let [element, meta, attributes, content] = items.as_slice() else {
                    return Err(RefractError::InvalidCompactLength(items.len()));
                };
                let element = element
                    .as_str()
                    .ok_or_else(|| RefractError::InvalidElementName(json_kind(element)))?;
                Ok(WireParts {
                    element,
                    meta: Some(meta),
                    attributes: Some(attributes),
                    content: Some(content),
                })
            }
        }
    }

    fn resolve(&self, name: &str) -> ElementClassRef {
        if !self.namespace.has_element(name) {
            tracing::debug!(element = %name, "Unknown element name, using base element");
        }
        self.namespace.get_element_class(name)
    }

    fn decode_attributes(
        &self,
        element: &Element,
        attributes: &Map<String, Value>,
        depth: usize,
    ) -> Result<crate::element::Attributes> {
        let mut decoded = crate::element::Attributes::new();

        for (name, value) in attributes {
            let attribute = if element.attribute_element_keys().iter().any(|k| k == name) {
                AttributeValue::Element(self.decode_at(value, depth + 1)?)
            } else if element
                .attribute_element_array_keys()
                .iter()
                .any(|k| k == name)
            {
                let items = value.as_array().ok_or_else(|| RefractError::InvalidField {
                    element: element.element().to_string(),
                    field: format!("attributes.{name}"),
                    expected: "array",
                    found: json_kind(value),
                })?;
                AttributeValue::Elements(self.decode_all(items, depth)?)
            } else {
                AttributeValue::Value(value.clone())
            };
            decoded.insert(name.clone(), attribute);
        }

        Ok(decoded)
    }

    fn decode_content(
        &self,
        class: &ElementClassRef,
        name: &str,
        content: &Value,
        depth: usize,
    ) -> Result<Content> {
        let shape = class.content_shape();
        let mismatch = || RefractError::ContentMismatch {
            element: name.to_string(),
            expected: shape,
            found: json_kind(content),
        };

        match shape {
            ContentShape::Opaque => {
                if class.accepts(content) {
                    Ok(Content::Value(content.clone()))
                } else {
                    Err(mismatch())
                }
            }
            ContentShape::Element => {
                if content.is_null() {
                    return Ok(Content::Value(Value::Null));
                }
                let nested = self.decode_at(content, depth + 1)?;
                Ok(Content::Element(Box::new(nested)))
            }
            ContentShape::Elements => {
                let items = content.as_array().ok_or_else(mismatch)?;
                Ok(Content::Elements(self.decode_all(items, depth)?))
            }
            ContentShape::Any => {
                if self.is_wire(content) {
                    let nested = self.decode_at(content, depth + 1)?;
                    return Ok(Content::Element(Box::new(nested)));
                }
                match content.as_array() {
                    Some(items) if !items.is_empty() && items.iter().all(|i| self.is_wire(i)) => {
                        Ok(Content::Elements(self.decode_all(items, depth)?))
                    }
                    _ => Ok(Content::Value(content.clone())),
                }
            }
            ContentShape::Pair => {
                let fields = content.as_object().ok_or_else(mismatch)?;
                if let Some((field, value)) = fields
                    .iter()
                    .find(|(field, _)| *field != "key" && *field != "value")
                {
                    return Err(RefractError::InvalidField {
                        element: name.to_string(),
                        field: format!("content.{field}"),
                        expected: "only 'key' and 'value'",
                        found: json_kind(value),
                    });
                }
                let key = fields
                    .get("key")
                    .map(|key| self.decode_at(key, depth + 1))
                    .transpose()?;
                let value = fields
                    .get("value")
                    .map(|value| self.decode_at(value, depth + 1))
                    .transpose()?;
                Ok(Content::Pair(Box::new(KeyValue { key, value })))
            }
        }
    }

    /// Check whether a value looks like a wire value of this decoder's form.
    fn is_wire(&self, value: &Value) -> bool {
        match self.form {
            WireForm::Full => value
                .as_object()
                .is_some_and(|fields| fields.get("element").is_some_and(Value::is_string)),
            WireForm::Compact => matches!(
                value.as_array().map(Vec::as_slice),
                Some([Value::String(_), Value::Object(_), Value::Object(_), _])
            ),
        }
    }

    fn decode_all(&self, items: &[Value], depth: usize) -> Result<Vec<Element>> {
        items
            .iter()
            .map(|item| self.decode_at(item, depth + 1))
            .collect()
    }
}

/// Get an optional object-valued field, treating `null` as absent.
fn object_field<'a>(
    value: Option<&'a Value>,
    field: &str,
    element: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(fields)) => Ok(Some(fields)),
        Some(other) => Err(RefractError::InvalidField {
            element: element.to_string(),
            field: field.to_string(),
            expected: "object",
            found: json_kind(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_decode_full_defaults() {
        let namespace = Namespace::new();
        let element = Decoder::new(&namespace, WireForm::Full)
            .decode(&json!({"element": "string", "content": "hi"}))
            .unwrap();

        assert_eq!(element.element(), "string");
        assert!(element.meta().is_empty());
        assert!(element.attributes().is_empty());
        assert_eq!(element.content(), &Content::Value(json!("hi")));
    }

    #[test]
    fn test_decode_absent_content_uses_empty_content() {
        let namespace = Namespace::new();
        let element = Decoder::new(&namespace, WireForm::Full)
            .decode(&json!({"element": "array"}))
            .unwrap();
        assert_eq!(element.content(), &Content::Elements(Vec::new()));
        assert_eq!(
            element.to_refract(),
            json!({"element": "array", "meta": {}, "attributes": {}, "content": []})
        );
    }

    #[test]
    fn test_decode_missing_element_name() {
        let namespace = Namespace::new();
        let err = Decoder::new(&namespace, WireForm::Full)
            .decode(&json!({"content": "x"}))
            .unwrap_err();
        assert!(matches!(err, RefractError::MissingElementName));
    }

    #[test]
    fn test_decode_non_string_element_name() {
        let namespace = Namespace::new();
        let err = Decoder::new(&namespace, WireForm::Full)
            .decode(&json!({"element": 7}))
            .unwrap_err();
        assert!(matches!(err, RefractError::InvalidElementName("number")));

        let err = Decoder::new(&namespace, WireForm::Compact)
            .decode(&json!([null, {}, {}, null]))
            .unwrap_err();
        assert!(matches!(err, RefractError::InvalidElementName("null")));
    }

    #[test]
    fn test_decode_compact_wrong_arity() {
        let namespace = Namespace::new();
        let err = Decoder::new(&namespace, WireForm::Compact)
            .decode(&json!(["string", {}, {}]))
            .unwrap_err();
        assert!(matches!(err, RefractError::InvalidCompactLength(3)));
    }

    #[test]
    fn test_decode_wrong_container() {
        let namespace = Namespace::new();
        let err = Decoder::new(&namespace, WireForm::Compact)
            .decode(&json!({"element": "string"}))
            .unwrap_err();
        assert!(matches!(err, RefractError::NotAnArray("object")));

        let err = Decoder::new(&namespace, WireForm::Full)
            .decode(&json!(["string", {}, {}, ""]))
            .unwrap_err();
        assert!(matches!(err, RefractError::NotAnObject("array")));
    }

    #[test]
    fn test_decode_invalid_meta() {
        let namespace = Namespace::new();
        let err = Decoder::new(&namespace, WireForm::Compact)
            .decode(&json!(["string", [], {}, ""]))
            .unwrap_err();
        assert!(matches!(err, RefractError::InvalidField { ref field, .. } if field == "meta"));
    }

    #[test]
    fn test_decode_shape_mismatch() {
        let namespace = Namespace::new();
        let err = Decoder::new(&namespace, WireForm::Compact)
            .decode(&json!(["array", {}, {}, "scalar"]))
            .unwrap_err();
        assert!(matches!(
            err,
            RefractError::ContentMismatch {
                expected: ContentShape::Elements,
                found: "string",
                ..
            }
        ));

        let err = Decoder::new(&namespace, WireForm::Compact)
            .decode(&json!(["string", {}, {}, [["string", {}, {}, "x"]]]))
            .unwrap_err();
        assert!(matches!(
            err,
            RefractError::ContentMismatch {
                expected: ContentShape::Opaque,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_unknown_element_keeps_content() {
        let namespace = Namespace::new();
        let wire = json!(["custom", {}, {}, [["string", {}, {}, "raw"]]]);
        let element = Decoder::new(&namespace, WireForm::Compact)
            .decode(&wire)
            .unwrap();

        assert_eq!(element.element(), "custom");
        assert_eq!(element.class().element_name(), "element");
        assert_eq!(element.to_compact_refract(), wire);
    }

    #[test]
    fn test_decode_nested_error_propagates() {
        let namespace = Namespace::new();
        let err = Decoder::new(&namespace, WireForm::Full)
            .decode(&json!({
                "element": "array",
                "content": [{"element": "string", "content": "ok"}, {"content": "no name"}],
            }))
            .unwrap_err();
        assert!(matches!(err, RefractError::MissingElementName));
    }

    #[test]
    fn test_decode_depth_limit() {
        let mut namespace = Namespace::new();
        namespace.register("wrap", namespace.get_element_class("array"));

        let mut wire = json!(["string", {}, {}, "leaf"]);
        for _ in 0..=MAX_REFRACT_DEPTH {
            wire = json!(["wrap", {}, {}, [wire]]);
        }

        let err = Decoder::new(&namespace, WireForm::Compact)
            .decode(&wire)
            .unwrap_err();
        assert!(matches!(err, RefractError::DepthLimitExceeded(MAX_REFRACT_DEPTH)));
    }

    #[test]
    fn test_decode_at_depth_limit_succeeds() {
        let mut namespace = Namespace::new();
        namespace.register("wrap", namespace.get_element_class("array"));

        let mut wire = json!(["string", {}, {}, "leaf"]);
        for _ in 0..MAX_REFRACT_DEPTH {
            wire = json!(["wrap", {}, {}, [wire]]);
        }

        let element = Decoder::new(&namespace, WireForm::Compact)
            .decode(&wire)
            .unwrap();
        assert_eq!(element.to_compact_refract(), wire);
    }

    #[test]
    fn test_decode_pair_rejects_unknown_fields() {
        let namespace = Namespace::new();
        let err = Decoder::new(&namespace, WireForm::Compact)
            .decode(&json!([
                "member",
                {},
                {},
                {"key": ["string", {}, {}, "k"], "extra": 1}
            ]))
            .unwrap_err();
        assert!(
            matches!(err, RefractError::InvalidField { ref field, found: "number", .. } if field == "content.extra")
        );
    }

    #[test]
    fn test_decode_unknown_element_decodes_nested_wire_values() {
        let mut namespace = Namespace::new();
        namespace.attribute_element_keys_mut().push("title".to_string());
        let wire = json!([
            "custom",
            {},
            {},
            [["string", {"id": "x"}, {"title": ["string", {}, {}, "T"]}, "x"]]
        ]);

        let element = Decoder::new(&namespace, WireForm::Compact)
            .decode(&wire)
            .unwrap();
        let Content::Elements(children) = element.content() else {
            unreachable!("wire content decodes as nested elements");
        };
        assert_eq!(children[0].element(), "string");
        assert!(matches!(
            children[0].attribute("title"),
            Some(AttributeValue::Element(_))
        ));
    }

    #[test]
    fn test_decode_unknown_element_single_nested_value() {
        let namespace = Namespace::new();
        let wire = json!({
            "element": "wrapper",
            "content": {"element": "number", "content": 3}
        });

        let element = Decoder::new(&namespace, WireForm::Full).decode(&wire).unwrap();
        assert!(matches!(element.content(), Content::Element(nested) if nested.element() == "number"));
    }

    #[test]
    fn test_decode_unknown_element_keeps_plain_json() {
        let namespace = Namespace::new();
        for content in [
            json!([]),
            json!(["a", "b", "c", "d"]),
            json!({"name": "not an element"}),
            json!([["string", {}, {}, "x"], 1]),
        ] {
            let wire = json!(["custom", {}, {}, content.clone()]);
            let element = Decoder::new(&namespace, WireForm::Compact)
                .decode(&wire)
                .unwrap();
            assert_eq!(element.content(), &Content::Value(content));
        }
    }

    #[test]
    fn test_decode_attribute_array_requires_array() {
        let mut namespace = Namespace::new();
        namespace
            .attribute_element_array_keys_mut()
            .push("tags".to_string());
        let err = Decoder::new(&namespace, WireForm::Full)
            .decode(&json!({
                "element": "string",
                "attributes": {"tags": "not-an-array"},
                "content": "",
            }))
            .unwrap_err();
        assert!(
            matches!(err, RefractError::InvalidField { ref field, .. } if field == "attributes.tags")
        );
    }
}
