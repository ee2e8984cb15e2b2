//! Refract Elements
//!
//! A runtime type registry and serializer for trees of typed elements.
//! This library provides functionality for:
//! - Registering element classes by name in an isolated [`Namespace`]
//! - Classifying native JSON values with ordered detection rules
//! - Extending a namespace through plugins
//! - Converting element trees to and from the full and compact refract forms
//!
//! # Example
//!
//! ```ignore
//! use refract_elements::Namespace;
//! use serde_json::json;
//!
//! let mut namespace = Namespace::new();
//! namespace.register("foo", namespace.get_element_class("array"));
//!
//! let wire = json!(["foo", {}, {}, [["string", {}, {}, "bar"]]]);
//! let element = namespace.from_compact_refract(&wire)?;
//! assert_eq!(element.to_compact_refract(), wire);
//! ```

pub mod class;
pub mod codec;
pub mod config;
pub mod detection;
pub mod element;
pub mod error;
pub mod namespace;
pub mod plugin;
pub mod registry;

// Re-export commonly used items
pub use class::{same_class, BaseElement, ContentShape, ElementClass, ElementClassRef};
pub use codec::WireForm;
pub use detection::{DetectionPredicate, DetectionRule, DetectionTable};
pub use element::{AttributeValue, Attributes, Content, Element, KeyValue};
pub use error::{RefractError, Result};
pub use namespace::{ElementInput, Namespace, NamespaceOptions};
pub use plugin::{FnPlugin, Hook, Plugin, PluginOptions};
pub use registry::{ElementRegistry, ElementsView};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
