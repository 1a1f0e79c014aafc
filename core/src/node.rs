//! Content tree used for rich-text page bodies.
//!
//! # Design
//! A `Node` is either a bare text leaf or a tagged element that owns its
//! attributes and ordered children outright. Attributes live in a `BTreeMap`
//! so equality ignores insertion order and encoding is deterministic.
//! Equality is structural and derived.
//!
//! Serialization goes through [`crate::codec`], which mirrors the service's
//! wire shape: strings are text, objects are elements, no discriminant.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec;

/// A single unit of page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Plain text leaf.
    Text(String),
    /// Tagged element with attributes and ordered children.
    Element(Element),
}

/// The tagged-container variant of [`Node`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<Node>,
}

/// Ordered sequence of sibling nodes, as carried by `Page.content`.
pub type Forest = Vec<Node>;

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// An element with no attributes and no children.
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Element(Element {
            tag: tag.into(),
            ..Element::default()
        })
    }

    /// Add an attribute. No-op on text nodes.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Node::Element(element) = &mut self {
            element.attrs.insert(key.into(), value.into());
        }
        self
    }

    /// Append a child. No-op on text nodes.
    pub fn with_child(mut self, child: Node) -> Self {
        if let Node::Element(element) = &mut self {
            element.children.push(child);
        }
        self
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(value) => Some(value),
            Node::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Text(_) => None,
            Node::Element(element) => Some(element),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        codec::encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        codec::decode(&value).map_err(serde::de::Error::custom)
    }
}
