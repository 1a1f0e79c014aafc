//! JSON codec for [`Node`] trees.
//!
//! # Design
//! The service discriminates nodes purely by JSON kind: a string is a text
//! leaf, an object is an element with `tag`, `attrs` and `children`. The
//! codec reproduces that exactly and never emits a type tag. Encoding always
//! writes all three element keys, so `{"tag":"p","attrs":{},"children":[]}`
//! is the canonical empty element. Decoding tolerates absent (or null)
//! `attrs` / `children` because the live service omits them when empty.
//!
//! Every function here is pure and recursive over subtrees. Content depth
//! is unbounded, so the recursion grows the stack on demand instead of
//! relying on the caller's thread having room.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::node::{Element, Forest, Node};

/// Remaining stack below which recursion switches to a fresh segment.
const STACK_RED_ZONE: usize = 64 * 1024;
/// Size of each segment allocated once the red zone is reached.
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Encode a single node.
pub fn encode(node: &Node) -> Value {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || encode_node(node))
}

fn encode_node(node: &Node) -> Value {
    match node {
        Node::Text(value) => Value::String(value.clone()),
        Node::Element(element) => {
            let attrs: Map<String, Value> = element
                .attrs
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            let mut object = Map::with_capacity(3);
            object.insert("tag".to_string(), Value::String(element.tag.clone()));
            object.insert("attrs".to_string(), Value::Object(attrs));
            object.insert("children".to_string(), encode_forest(&element.children));
            Value::Object(object)
        }
    }
}

/// Encode a forest as a JSON array, preserving order.
pub fn encode_forest(forest: &[Node]) -> Value {
    Value::Array(forest.iter().map(encode).collect())
}

/// Decode a single node, dispatching on the JSON kind.
pub fn decode(value: &Value) -> Result<Node, ApiError> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || decode_node(value))
}

fn decode_node(value: &Value) -> Result<Node, ApiError> {
    match value {
        Value::String(text) => Ok(Node::Text(text.clone())),
        Value::Object(object) => decode_element(object).map(Node::Element),
        other => Err(ApiError::MalformedContent(format!(
            "expected a string or an object for a node, found {}",
            kind(other)
        ))),
    }
}

/// Decode a JSON array into a forest. An empty array is an empty forest.
pub fn decode_forest(value: &Value) -> Result<Forest, ApiError> {
    match value {
        Value::Array(items) => items.iter().map(decode).collect(),
        other => Err(ApiError::MalformedContent(format!(
            "expected an array of nodes, found {}",
            kind(other)
        ))),
    }
}

fn decode_element(object: &Map<String, Value>) -> Result<Element, ApiError> {
    let tag = match object.get("tag") {
        Some(Value::String(tag)) => tag.clone(),
        Some(other) => {
            return Err(ApiError::MalformedContent(format!(
                "element `tag` must be a string, found {}",
                kind(other)
            )))
        }
        None => return Err(ApiError::MalformedContent("element is missing `tag`".to_string())),
    };

    let attrs = match object.get("attrs") {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::Object(attrs)) => attrs
            .iter()
            .map(|(key, value)| match value {
                Value::String(v) => Ok((key.clone(), v.clone())),
                other => Err(ApiError::MalformedContent(format!(
                    "attribute `{key}` of <{tag}> must be a string, found {}",
                    kind(other)
                ))),
            })
            .collect::<Result<_, _>>()?,
        Some(other) => {
            return Err(ApiError::MalformedContent(format!(
                "`attrs` of <{tag}> must be an object, found {}",
                kind(other)
            )))
        }
    };

    let children = match object.get("children") {
        None | Some(Value::Null) => Vec::new(),
        Some(children) => decode_forest(children)?,
    };

    Ok(Element { tag, attrs, children })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// String helpers
// ---------------------------------------------------------------------------

pub fn node_to_string(node: &Node, pretty: bool) -> Result<String, ApiError> {
    render(&encode(node), pretty)
}

pub fn forest_to_string(forest: &[Node], pretty: bool) -> Result<String, ApiError> {
    render(&encode_forest(forest), pretty)
}

pub fn node_from_str(json: &str) -> Result<Node, ApiError> {
    decode(&parse(json)?)
}

pub fn forest_from_str(json: &str) -> Result<Forest, ApiError> {
    decode_forest(&parse(json)?)
}

/// Compact JSON for the raw `content` parameter of createPage / editPage.
pub fn content_from_forest(forest: &[Node]) -> Result<String, ApiError> {
    forest_to_string(forest, false)
}

fn parse(json: &str) -> Result<Value, ApiError> {
    parse_value(json).map_err(|e| ApiError::MalformedContent(e.to_string()))
}

/// Parse JSON text of any nesting depth into a `Value`.
///
/// serde_json's default 128-level limit is lifted; the parser runs on a
/// growable stack instead.
pub(crate) fn parse_value(json: &str) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

fn render(value: &Value, pretty: bool) -> Result<String, ApiError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.map_err(|e| ApiError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Node {
        Node::element("p")
            .with_child(Node::text("text content"))
            .with_child(
                Node::element("a")
                    .with_attr("href", "https://m.habrahabr.ru/post/335876/")
                    .with_attr("target", "_blank")
                    .with_child(Node::text("https://m.habrahabr.ru/post/335876/")),
            )
    }

    #[test]
    fn text_encodes_to_bare_string() {
        assert_eq!(encode(&Node::text("hello")), json!("hello"));
    }

    #[test]
    fn empty_element_has_all_three_keys() {
        let encoded = encode(&Node::element("p"));
        assert_eq!(encoded, json!({"tag": "p", "attrs": {}, "children": []}));
        assert_eq!(
            serde_json::to_string(&encoded).unwrap(),
            r#"{"attrs":{},"children":[],"tag":"p"}"#
        );
        assert_eq!(decode(&encoded).unwrap(), Node::element("p"));
    }

    #[test]
    fn nested_element_encodes_recursively() {
        assert_eq!(
            encode(&sample()),
            json!({
                "tag": "p",
                "attrs": {},
                "children": [
                    "text content",
                    {
                        "tag": "a",
                        "attrs": {
                            "href": "https://m.habrahabr.ru/post/335876/",
                            "target": "_blank"
                        },
                        "children": ["https://m.habrahabr.ru/post/335876/"]
                    }
                ]
            })
        );
    }

    #[test]
    fn deep_mixed_tree_round_trips() {
        let tree = Node::element("blockquote").with_child(
            Node::element("p")
                .with_child(Node::text("a"))
                .with_child(
                    Node::element("strong")
                        .with_child(Node::element("em").with_child(Node::text("deep")))
                        .with_child(Node::text("b")),
                )
                .with_child(Node::element("br")),
        );
        assert_eq!(decode(&encode(&tree)).unwrap(), tree);
    }

    #[test]
    fn legal_encoding_round_trips_as_json() {
        let value = json!({
            "tag": "figure",
            "attrs": {"class": "wide"},
            "children": [{"tag": "img", "attrs": {"src": "/file/x.png"}, "children": []}, "caption"]
        });
        assert_eq!(encode(&decode(&value).unwrap()), value);
    }

    #[test]
    fn missing_attrs_and_children_default_to_empty() {
        let node = decode(&json!({"tag": "hr"})).unwrap();
        assert_eq!(node, Node::element("hr"));
    }

    #[test]
    fn null_attrs_is_treated_as_absent() {
        let node = decode(&json!({"tag": "hr", "attrs": null, "children": null})).unwrap();
        assert_eq!(node, Node::element("hr"));
    }

    #[test]
    fn rejects_non_node_kinds() {
        for value in [json!(1), json!(true), json!(null), json!(["a"])] {
            let err = decode(&value).unwrap_err();
            assert!(matches!(err, ApiError::MalformedContent(_)), "{value}");
        }
    }

    #[test]
    fn rejects_missing_tag() {
        let err = decode(&json!({"attrs": {}, "children": []})).unwrap_err();
        assert!(matches!(err, ApiError::MalformedContent(_)));
    }

    #[test]
    fn rejects_non_string_attribute() {
        let err = decode(&json!({"tag": "img", "attrs": {"width": 100}})).unwrap_err();
        assert!(matches!(err, ApiError::MalformedContent(msg) if msg.contains("width")));
    }

    #[test]
    fn rejects_malformed_grandchild() {
        let value = json!({"tag": "p", "children": [{"tag": "b", "children": [42]}]});
        assert!(matches!(decode(&value), Err(ApiError::MalformedContent(_))));
    }

    #[test]
    fn forest_preserves_order() {
        let forest = decode_forest(&json!(["one", {"tag": "br"}, "two"])).unwrap();
        assert_eq!(forest, vec![Node::text("one"), Node::element("br"), Node::text("two")]);
    }

    #[test]
    fn empty_array_is_empty_forest() {
        assert_eq!(decode_forest(&json!([])).unwrap(), Vec::<Node>::new());
    }

    #[test]
    fn forest_rejects_single_object() {
        let err = decode_forest(&json!({"tag": "p"})).unwrap_err();
        assert!(matches!(err, ApiError::MalformedContent(_)));
    }

    #[test]
    fn pretty_and_compact_strings_parse_back() {
        let forest = vec![sample(), sample()];
        let compact = forest_to_string(&forest, false).unwrap();
        let pretty = forest_to_string(&forest, true).unwrap();
        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        assert_eq!(forest_from_str(&compact).unwrap(), forest);
        assert_eq!(forest_from_str(&pretty).unwrap(), forest);
        assert_eq!(node_from_str(&node_to_string(&sample(), true).unwrap()).unwrap(), sample());
    }

    #[test]
    fn content_string_is_compact_array() {
        let content = content_from_forest(&[Node::element("p").with_child(Node::text("Hi"))]).unwrap();
        assert_eq!(content, r#"[{"attrs":{},"children":["Hi"],"tag":"p"}]"#);
    }

    /// `[{"tag":"b","children":[ ... "deep" ... ]}]` nested `depth` elements down.
    fn nested_content(depth: usize) -> String {
        let mut json = String::from("[");
        for _ in 0..depth {
            json.push_str(r#"{"tag":"b","children":["#);
        }
        json.push_str(r#""deep""#);
        for _ in 0..depth {
            json.push_str("]}");
        }
        json.push(']');
        json
    }

    fn innermost(forest: &[Node]) -> (usize, Option<&Node>) {
        let mut depth = 0;
        let mut current = forest;
        while let Some(Node::Element(element)) = current.first() {
            depth += 1;
            current = &element.children;
        }
        (depth, current.first())
    }

    #[test]
    fn deeply_nested_text_parses() {
        let forest = forest_from_str(&nested_content(1000)).unwrap();
        let (depth, leaf) = innermost(&forest);
        assert_eq!(depth, 1000);
        assert_eq!(leaf, Some(&Node::text("deep")));
    }

    #[test]
    fn deeply_nested_value_round_trips() {
        let forest = forest_from_str(&nested_content(1000)).unwrap();
        let encoded = encode_forest(&forest);
        assert_eq!(decode_forest(&encoded).unwrap(), forest);
    }

    #[test]
    fn trailing_garbage_is_malformed_content() {
        assert!(matches!(forest_from_str(r#"["a"] x"#), Err(ApiError::MalformedContent(_))));
    }

    #[test]
    fn invalid_json_text_is_malformed_content() {
        assert!(matches!(node_from_str("{"), Err(ApiError::MalformedContent(_))));
    }

    #[test]
    fn serde_impls_delegate_to_codec() {
        let json = serde_json::to_value(&sample()).unwrap();
        assert_eq!(json, encode(&sample()));
        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
        assert!(serde_json::from_value::<Node>(json!(3)).is_err());
    }
}
