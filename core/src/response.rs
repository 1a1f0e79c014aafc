//! The `{ok, error, result}` envelope every Telegraph method answers with.
//!
//! # Design
//! The envelope alone cannot tell which record `result` holds, so decoding
//! takes the result decoder as an explicit argument. The decoders in
//! [`decode`] cover the four result shapes; page-bearing decoders route
//! `content` through the node codec so a bad tree surfaces as
//! `MalformedContent` rather than a generic shape error.

use serde::Serialize;
use serde_json::Value;

use crate::codec;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
}

impl<T> Response<T> {
    pub fn success(result: T) -> Self {
        Self {
            ok: true,
            error: None,
            result: Some(result),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            result: None,
        }
    }

    /// Decode raw JSON text with the given result decoder.
    pub fn from_json<F>(json: &str, decode_result: F) -> Result<Self, ApiError>
    where
        F: FnOnce(&Value) -> Result<T, ApiError>,
    {
        let value =
            codec::parse_value(json).map_err(|e| ApiError::MalformedResponse(e.to_string()))?;
        Self::from_value(&value, decode_result)
    }

    /// Decode an already-parsed envelope with the given result decoder.
    pub fn from_value<F>(value: &Value, decode_result: F) -> Result<Self, ApiError>
    where
        F: FnOnce(&Value) -> Result<T, ApiError>,
    {
        let envelope = value
            .as_object()
            .ok_or_else(|| ApiError::MalformedResponse("envelope must be a JSON object".to_string()))?;

        let ok = envelope
            .get("ok")
            .and_then(Value::as_bool)
            .ok_or_else(|| ApiError::MalformedResponse("envelope is missing boolean `ok`".to_string()))?;

        if !ok {
            let error = match envelope.get("error") {
                None | Some(Value::Null) => None,
                Some(Value::String(error)) => Some(error.clone()),
                Some(_) => {
                    return Err(ApiError::MalformedResponse(
                        "envelope `error` must be a string".to_string(),
                    ))
                }
            };
            return Ok(Self {
                ok,
                error,
                result: None,
            });
        }

        let result = match envelope.get("result") {
            None | Some(Value::Null) => {
                return Err(ApiError::MalformedResponse(
                    "envelope has `ok: true` but no `result`".to_string(),
                ))
            }
            Some(result) => decode_result(result)?,
        };

        Ok(Self {
            ok,
            error: None,
            result: Some(result),
        })
    }

    /// Collapse into the result, turning `ok: false` into `Err(error)`.
    pub fn into_result(self) -> Result<T, String> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(self.error.unwrap_or_default()),
        }
    }
}

impl<T: Serialize> Response<T> {
    pub fn to_value(&self) -> Result<Value, ApiError> {
        serde_json::to_value(self).map_err(|e| ApiError::SerializationError(e.to_string()))
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, ApiError> {
        let rendered = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        rendered.map_err(|e| ApiError::SerializationError(e.to_string()))
    }
}

/// Result decoders for [`Response::from_json`].
pub mod decode {
    use serde::de::DeserializeOwned;
    use serde_json::{Map, Value};

    use crate::codec;
    use crate::error::ApiError;
    use crate::types::{Account, Page, PageList, PageViews};

    /// Plain serde decode for records that embed no content.
    pub fn record<T: DeserializeOwned>(value: &Value) -> Result<T, ApiError> {
        T::deserialize(value).map_err(|e| ApiError::MalformedResponse(e.to_string()))
    }

    pub fn account(value: &Value) -> Result<Account, ApiError> {
        record(value)
    }

    pub fn page_views(value: &Value) -> Result<PageViews, ApiError> {
        record(value)
    }

    pub fn page(value: &Value) -> Result<Page, ApiError> {
        let object = value
            .as_object()
            .ok_or_else(|| ApiError::MalformedResponse("page must be a JSON object".to_string()))?;
        let fields: Map<String, Value> = object
            .iter()
            .filter(|(key, _)| key.as_str() != "content")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let mut page: Page = record(&Value::Object(fields))?;
        page.content = match object.get("content") {
            None | Some(Value::Null) => None,
            Some(content) => Some(codec::decode_forest(content)?),
        };
        Ok(page)
    }

    pub fn page_list(value: &Value) -> Result<PageList, ApiError> {
        let total_count = value
            .get("total_count")
            .and_then(Value::as_i64)
            .ok_or_else(|| ApiError::MalformedResponse("page list is missing `total_count`".to_string()))?;
        let pages = value
            .get("pages")
            .and_then(Value::as_array)
            .ok_or_else(|| ApiError::MalformedResponse("page list is missing `pages`".to_string()))?
            .iter()
            .map(page)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageList { total_count, pages })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::node::Node;
    use crate::types::{Account, Page, PageList, PageViews, UNKNOWN_PAGE_COUNT};

    #[test]
    fn decodes_successful_account() {
        let response = Response::from_json(
            r#"{"ok":true,"result":{"short_name":"Sandbox","author_name":"Anonymous","author_url":""}}"#,
            decode::account,
        )
        .unwrap();
        assert!(response.ok);
        assert!(response.error.is_none());
        assert_eq!(
            response.result,
            Some(Account {
                short_name: "Sandbox".to_string(),
                author_name: "Anonymous".to_string(),
                author_url: String::new(),
                access_token: None,
                auth_url: None,
                page_count: UNKNOWN_PAGE_COUNT,
            })
        );
    }

    #[test]
    fn decodes_failure_without_result() {
        let response =
            Response::from_json(r#"{"ok":false,"error":"SHORT_NAME_REQUIRED"}"#, decode::account).unwrap();
        assert!(!response.ok);
        assert_eq!(response.error.as_deref(), Some("SHORT_NAME_REQUIRED"));
        assert!(response.result.is_none());
    }

    #[test]
    fn failure_ignores_result_and_skips_decoder() {
        let response = Response::<Account>::from_json(
            r#"{"ok":false,"error":"PAGE_NOT_FOUND","result":42}"#,
            |_| panic!("decoder must not run"),
        )
        .unwrap();
        assert!(response.result.is_none());
    }

    #[test]
    fn ok_true_without_result_is_malformed() {
        let err = Response::from_json(r#"{"ok":true}"#, decode::account).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
        let err = Response::from_json(r#"{"ok":true,"result":null}"#, decode::account).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn missing_ok_is_malformed() {
        let err = Response::from_json(r#"{"result":{"views":1}}"#, decode::page_views).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
        let err = Response::from_json(r#"[]"#, decode::page_views).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
        let err = Response::from_json("<html>", decode::page_views).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn wrong_result_shape_is_malformed() {
        let err = Response::from_json(r#"{"ok":true,"result":{"views":"many"}}"#, decode::page_views)
            .unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn page_content_goes_through_codec() {
        let response = Response::from_json(
            r#"{"ok":true,"result":{"path":"Sample-Page-12-15","url":"https://telegra.ph/Sample-Page-12-15","title":"Sample Page","description":"Hello, world!","author_name":"Anonymous","content":[{"tag":"p","children":["Hello, world!"]}],"views":0,"can_edit":true}}"#,
            decode::page,
        )
        .unwrap();
        let page = response.result.unwrap();
        assert_eq!(
            page.content,
            Some(vec![Node::element("p").with_child(Node::text("Hello, world!"))])
        );
        assert!(page.can_edit);
    }

    #[test]
    fn bad_page_content_is_malformed_content() {
        let err = Response::from_json(
            r#"{"ok":true,"result":{"path":"p","url":"u","title":"t","description":"d","content":[7],"views":0}}"#,
            decode::page,
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::MalformedContent(_)));
    }

    #[test]
    fn deeply_nested_page_content_decodes() {
        let depth = 1000;
        let content = format!(
            "[{}\"deep\"{}]",
            r#"{"tag":"b","children":["#.repeat(depth),
            "]}".repeat(depth)
        );
        let body = format!(
            r#"{{"ok":true,"result":{{"path":"p","url":"u","title":"t","description":"","views":0,"content":{content}}}}}"#
        );
        let page = Response::from_json(&body, decode::page).unwrap().result.unwrap();

        let mut levels = 0;
        let mut current = page.content.as_deref().unwrap();
        while let Some(Node::Element(element)) = current.first() {
            assert_eq!(element.tag, "b");
            levels += 1;
            current = &element.children;
        }
        assert_eq!(levels, depth);
        assert_eq!(current, [Node::text("deep")]);
    }

    #[test]
    fn page_list_decodes_each_page() {
        let response = Response::from_json(
            r#"{"ok":true,"result":{"total_count":2,"pages":[
                {"path":"a","url":"https://telegra.ph/a","title":"A","description":"","views":1},
                {"path":"b","url":"https://telegra.ph/b","title":"B","description":"","views":2,"content":["x"]}
            ]}}"#,
            decode::page_list,
        )
        .unwrap();
        let list = response.result.unwrap();
        assert_eq!(list.total_count, 2);
        assert_eq!(list.pages[0].path, "a");
        assert_eq!(list.pages[1].content, Some(vec![Node::text("x")]));
    }

    #[test]
    fn page_list_requires_total_count() {
        let err = Response::from_json(r#"{"ok":true,"result":{"pages":[]}}"#, decode::page_list).unwrap_err();
        assert!(matches!(err, ApiError::MalformedResponse(_)));
    }

    #[test]
    fn encode_mirrors_decode() {
        let page = Page {
            path: "a".to_string(),
            url: "https://telegra.ph/a".to_string(),
            title: "A".to_string(),
            description: String::new(),
            author_name: None,
            author_url: None,
            image_url: None,
            content: Some(vec![Node::element("p")]),
            views: 3,
            can_edit: false,
        };
        let response = Response::success(PageList {
            total_count: 1,
            pages: vec![page],
        });
        let value = response.to_value().unwrap();
        assert_eq!(
            value,
            json!({"ok": true, "result": {"total_count": 1, "pages": [{
                "path": "a", "url": "https://telegra.ph/a", "title": "A", "description": "",
                "content": [{"tag": "p", "attrs": {}, "children": []}], "views": 3
            }]}})
        );
        let back = Response::from_value(&value, decode::page_list).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn failure_encodes_without_result() {
        let json = Response::<PageViews>::failure("PAGE_NOT_FOUND").to_json(false).unwrap();
        assert_eq!(json, r#"{"ok":false,"error":"PAGE_NOT_FOUND"}"#);
    }

    #[test]
    fn into_result_splits_success_and_failure() {
        assert_eq!(Response::success(PageViews { views: 5 }).into_result(), Ok(PageViews { views: 5 }));
        assert_eq!(
            Response::<PageViews>::failure("ACCESS_TOKEN_INVALID").into_result(),
            Err("ACCESS_TOKEN_INVALID".to_string())
        );
    }
}
