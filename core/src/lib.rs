//! Synchronous API client core for the Telegraph publishing service.
//!
//! # Overview
//! Builds validated request URLs and decodes `{ok, error, result}` envelopes
//! without touching the network (host-does-IO pattern). The caller executes
//! the actual HTTP GET, keeping the core deterministic and testable.
//!
//! # Design
//! - `TelegraphClient` is stateless; it holds only a `ClientConfig`.
//! - Each API method is split into `build_*` (validates, produces request)
//!   and `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `endpoint` exposes the same URL construction as free functions.
//! - Page bodies are `Node` trees; `codec` maps them to and from the
//!   service's JSON shape.

pub mod client;
pub mod codec;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod node;
pub mod response;
pub mod types;
pub mod validate;

pub use client::TelegraphClient;
pub use config::{ClientConfig, Limits};
pub use error::{ApiError, Violation};
pub use http::{HttpRequest, HttpResponse};
pub use node::{Element, Forest, Node};
pub use response::Response;
pub use types::{
    Account, AccountField, CreateAccount, CreatePage, EditAccountInfo, EditPage, GetAccountInfo,
    GetPage, GetPageList, GetViews, Page, PageList, PageViews, ViewsPeriod,
};
