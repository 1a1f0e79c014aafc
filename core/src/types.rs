//! Domain records and call parameters for the Telegraph API.
//!
//! # Design
//! Records (`Account`, `Page`, `PageList`, `PageViews`) are immutable
//! snapshots of what the service returned; field names are the wire names.
//! Parameter structs are plain owned data with `Default`-backed optional
//! fields, so an empty string and an omitted field mean the same thing to
//! the endpoint builder.

use serde::{Deserialize, Serialize};

use crate::node::Node;

/// Sentinel `page_count` meaning the field was not requested.
pub const UNKNOWN_PAGE_COUNT: i64 = -1;

fn unknown_page_count() -> i64 {
    UNKNOWN_PAGE_COUNT
}

fn is_unknown_page_count(count: &i64) -> bool {
    *count == UNKNOWN_PAGE_COUNT
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A Telegraph account.
///
/// Every field may be missing on the wire: `getAccountInfo` returns only the
/// requested fields and `revokeAccessToken` only the new credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(default = "unknown_page_count", skip_serializing_if = "is_unknown_page_count")]
    pub page_count: i64,
}

/// A Telegraph page. `content` is only present when it was requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub path: String,
    pub url: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    pub views: i64,
    #[serde(default, skip_serializing_if = "is_false")]
    pub can_edit: bool,
}

/// One page of an account's page list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageList {
    pub total_count: i64,
    pub pages: Vec<Page>,
}

/// View count for a page over the requested period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageViews {
    pub views: i64,
}

/// Account fields selectable in `getAccountInfo`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccountField {
    ShortName,
    AuthorName,
    AuthorUrl,
    AuthUrl,
    PageCount,
}

impl AccountField {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountField::ShortName => "short_name",
            AccountField::AuthorName => "author_name",
            AccountField::AuthorUrl => "author_url",
            AccountField::AuthUrl => "auth_url",
            AccountField::PageCount => "page_count",
        }
    }
}

// ---------------------------------------------------------------------------
// Call parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAccount {
    pub short_name: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_url: String,
}

/// Fields left blank are not sent and stay unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditAccountInfo {
    pub access_token: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAccountInfo {
    pub access_token: String,
    #[serde(default)]
    pub fields: Vec<AccountField>,
}

/// `content` is the raw JSON array of nodes, see [`crate::codec::content_from_forest`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePage {
    pub access_token: String,
    pub title: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_url: String,
    pub content: String,
    #[serde(default)]
    pub return_content: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditPage {
    pub access_token: String,
    pub path: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_url: String,
    #[serde(default)]
    pub return_content: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetPage {
    pub path: String,
    #[serde(default)]
    pub return_content: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPageList {
    pub access_token: String,
    #[serde(default)]
    pub offset: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

pub const DEFAULT_PAGE_LIST_LIMIT: u32 = 50;

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIST_LIMIT
}

impl GetPageList {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            offset: 0,
            limit: DEFAULT_PAGE_LIST_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetViews {
    pub path: String,
    #[serde(flatten)]
    pub period: ViewsPeriod,
}

/// The four accepted `getViews` shapes. Each carries only the time fields
/// it sends; `hour` is always present.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ViewsPeriod {
    Date { year: i32, month: i32, day: i32, hour: i32 },
    Month { month: i32, day: i32, hour: i32 },
    Day { day: i32, hour: i32 },
    Hour { hour: i32 },
}

impl GetViews {
    pub fn hour(path: impl Into<String>, hour: i32) -> Self {
        Self::with_period(path, ViewsPeriod::Hour { hour })
    }

    pub fn day(path: impl Into<String>, day: i32, hour: i32) -> Self {
        Self::with_period(path, ViewsPeriod::Day { day, hour })
    }

    pub fn month(path: impl Into<String>, month: i32, day: i32, hour: i32) -> Self {
        Self::with_period(path, ViewsPeriod::Month { month, day, hour })
    }

    pub fn date(path: impl Into<String>, year: i32, month: i32, day: i32, hour: i32) -> Self {
        Self::with_period(path, ViewsPeriod::Date { year, month, day, hour })
    }

    fn with_period(path: impl Into<String>, period: ViewsPeriod) -> Self {
        Self {
            path: path.into(),
            period,
        }
    }
}
