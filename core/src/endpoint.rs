//! Validating URL builder, one pure function per API method.
//!
//! # Design
//! Every function validates all of its inputs first and only then formats
//! the URL, so a failure never yields a partial URL. Parameter order is
//! fixed per method. Values go through `urlencoding::encode`, except
//! `author_url`, `content` and the `getPageList` token, which the service's
//! existing wire contract passes through verbatim. Optional string
//! parameters are appended only when non-blank.

use std::fmt::Display;

use urlencoding::encode;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::types::{
    CreateAccount, CreatePage, EditAccountInfo, EditPage, GetAccountInfo, GetPage, GetPageList,
    GetViews, ViewsPeriod,
};
use crate::validate::{self, is_blank};

/// Service root without trailing slashes; configs may arrive unnormalized
/// through serde.
fn root(config: &ClientConfig) -> &str {
    config.base_url.trim_end_matches('/')
}

/// Accumulates `{base}/{method}[/{path}]?k=v&k=v`.
struct UrlBuilder {
    url: String,
    has_query: bool,
}

impl UrlBuilder {
    fn new(config: &ClientConfig, method: &str) -> Self {
        Self {
            url: format!("{}/{method}", root(config)),
            has_query: false,
        }
    }

    fn with_path(config: &ClientConfig, method: &str, path: &str) -> Self {
        Self {
            url: format!("{}/{method}/{}", root(config), encode(path)),
            has_query: false,
        }
    }

    fn raw(mut self, key: &str, value: impl Display) -> Self {
        let separator = if self.has_query { '&' } else { '?' };
        self.has_query = true;
        self.url.push(separator);
        self.url.push_str(key);
        self.url.push('=');
        self.url.push_str(&value.to_string());
        self
    }

    fn encoded(self, key: &str, value: &str) -> Self {
        self.raw(key, encode(value))
    }

    fn encoded_if_present(self, key: &str, value: &str) -> Self {
        if is_blank(value) {
            return self;
        }
        self.encoded(key, value)
    }

    fn raw_if_present(self, key: &str, value: &str) -> Self {
        if is_blank(value) {
            return self;
        }
        self.raw(key, value)
    }

    fn build(self) -> String {
        self.url
    }
}

/// `/createAccount?short_name=..[&author_name=..][&author_url=..]`
pub fn create_account(config: &ClientConfig, input: &CreateAccount) -> Result<String, ApiError> {
    validate::short_name(&input.short_name, &config.limits)?;
    validate::author(&input.author_name, &input.author_url, &config.limits)?;

    tracing::debug!(operation = "createAccount", "built endpoint");
    Ok(UrlBuilder::new(config, "createAccount")
        .encoded("short_name", &input.short_name)
        .encoded_if_present("author_name", &input.author_name)
        .raw_if_present("author_url", &input.author_url)
        .build())
}

/// `/editAccountInfo?access_token=..` followed by whichever fields are set.
pub fn edit_account_info(
    config: &ClientConfig,
    input: &EditAccountInfo,
) -> Result<String, ApiError> {
    validate::access_token(&input.access_token)?;
    if !is_blank(&input.short_name) {
        validate::short_name(&input.short_name, &config.limits)?;
    }
    validate::author(&input.author_name, &input.author_url, &config.limits)?;

    tracing::debug!(operation = "editAccountInfo", "built endpoint");
    Ok(UrlBuilder::new(config, "editAccountInfo")
        .encoded("access_token", &input.access_token)
        .encoded_if_present("short_name", &input.short_name)
        .encoded_if_present("author_name", &input.author_name)
        .raw_if_present("author_url", &input.author_url)
        .build())
}

/// `/getAccountInfo?access_token=..[&fields=["f1","f2"]]`
pub fn get_account_info(config: &ClientConfig, input: &GetAccountInfo) -> Result<String, ApiError> {
    validate::access_token(&input.access_token)?;

    let mut url = UrlBuilder::new(config, "getAccountInfo").encoded("access_token", &input.access_token);
    if !input.fields.is_empty() {
        let fields: Vec<String> = input
            .fields
            .iter()
            .map(|field| format!("\"{}\"", encode(field.as_str())))
            .collect();
        url = url.raw("fields", format!("[{}]", fields.join(",")));
    }

    tracing::debug!(operation = "getAccountInfo", fields = input.fields.len(), "built endpoint");
    Ok(url.build())
}

/// `/revokeAccessToken?access_token=..`
pub fn revoke_access_token(config: &ClientConfig, access_token: &str) -> Result<String, ApiError> {
    validate::access_token(access_token)?;

    tracing::debug!(operation = "revokeAccessToken", "built endpoint");
    Ok(UrlBuilder::new(config, "revokeAccessToken")
        .encoded("access_token", access_token)
        .build())
}

/// `/createPage?access_token=..&title=..[&author_name=..][&author_url=..]&content=..&return_content=..`
pub fn create_page(config: &ClientConfig, input: &CreatePage) -> Result<String, ApiError> {
    validate::access_token(&input.access_token)?;
    validate::title(&input.title, &config.limits)?;
    validate::author(&input.author_name, &input.author_url, &config.limits)?;
    validate::content(&input.content, &config.limits)?;

    tracing::debug!(operation = "createPage", bytes = input.content.len(), "built endpoint");
    Ok(UrlBuilder::new(config, "createPage")
        .encoded("access_token", &input.access_token)
        .encoded("title", &input.title)
        .encoded_if_present("author_name", &input.author_name)
        .raw_if_present("author_url", &input.author_url)
        .raw("content", &input.content)
        .raw("return_content", input.return_content)
        .build())
}

/// `/editPage/{path}?access_token=..&title=..[&author_name=..][&author_url=..]&content=..&return_content=..`
pub fn edit_page(config: &ClientConfig, input: &EditPage) -> Result<String, ApiError> {
    validate::access_token(&input.access_token)?;
    validate::path(&input.path)?;
    validate::title(&input.title, &config.limits)?;
    validate::author(&input.author_name, &input.author_url, &config.limits)?;
    validate::content(&input.content, &config.limits)?;

    tracing::debug!(operation = "editPage", path = %input.path, "built endpoint");
    Ok(UrlBuilder::with_path(config, "editPage", &input.path)
        .encoded("access_token", &input.access_token)
        .encoded("title", &input.title)
        .encoded_if_present("author_name", &input.author_name)
        .raw_if_present("author_url", &input.author_url)
        .raw("content", &input.content)
        .raw("return_content", input.return_content)
        .build())
}

/// `/getPage/{path}?return_content=..`
pub fn get_page(config: &ClientConfig, input: &GetPage) -> Result<String, ApiError> {
    validate::path(&input.path)?;

    tracing::debug!(operation = "getPage", path = %input.path, "built endpoint");
    Ok(UrlBuilder::with_path(config, "getPage", &input.path)
        .raw("return_content", input.return_content)
        .build())
}

/// `/getPageList?access_token=..&offset=..&limit=..`
pub fn get_page_list(config: &ClientConfig, input: &GetPageList) -> Result<String, ApiError> {
    validate::access_token(&input.access_token)?;

    tracing::debug!(operation = "getPageList", offset = input.offset, limit = input.limit, "built endpoint");
    Ok(UrlBuilder::new(config, "getPageList")
        .raw("access_token", &input.access_token)
        .raw("offset", input.offset)
        .raw("limit", input.limit)
        .build())
}

/// `/getViews/{path}?[year=..&][month=..&][day=..&]hour=..`
pub fn get_views(config: &ClientConfig, input: &GetViews) -> Result<String, ApiError> {
    validate::path(&input.path)?;

    let url = UrlBuilder::with_path(config, "getViews", &input.path);
    let url = match input.period {
        ViewsPeriod::Hour { hour } => {
            validate::hour(hour)?;
            url.raw("hour", hour)
        }
        ViewsPeriod::Day { day, hour } => {
            validate::day(day)?;
            validate::hour(hour)?;
            url.raw("day", day).raw("hour", hour)
        }
        ViewsPeriod::Month { month, day, hour } => {
            validate::month(month)?;
            validate::day(day)?;
            validate::hour(hour)?;
            url.raw("month", month).raw("day", day).raw("hour", hour)
        }
        ViewsPeriod::Date {
            year,
            month,
            day,
            hour,
        } => {
            validate::year(year, &config.limits)?;
            validate::month(month)?;
            validate::day(day)?;
            validate::hour(hour)?;
            url.raw("year", year)
                .raw("month", month)
                .raw("day", day)
                .raw("hour", hour)
        }
    };

    tracing::debug!(operation = "getViews", path = %input.path, "built endpoint");
    Ok(url.build())
}
