//! Stateless request builder and response parser for the Telegraph API.
//!
//! # Design
//! `TelegraphClient` holds only its `ClientConfig` and carries no mutable
//! state between calls, so one instance can be shared across threads. Each
//! API method is split into a `build_*` method that validates input and
//! produces an `HttpRequest`, and a `parse_*` method that consumes an
//! `HttpResponse` and decodes the envelope with the matching result decoder.

use crate::config::ClientConfig;
use crate::endpoint;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::response::{decode, Response};
use crate::types::{
    Account, CreateAccount, CreatePage, EditAccountInfo, EditPage, GetAccountInfo, GetPage,
    GetPageList, GetViews, Page, PageList, PageViews,
};

/// Synchronous, stateless client for the Telegraph API.
#[derive(Debug, Clone, Default)]
pub struct TelegraphClient {
    config: ClientConfig,
}

impl TelegraphClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    pub fn build_create_account(&self, input: &CreateAccount) -> Result<HttpRequest, ApiError> {
        endpoint::create_account(&self.config, input).map(HttpRequest::get)
    }

    pub fn build_edit_account_info(&self, input: &EditAccountInfo) -> Result<HttpRequest, ApiError> {
        endpoint::edit_account_info(&self.config, input).map(HttpRequest::get)
    }

    pub fn build_get_account_info(&self, input: &GetAccountInfo) -> Result<HttpRequest, ApiError> {
        endpoint::get_account_info(&self.config, input).map(HttpRequest::get)
    }

    pub fn build_revoke_access_token(&self, access_token: &str) -> Result<HttpRequest, ApiError> {
        endpoint::revoke_access_token(&self.config, access_token).map(HttpRequest::get)
    }

    pub fn build_create_page(&self, input: &CreatePage) -> Result<HttpRequest, ApiError> {
        endpoint::create_page(&self.config, input).map(HttpRequest::get)
    }

    pub fn build_edit_page(&self, input: &EditPage) -> Result<HttpRequest, ApiError> {
        endpoint::edit_page(&self.config, input).map(HttpRequest::get)
    }

    pub fn build_get_page(&self, input: &GetPage) -> Result<HttpRequest, ApiError> {
        endpoint::get_page(&self.config, input).map(HttpRequest::get)
    }

    pub fn build_get_page_list(&self, input: &GetPageList) -> Result<HttpRequest, ApiError> {
        endpoint::get_page_list(&self.config, input).map(HttpRequest::get)
    }

    pub fn build_get_views(&self, input: &GetViews) -> Result<HttpRequest, ApiError> {
        endpoint::get_views(&self.config, input).map(HttpRequest::get)
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    /// Shared by createAccount, editAccountInfo, getAccountInfo and revokeAccessToken.
    pub fn parse_account(&self, response: HttpResponse) -> Result<Response<Account>, ApiError> {
        parse(response, decode::account)
    }

    /// Shared by createPage, editPage and getPage.
    pub fn parse_page(&self, response: HttpResponse) -> Result<Response<Page>, ApiError> {
        parse(response, decode::page)
    }

    pub fn parse_page_list(&self, response: HttpResponse) -> Result<Response<PageList>, ApiError> {
        parse(response, decode::page_list)
    }

    pub fn parse_views(&self, response: HttpResponse) -> Result<Response<PageViews>, ApiError> {
        parse(response, decode::page_views)
    }
}

fn parse<T, F>(response: HttpResponse, decode_result: F) -> Result<Response<T>, ApiError>
where
    F: FnOnce(&serde_json::Value) -> Result<T, ApiError>,
{
    check_status(&response)?;
    let decoded = Response::from_json(&response.body, decode_result)?;
    if !decoded.ok {
        tracing::warn!(error = ?decoded.error, "service rejected request");
    }
    Ok(decoded)
}

/// The service answers 200 for both `ok` outcomes; anything else is a
/// transport-level failure.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    tracing::warn!(status = response.status, "unexpected HTTP status");
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
