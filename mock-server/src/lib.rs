use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const PAGE_ROOT: &str = "https://telegra.ph";

#[derive(Clone, Debug)]
pub struct Account {
    pub id: Uuid,
    pub access_token: String,
    pub short_name: String,
    pub author_name: String,
    pub author_url: String,
}

#[derive(Clone, Debug)]
pub struct Page {
    pub owner: Uuid,
    pub path: String,
    pub title: String,
    pub author_name: String,
    pub author_url: String,
    pub content: Value,
    pub views: i64,
}

#[derive(Default)]
pub struct Store {
    accounts: HashMap<Uuid, Account>,
    pages: Vec<Page>,
}

impl Store {
    fn account_by_token(&self, token: Option<&String>) -> Option<&Account> {
        let token = token?;
        self.accounts.values().find(|a| &a.access_token == token)
    }

    fn account_by_token_mut(&mut self, token: Option<&String>) -> Option<&mut Account> {
        let token = token?;
        self.accounts.values_mut().find(|a| &a.access_token == token)
    }

    fn page_mut(&mut self, path: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.path == path)
    }
}

pub type Db = Arc<RwLock<Store>>;
type Params = Query<HashMap<String, String>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/createAccount", get(create_account))
        .route("/editAccountInfo", get(edit_account_info))
        .route("/getAccountInfo", get(get_account_info))
        .route("/revokeAccessToken", get(revoke_access_token))
        .route("/createPage", get(create_page))
        .route("/editPage/{path}", get(edit_page))
        .route("/getPage/{path}", get(get_page))
        .route("/getPageList", get(get_page_list))
        .route("/getViews/{path}", get(get_views))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn ok(result: Value) -> Json<Value> {
    Json(json!({ "ok": true, "result": result }))
}

fn fail(error: &str) -> Json<Value> {
    tracing::debug!(error, "rejecting request");
    Json(json!({ "ok": false, "error": error }))
}

fn param<'a>(params: &'a HashMap<String, String>, key: &str) -> &'a str {
    params.get(key).map(String::as_str).unwrap_or("")
}

fn flag(params: &HashMap<String, String>, key: &str) -> bool {
    param(params, key) == "true"
}

fn new_token() -> String {
    Uuid::new_v4().simple().to_string()
}

fn auth_url(token: &str) -> String {
    format!("https://edit.telegra.ph/auth/{token}")
}

fn account_json(account: &Account) -> Value {
    json!({
        "short_name": account.short_name,
        "author_name": account.author_name,
        "author_url": account.author_url,
    })
}

/// Text of the first text leaf, in document order.
fn first_text(content: &Value) -> Option<String> {
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => items.iter().find_map(first_text),
        Value::Object(object) => object.get("children").and_then(first_text),
        _ => None,
    }
}

fn page_json(page: &Page, with_content: bool, can_edit: bool) -> Value {
    let mut object = Map::new();
    object.insert("path".into(), json!(page.path));
    object.insert("url".into(), json!(format!("{PAGE_ROOT}/{}", page.path)));
    object.insert("title".into(), json!(page.title));
    object.insert(
        "description".into(),
        json!(first_text(&page.content).unwrap_or_default()),
    );
    if !page.author_name.is_empty() {
        object.insert("author_name".into(), json!(page.author_name));
    }
    if !page.author_url.is_empty() {
        object.insert("author_url".into(), json!(page.author_url));
    }
    if with_content {
        object.insert("content".into(), page.content.clone());
    }
    object.insert("views".into(), json!(page.views));
    if can_edit {
        object.insert("can_edit".into(), json!(true));
    }
    Value::Object(object)
}

fn slug(title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    slug.trim_matches('-').to_string()
}

/// Content must be a JSON array of nodes.
fn parse_content(raw: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(content @ Value::Array(_)) => Some(content),
        _ => None,
    }
}

async fn create_account(State(db): State<Db>, Query(params): Params) -> Json<Value> {
    let short_name = param(&params, "short_name");
    if short_name.trim().is_empty() {
        return fail("SHORT_NAME_REQUIRED");
    }
    let account = Account {
        id: Uuid::new_v4(),
        access_token: new_token(),
        short_name: short_name.to_string(),
        author_name: param(&params, "author_name").to_string(),
        author_url: param(&params, "author_url").to_string(),
    };
    let mut result = account_json(&account);
    result["access_token"] = json!(account.access_token);
    result["auth_url"] = json!(auth_url(&account.access_token));

    tracing::info!(short_name = %account.short_name, "account created");
    db.write().await.accounts.insert(account.id, account);
    ok(result)
}

async fn edit_account_info(State(db): State<Db>, Query(params): Params) -> Json<Value> {
    let mut store = db.write().await;
    let Some(account) = store.account_by_token_mut(params.get("access_token")) else {
        return fail("ACCESS_TOKEN_INVALID");
    };
    if let Some(short_name) = params.get("short_name") {
        account.short_name = short_name.clone();
    }
    if let Some(author_name) = params.get("author_name") {
        account.author_name = author_name.clone();
    }
    if let Some(author_url) = params.get("author_url") {
        account.author_url = author_url.clone();
    }
    ok(account_json(account))
}

async fn get_account_info(State(db): State<Db>, Query(params): Params) -> Json<Value> {
    let store = db.read().await;
    let Some(account) = store.account_by_token(params.get("access_token")) else {
        return fail("ACCESS_TOKEN_INVALID");
    };
    let fields: Vec<String> = match params.get("fields") {
        None => vec!["short_name".into(), "author_name".into(), "author_url".into()],
        Some(raw) => match serde_json::from_str(raw) {
            Ok(fields) => fields,
            Err(_) => return fail("FIELDS_FORMAT_INVALID"),
        },
    };

    let mut result = Map::new();
    for field in fields {
        let value = match field.as_str() {
            "short_name" => json!(account.short_name),
            "author_name" => json!(account.author_name),
            "author_url" => json!(account.author_url),
            "auth_url" => json!(auth_url(&account.access_token)),
            "page_count" => json!(store.pages.iter().filter(|p| p.owner == account.id).count()),
            _ => return fail("FIELDS_FORMAT_INVALID"),
        };
        result.insert(field, value);
    }
    ok(Value::Object(result))
}

async fn revoke_access_token(State(db): State<Db>, Query(params): Params) -> Json<Value> {
    let mut store = db.write().await;
    let Some(account) = store.account_by_token_mut(params.get("access_token")) else {
        return fail("ACCESS_TOKEN_INVALID");
    };
    account.access_token = new_token();
    ok(json!({
        "access_token": account.access_token,
        "auth_url": auth_url(&account.access_token),
    }))
}

async fn create_page(State(db): State<Db>, Query(params): Params) -> Json<Value> {
    let mut store = db.write().await;
    let Some(owner) = store.account_by_token(params.get("access_token")).map(|a| a.id) else {
        return fail("ACCESS_TOKEN_INVALID");
    };
    let title = param(&params, "title");
    if title.trim().is_empty() {
        return fail("TITLE_REQUIRED");
    }
    let Some(content) = parse_content(param(&params, "content")) else {
        return fail("CONTENT_FORMAT_INVALID");
    };

    let page = Page {
        owner,
        path: format!("{}-{}", slug(title), store.pages.len() + 1),
        title: title.to_string(),
        author_name: param(&params, "author_name").to_string(),
        author_url: param(&params, "author_url").to_string(),
        content,
        views: 0,
    };
    let result = page_json(&page, flag(&params, "return_content"), true);

    tracing::info!(path = %page.path, "page created");
    store.pages.push(page);
    ok(result)
}

async fn edit_page(
    State(db): State<Db>,
    Path(path): Path<String>,
    Query(params): Params,
) -> Json<Value> {
    let mut store = db.write().await;
    let Some(owner) = store.account_by_token(params.get("access_token")).map(|a| a.id) else {
        return fail("ACCESS_TOKEN_INVALID");
    };
    let title = param(&params, "title");
    if title.trim().is_empty() {
        return fail("TITLE_REQUIRED");
    }
    let Some(content) = parse_content(param(&params, "content")) else {
        return fail("CONTENT_FORMAT_INVALID");
    };
    let Some(page) = store.page_mut(&path) else {
        return fail("PAGE_NOT_FOUND");
    };
    if page.owner != owner {
        return fail("PAGE_ACCESS_DENIED");
    }

    page.title = title.to_string();
    page.content = content;
    if let Some(author_name) = params.get("author_name") {
        page.author_name = author_name.clone();
    }
    if let Some(author_url) = params.get("author_url") {
        page.author_url = author_url.clone();
    }
    ok(page_json(page, flag(&params, "return_content"), true))
}

async fn get_page(
    State(db): State<Db>,
    Path(path): Path<String>,
    Query(params): Params,
) -> Json<Value> {
    let mut store = db.write().await;
    let Some(page) = store.page_mut(&path) else {
        return fail("PAGE_NOT_FOUND");
    };
    page.views += 1;
    ok(page_json(page, flag(&params, "return_content"), false))
}

async fn get_page_list(State(db): State<Db>, Query(params): Params) -> Json<Value> {
    let store = db.read().await;
    let Some(account) = store.account_by_token(params.get("access_token")) else {
        return fail("ACCESS_TOKEN_INVALID");
    };
    let offset: usize = param(&params, "offset").parse().unwrap_or(0);
    let limit: usize = param(&params, "limit").parse().unwrap_or(50);

    let owned: Vec<&Page> = store.pages.iter().rev().filter(|p| p.owner == account.id).collect();
    let pages: Vec<Value> = owned
        .iter()
        .skip(offset)
        .take(limit)
        .map(|page| page_json(page, false, true))
        .collect();
    ok(json!({ "total_count": owned.len(), "pages": pages }))
}

async fn get_views(
    State(db): State<Db>,
    Path(path): Path<String>,
    Query(params): Params,
) -> Json<Value> {
    let hour_valid = param(&params, "hour")
        .parse::<i32>()
        .map(|hour| (0..=24).contains(&hour))
        .unwrap_or(true);
    if !hour_valid {
        return fail("HOUR_INVALID");
    }
    let mut store = db.write().await;
    let Some(page) = store.page_mut(&path) else {
        return fail("PAGE_NOT_FOUND");
    };
    ok(json!({ "views": page.views }))
}
