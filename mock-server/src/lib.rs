//! In-memory stand-in for the OneSignal REST API.
//!
//! Serves the endpoints the client calls under `/api/v1`, checks the
//! `Authorization: Basic <key>` header, and answers errors in the service's
//! `{"errors": ...}` shape. State lives for the router's lifetime.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_LIST_LIMIT: usize = 50;

type Object = Map<String, Value>;

#[derive(Default)]
pub struct Store {
    apps: Vec<Object>,
    players: Vec<Object>,
    notifications: Vec<Object>,
}

#[derive(Clone)]
pub struct AppState {
    api_key: Arc<str>,
    store: Arc<RwLock<Store>>,
}

/// An error answer in the service's shape.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    errors: Value,
}

impl ApiFailure {
    fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            errors: json!([message]),
        }
    }

    fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            errors: json!([message]),
        }
    }

    fn field(field: &str, message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            errors: Value::Object(Map::from_iter([(field.to_string(), json!(message))])),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "errors": self.errors }))).into_response()
    }
}

type ApiResult = Result<Json<Value>, ApiFailure>;

/// Query string of the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    app_id: Option<String>,
    offset: Option<usize>,
    limit: Option<usize>,
}

pub fn app(api_key: &str) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        store: Arc::new(RwLock::new(Store::default())),
    };

    let api = Router::new()
        .route("/notifications", get(list_notifications).post(create_notification))
        .route(
            "/notifications/{id}",
            get(notification_details).put(open_notification).delete(cancel_notification),
        )
        .route("/apps", get(list_apps).post(create_app))
        .route("/apps/{id}", get(app_details).put(update_app))
        .route("/players", get(list_players).post(create_player))
        .route("/players/csv_export", post(csv_export))
        .route("/players/{id}", get(player_details).put(update_player))
        .route("/players/{id}/on_session", post(on_session))
        .route("/players/{id}/on_purchase", post(on_purchase))
        .route("/players/{id}/on_focus", post(on_focus))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new().nest("/api/v1", api).with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(api_key)).await
}

async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Basic {}", state.api_key);
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        return ApiFailure::bad_request(
            "Please include a case-sensitive header of Authorization: Basic <YOUR-REST-API-KEY-HERE> with a valid REST API key.",
        )
        .into_response();
    }
    next.run(request).await
}

fn required_app_id(value: Option<&Value>) -> Result<String, ApiFailure> {
    match value {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        _ => Err(ApiFailure::bad_request("app_id not found. You may be missing a Content-Type: application/json header.")),
    }
}

fn has_id(item: &Object, id: &str) -> bool {
    item.get("id").and_then(Value::as_str) == Some(id)
}

fn find<'a>(items: &'a [Object], id: &str) -> Option<&'a Object> {
    items.iter().find(|item| has_id(item, id))
}

fn find_mut<'a>(items: &'a mut [Object], id: &str) -> Option<&'a mut Object> {
    items.iter_mut().find(|item| has_id(item, id))
}

fn page(items: Vec<Value>, query: &ListQuery) -> (usize, usize, Vec<Value>) {
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    (offset, limit, items.into_iter().skip(offset).take(limit).collect())
}

// --- notifications ---

async fn list_notifications(State(state): State<AppState>, Query(query): Query<ListQuery>) -> ApiResult {
    let app_id = required_app_id(query.app_id.clone().map(Value::String).as_ref())?;
    let store = state.store.read().await;
    let matching: Vec<Value> = store
        .notifications
        .iter()
        .filter(|n| n.get("app_id").and_then(Value::as_str) == Some(app_id.as_str()))
        .cloned()
        .map(Value::Object)
        .collect();
    let total = matching.len();
    let (offset, limit, notifications) = page(matching, &query);
    Ok(Json(json!({
        "total_count": total,
        "offset": offset,
        "limit": limit,
        "notifications": notifications,
    })))
}

async fn create_notification(State(state): State<AppState>, Json(input): Json<Object>) -> ApiResult {
    let app_id = required_app_id(input.get("app_id"))?;
    let has_contents = input.get("contents").and_then(Value::as_object).is_some_and(|c| c.contains_key("en"));
    if !has_contents && !input.contains_key("template_id") {
        return Err(ApiFailure::bad_request("Notification content must not be null for any languages."));
    }
    let recipients = input
        .get("include_player_ids")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);

    let id = Uuid::new_v4().to_string();
    let mut notification = input;
    notification.insert("id".to_string(), json!(id));
    notification.insert("app_id".to_string(), json!(app_id));
    notification.insert("successful".to_string(), json!(recipients));
    notification.insert("failed".to_string(), json!(0));
    notification.insert("converted".to_string(), json!(0));
    notification.insert("remaining".to_string(), json!(0));
    notification.insert("canceled".to_string(), json!(false));
    state.store.write().await.notifications.push(notification);

    Ok(Json(json!({ "id": id, "recipients": recipients })))
}

async fn notification_details(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let store = state.store.read().await;
    let notification = find(&store.notifications, &id).ok_or_else(|| ApiFailure::not_found("Couldn't find notification"))?;
    Ok(Json(Value::Object(notification.clone())))
}

async fn open_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<Object>,
) -> ApiResult {
    if input.get("opened") != Some(&Value::Bool(true)) {
        return Err(ApiFailure::field("opened", "must be true"));
    }
    let mut store = state.store.write().await;
    let notification = find_mut(&mut store.notifications, &id).ok_or_else(|| ApiFailure::not_found("Couldn't find notification"))?;
    let converted = notification.get("converted").and_then(Value::as_u64).unwrap_or(0);
    notification.insert("converted".to_string(), json!(converted + 1));
    Ok(Json(json!({ "success": true })))
}

async fn cancel_notification(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let mut store = state.store.write().await;
    let notification = find_mut(&mut store.notifications, &id).ok_or_else(|| ApiFailure::not_found("Couldn't find notification"))?;
    notification.insert("canceled".to_string(), json!(true));
    Ok(Json(json!({ "success": true })))
}

// --- apps ---

async fn list_apps(State(state): State<AppState>) -> ApiResult {
    let store = state.store.read().await;
    Ok(Json(Value::Array(store.apps.iter().cloned().map(Value::Object).collect())))
}

async fn create_app(State(state): State<AppState>, Json(input): Json<Object>) -> ApiResult {
    let named = input.get("name").and_then(Value::as_str).is_some_and(|n| !n.is_empty());
    if !named {
        return Err(ApiFailure::field("name", "Name can't be blank"));
    }
    let mut app = input;
    app.remove("app_id");
    app.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
    app.insert("players".to_string(), json!(0));
    app.insert("messagable_players".to_string(), json!(0));
    state.store.write().await.apps.push(app.clone());
    Ok(Json(Value::Object(app)))
}

async fn app_details(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let store = state.store.read().await;
    let app = find(&store.apps, &id).ok_or_else(|| ApiFailure::not_found("App not found"))?;
    Ok(Json(Value::Object(app.clone())))
}

async fn update_app(State(state): State<AppState>, Path(id): Path<String>, Json(mut input): Json<Object>) -> ApiResult {
    input.remove("app_id");
    input.remove("id");
    let mut store = state.store.write().await;
    let app = find_mut(&mut store.apps, &id).ok_or_else(|| ApiFailure::not_found("App not found"))?;
    app.extend(input);
    Ok(Json(Value::Object(app.clone())))
}

// --- players ---

async fn list_players(State(state): State<AppState>, Query(query): Query<ListQuery>) -> ApiResult {
    let app_id = required_app_id(query.app_id.clone().map(Value::String).as_ref())?;
    let store = state.store.read().await;
    let matching: Vec<Value> = store
        .players
        .iter()
        .filter(|p| p.get("app_id").and_then(Value::as_str) == Some(app_id.as_str()))
        .cloned()
        .map(Value::Object)
        .collect();
    let total = matching.len();
    let (offset, limit, players) = page(matching, &query);
    Ok(Json(json!({
        "total_count": total,
        "offset": offset,
        "limit": limit,
        "players": players,
    })))
}

async fn create_player(State(state): State<AppState>, Json(input): Json<Object>) -> ApiResult {
    required_app_id(input.get("app_id"))?;
    if !input.get("device_type").is_some_and(Value::is_i64) {
        return Err(ApiFailure::bad_request("Device type must be an integer"));
    }
    let id = Uuid::new_v4().to_string();
    let mut player = input;
    player.insert("id".to_string(), json!(id));
    player.insert("session_count".to_string(), json!(0));
    player.insert("amount_spent".to_string(), json!(0.0));
    player.insert("playtime".to_string(), json!(0));
    state.store.write().await.players.push(player);
    Ok(Json(json!({ "success": true, "id": id })))
}

async fn player_details(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let store = state.store.read().await;
    let player = find(&store.players, &id).ok_or_else(|| ApiFailure::not_found("No user with this id found"))?;
    Ok(Json(Value::Object(player.clone())))
}

async fn update_player(State(state): State<AppState>, Path(id): Path<String>, Json(mut input): Json<Object>) -> ApiResult {
    input.remove("id");
    let mut store = state.store.write().await;
    let player = find_mut(&mut store.players, &id).ok_or_else(|| ApiFailure::not_found("No user with this id found"))?;
    player.extend(input);
    Ok(Json(json!({ "success": true })))
}

async fn on_session(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    let mut store = state.store.write().await;
    let player = find_mut(&mut store.players, &id).ok_or_else(|| ApiFailure::not_found("No user with this id found"))?;
    let count = player.get("session_count").and_then(Value::as_u64).unwrap_or(0);
    player.insert("session_count".to_string(), json!(count + 1));
    Ok(Json(json!({ "success": true })))
}

async fn on_purchase(State(state): State<AppState>, Path(id): Path<String>, Json(input): Json<Object>) -> ApiResult {
    let purchases = input
        .get("purchases")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiFailure::field("purchases", "can't be blank"))?;
    let spent: f64 = purchases
        .iter()
        .filter_map(|p| p.get("amount").and_then(Value::as_f64))
        .sum();

    let mut store = state.store.write().await;
    let player = find_mut(&mut store.players, &id).ok_or_else(|| ApiFailure::not_found("No user with this id found"))?;
    let total = player.get("amount_spent").and_then(Value::as_f64).unwrap_or(0.0) + spent;
    player.insert("amount_spent".to_string(), json!(total));
    Ok(Json(json!({ "success": true })))
}

async fn on_focus(State(state): State<AppState>, Path(id): Path<String>, Json(input): Json<Object>) -> ApiResult {
    if input.get("state").and_then(Value::as_str) != Some("ping") {
        return Err(ApiFailure::field("state", "must be ping"));
    }
    let active_time = input
        .get("active_time")
        .and_then(Value::as_u64)
        .ok_or_else(|| ApiFailure::field("active_time", "must be a number"))?;

    let mut store = state.store.write().await;
    let player = find_mut(&mut store.players, &id).ok_or_else(|| ApiFailure::not_found("No user with this id found"))?;
    let playtime = player.get("playtime").and_then(Value::as_u64).unwrap_or(0);
    player.insert("playtime".to_string(), json!(playtime + active_time));
    Ok(Json(json!({ "success": true })))
}

async fn csv_export(Json(input): Json<Object>) -> ApiResult {
    let app_id = required_app_id(input.get("app_id"))?;
    Ok(Json(json!({
        "csv_file_url": format!("https://onesignal.com/csv_exports/{app_id}/users_{}.csv.gz", Uuid::new_v4().simple()),
    })))
}
