//! In-memory mock of the Wintender REST API.
//!
//! Serves every endpoint the dashboard consumes from seeded state. All
//! routes require `Authorization: Bearer <token>`; failures carry a JSON
//! `{"message": …}` body like the real server.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_TOKEN: &str = "mock-token";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub role: String,
    pub status: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tin_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub documents: Vec<String>,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub message: String,
    pub reply: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clarification {
    pub id: i64,
    pub tender_id: i64,
    pub question: String,
    pub answer: Option<String>,
    pub status: String,
    pub created_at: String,
    pub answered_at: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemError {
    pub id: i64,
    pub message: String,
    pub path: String,
    pub method: String,
    pub status_code: u16,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct ChatPrompt {
    pub message: String,
}

#[derive(Deserialize)]
pub struct ClarificationQuestion {
    pub question: String,
}

#[derive(Deserialize)]
pub struct ClarificationAnswer {
    pub answer: String,
}

/// Query parameters accepted by list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub search: Option<String>,
    pub filter: Option<String>,
    pub phone: Option<String>,
}

#[derive(Default)]
pub struct MockDb {
    pub users: Vec<User>,
    pub entities: Vec<Entity>,
    pub chat: Vec<ChatMessage>,
    pub clarifications: Vec<Clarification>,
    pub errors: Vec<SystemError>,
    pub settings: Map<String, Value>,
    next_id: i64,
}

impl MockDb {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Seed data shared by tests and the standalone binary.
    pub fn seeded() -> Self {
        let user = |id, first: &str, last: &str, email: &str, phone: &str, role: &str, status: &str| User {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone_number: phone.to_string(),
            role: role.to_string(),
            status: status.to_string(),
            created_at: "2026-01-10T08:30:00Z".to_string(),
        };
        let mut settings = Map::new();
        settings.insert("siteName".to_string(), json!("Wintender"));
        settings.insert("vatRate".to_string(), json!(15));
        settings.insert("maintenanceMode".to_string(), json!(false));

        Self {
            users: vec![
                user(1, "Sara", "Bekele", "sara@wintender.et", "0911223344", "ADMIN", "ACTIVE"),
                user(2, "Dawit", "Alemu", "dawit@wintender.et", "0922334455", "SUPPORT", "ACTIVE"),
                user(3, "Hana", "Tesfaye", "hana@bidder.et", "0933445566", "BIDDER", "SUSPENDED"),
            ],
            entities: vec![
                Entity {
                    id: 10,
                    name: "Abay Trading PLC".to_string(),
                    tin_number: Some("0012345678".to_string()),
                    email: Some("info@abay.et".to_string()),
                    phone_number: Some("0115556677".to_string()),
                    entity_type: Some("SUPPLIER".to_string()),
                    status: "APPROVED".to_string(),
                    created_at: "2026-02-01T09:00:00Z".to_string(),
                    ..Default::default()
                },
                Entity {
                    id: 11,
                    name: "Tana Construction".to_string(),
                    entity_type: Some("CONTRACTOR".to_string()),
                    status: "PENDING".to_string(),
                    created_at: "2026-02-15T11:45:00Z".to_string(),
                    ..Default::default()
                },
            ],
            errors: vec![
                SystemError {
                    id: 20,
                    message: "NullPointerException in PaymentService".to_string(),
                    path: "/payments/verify".to_string(),
                    method: "POST".to_string(),
                    status_code: 500,
                    created_at: "2026-03-01T10:00:00Z".to_string(),
                },
                SystemError {
                    id: 21,
                    message: "Tender not found".to_string(),
                    path: "/tenders/99".to_string(),
                    method: "GET".to_string(),
                    status_code: 404,
                    created_at: "2026-03-02T12:30:00Z".to_string(),
                },
            ],
            settings,
            next_id: 100,
            ..Default::default()
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<RwLock<MockDb>>,
    pub token: Arc<str>,
}

impl AppState {
    pub fn new(db: MockDb, token: &str) -> Self {
        Self {
            db: Arc::new(RwLock::new(db)),
            token: Arc::from(token),
        }
    }
}

/// Router over seeded data accepting [`DEFAULT_TOKEN`].
pub fn app() -> Router {
    app_with(AppState::new(MockDb::seeded(), DEFAULT_TOKEN))
}

pub fn app_with(state: AppState) -> Router {
    Router::new()
        .route("/ai/chat", get(list_chat).post(send_chat))
        .route("/ai/chat/{id}", delete(delete_chat))
        .route(
            "/tenders/clarification/{id}",
            get(list_clarifications).post(ask_clarification).put(answer_clarification),
        )
        .route("/reports/statistics/summary", get(statistics_summary))
        .route("/reports/server/actuator", get(actuator))
        .route("/entities/list", get(list_entities))
        .route("/entities/register", post(register_entity))
        .route("/entities/update/{id}", put(update_entity))
        .route("/commons/setting", get(get_settings).put(update_settings))
        .route("/commons/errors", get(list_errors))
        .route("/users/user/list", get(list_users))
        .route("/users/user/view/{id}", get(view_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", state.token);
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if !authorized {
        tracing::debug!(path = %request.uri().path(), "rejected unauthenticated request");
        return failure(StatusCode::UNAUTHORIZED, "Full authentication is required");
    }
    next.run(request).await
}

/// Filter, sort and page `items` the way the real list endpoints do.
///
/// `search` matches `search_fields` case-insensitively, `phone` matches
/// `phoneNumber` by substring, `filter` must equal `filter_field`. `sort` is
/// `field` or `field,desc`.
fn paginate<T: Serialize>(items: &[T], query: &ListQuery, search_fields: &[&str], filter_field: &str) -> Value {
    let text = |v: &Value, field: &str| match v.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };

    let mut rows: Vec<Value> = items
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .filter(|row| match query.search.as_deref().filter(|s| !s.is_empty()) {
            Some(search) => {
                let needle = search.to_lowercase();
                search_fields.iter().any(|f| text(row, f).to_lowercase().contains(&needle))
            }
            None => true,
        })
        .filter(|row| match query.phone.as_deref().filter(|s| !s.is_empty()) {
            Some(phone) => text(row, "phoneNumber").contains(phone),
            None => true,
        })
        .filter(|row| match query.filter.as_deref().filter(|s| !s.is_empty()) {
            Some(filter) => text(row, filter_field).eq_ignore_ascii_case(filter),
            None => true,
        })
        .collect();

    if let Some(sort) = query.sort.as_deref().filter(|s| !s.is_empty()) {
        let (field, descending) = match sort.split_once(',') {
            Some((field, dir)) => (field, dir.eq_ignore_ascii_case("desc")),
            None => (sort, false),
        };
        rows.sort_by(|a, b| match (a.get(field).and_then(Value::as_i64), b.get(field).and_then(Value::as_i64)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => text(a, field).cmp(&text(b, field)),
        });
        if descending {
            rows.reverse();
        }
    }

    let size = query.size.unwrap_or(10).max(1);
    let page = query.page.unwrap_or(0);
    let total = rows.len();
    let content: Vec<Value> = rows
        .into_iter()
        .skip(page as usize * size as usize)
        .take(size as usize)
        .collect();
    json!({
        "content": content,
        "totalElements": total,
        "totalPages": total.div_ceil(size as usize),
        "number": page,
        "size": size,
    })
}

// --- chat ---

async fn list_chat(State(state): State<AppState>) -> Json<Vec<ChatMessage>> {
    Json(state.db.read().await.chat.clone())
}

async fn send_chat(State(state): State<AppState>, Json(prompt): Json<ChatPrompt>) -> Response {
    if prompt.message.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "message must not be empty");
    }
    let mut db = state.db.write().await;
    let message = ChatMessage {
        id: db.next_id(),
        reply: format!("Noted: {}", prompt.message),
        message: prompt.message,
        created_at: now(),
    };
    db.chat.push(message.clone());
    (StatusCode::CREATED, Json(json!({ "message": "Message sent", "data": message }))).into_response()
}

async fn delete_chat(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let mut db = state.db.write().await;
    let before = db.chat.len();
    db.chat.retain(|m| m.id != id);
    if db.chat.len() == before {
        return failure(StatusCode::NOT_FOUND, "Chat message not found");
    }
    Json(json!({ "message": "Chat message deleted" })).into_response()
}

// --- clarifications ---

async fn list_clarifications(State(state): State<AppState>, Path(tender_id): Path<i64>) -> Json<Vec<Clarification>> {
    let db = state.db.read().await;
    Json(db.clarifications.iter().filter(|c| c.tender_id == tender_id).cloned().collect())
}

async fn ask_clarification(
    State(state): State<AppState>,
    Path(tender_id): Path<i64>,
    Json(input): Json<ClarificationQuestion>,
) -> Response {
    if input.question.trim().is_empty() {
        return failure(StatusCode::BAD_REQUEST, "question must not be empty");
    }
    let mut db = state.db.write().await;
    let clarification = Clarification {
        id: db.next_id(),
        tender_id,
        question: input.question,
        answer: None,
        status: "PENDING".to_string(),
        created_at: now(),
        answered_at: None,
    };
    db.clarifications.push(clarification.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Clarification submitted", "data": clarification })),
    )
        .into_response()
}

async fn answer_clarification(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ClarificationAnswer>,
) -> Response {
    let mut db = state.db.write().await;
    let Some(clarification) = db.clarifications.iter_mut().find(|c| c.id == id) else {
        return failure(StatusCode::NOT_FOUND, "Clarification not found");
    };
    clarification.answer = Some(input.answer);
    clarification.status = "ANSWERED".to_string();
    clarification.answered_at = Some(now());
    Json(json!({ "message": "Clarification answered", "data": clarification })).into_response()
}

// --- reports ---

async fn statistics_summary(State(state): State<AppState>) -> Json<Value> {
    let db = state.db.read().await;
    Json(json!({
        "totalUsers": db.users.len(),
        "totalEntities": db.entities.len(),
        "totalTenders": 12,
        "totalPayments": 0,
        "totalRevenue": 0.0,
    }))
}

async fn actuator() -> Json<Value> {
    Json(json!({
        "status": "UP",
        "components": {
            "db": { "status": "UP" },
            "diskSpace": { "status": "UP", "details": { "free": 52_428_800 } },
        }
    }))
}

// --- entities ---

#[derive(Default)]
struct EntityFields {
    text: BTreeMap<String, String>,
    logo: Option<String>,
    documents: Vec<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<EntityFields, Response> {
    let bad = |e: axum::extract::multipart::MultipartError| failure(StatusCode::BAD_REQUEST, &e.to_string());
    let mut fields = EntityFields::default();
    while let Some(field) = multipart.next_field().await.map_err(bad)? {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                field.bytes().await.map_err(bad)?;
                if name == "logo" {
                    fields.logo = Some(file_name);
                } else {
                    fields.documents.push(file_name);
                }
            }
            None => {
                let value = field.text().await.map_err(bad)?;
                fields.text.insert(name, value);
            }
        }
    }
    Ok(fields)
}

fn apply(entity: &mut Entity, fields: EntityFields) {
    let mut text = fields.text;
    if let Some(name) = text.remove("name") {
        entity.name = name;
    }
    for (key, slot) in [
        ("tinNumber", &mut entity.tin_number),
        ("email", &mut entity.email),
        ("phoneNumber", &mut entity.phone_number),
        ("address", &mut entity.address),
        ("entityType", &mut entity.entity_type),
    ] {
        if let Some(value) = text.remove(key) {
            *slot = Some(value);
        }
    }
    if let Some(logo) = fields.logo {
        entity.logo_url = Some(format!("/files/{logo}"));
    }
    entity.documents.extend(fields.documents);
}

async fn list_entities(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Json<Value> {
    let db = state.db.read().await;
    Json(paginate(&db.entities, &query, &["name", "email", "tinNumber"], "status"))
}

async fn register_entity(State(state): State<AppState>, multipart: Multipart) -> Response {
    let fields = match read_form(multipart).await {
        Ok(fields) => fields,
        Err(response) => return response,
    };
    if fields.text.get("name").is_none_or(|n| n.trim().is_empty()) {
        return failure(StatusCode::BAD_REQUEST, "name is required");
    }
    let mut db = state.db.write().await;
    let mut entity = Entity {
        id: db.next_id(),
        status: "PENDING".to_string(),
        created_at: now(),
        ..Default::default()
    };
    apply(&mut entity, fields);
    tracing::info!(id = entity.id, name = %entity.name, "entity registered");
    db.entities.push(entity.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Entity registered successfully", "data": entity })),
    )
        .into_response()
}

async fn update_entity(State(state): State<AppState>, Path(id): Path<i64>, multipart: Multipart) -> Response {
    let fields = match read_form(multipart).await {
        Ok(fields) => fields,
        Err(response) => return response,
    };
    let mut db = state.db.write().await;
    let Some(entity) = db.entities.iter_mut().find(|e| e.id == id) else {
        return failure(StatusCode::NOT_FOUND, "Entity not found");
    };
    apply(entity, fields);
    Json(json!({ "message": "Entity updated successfully", "data": entity })).into_response()
}

// --- commons ---

async fn get_settings(State(state): State<AppState>) -> Json<Map<String, Value>> {
    Json(state.db.read().await.settings.clone())
}

async fn update_settings(State(state): State<AppState>, Json(input): Json<Map<String, Value>>) -> Response {
    if input.get("vatRate").is_some_and(|v| !v.is_number()) {
        return failure(StatusCode::BAD_REQUEST, "vatRate must be numeric");
    }
    let mut db = state.db.write().await;
    db.settings.extend(input);
    Json(json!({ "message": "Settings updated", "data": db.settings })).into_response()
}

async fn list_errors(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Json<Value> {
    let db = state.db.read().await;
    Json(paginate(&db.errors, &query, &["message", "path"], "statusCode"))
}

// --- users ---

async fn list_users(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Json<Value> {
    let db = state.db.read().await;
    Json(paginate(&db.users, &query, &["firstName", "lastName", "email"], "role"))
}

async fn view_user(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let db = state.db.read().await;
    match db.users.iter().find(|u| u.id == id) {
        Some(user) => Json(user.clone()).into_response(),
        None => failure(StatusCode::NOT_FOUND, "User not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_pages_and_counts() {
        let db = MockDb::seeded();
        let query = ListQuery {
            page: Some(1),
            size: Some(2),
            ..Default::default()
        };
        let page = paginate(&db.users, &query, &["email"], "role");
        assert_eq!(page["totalElements"], 3);
        assert_eq!(page["totalPages"], 2);
        assert_eq!(page["content"].as_array().unwrap().len(), 1);
        assert_eq!(page["content"][0]["id"], 3);
    }

    #[test]
    fn paginate_search_phone_filter() {
        let db = MockDb::seeded();
        let query = ListQuery {
            search: Some("WINTENDER".to_string()),
            filter: Some("support".to_string()),
            ..Default::default()
        };
        let page = paginate(&db.users, &query, &["email"], "role");
        assert_eq!(page["totalElements"], 1);
        assert_eq!(page["content"][0]["firstName"], "Dawit");

        let query = ListQuery {
            phone: Some("0933".to_string()),
            ..Default::default()
        };
        let page = paginate(&db.users, &query, &["email"], "role");
        assert_eq!(page["content"][0]["id"], 3);
    }

    #[test]
    fn paginate_sorts_descending() {
        let db = MockDb::seeded();
        let query = ListQuery {
            sort: Some("id,desc".to_string()),
            ..Default::default()
        };
        let page = paginate(&db.users, &query, &[], "role");
        let ids: Vec<_> = page["content"].as_array().unwrap().iter().map(|u| u["id"].clone()).collect();
        assert_eq!(ids, vec![json!(3), json!(2), json!(1)]);
    }

    #[test]
    fn seeded_ids_do_not_collide() {
        let mut db = MockDb::seeded();
        let id = db.next_id();
        assert!(db.users.iter().all(|u| u.id != id));
        assert!(db.entities.iter().all(|e| e.id != id));
    }
}
