use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use wintender_mock::{app, DEFAULT_TOKEN};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn authed(method: &str, uri: &str) -> http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {DEFAULT_TOKEN}"))
}

fn get(uri: &str) -> Request<String> {
    authed("GET", uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    authed(method, uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn multipart_request(method: &str, uri: &str, fields: &[(&str, &str)], file: Option<(&str, &str)>) -> Request<String> {
    let boundary = "test-boundary";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    if let Some((name, file_name)) = file {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\nbytes\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));
    authed(method, uri)
        .header(http::header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(body)
        .unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_token_is_401_with_message() {
    let resp = app()
        .oneshot(Request::builder().uri("/users/user/list").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn wrong_token_is_401() {
    let req = Request::builder()
        .uri("/commons/setting")
        .header(http::header::AUTHORIZATION, "Bearer nope")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- users ---

#[tokio::test]
async fn list_users_is_a_page() {
    let resp = app().oneshot(get("/users/user/list?page=0&size=2")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let page = body_json(resp).await;
    assert_eq!(page["totalElements"], 3);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["content"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn view_missing_user_is_404() {
    let resp = app().oneshot(get("/users/user/view/999")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["message"], "User not found");
}

// --- entities ---

#[tokio::test]
async fn register_entity_from_multipart() {
    let req = multipart_request(
        "POST",
        "/entities/register",
        &[("name", "Lalibela Supplies"), ("tinNumber", "0099887766")],
        Some(("logo", "logo.png")),
    );
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Entity registered successfully");
    assert_eq!(body["data"]["name"], "Lalibela Supplies");
    assert_eq!(body["data"]["logoUrl"], "/files/logo.png");
    assert_eq!(body["data"]["status"], "PENDING");
}

#[tokio::test]
async fn register_entity_without_name_is_400() {
    let req = multipart_request("POST", "/entities/register", &[("email", "a@b.et")], None);
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "name is required");
}

#[tokio::test]
async fn update_missing_entity_is_404() {
    let req = multipart_request("PUT", "/entities/update/999", &[("name", "x")], None);
    let resp = app().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- chat ---

#[tokio::test]
async fn send_chat_wraps_message_in_ack() {
    let resp = app()
        .oneshot(json_request("POST", "/ai/chat", r#"{"message":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Message sent");
    assert_eq!(body["data"]["message"], "hello");
}

#[tokio::test]
async fn delete_missing_chat_is_404() {
    let resp = app()
        .oneshot(authed("DELETE", "/ai/chat/12345").body(String::new()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- reports / commons ---

#[tokio::test]
async fn actuator_reports_up() {
    let resp = app().oneshot(get("/reports/server/actuator")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["status"], "UP");
    assert_eq!(body["components"]["db"]["status"], "UP");
}

#[tokio::test]
async fn settings_reject_non_numeric_vat() {
    let resp = app()
        .oneshot(json_request("PUT", "/commons/setting", r#"{"vatRate":"abc"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn system_errors_filter_by_status_code() {
    let resp = app().oneshot(get("/commons/errors?filter=404")).await.unwrap();
    let page = body_json(resp).await;
    assert_eq!(page["totalElements"], 1);
    assert_eq!(page["content"][0]["path"], "/tenders/99");
}
