use drive_ox::{Drive, DriveRequestError, FileQuery, FileView, UpdateFilePayload};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_body(ids: &[&str], current: u32, total: u32) -> serde_json::Value {
    json!({
        "files": ids.iter().map(|id| json!({
            "id": id,
            "name": format!("{id}.txt"),
            "type": "file",
            "mimeType": "text/plain",
            "size": "10",
        })).collect::<Vec<_>>(),
        "meta": {"currentPage": current, "totalPages": total},
    })
}

#[tokio::test]
async fn session_parses_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"id": "u1", "name": "Ada", "email": "ada@example.com"},
        })))
        .mount(&server)
        .await;

    let client = Drive::new(server.uri());
    let session = client.session().await.expect("request should succeed");
    assert_eq!(session.expect("session should be present").user.id, "u1");
}

#[tokio::test]
async fn non_json_session_body_means_no_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/session"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let client = Drive::new(server.uri());
    let session = client.session().await.expect("request should succeed");
    assert!(session.is_none());
}

#[tokio::test]
async fn list_files_sends_view_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .and(query_param("op", "find"))
        .and(query_param("type", "file"))
        .and(query_param("category", "movies"))
        .and(query_param("page", "1"))
        .and(query_param("pageSize", "500"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&["f1"], 1, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let client = Drive::new(server.uri());
    let query = FileQuery::new(FileView::Category, "/movies/");
    let page = client.list_files(&query, 1).await.expect("request should succeed");
    assert_eq!(page.files.len(), 1);
    assert_eq!(page.meta.next_page(), None);
}

#[tokio::test]
async fn update_file_patches_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/files/f1"))
        .and(body_json(json!({"starred": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "f1",
            "name": "one.txt",
            "type": "file",
            "mimeType": "text/plain",
            "size": "10",
            "starred": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Drive::new(server.uri());
    let payload = UpdateFilePayload::builder().starred(true).build();
    let record = client.update_file("f1", &payload).await.expect("request should succeed");
    assert!(record.starred);
}

#[tokio::test]
async fn delete_files_posts_id_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/files/delete"))
        .and(body_json(json!({"files": ["f1", "f2"]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = Drive::new(server.uri());
    client
        .delete_files(&["f1".to_string(), "f2".to_string()])
        .await
        .expect("request should succeed");
}

#[tokio::test]
async fn delete_session_targets_the_hash() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/sessions/abc123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = Drive::new(server.uri());
    client.delete_session("abc123").await.expect("request should succeed");
}

#[tokio::test]
async fn upload_stats_passes_days() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/uploads/stats"))
        .and(query_param("days", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"uploadDate": "2026-08-20T00:00:00Z", "totalUploaded": 1073741824u64},
        ])))
        .mount(&server)
        .await;

    let client = Drive::new(server.uri());
    let stats = client.upload_stats(7).await.expect("request should succeed");
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].total_uploaded, 1_073_741_824);
}

#[tokio::test]
async fn bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/sessions"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Drive::builder()
        .base_url(server.uri())
        .token("secret")
        .build();
    let sessions = client.sessions().await.expect("request should succeed");
    assert!(sessions.is_empty());
}

#[tokio::test]
async fn session_cookie_is_sent_without_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/sessions"))
        .and(header("cookie", "drive.sid=c0ffee"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Drive::builder()
        .base_url(server.uri())
        .session_cookie("c0ffee")
        .build();
    client.sessions().await.expect("request should succeed");
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users/sessions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "no session"}})),
        )
        .mount(&server)
        .await;

    let client = Drive::new(server.uri());
    let err = client.sessions().await.expect_err("request should fail");
    assert!(!err.is_retryable());
    match err {
        DriveRequestError::Authentication(msg) => assert_eq!(msg, "no session"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn debug_redacts_credentials() {
    let client = Drive::builder()
        .base_url("http://localhost:3000")
        .token("super-secret")
        .build();
    let debug = format!("{client:?}");
    assert!(debug.contains("[REDACTED]"));
    assert!(!debug.contains("super-secret"));
}
