// ====================================
// tests/integration/notes_flow_tests.rs
// ====================================
//! Note CRUD behind the request gate
use axum::http::{Method, StatusCode};
use serde_json::json;
use crate::test_utils::*;

#[tokio::test]
async fn test_notes_require_a_token() {
    let (_state, app) = memory_app(test_settings());

    let (status, _) = send(&app, build_request(Method::GET, "/notes", None, None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let body = json!({ "title": "sneaky" });
    let (status, _) = send(&app, build_request(Method::POST, "/notes", None, None, Some(body))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_note_lifecycle() {
    let (_state, app, _temp_dir) = file_app(test_settings());
    let (token, user_id) = signed_in(&app, "alice1").await;

    let body = json!({ "title": "Groceries", "content": "milk" });
    let (status, note) = send(&app, build_request(Method::POST, "/notes", Some(&token), None, Some(body))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["title"], "Groceries");
    assert_eq!(note["userId"], user_id);
    let id = note["id"].as_i64().unwrap();

    let body = json!({ "id": id, "title": "Groceries", "content": "milk, eggs" });
    let uri = format!("/notes/{id}");
    let (status, _) = send(&app, build_request(Method::PUT, &uri, Some(&token), None, Some(body))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, notes) = send(&app, build_request(Method::GET, "/notes", Some(&token), None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notes.as_array().unwrap().len(), 1);
    assert_eq!(notes[0]["content"], "milk, eggs");

    let (status, _) = send(&app, build_request(Method::DELETE, &uri, Some(&token), None, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, notes) = send(&app, build_request(Method::GET, "/notes", Some(&token), None, None)).await;
    assert!(notes.as_array().unwrap().is_empty());

    // deleted notes can be neither updated nor deleted again
    let (status, _) = send(&app, build_request(Method::DELETE, &uri, Some(&token), None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let body = json!({ "title": "back from the dead" });
    let (status, _) = send(&app, build_request(Method::PUT, &uri, Some(&token), None, Some(body))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notes_are_listed_newest_first() {
    let (_state, app) = memory_app(test_settings());
    let (token, _) = signed_in(&app, "alice1").await;

    for title in ["first", "second", "third"] {
        let body = json!({ "title": title });
        let (status, _) = send(&app, build_request(Method::POST, "/notes", Some(&token), None, Some(body))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, notes) = send(&app, build_request(Method::GET, "/notes", Some(&token), None, None)).await;
    let titles: Vec<&str> = notes
        .as_array()
        .unwrap()
        .iter()
        .map(|note| note["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn test_note_validation() {
    let (_state, app) = memory_app(test_settings());
    let (token, _) = signed_in(&app, "alice1").await;

    let body = json!({ "title": "   " });
    let (status, error) = send(&app, build_request(Method::POST, "/notes", Some(&token), None, Some(body))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_messages(&error), vec!["Title is required.".to_string()]);

    let body = json!({ "title": "ok" });
    let (_, note) = send(&app, build_request(Method::POST, "/notes", Some(&token), None, Some(body))).await;
    let id = note["id"].as_i64().unwrap();

    let body = json!({ "id": id + 1, "title": "ok" });
    let (status, error) = send(
        &app,
        build_request(Method::PUT, &format!("/notes/{id}"), Some(&token), None, Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_messages(&error), vec!["Id mismatch.".to_string()]);
}

#[tokio::test]
async fn test_notes_are_scoped_to_their_owner() {
    let (_state, app) = memory_app(test_settings());
    let (alice, _) = signed_in(&app, "alice1").await;
    let (bob, _) = signed_in(&app, "bob22").await;

    let body = json!({ "title": "alice's secret" });
    let (_, note) = send(&app, build_request(Method::POST, "/notes", Some(&alice), None, Some(body))).await;
    let uri = format!("/notes/{}", note["id"].as_i64().unwrap());

    let (_, notes) = send(&app, build_request(Method::GET, "/notes", Some(&bob), None, None)).await;
    assert!(notes.as_array().unwrap().is_empty());

    let body = json!({ "title": "bob was here" });
    let (status, _) = send(&app, build_request(Method::PUT, &uri, Some(&bob), None, Some(body))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, build_request(Method::DELETE, &uri, Some(&bob), None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, notes) = send(&app, build_request(Method::GET, "/notes", Some(&alice), None, None)).await;
    assert_eq!(notes[0]["title"], "alice's secret");
}
