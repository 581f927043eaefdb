//! Store and app flows against a mock comments backend.

use comments_shared::api::{CommentFilters, CreateCommentRequest, FilterPatch};
use comments_tui::api::ApiClient;
use comments_tui::app::{App, FormState};
use comments_tui::store::CommentStore;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&format!("{}/api", server.uri()))
}

fn comment_json(id: &str, task_id: &str, content: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "taskId": task_id,
        "userId": "u1",
        "userName": "Alice",
        "content": content,
        "createdAt": "2024-03-01T10:00:00.000Z",
        "updatedAt": "2024-03-01T10:00:00.000Z"
    })
}

fn page_json(comments: Vec<serde_json::Value>, total_records: u64) -> serde_json::Value {
    json!({
        "data": comments,
        "pagination": {
            "currentPage": 1,
            "totalPages": 1,
            "hasNextPage": false,
            "hasPrevPage": false,
            "totalRecords": total_records
        }
    })
}

#[tokio::test]
async fn created_comment_is_listed_for_its_task() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/comments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(comment_json("c42", "t1", "hello")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/comments/all"))
        .and(query_param("taskId", "t1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![comment_json("c42", "t1", "hello")], 1)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/comments/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0)))
        .mount(&server)
        .await;

    let api = client(&server);
    let mut store = CommentStore::new();

    let created = store
        .create_comment(
            &api,
            &CreateCommentRequest {
                task_id: "t1".to_string(),
                user_id: "u1".to_string(),
                user_name: "Alice".to_string(),
                content: "hello".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(created.id, "c42");

    store
        .fetch_comments(&api, &FilterPatch::from(CommentFilters::default().with_task_id("t1")))
        .await;

    assert_eq!(store.filters.task_id, "t1");
    let listed = store.get(0).expect("created comment is listed");
    assert_eq!(listed.content, "hello");
    assert_eq!(listed.id, "c42");
}

#[tokio::test]
async fn delete_lowers_total_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/comments/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![
                comment_json("c1", "t1", "one"),
                comment_json("c2", "t1", "two"),
                comment_json("c3", "t1", "three"),
            ],
            3,
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/comments/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Comment deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/comments/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![comment_json("c2", "t1", "two"), comment_json("c3", "t1", "three")],
            2,
        )))
        .mount(&server)
        .await;

    let api = client(&server);
    let mut store = CommentStore::new();

    store.refresh(&api).await;
    let before = store.pagination.total_records;

    store.delete_comment(&api, "c1").await.unwrap();

    assert_eq!(store.pagination.total_records, before - 1);
    assert!(store.comments.iter().all(|c| c.id != "c1"));
}

#[tokio::test]
async fn failed_refetch_keeps_the_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/comments/all"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![comment_json("c1", "t1", "one")], 1)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/comments/all"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "Database error" })))
        .mount(&server)
        .await;

    let api = client(&server);
    let mut store = CommentStore::new();

    store.refresh(&api).await;
    let pagination = store.pagination.clone();

    store
        .fetch_comments(&api, &FilterPatch::from(CommentFilters::default().with_search("x")))
        .await;

    assert_eq!(store.error.as_deref(), Some("Database error"));
    assert_eq!(store.comments.len(), 1);
    assert_eq!(store.pagination, pagination);
    assert_eq!(store.filters.search, "");
    assert!(!store.loading);
}

#[tokio::test]
async fn failed_mutation_skips_refetch() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/comments/c1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/comments/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0)))
        .expect(0)
        .mount(&server)
        .await;

    let api = client(&server);
    let mut store = CommentStore::new();

    let err = store
        .update_comment(
            &api,
            "c1",
            &comments_shared::api::UpdateCommentRequest {
                content: "edited".to_string(),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to update comment");
}

#[tokio::test]
async fn oversized_comment_never_reaches_the_backend() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/comments"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = App::new(client(&server));
    app.open_create_form();
    if let Some(form) = app.form.form_mut() {
        form.task_id = "t1".to_string();
        form.user_id = "u1".to_string();
        form.user_name = "Alice".to_string();
        form.set_content(&"x".repeat(1001));
    }

    app.submit_form().await;

    let form = app.form.form().expect("form stays open");
    assert_eq!(
        form.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        vec!["Comment cannot exceed 1000 characters".to_string()]
    );
}

#[tokio::test]
async fn submitted_edit_closes_form_and_reloads() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/comments/all"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![comment_json("c1", "t1", "original")], 1)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/comments/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_json("c1", "t1", "edited")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/comments/all"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![comment_json("c1", "t1", "edited")], 1)),
        )
        .mount(&server)
        .await;

    let mut app = App::new(client(&server));
    app.store.refresh(&app.api.clone()).await;

    app.open_edit_form();
    if let Some(form) = app.form.form_mut() {
        form.set_content("edited");
    }
    app.submit_form().await;

    assert!(matches!(app.form, FormState::Hidden));
    assert!(app.form_error.is_none());
    assert_eq!(app.store.get(0).map(|c| c.content.as_str()), Some("edited"));
    assert_eq!(
        app.toasts.iter().last().map(|t| t.message.as_str()),
        Some("Comment updated successfully!")
    );
}

#[tokio::test]
async fn confirmed_delete_reloads_and_notifies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/comments/all"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_json(vec![comment_json("c1", "t1", "one")], 1)),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/comments/c1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/comments/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![], 0)))
        .mount(&server)
        .await;

    let mut app = App::new(client(&server));
    app.store.refresh(&app.api.clone()).await;

    app.request_delete();
    app.confirm_delete().await;
    // Nothing left pending, so this must not send a second DELETE
    app.confirm_delete().await;

    assert!(app.store.is_empty());
    assert_eq!(app.store.pagination.total_records, 0);
    assert_eq!(
        app.toasts.iter().last().map(|t| t.message.as_str()),
        Some("Comment deleted successfully!")
    );
}
