// End-to-end store scenarios against a mock backend

use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use taskstore::store::{CREATE_FAILED, FETCH_FAILED};
use taskstore::{Config, Filter, RestClient, TaskDraft, TaskId, TaskPatch, TaskStore};

fn store_for(server: &Server) -> TaskStore<RestClient> {
    let config = Config {
        base_url: format!("{}/api", server.url()),
        token: Some("test-token".to_string()),
        timeout_secs: 5,
    };
    TaskStore::new(RestClient::new(&config).unwrap())
}

#[tokio::test]
async fn test_task_lifecycle() {
    let mut server = Server::new_async().await;
    let store = store_for(&server);

    // Fetch
    let list = server
        .mock("GET", "/api/tasks/")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id":"1","title":"Buy milk","completed":false}]"#)
        .create_async()
        .await;

    store.fetch().await;
    list.assert_async().await;

    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.active_count(), 1);
    assert_eq!(store.completed_count(), 0);
    assert!(!store.loading());
    assert_eq!(store.error(), None);

    // Create
    let create = server
        .mock("POST", "/api/tasks/")
        .match_body(Matcher::Json(json!({"title": "Write spec", "description": "", "completed": false})))
        .with_status(201)
        .with_body(r#"{"id":"2","title":"Write spec","description":"","completed":false}"#)
        .create_async()
        .await;

    let created = store.create(TaskDraft::new("Write spec")).await.unwrap();
    create.assert_async().await;

    assert_eq!(store.tasks().len(), 2);
    assert_eq!(store.tasks().last(), Some(&created));
    assert_eq!(created.description, "");

    // Update
    let update = server
        .mock("PUT", "/api/tasks/2")
        .match_body(Matcher::Json(json!({"title": "Write spec", "description": "", "completed": true})))
        .with_status(200)
        .with_body(r#"{"_id":"2","title":"Write spec","description":"","completed":true}"#)
        .create_async()
        .await;

    let completed_before = store.completed_count();
    let patch = TaskPatch {
        title: "Write spec".to_string(),
        description: String::new(),
        completed: true,
    };
    store.update(&TaskId::from("2"), patch).await.unwrap();
    update.assert_async().await;

    assert!(store.find(&TaskId::from("2")).unwrap().completed);
    assert_eq!(store.completed_count(), completed_before + 1);

    // Delete
    let delete = server
        .mock("DELETE", "/api/tasks/1")
        .with_status(200)
        .with_body(r#"{"message":"Task deleted"}"#)
        .create_async()
        .await;

    let active_before = store.active_count();
    store.delete(&TaskId::from("1")).await.unwrap();
    delete.assert_async().await;

    assert!(store.tasks().iter().all(|t| t.id != TaskId::from("1")));
    assert_eq!(store.active_count(), active_before - 1);
    assert_eq!(store.active_count() + store.completed_count(), store.tasks().len());
}

#[tokio::test]
async fn test_toggle_roundtrip_with_numeric_ids() {
    let mut server = Server::new_async().await;
    let store = store_for(&server);

    server
        .mock("GET", "/api/tasks/")
        .with_status(200)
        .with_body(r#"[{"_id":7,"title":"Stretch","description":"5 min","completed":false}]"#)
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/api/tasks/7")
        .match_body(Matcher::Json(json!({"title": "Stretch", "description": "5 min", "completed": true})))
        .with_status(200)
        .with_body(r#"{"_id":7,"title":"Stretch","description":"5 min","completed":true}"#)
        .create_async()
        .await;

    store.fetch().await;
    let toggled = store.toggle_completion(&TaskId::from(7)).await.unwrap().unwrap();
    put.assert_async().await;

    assert!(toggled.completed);
    assert_eq!(toggled.title, "Stretch");
    assert_eq!(toggled.description, "5 min");

    store.set_filter(Filter::Active);
    assert!(store.filtered_tasks().is_empty());
    store.set_filter(Filter::Completed);
    assert_eq!(store.filtered_tasks(), vec![toggled]);
}

#[tokio::test]
async fn test_server_errors_are_recorded() {
    let mut server = Server::new_async().await;
    let store = store_for(&server);

    server
        .mock("GET", "/api/tasks/")
        .with_status(503)
        .create_async()
        .await;
    server
        .mock("POST", "/api/tasks/")
        .with_status(400)
        .with_body(r#"{"error":"title is required"}"#)
        .create_async()
        .await;

    store.fetch().await;
    assert!(store.tasks().is_empty());
    assert_eq!(store.error().as_deref(), Some(FETCH_FAILED));

    let err = store.create(TaskDraft::new("x")).await.unwrap_err();
    assert_eq!(err.to_string(), CREATE_FAILED);
    assert!(store.tasks().is_empty());
    assert_eq!(store.error().as_deref(), Some(CREATE_FAILED));
    assert!(!store.loading());
}

#[tokio::test]
async fn test_shared_store_concurrent_creates() {
    let mut server = Server::new_async().await;
    let store = Arc::new(store_for(&server));

    server
        .mock("POST", "/api/tasks/")
        .match_body(Matcher::PartialJson(json!({"title": "a"})))
        .with_status(201)
        .with_body(r#"{"id":"a","title":"a"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/api/tasks/")
        .match_body(Matcher::PartialJson(json!({"title": "b"})))
        .with_status(201)
        .with_body(r#"{"id":"b","title":"b"}"#)
        .create_async()
        .await;

    let first = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.create(TaskDraft::new("a")).await }
    });
    let second = tokio::spawn({
        let store = Arc::clone(&store);
        async move { store.create(TaskDraft::new("b")).await }
    });

    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let mut ids: Vec<String> = store.tasks().iter().map(|t| t.id.to_string()).collect();
    ids.sort();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(!store.loading());
}
