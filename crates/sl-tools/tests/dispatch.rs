use std::sync::Arc;

use serde_json::json;
use sl_db::{InMemoryStore, Store};
use sl_domain::error::Error;
use sl_skills::SkillSnapshot;
use sl_tools::{dispatch, SkillLearnerCtx};
use uuid::Uuid;

fn ctx(store: Arc<dyn Store>, skills_root: std::path::PathBuf) -> SkillLearnerCtx {
    SkillLearnerCtx {
        store,
        project_id: Uuid::new_v4(),
        learning_space_id: Uuid::new_v4(),
        user_id: None,
        skills: SkillSnapshot::default(),
        skills_root,
        has_reported_thinking: false,
    }
}

#[tokio::test]
async fn report_thinking_sets_flag_and_returns_ok() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let mut c = ctx(store, dir.path().to_path_buf());
    assert!(!c.has_reported_thinking);
    let out = dispatch(&mut c, "report_thinking", json!({"thinking": "user wants CSV exports"}))
        .await
        .unwrap();
    assert_eq!(out, "thinking recorded");
    assert!(c.has_reported_thinking);
}

#[tokio::test]
async fn create_skill_requires_report_thinking_first() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let mut c = ctx(store, dir.path().to_path_buf());

    let err = dispatch(
        &mut c,
        "create_skill",
        json!({"name": "Export CSV", "description": "v1", "content": "body"}),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Tool { .. }));
}

#[tokio::test]
async fn create_skill_writes_file_and_registers_row() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let mut c = ctx(store.clone(), dir.path().to_path_buf());
    dispatch(&mut c, "report_thinking", json!({"thinking": "user wants CSV exports"}))
        .await
        .unwrap();

    let out = dispatch(
        &mut c,
        "create_skill",
        json!({"name": "Export CSV", "description": "exports data as CSV", "content": "# Export CSV\n..."}),
    )
    .await
    .unwrap();
    assert!(out.contains("Export CSV"));
    assert_eq!(c.skills.len(), 1);

    let ids = store.get_learning_space_skill_ids(c.learning_space_id).await.unwrap();
    assert_eq!(ids.len(), 1);
    let info = store.get_skills_info(&ids).await.unwrap();
    assert_eq!(info[0].name, "Export CSV");
    assert_eq!(info[0].disk_id, "export-csv");

    let file_path = &info[0].file_paths[0];
    let body = tokio::fs::read_to_string(file_path).await.unwrap();
    assert!(body.contains("Export CSV"));
}

#[tokio::test]
async fn create_skill_rejects_duplicate_name() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let mut c = ctx(store, dir.path().to_path_buf());
    dispatch(&mut c, "report_thinking", json!({"thinking": "user wants CSV exports"}))
        .await
        .unwrap();

    dispatch(
        &mut c,
        "create_skill",
        json!({"name": "Export CSV", "description": "v1", "content": "body"}),
    )
    .await
    .unwrap();

    let err = dispatch(
        &mut c,
        "create_skill",
        json!({"name": "Export CSV", "description": "v2", "content": "body2"}),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Tool { .. }));
}

#[tokio::test]
async fn update_skill_requires_existing_skill() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let mut c = ctx(store, dir.path().to_path_buf());
    dispatch(&mut c, "report_thinking", json!({"thinking": "user wants CSV exports"}))
        .await
        .unwrap();

    let err = dispatch(
        &mut c,
        "update_skill",
        json!({"name": "Nonexistent", "description": "x"}),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Tool { .. }));
}

#[tokio::test]
async fn update_skill_rewrites_description_and_content() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let mut c = ctx(store.clone(), dir.path().to_path_buf());
    dispatch(&mut c, "report_thinking", json!({"thinking": "user wants CSV exports"}))
        .await
        .unwrap();

    dispatch(
        &mut c,
        "create_skill",
        json!({"name": "Export CSV", "description": "v1", "content": "body v1"}),
    )
    .await
    .unwrap();

    dispatch(
        &mut c,
        "update_skill",
        json!({"name": "Export CSV", "description": "v2", "content": "body v2"}),
    )
    .await
    .unwrap();

    let ids = store.get_learning_space_skill_ids(c.learning_space_id).await.unwrap();
    let info = store.get_skills_info(&ids).await.unwrap();
    assert_eq!(info[0].description, "v2");
    let body = tokio::fs::read_to_string(&info[0].file_paths[0]).await.unwrap();
    assert_eq!(body, "body v2");
}

#[tokio::test]
async fn unknown_tool_name_is_a_hard_failure() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
    let mut c = ctx(store, dir.path().to_path_buf());
    let err = dispatch(&mut c, "delete_everything", json!({})).await.unwrap_err();
    assert!(matches!(err, Error::UnknownTool(_)));
}
