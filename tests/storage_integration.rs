use std::env;
use uuid::Uuid;

use shortforge_api::db::Database;
use shortforge_api::db_storage::{InquiryStorage, ProjectStorage};
use shortforge_api::inquiry_models::{InquiryStatus, NewInquiry};
use shortforge_api::project_models::{NewProject, NewProjectUpdate, ProjectChanges};
use shortforge_api::record_store::{PgRecordStore, RecordStore};

async fn test_database() -> anyhow::Result<Database> {
    let db_url = env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .map_err(|_| anyhow::anyhow!("Set TEST_DATABASE_URL or DATABASE_URL to run this test"))?;

    let db = Database::new(&db_url).await?;
    sqlx::raw_sql(include_str!("../sql/schema.sql"))
        .execute(&db.pool)
        .await?;
    Ok(db)
}

/// Smoke test for inquiry storage.
/// Marked ignored to avoid running against production by accident; set TEST_DATABASE_URL to run.
#[tokio::test]
#[ignore]
async fn inquiry_lifecycle_smoke_test() -> anyhow::Result<()> {
    let db = test_database().await?;
    let storage = InquiryStorage::new(db.pool.clone());

    let inquiry = NewInquiry {
        name: "Smoke Test".to_string(),
        email: format!("smoke-{}@example.com", Uuid::new_v4().simple()),
        phone: None,
        company: Some("ShortForge QA".to_string()),
        subject: "Storage smoke test".to_string(),
        message: "Created by storage_integration.rs".to_string(),
        service_interest: Some("Automation".to_string()),
    }
    .validated()
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let created = storage
        .create(&inquiry)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(created.status, "new");

    let updated = storage
        .update_status(created.id, Some(InquiryStatus::Responded))
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(updated.status, "responded");
    assert!(updated.updated_at.is_some());

    let missing = storage.get(Uuid::new_v4()).await;
    assert!(missing.is_err_and(|e| e.is_not_found()));
    Ok(())
}

/// Smoke test for project storage.
#[tokio::test]
#[ignore]
async fn project_lifecycle_smoke_test() -> anyhow::Result<()> {
    let db = test_database().await?;
    let storage = ProjectStorage::new(db.pool.clone());
    let client_id = Uuid::new_v4();

    let (project, _) = NewProject {
        title: "Receptionist agent".to_string(),
        description: None,
        project_type: "ai_agents".to_string(),
        budget: Some(8_500.0),
        deadline: None,
        client_id,
    }
    .validated()
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let created = storage
        .create(&project)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(created.status, "planning");

    let changes = ProjectChanges {
        status: Some("in_progress".to_string()),
        ..Default::default()
    }
    .validated()
    .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let updated = storage
        .update(created.id, &changes)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(updated.status, "in_progress");
    assert_eq!(updated.budget, Some(8_500.0));

    let cleared: ProjectChanges = serde_json::from_value(serde_json::json!({ "budget": null }))?;
    let cleared = storage
        .update(created.id, &cleared)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(cleared.budget, None);
    assert_eq!(cleared.status, "in_progress");

    storage
        .add_update(&NewProjectUpdate {
            project_id: created.id,
            title: "Kickoff".to_string(),
            content: "Scope agreed".to_string(),
            is_public: false,
        })
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let with_updates = storage
        .get_with_updates(created.id)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(with_updates.updates.len(), 1);

    let listed = storage
        .list(Some(client_id), 0, 10)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert_eq!(listed.len(), 1);
    Ok(())
}

/// The record store answers "no row" for an identifier that cannot exist.
#[tokio::test]
#[ignore]
async fn record_store_missing_domain_smoke_test() -> anyhow::Result<()> {
    let db = test_database().await?;
    let store = PgRecordStore::new(db.pool.clone());

    let record = store
        .latest_by_domain_id("-1")
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;
    assert!(record.is_none());
    Ok(())
}
