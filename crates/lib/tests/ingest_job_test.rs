//! # Ingestion Job Tests
//!
//! Runs the full fetch-transform-load sequence against a mocked NewsAPI and an
//! in-memory warehouse.

mod common;

use anyhow::Result;
use batchnews::{
    InsertErrorDetail, IngestJob, JobError, JobConfigBuilder, Row, RowInsertError,
};
use batchnews_test_utils::{full_article, top_headlines_body, MockWarehouse};
use common::{mount_top_headlines, test_config, TEST_PROJECT};
use serde_json::json;
use wiremock::{MockServer, ResponseTemplate};

fn warehouse() -> MockWarehouse {
    MockWarehouse::new(TEST_PROJECT).with_table("batchnews", "batchnewstable")
}

#[tokio::test]
async fn test_run_appends_rows_in_provider_order() -> Result<()> {
    // --- Arrange ---
    let server = MockServer::start().await;
    let body = json!({
        "articles": [
            { "title": "A", "description": "d1", "url": "u1" },
            { "title": "B", "description": null, "url": "u2" }
        ]
    });
    mount_top_headlines(&server, ResponseTemplate::new(200).set_body_json(body)).await;
    let warehouse = warehouse();
    let job = IngestJob::new(test_config(&server))?;

    // --- Act ---
    let summary = job.run(&warehouse).await?;

    // --- Assert ---
    assert_eq!(summary.rows, 2);
    assert!(!summary.dry_run);
    assert_eq!(summary.table, "test-project.batchnews.batchnewstable");

    let calls = warehouse.insert_calls();
    assert_eq!(calls.len(), 1, "all rows must go in a single insert call");
    let (table, rows) = &calls[0];
    assert_eq!(table.to_string(), "test-project.batchnews.batchnewstable");
    assert_eq!(
        serde_json::to_value(rows)?,
        json!([
            { "title": "A", "description": "d1", "url": "u1" },
            { "title": "B", "description": null, "url": "u2" }
        ])
    );

    Ok(())
}

#[tokio::test]
async fn test_run_projects_every_article_identically() -> Result<()> {
    // --- Arrange ---
    let server = MockServer::start().await;
    let articles: Vec<_> = (0..25)
        .map(|i| {
            let description = format!("description {i}");
            full_article(
                &format!("Headline {i}"),
                (i % 3 != 0).then_some(description.as_str()),
                &format!("https://news.test/{i}"),
            )
        })
        .collect();
    let body = top_headlines_body(json!(articles));
    mount_top_headlines(&server, ResponseTemplate::new(200).set_body_json(body)).await;
    let warehouse = warehouse();
    let job = IngestJob::new(test_config(&server))?;

    // --- Act ---
    job.run(&warehouse).await?;

    // --- Assert ---
    let calls = warehouse.insert_calls();
    let rows = &calls[0].1;
    assert_eq!(rows.len(), 25);
    for (i, row) in rows.iter().enumerate() {
        let expected = Row {
            title: Some(format!("Headline {i}")),
            description: (i % 3 != 0).then(|| format!("description {i}")),
            url: Some(format!("https://news.test/{i}")),
        };
        assert_eq!(row, &expected, "row {i} differs from its article");
    }

    Ok(())
}

#[tokio::test]
async fn test_run_fails_when_rows_are_rejected() -> Result<()> {
    // --- Arrange ---
    let server = MockServer::start().await;
    let body = top_headlines_body(json!([full_article("A", None, "u1")]));
    mount_top_headlines(&server, ResponseTemplate::new(200).set_body_json(body)).await;
    let rejected = RowInsertError {
        index: Some(0),
        errors: vec![InsertErrorDetail {
            reason: Some("invalid".to_string()),
            location: Some("description".to_string()),
            message: Some("Missing required field: description.".to_string()),
        }],
    };
    let warehouse = warehouse().with_insert_errors(vec![rejected.clone()]);
    let job = IngestJob::new(test_config(&server))?;

    // --- Act ---
    let result = job.run(&warehouse).await;

    // --- Assert ---
    match result {
        Err(JobError::InsertFailed(errors)) => assert_eq!(errors, vec![rejected]),
        other => panic!("Expected InsertFailed, got {other:?}"),
    }
    assert_eq!(warehouse.insert_calls().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_insert_failure_message_embeds_errors() -> Result<()> {
    // --- Arrange ---
    let server = MockServer::start().await;
    let body = top_headlines_body(json!([full_article("A", Some("d"), "u1")]));
    mount_top_headlines(&server, ResponseTemplate::new(200).set_body_json(body)).await;
    let warehouse = warehouse().with_insert_errors(vec![RowInsertError {
        index: Some(0),
        errors: vec![InsertErrorDetail {
            reason: Some("invalid".to_string()),
            location: None,
            message: Some("no such field: title".to_string()),
        }],
    }]);
    let job = IngestJob::new(test_config(&server))?;

    // --- Act ---
    let message = job.run(&warehouse).await.unwrap_err().to_string();

    // --- Assert ---
    assert!(
        message.contains("Error inserting rows into BigQuery"),
        "Unexpected error message: {message}"
    );
    assert!(message.contains("row 0: no such field: title (invalid)"));

    Ok(())
}

#[tokio::test]
async fn test_missing_articles_fails_before_warehouse() -> Result<()> {
    // --- Arrange ---
    let server = MockServer::start().await;
    let body = json!({ "status": "ok", "totalResults": 0 });
    mount_top_headlines(&server, ResponseTemplate::new(200).set_body_json(body)).await;
    let warehouse = warehouse();
    let job = IngestJob::new(test_config(&server))?;

    // --- Act ---
    let result = job.run(&warehouse).await;

    // --- Assert ---
    assert!(matches!(result, Err(JobError::MissingArticles)));
    assert!(warehouse.untouched());

    Ok(())
}

#[tokio::test]
async fn test_http_error_fails_before_warehouse() -> Result<()> {
    // --- Arrange ---
    let server = MockServer::start().await;
    let body = json!({
        "status": "error",
        "code": "apiKeyInvalid",
        "message": "Your API key is invalid or incorrect."
    });
    mount_top_headlines(&server, ResponseTemplate::new(401).set_body_json(body)).await;
    let warehouse = warehouse();
    let job = IngestJob::new(test_config(&server))?;

    // --- Act ---
    let result = job.run(&warehouse).await;

    // --- Assert ---
    match result {
        Err(JobError::NewsApi { status, code, .. }) => {
            assert_eq!(status, 401);
            assert_eq!(code, "apiKeyInvalid");
        }
        other => panic!("Expected NewsApi error, got {other:?}"),
    }
    assert!(warehouse.untouched());

    Ok(())
}

#[tokio::test]
async fn test_missing_table_skips_insert() -> Result<()> {
    // --- Arrange ---
    let server = MockServer::start().await;
    let body = top_headlines_body(json!([full_article("A", Some("d"), "u1")]));
    mount_top_headlines(&server, ResponseTemplate::new(200).set_body_json(body)).await;
    let warehouse = MockWarehouse::new(TEST_PROJECT);
    let job = IngestJob::new(test_config(&server))?;

    // --- Act ---
    let result = job.run(&warehouse).await;

    // --- Assert ---
    assert!(matches!(result, Err(JobError::TableNotFound(_))));
    assert_eq!(warehouse.resolve_calls().len(), 1);
    assert!(warehouse.insert_calls().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_custom_dataset_and_table_are_used() -> Result<()> {
    // --- Arrange ---
    let server = MockServer::start().await;
    let body = top_headlines_body(json!([full_article("A", Some("d"), "u1")]));
    mount_top_headlines(&server, ResponseTemplate::new(200).set_body_json(body)).await;
    let warehouse = MockWarehouse::new(TEST_PROJECT).with_table("news", "headlines");
    let config = JobConfigBuilder::new()
        .api_key(common::TEST_API_KEY.to_string())
        .project_id(TEST_PROJECT.to_string())
        .dataset("news".to_string())
        .table("headlines".to_string())
        .news_api_url(server.uri())
        .build()?;
    let job = IngestJob::new(config)?;

    // --- Act ---
    let summary = job.run(&warehouse).await?;

    // --- Assert ---
    assert_eq!(summary.table, "test-project.news.headlines");
    assert_eq!(
        warehouse.resolve_calls(),
        vec![("news".to_string(), "headlines".to_string())]
    );

    Ok(())
}

#[tokio::test]
async fn test_dry_run_never_touches_warehouse() -> Result<()> {
    // --- Arrange ---
    let server = MockServer::start().await;
    let body = top_headlines_body(json!([
        full_article("A", Some("d1"), "u1"),
        full_article("B", None, "u2")
    ]));
    mount_top_headlines(&server, ResponseTemplate::new(200).set_body_json(body)).await;
    let warehouse = warehouse();
    let config = JobConfigBuilder::new()
        .api_key(common::TEST_API_KEY.to_string())
        .project_id(TEST_PROJECT.to_string())
        .news_api_url(server.uri())
        .build()?;
    let job = IngestJob::new(config)?;

    // --- Act ---
    let summary = job.dry_run().await?;

    // --- Assert ---
    assert!(summary.dry_run);
    assert_eq!(summary.rows, 2);
    assert!(warehouse.untouched());

    Ok(())
}

#[tokio::test]
async fn test_empty_article_list_still_loads() -> Result<()> {
    // --- Arrange ---
    let server = MockServer::start().await;
    let body = top_headlines_body(json!([]));
    mount_top_headlines(&server, ResponseTemplate::new(200).set_body_json(body)).await;
    let warehouse = warehouse();
    let job = IngestJob::new(test_config(&server))?;

    // --- Act ---
    let summary = job.run(&warehouse).await?;

    // --- Assert ---
    assert_eq!(summary.rows, 0);
    let calls = warehouse.insert_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].1.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_fetch_rows_then_load_splits_the_run() -> Result<()> {
    // --- Arrange ---
    let server = MockServer::start().await;
    let body = top_headlines_body(json!([full_article("A", Some("d1"), "u1")]));
    mount_top_headlines(&server, ResponseTemplate::new(200).set_body_json(body)).await;
    let warehouse = warehouse();
    let job = IngestJob::new(test_config(&server))?;

    // --- Act ---
    let rows = job.fetch_rows().await?;
    let untouched_after_fetch = warehouse.untouched();
    let summary = job.load(&warehouse, rows).await?;

    // --- Assert ---
    assert!(untouched_after_fetch);
    assert_eq!(summary.rows, 1);
    assert_eq!(warehouse.insert_calls().len(), 1);

    Ok(())
}
