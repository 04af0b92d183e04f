//! Cleanup worker scenarios against an in-memory catalog and ledger.

use cleanup_core::{Error, LedgerValue, Settings};
use integration_tests::fixtures::{
    self, attr, event, record, record_without_batch_id, scrambled_versions, BATCH_ID,
};
use integration_tests::mocks::{CatalogCall, MockCatalog, MockLedger};
use rstest::rstest;
use worker::{CleanupSettings, CleanupWorker, CLEANUP_SUCCESS};

fn ids(range: impl Iterator<Item = i64>) -> Vec<String> {
    range.map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn test_120_versions_keep_100() {
    let catalog = MockCatalog::new();
    catalog.add_table("sales", "orders", 1..=120);
    let ledger = MockLedger::new();

    let report = fixtures::cleanup_worker(&catalog, &ledger, 100)
        .handle(&event(vec![record("sales", "orders")]))
        .await
        .unwrap();

    assert_eq!(report.records, 1);
    assert_eq!(report.tables_cleaned, 1);
    assert_eq!(report.versions_deleted, 20);
    assert!(report.not_deleted.is_empty());

    assert_eq!(catalog.delete_batches(), vec![ids((1..=20).rev())]);
    assert_eq!(
        catalog.remaining_versions("sales", "orders"),
        (21..=120).collect::<Vec<_>>()
    );

    let items = ledger.items();
    assert_eq!(items.len(), 1);
    let (table_name, item) = &items[0];
    assert_eq!(table_name, "glue_table_version_cleanup_statistics");
    assert!(matches!(item["execution_id"], LedgerValue::N(_)));
    assert_eq!(item["execution_batch_id"], LedgerValue::N(BATCH_ID.into()));
    assert_eq!(attr(item, "database_name"), "sales");
    assert_eq!(attr(item, "table_name"), "orders");
    assert_eq!(attr(item, "number_of_versions_before_cleanup"), "120");
    assert_eq!(attr(item, "number_of_versions_retained"), "100");
    assert_eq!(attr(item, "number_of_versions_deleted"), "20");
}

#[tokio::test]
async fn test_250_versions_keep_50() {
    let catalog = MockCatalog::new();
    catalog.add_table("sales", "orders", 1..=250);
    let ledger = MockLedger::new();

    let report = fixtures::cleanup_worker(&catalog, &ledger, 50)
        .handle(&event(vec![record("sales", "orders")]))
        .await
        .unwrap();

    assert_eq!(report.versions_deleted, 200);
    let batches = catalog.delete_batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0], ids((101..=200).rev()));
    assert_eq!(batches[1], ids((1..=100).rev()));
    assert_eq!(
        catalog.remaining_versions("sales", "orders"),
        (201..=250).collect::<Vec<_>>()
    );
}

#[rstest]
#[case(51, 50, 1)]
#[case(150, 50, 1)]
#[case(151, 50, 2)]
#[case(351, 50, 4)]
#[case(1000, 100, 9)]
#[tokio::test]
async fn test_delete_call_count(
    #[case] versions: i64,
    #[case] threshold: i64,
    #[case] expected_calls: usize,
) {
    let catalog = MockCatalog::new();
    catalog.add_table("sales", "orders", scrambled_versions(versions));
    let ledger = MockLedger::new();

    let report = fixtures::cleanup_worker(&catalog, &ledger, threshold)
        .handle(&event(vec![record("sales", "orders")]))
        .await
        .unwrap();

    let batches = catalog.delete_batches();
    assert_eq!(batches.len(), expected_calls);
    assert!(batches.iter().all(|b| !b.is_empty() && b.len() <= 100));
    assert_eq!(report.versions_deleted as i64, versions - threshold);

    // The newest `threshold` versions survive.
    let expected: Vec<i64> = (versions - threshold + 1..=versions).collect();
    assert_eq!(catalog.remaining_versions("sales", "orders"), expected);
}

#[rstest]
#[case(50)]
#[case(100)]
#[tokio::test]
async fn test_at_or_below_threshold_is_untouched(#[case] versions: i64) {
    let catalog = MockCatalog::new();
    catalog.add_table("sales", "orders", 1..=versions);
    let ledger = MockLedger::new();

    let report = fixtures::cleanup_worker(&catalog, &ledger, 100)
        .handle(&event(vec![record("sales", "orders")]))
        .await
        .unwrap();

    assert_eq!(report.tables_skipped, 1);
    assert_eq!(report.tables_cleaned, 0);
    assert!(catalog.delete_batches().is_empty());
    assert_eq!(ledger.item_count(), 0);
}

#[rstest]
#[case(49)]
#[case(0)]
#[case(-5)]
#[tokio::test]
async fn test_threshold_below_floor_aborts_before_catalog(#[case] threshold: i64) {
    let catalog = MockCatalog::new();
    catalog.add_table("sales", "orders", 1..=500);
    let ledger = MockLedger::new();

    let err = fixtures::cleanup_worker(&catalog, &ledger, threshold)
        .handle(&event(vec![record("sales", "orders")]))
        .await
        .unwrap_err();

    assert!(err.is_configuration());
    assert_eq!(catalog.call_count(), 0);
    assert_eq!(ledger.item_count(), 0);
}

#[tokio::test]
async fn test_explicit_zero_from_settings_fails_floor() {
    let settings = Settings::from_pairs([("number_of_versions_to_retain", "0")]).unwrap();
    let cleanup_settings = CleanupSettings::from_settings(&settings).unwrap();
    assert_eq!(cleanup_settings.versions_to_retain, 0);

    let catalog = MockCatalog::new();
    let ledger = MockLedger::new();
    let err = fixtures::cleanup_worker(&catalog, &ledger, cleanup_settings.versions_to_retain)
        .handle(&event(vec![record("sales", "orders")]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::RetentionBelowMinimum {
            configured: 0,
            minimum: 50
        }
    ));
}

#[tokio::test]
async fn test_refused_versions_are_reported_not_fatal() {
    let catalog = MockCatalog::new();
    catalog.add_table("sales", "orders", 1..=250);
    catalog.refuse_deletes([3, 77, 150]);
    let ledger = MockLedger::new();

    let report = fixtures::cleanup_worker(&catalog, &ledger, 50)
        .handle(&event(vec![record("sales", "orders")]))
        .await
        .unwrap();

    assert_eq!(report.not_deleted.len(), 3);
    assert_eq!(report.versions_deleted, 197);

    let mut refused: Vec<&str> = report
        .not_deleted
        .iter()
        .map(|e| e.version_id.as_str())
        .collect();
    refused.sort_unstable();
    assert_eq!(refused, vec!["150", "3", "77"]);
    assert!(report.not_deleted.iter().all(|e| e.table_name == "orders"));

    let items = ledger.items();
    assert_eq!(attr(&items[0].1, "number_of_versions_deleted"), "197");
    assert_eq!(catalog.remaining_versions("sales", "orders").len(), 53);
}

#[tokio::test]
async fn test_records_processed_in_order() {
    let catalog = MockCatalog::new();
    catalog
        .add_table("sales", "orders", 1..=60)
        .add_table("sales", "refunds", 1..=10)
        .add_table("marketing", "campaigns", 1..=70);
    let ledger = MockLedger::new();

    let report = fixtures::cleanup_worker(&catalog, &ledger, 50)
        .handle(&event(vec![
            record("sales", "orders"),
            record("sales", "refunds"),
            record_without_batch_id("marketing", "campaigns"),
        ]))
        .await
        .unwrap();

    assert_eq!(report.records, 3);
    assert_eq!(report.tables_cleaned, 2);
    assert_eq!(report.tables_skipped, 1);
    assert_eq!(report.versions_deleted, 30);

    let version_listings: Vec<String> = catalog
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            CatalogCall::GetTableVersions(_, table) => Some(table),
            _ => None,
        })
        .collect();
    assert_eq!(version_listings, vec!["orders", "refunds", "campaigns"]);

    let items = ledger.items();
    assert_eq!(items.len(), 2);
    assert_eq!(attr(&items[0].1, "table_name"), "orders");
    assert_eq!(attr(&items[1].1, "table_name"), "campaigns");
    // No batch id attribute on the message.
    assert_eq!(items[1].1["execution_batch_id"], LedgerValue::S(String::new()));
}

#[tokio::test]
async fn test_versions_listed_across_pages() {
    let catalog = MockCatalog::with_page_size(100);
    catalog.add_table("sales", "orders", scrambled_versions(350));
    let ledger = MockLedger::new();

    let report = fixtures::cleanup_worker(&catalog, &ledger, 50)
        .handle(&event(vec![record("sales", "orders")]))
        .await
        .unwrap();

    let listings = catalog
        .calls()
        .iter()
        .filter(|c| matches!(c, CatalogCall::GetTableVersions(..)))
        .count();
    assert_eq!(listings, 4);
    assert_eq!(report.versions_deleted, 300);
    assert_eq!(catalog.delete_batches().len(), 3);
    assert_eq!(attr(&ledger.items()[0].1, "number_of_versions_before_cleanup"), "350");
}

#[tokio::test]
async fn test_malformed_record_aborts_invocation() {
    let catalog = MockCatalog::new();
    catalog.add_table("sales", "orders", 1..=60);
    let ledger = MockLedger::new();

    let bad = integration_tests::fixtures::event_from_json(serde_json::json!({
        "Records": [{ "body": "{\"DatabaseName\":\"sales\"}" }]
    }))
    .records;
    let mut records = vec![record("sales", "orders")];
    records.extend(bad);

    let err = fixtures::cleanup_worker(&catalog, &ledger, 50)
        .handle(&event(records))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::MalformedWorkItem(_)));
    // The first record was fully processed before the failure.
    assert_eq!(ledger.item_count(), 1);
}

#[tokio::test]
async fn test_missing_table_aborts_invocation() {
    let catalog = MockCatalog::new();
    let ledger = MockLedger::new();

    let err = fixtures::cleanup_worker(&catalog, &ledger, 50)
        .handle(&event(vec![record("sales", "dropped")]))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Catalog(_)));
    assert_eq!(ledger.item_count(), 0);
}

#[tokio::test]
async fn test_ledger_failure_aborts_invocation() {
    let catalog = MockCatalog::new();
    catalog.add_table("sales", "orders", 1..=60);
    let ledger = MockLedger::new();
    ledger.set_should_fail(true);

    let err = fixtures::cleanup_worker(&catalog, &ledger, 50)
        .handle(&event(vec![record("sales", "orders")]))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Ledger(_)));
}

#[tokio::test]
async fn test_reprocessing_is_idempotent() {
    let catalog = MockCatalog::new();
    catalog.add_table("sales", "orders", 1..=180);
    let ledger = MockLedger::new();
    let worker: CleanupWorker = fixtures::cleanup_worker(&catalog, &ledger, 50);
    let event = event(vec![record("sales", "orders")]);

    let first = worker.handle(&event).await.unwrap();
    let second = worker.handle(&event).await.unwrap();

    assert_eq!(first.versions_deleted, 130);
    assert_eq!(second.tables_skipped, 1);
    assert_eq!(second.versions_deleted, 0);
    assert_eq!(
        catalog.remaining_versions("sales", "orders"),
        (131..=180).collect::<Vec<_>>()
    );
    assert_eq!(CLEANUP_SUCCESS, "Cleanup execution succeeded");
}

#[tokio::test]
async fn test_lambda_event_shape() {
    let catalog = MockCatalog::new();
    catalog.add_table("sales", "orders", 1..=55);
    let ledger = MockLedger::new();

    let event = fixtures::event_from_json(serde_json::json!({
        "Records": [{
            "messageId": "059f36b4-87a3-44ab-83d2-661975830a7d",
            "body": "{\"DatabaseName\":\"sales\",\"TableName\":\"orders\"}",
            "messageAttributes": {
                "executionBatchId": { "stringValue": "1705276800000", "dataType": "String" }
            }
        }]
    }));

    fixtures::cleanup_worker(&catalog, &ledger, 50)
        .handle(&event)
        .await
        .unwrap();

    let items = ledger.items();
    assert_eq!(items[0].1["execution_batch_id"], LedgerValue::N(BATCH_ID.into()));
    assert_eq!(attr(&items[0].1, "number_of_versions_deleted"), "5");
}
