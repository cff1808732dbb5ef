//! Connection lifecycle tests against the scripted driver.

mod common;

use common::{adapter, adapter_with_config, credentials, FakeHive, DEFAULT_HOST};
use hive_adapter::connection::{Connection, ConnectionManager};
use hive_adapter::{AdapterConfig, ConnectionState, ErrorKind, HiveError};
use std::sync::Arc;

#[tokio::test]
async fn connection_opens_once_per_name() {
    let hive = FakeHive::new();
    let mut adapter = adapter(&hive);

    adapter.execute("select 1", None, false, false).await.unwrap();
    adapter.execute("select 2", None, false, false).await.unwrap();

    assert_eq!(hive.connect_count(), 1);
    assert_eq!(
        hive.calls()[0],
        format!("connect: {}:10000/default", DEFAULT_HOST)
    );
}

#[tokio::test]
async fn connection_open_is_idempotent() {
    let hive = FakeHive::new();
    let manager = ConnectionManager::new(
        Arc::new(hive.clone()),
        credentials(),
        &AdapterConfig::default(),
    );

    let mut conn = Connection::new("master", credentials());
    manager.open(&mut conn).await.unwrap();
    manager.open(&mut conn).await.unwrap();

    assert_eq!(conn.state(), ConnectionState::Open);
    assert!(conn.has_handle());
    assert_eq!(hive.connect_count(), 1);
}

#[tokio::test]
async fn connection_failure_leaves_fail_state() {
    let hive = FakeHive::new().refuse_connections("TSocket: could not connect to hive.test:10000");
    let manager = ConnectionManager::new(
        Arc::new(hive.clone()),
        credentials(),
        &AdapterConfig::default(),
    );

    let mut conn = Connection::new("master", credentials());
    let err = manager.open(&mut conn).await.unwrap_err();

    assert!(err.to_string().contains("could not connect"));
    assert_eq!(conn.state(), ConnectionState::Fail);
    assert!(!conn.has_handle());
}

#[tokio::test]
async fn connection_failure_surfaces_through_adapter() {
    let hive = FakeHive::new().refuse_connections("connection refused");
    let mut adapter = adapter(&hive);

    let err = adapter.list_schemas(None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Connection);
    assert!(hive.executed().is_empty());
}

#[tokio::test]
async fn connection_close_swallows_transport_errors() {
    let hive = FakeHive::new().fail_close();
    let manager = ConnectionManager::new(
        Arc::new(hive.clone()),
        credentials(),
        &AdapterConfig::default(),
    );

    let mut conn = Connection::new("master", credentials());
    manager.open(&mut conn).await.unwrap();
    ConnectionManager::close(&mut conn).await;

    assert_eq!(conn.state(), ConnectionState::Closed);
    assert!(!conn.has_handle());
    assert_eq!(hive.calls().last().map(String::as_str), Some("close"));
}

#[tokio::test]
async fn connection_cleanup_closes_pooled_connections() {
    let hive = FakeHive::new();
    let mut adapter = adapter(&hive);

    adapter.execute("select 1", None, false, false).await.unwrap();
    adapter.execute("select 1", Some("model_a"), false, false).await.unwrap();
    adapter.release_connection("model_a").await;

    adapter.execute("select 1", Some("model_b"), false, false).await.unwrap();
    assert_eq!(hive.connect_count(), 2);

    adapter.cleanup_connections().await;
    assert_eq!(hive.close_count(), 2);
}

#[tokio::test]
async fn connection_pool_is_bounded() {
    let hive = FakeHive::new();
    let config = AdapterConfig {
        threads: 1,
        ..AdapterConfig::default()
    };
    let mut adapter = adapter_with_config(&hive, config);

    for name in ["master", "model_a", "model_b"] {
        adapter.execute("select 1", Some(name), false, false).await.unwrap();
    }
    let err = adapter
        .execute("select 1", Some("model_c"), false, false)
        .await
        .unwrap_err();

    assert!(matches!(err, HiveError::Internal(_)));
    assert_eq!(hive.connect_count(), 3);
}

#[tokio::test]
async fn connection_cancel_is_not_implemented() {
    let hive = FakeHive::new();
    let mut adapter = adapter(&hive);
    adapter.execute("select 1", Some("model_a"), false, false).await.unwrap();
    let before = hive.calls().len();

    let err = adapter.cancel_open_connections().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotImplemented);
    assert_eq!(hive.calls().len(), before);
}

#[tokio::test]
async fn connection_strict_mode_rejects_unbalanced_commit() {
    let hive = FakeHive::new();
    let config = AdapterConfig {
        strict_mode: true,
        ..AdapterConfig::default()
    };
    let mut adapter = adapter_with_config(&hive, config);

    assert_eq!(
        adapter.commit(None).await.unwrap_err().kind(),
        ErrorKind::Internal
    );

    adapter.begin(None).await.unwrap();
    adapter.commit(None).await.unwrap();
}
