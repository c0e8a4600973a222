//! Store behavior tests against an in-memory SQLite database.
//!
//! SQLite exercises the same Sea-ORM query paths as PostgreSQL without
//! needing a server in CI. The pool is capped at one connection so every
//! statement sees the same in-memory database.

use mtproto_session_seaorm_store::entity::{cached_entity, session};
use mtproto_session_seaorm_store::migration::Migrator;
use mtproto_session_seaorm_store::{
    CachedEntity, EntityKind, FileKind, PostgresStore, SentFile, SessionData, SessionStorage,
    StoreError, UpdateState,
};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, IntoActiveModel,
    Set,
};
use sea_orm_migration::MigratorTrait;

async fn open_conn() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    Database::connect(options).await.unwrap()
}

async fn open_store() -> (PostgresStore, DatabaseConnection) {
    let conn = open_conn().await;
    Migrator::up(&conn, None).await.unwrap();
    (PostgresStore::new(conn.clone()), conn)
}

fn sample_session() -> SessionData {
    SessionData {
        dc_id: 2,
        server_address: "149.154.167.51".to_string(),
        port: 443,
        auth_key: vec![7u8; 256],
        takeout_id: None,
    }
}

#[tokio::test]
async fn load_on_fresh_schema_returns_none() {
    let (store, _conn) = open_store().await;
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let (store, _conn) = open_store().await;

    let session = sample_session();
    store.save(&session).await.unwrap();

    assert_eq!(store.load().await.unwrap(), Some(session));
}

#[tokio::test]
async fn save_keeps_a_single_row_and_the_last_session_wins() {
    let (store, conn) = open_store().await;

    store.save(&sample_session()).await.unwrap();

    let migrated = SessionData {
        dc_id: 4,
        server_address: "149.154.167.91".to_string(),
        port: 443,
        auth_key: vec![9u8; 256],
        takeout_id: Some(12),
    };
    store.save(&migrated).await.unwrap();

    assert_eq!(store.load().await.unwrap(), Some(migrated));

    let rows = session::Entity::find().all(&conn).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn save_is_idempotent() {
    let (store, conn) = open_store().await;

    let session = sample_session();
    store.save(&session).await.unwrap();
    store.save(&session).await.unwrap();

    assert_eq!(store.load().await.unwrap(), Some(session));
    let rows = session::Entity::find().all(&conn).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn delete_removes_the_session() {
    let (store, _conn) = open_store().await;

    store.save(&sample_session()).await.unwrap();
    store.delete().await.unwrap();

    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn cache_entity_twice_leaves_one_row() {
    let (store, conn) = open_store().await;

    let peer = CachedEntity::new(777000, 1234, EntityKind::User).with_username("telegram");
    store.cache_entity(&peer).await.unwrap();
    store.cache_entity(&peer).await.unwrap();

    let rows = cached_entity::Entity::find().all(&conn).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(store.get_entity(777000).await.unwrap(), Some(peer));
}

#[tokio::test]
async fn cache_entity_overwrites_on_conflict() {
    let (store, _conn) = open_store().await;

    store
        .cache_entity(&CachedEntity::new(42, 1, EntityKind::Channel))
        .await
        .unwrap();
    store
        .cache_entity(&CachedEntity::new(42, 2, EntityKind::Channel).with_name("news"))
        .await
        .unwrap();

    let cached = store.get_entity(42).await.unwrap().unwrap();
    assert_eq!(cached.hash, 2);
    assert_eq!(cached.name.as_deref(), Some("news"));
}

#[tokio::test]
async fn cache_entities_upserts_a_batch() {
    let (store, _conn) = open_store().await;

    let batch = vec![
        CachedEntity::new(1, 11, EntityKind::User),
        CachedEntity::new(2, 22, EntityKind::Chat),
        CachedEntity::new(3, 33, EntityKind::Channel),
    ];
    store.cache_entities(&batch).await.unwrap();
    store.cache_entities(&[]).await.unwrap();

    assert_eq!(store.get_entity(2).await.unwrap().unwrap().hash, 22);
}

#[tokio::test]
async fn cache_entities_collapses_duplicate_ids_in_one_batch() {
    let (store, conn) = open_store().await;

    let batch = vec![
        CachedEntity::new(5, 1, EntityKind::User),
        CachedEntity::new(6, 60, EntityKind::Chat),
        CachedEntity::new(5, 2, EntityKind::User).with_username("later"),
    ];
    store.cache_entities(&batch).await.unwrap();

    let rows = cached_entity::Entity::find().all(&conn).await.unwrap();
    assert_eq!(rows.len(), 2);

    let peer = store.get_entity(5).await.unwrap().unwrap();
    assert_eq!(peer.hash, 2);
    assert_eq!(peer.username.as_deref(), Some("later"));
}

#[tokio::test]
async fn load_rejects_a_port_outside_the_tcp_range() {
    let (store, conn) = open_store().await;

    // External tooling can write any INTEGER into the port column.
    let tampered = session::ActiveModel {
        dc_id: Set(2),
        server_address: Set("149.154.167.51".to_string()),
        port: Set(70_000),
        auth_key: Set(vec![7u8; 256]),
        takeout_id: Set(None),
    };
    tampered.insert(&conn).await.unwrap();

    assert!(matches!(store.load().await, Err(StoreError::Backend(_))));
}

#[tokio::test]
async fn get_entity_missing_returns_none() {
    let (store, _conn) = open_store().await;
    assert_eq!(store.get_entity(404).await.unwrap(), None);
}

#[tokio::test]
async fn username_lookup_prefers_newest_and_clears_stale_rows() {
    let (store, conn) = open_store().await;

    store
        .cache_entity(&CachedEntity::new(1, 11, EntityKind::User).with_username("alice"))
        .await
        .unwrap();

    // Age the first claim so the second one is unambiguously newer.
    let mut old = cached_entity::Entity::find_by_id(1)
        .one(&conn)
        .await
        .unwrap()
        .unwrap()
        .into_active_model();
    old.date = Set(1_000);
    old.update(&conn).await.unwrap();

    store
        .cache_entity(&CachedEntity::new(2, 22, EntityKind::User).with_username("alice"))
        .await
        .unwrap();

    let found = store.get_entity_by_username("alice").await.unwrap().unwrap();
    assert_eq!(found.id, 2);

    // The stale row lost its username but kept its access hash.
    let stale = store.get_entity(1).await.unwrap().unwrap();
    assert_eq!(stale.username, None);
    assert_eq!(stale.hash, 11);
}

#[tokio::test]
async fn username_lookup_missing_returns_none() {
    let (store, _conn) = open_store().await;
    assert_eq!(store.get_entity_by_username("nobody").await.unwrap(), None);
}

#[tokio::test]
async fn sent_file_cache_round_trips_and_overwrites() {
    let (store, _conn) = open_store().await;

    let mut file = SentFile {
        md5_digest: vec![0xAB; 16],
        file_size: 2048,
        kind: FileKind::Photo,
        id: 100,
        hash: 200,
    };
    store.cache_file(&file).await.unwrap();

    // Same content re-uploaded under a new server reference.
    file.id = 101;
    file.hash = 201;
    store.cache_file(&file).await.unwrap();

    let found = store
        .get_file(&[0xAB; 16], 2048, FileKind::Photo)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, file);

    assert_eq!(
        store.get_file(&[0xAB; 16], 2048, FileKind::Document).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn update_state_checkpoint_is_overwritten() {
    let (store, _conn) = open_store().await;

    let date = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let first = UpdateState {
        id: 0,
        pts: 10,
        qts: 1,
        date,
        seq: 5,
    };
    store.set_update_state(&first).await.unwrap();

    let second = UpdateState {
        pts: 25,
        seq: 6,
        ..first.clone()
    };
    store.set_update_state(&second).await.unwrap();

    assert_eq!(store.get_update_state(0).await.unwrap(), Some(second.clone()));
    assert_eq!(store.get_update_states().await.unwrap(), vec![second]);
}

#[tokio::test]
async fn get_update_state_missing_returns_none() {
    let (store, _conn) = open_store().await;
    assert_eq!(store.get_update_state(0).await.unwrap(), None);
}

#[tokio::test]
async fn close_is_idempotent_and_rejects_further_operations() {
    let (store, _conn) = open_store().await;

    store.close().await.unwrap();
    store.close().await.unwrap();

    assert!(matches!(store.load().await, Err(StoreError::Closed)));
    assert!(matches!(
        store.save(&sample_session()).await,
        Err(StoreError::Closed)
    ));
    assert!(matches!(store.get_entity(1).await, Err(StoreError::Closed)));
}

#[tokio::test]
async fn unmigrated_schema_surfaces_a_schema_error() {
    let conn = open_conn().await;
    let store = PostgresStore::new(conn);

    assert!(matches!(store.load().await, Err(StoreError::Schema(_))));
}
