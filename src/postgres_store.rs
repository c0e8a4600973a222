use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set, TransactionTrait,
};
use tracing::debug;

use crate::entity::cached_entity::{self, Entity as CachedEntityEntity};
use crate::entity::sent_file::{self, Entity as SentFileEntity, FileKind};
use crate::entity::session::{self, Entity as SessionEntity};
use crate::entity::update_state::{self, Entity as UpdateStateEntity};
use crate::error::StoreError;
use crate::storage::{CachedEntity, SentFile, SessionData, SessionStorage, UpdateState};

/// A PostgreSQL-backed [`SessionStorage`] implementation using Sea-ORM.
///
/// `PostgresStore` persists an MTProto client's session state in four tables
/// (`sessions`, `entities`, `sent_files`, `update_state`) inside the schema
/// selected at connection time. The store holds one Sea-ORM connection
/// handle and performs no internal retries or caching; each operation is a
/// single statement or a single transaction.
///
/// # Usage
///
/// ```no_run
/// use mtproto_session_seaorm_store::{PostgresStore, SessionStorage, StoreConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = StoreConfig::new("telegram", "bot_alpha", "postgres", "postgres")
///     .connect()
///     .await?;
///
/// if let Some(session) = store.load().await? {
///     println!("resuming on DC {}", session.dc_id);
/// }
///
/// store.close().await?;
/// # Ok(())
/// # }
/// ```
///
/// An existing [`sea_orm::DatabaseConnection`] can be wrapped directly with
/// [`PostgresStore::new`] when the application manages its own connection.
///
/// # Error Handling
///
/// Database failures are classified into [`StoreError`] kinds: unreachable
/// database → [`StoreError::Connectivity`], missing tables →
/// [`StoreError::Schema`], constraint violations →
/// [`StoreError::Integrity`], use after [`close`](SessionStorage::close) →
/// [`StoreError::Closed`].
#[derive(Debug, Clone)]
pub struct PostgresStore {
    conn: DatabaseConnection,
    /// Set once by `close()`; clones share the flag so a store handed out
    /// by value still observes the shutdown.
    closed: Arc<AtomicBool>,
}

impl PostgresStore {
    /// Wraps an already-established Sea-ORM connection.
    ///
    /// The connection is expected to have its `search_path` pointing at the
    /// schema holding the session tables;
    /// [`StoreConfig::connect`](crate::StoreConfig::connect) sets this up.
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    fn conn(&self) -> Result<&DatabaseConnection, StoreError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Closed);
        }
        Ok(&self.conn)
    }
}

fn session_from_model(model: session::Model) -> Result<SessionData, StoreError> {
    // The column is INTEGER and writable by external tooling; reject values
    // that are not a TCP port instead of truncating them.
    let port = u16::try_from(model.port)
        .map_err(|_| StoreError::Backend(format!("session port out of range: {}", model.port)))?;

    Ok(SessionData {
        dc_id: model.dc_id,
        server_address: model.server_address,
        port,
        auth_key: model.auth_key,
        takeout_id: model.takeout_id,
    })
}

fn entity_from_model(model: cached_entity::Model) -> CachedEntity {
    CachedEntity {
        id: model.id,
        hash: model.hash,
        kind: model.kind,
        username: model.username,
        phone: model.phone,
        name: model.name,
    }
}

fn entity_to_active_model(entity: &CachedEntity, now: i64) -> cached_entity::ActiveModel {
    cached_entity::ActiveModel {
        id: Set(entity.id),
        hash: Set(entity.hash),
        kind: Set(entity.kind),
        username: Set(entity.username.clone()),
        phone: Set(entity.phone),
        name: Set(entity.name.clone()),
        date: Set(now),
    }
}

/// Upsert target: on a duplicate peer id, every other column is overwritten
/// (last write wins, no versioning).
fn entity_on_conflict() -> OnConflict {
    OnConflict::column(cached_entity::Column::Id)
        .update_columns([
            cached_entity::Column::Hash,
            cached_entity::Column::Kind,
            cached_entity::Column::Username,
            cached_entity::Column::Phone,
            cached_entity::Column::Name,
            cached_entity::Column::Date,
        ])
        .to_owned()
}

#[async_trait]
impl SessionStorage for PostgresStore {
    async fn load(&self) -> Result<Option<SessionData>, StoreError> {
        let model = SessionEntity::find().one(self.conn()?).await?;
        model.map(session_from_model).transpose()
    }

    /// Replaces the session row inside one transaction, so the table never
    /// holds more than one row and a concurrent `load` sees either the old
    /// session or the new one.
    async fn save(&self, session: &SessionData) -> Result<(), StoreError> {
        let conn = self.conn()?;
        let txn = conn.begin().await?;

        SessionEntity::delete_many().exec(&txn).await?;

        let model = session::ActiveModel {
            dc_id: Set(session.dc_id),
            server_address: Set(session.server_address.clone()),
            port: Set(i32::from(session.port)),
            auth_key: Set(session.auth_key.clone()),
            takeout_id: Set(session.takeout_id),
        };
        model.insert(&txn).await?;

        txn.commit().await?;

        debug!(dc_id = session.dc_id, "session saved");
        Ok(())
    }

    async fn delete(&self) -> Result<(), StoreError> {
        SessionEntity::delete_many().exec(self.conn()?).await?;
        debug!("session deleted");
        Ok(())
    }

    async fn cache_entity(&self, entity: &CachedEntity) -> Result<(), StoreError> {
        let now = Utc::now().timestamp();
        CachedEntityEntity::insert(entity_to_active_model(entity, now))
            .on_conflict(entity_on_conflict())
            .exec(self.conn()?)
            .await?;
        Ok(())
    }

    async fn cache_entities(&self, entities: &[CachedEntity]) -> Result<(), StoreError> {
        if entities.is_empty() {
            return Ok(());
        }

        // One upsert statement cannot touch the same row twice, so a batch
        // mentioning a peer id more than once must be collapsed first; the
        // last occurrence wins, as with sequential upserts.
        let mut by_id: HashMap<i64, &CachedEntity> = HashMap::with_capacity(entities.len());
        for entity in entities {
            by_id.insert(entity.id, entity);
        }

        let now = Utc::now().timestamp();
        let count = by_id.len();
        let models = by_id.into_values().map(|e| entity_to_active_model(e, now));
        CachedEntityEntity::insert_many(models)
            .on_conflict(entity_on_conflict())
            .exec(self.conn()?)
            .await?;

        debug!(count, "entities cached");
        Ok(())
    }

    async fn get_entity(&self, id: i64) -> Result<Option<CachedEntity>, StoreError> {
        let model = CachedEntityEntity::find_by_id(id).one(self.conn()?).await?;
        Ok(model.map(entity_from_model))
    }

    async fn get_entity_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CachedEntity>, StoreError> {
        let conn = self.conn()?;

        let mut rows = CachedEntityEntity::find()
            .filter(cached_entity::Column::Username.eq(username))
            .all(conn)
            .await?;

        if rows.len() > 1 {
            // Usernames can move between peers; keep the newest claim and
            // clear the username from the stale rows.
            rows.sort_by_key(|m| m.date);
            let stale = rows.drain(..rows.len() - 1).collect::<Vec<_>>();
            for row in stale {
                debug!(id = row.id, username, "clearing stale username claim");
                let mut active = row.into_active_model();
                active.username = Set(None);
                active.update(conn).await?;
            }
        }

        Ok(rows.pop().map(entity_from_model))
    }

    async fn cache_file(&self, file: &SentFile) -> Result<(), StoreError> {
        let model = sent_file::ActiveModel {
            md5_digest: Set(file.md5_digest.clone()),
            file_size: Set(file.file_size),
            kind: Set(file.kind),
            id: Set(file.id),
            hash: Set(file.hash),
        };

        SentFileEntity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    sent_file::Column::Md5Digest,
                    sent_file::Column::FileSize,
                    sent_file::Column::Kind,
                ])
                .update_columns([sent_file::Column::Id, sent_file::Column::Hash])
                .to_owned(),
            )
            .exec(self.conn()?)
            .await?;

        Ok(())
    }

    async fn get_file(
        &self,
        md5_digest: &[u8],
        file_size: i64,
        kind: FileKind,
    ) -> Result<Option<SentFile>, StoreError> {
        let model = SentFileEntity::find()
            .filter(sent_file::Column::Md5Digest.eq(md5_digest))
            .filter(sent_file::Column::FileSize.eq(file_size))
            .filter(sent_file::Column::Kind.eq(kind))
            .one(self.conn()?)
            .await?;

        Ok(model.map(|m| SentFile {
            md5_digest: m.md5_digest,
            file_size: m.file_size,
            kind: m.kind,
            id: m.id,
            hash: m.hash,
        }))
    }

    async fn set_update_state(&self, state: &UpdateState) -> Result<(), StoreError> {
        let model = update_state::ActiveModel {
            id: Set(state.id),
            pts: Set(state.pts),
            qts: Set(state.qts),
            date: Set(state.date.timestamp()),
            seq: Set(state.seq),
        };

        UpdateStateEntity::insert(model)
            .on_conflict(
                OnConflict::column(update_state::Column::Id)
                    .update_columns([
                        update_state::Column::Pts,
                        update_state::Column::Qts,
                        update_state::Column::Date,
                        update_state::Column::Seq,
                    ])
                    .to_owned(),
            )
            .exec(self.conn()?)
            .await?;

        Ok(())
    }

    async fn get_update_state(&self, id: i64) -> Result<Option<UpdateState>, StoreError> {
        let model = UpdateStateEntity::find_by_id(id).one(self.conn()?).await?;
        model.map(update_state_from_model).transpose()
    }

    async fn get_update_states(&self) -> Result<Vec<UpdateState>, StoreError> {
        let models = UpdateStateEntity::find().all(self.conn()?).await?;
        models.into_iter().map(update_state_from_model).collect()
    }

    async fn close(&self) -> Result<(), StoreError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        debug!("closing session store");
        // DatabaseConnection is a shared handle; closing this clone closes
        // the underlying pool for every clone.
        self.conn.clone().close().await?;
        Ok(())
    }
}

fn update_state_from_model(model: update_state::Model) -> Result<UpdateState, StoreError> {
    let date = DateTime::<Utc>::from_timestamp(model.date, 0).ok_or_else(|| {
        StoreError::Backend(format!("update_state date out of range: {}", model.date))
    })?;

    Ok(UpdateState {
        id: model.id,
        pts: model.pts,
        qts: model.qts,
        date,
        seq: model.seq,
    })
}
