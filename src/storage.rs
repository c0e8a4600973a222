//! The session-storage contract and the plain data types crossing it.
//!
//! [`SessionStorage`] mirrors the pluggable session interface an MTProto
//! client library expects from its storage backend: load and save the
//! authorization state, cache observed peers and uploaded files, and
//! checkpoint the update sequence. [`crate::PostgresStore`] is the
//! PostgreSQL implementation shipped by this crate; the trait exists so a
//! client (or a test harness) can swap in another backend.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entity::cached_entity::EntityKind;
use crate::entity::sent_file::FileKind;
use crate::error::StoreError;

/// The authorization state a client needs to resume a connection without
/// logging in again.
///
/// Equality compares every field including the key bytes; `Debug` redacts
/// the key, since printing it would leak a credential equivalent to the
/// account password.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionData {
    /// Data center the session is authorized against.
    pub dc_id: i32,
    /// Host address of that data center.
    pub server_address: String,
    /// TCP port of that data center.
    pub port: u16,
    /// Authorization key bytes.
    pub auth_key: Vec<u8>,
    /// In-progress takeout (data export) session, if any.
    pub takeout_id: Option<i32>,
}

impl fmt::Debug for SessionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionData")
            .field("dc_id", &self.dc_id)
            .field("server_address", &self.server_address)
            .field("port", &self.port)
            .field("auth_key", &format_args!("<{} bytes>", self.auth_key.len()))
            .field("takeout_id", &self.takeout_id)
            .finish()
    }
}

/// A peer observed by the client: its identifier, the access hash needed to
/// reference it later, and whatever identifying metadata came with it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedEntity {
    /// Numeric peer identifier.
    pub id: i64,
    /// Access hash required to reference the peer in API calls.
    pub hash: i64,
    /// What kind of peer this is.
    pub kind: EntityKind,
    /// Public username, if any.
    pub username: Option<String>,
    /// Phone number, if exposed.
    pub phone: Option<i64>,
    /// Display name at observation time.
    pub name: Option<String>,
}

impl CachedEntity {
    /// A cache row carrying only the fields every peer has.
    pub fn new(id: i64, hash: i64, kind: EntityKind) -> Self {
        Self {
            id,
            hash,
            kind,
            username: None,
            phone: None,
            name: None,
        }
    }

    /// Attaches a username to the row.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Attaches a display name to the row.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches a phone number to the row.
    pub fn with_phone(mut self, phone: i64) -> Self {
        self.phone = Some(phone);
        self
    }
}

/// Server-side reference of a file that was already uploaded, so re-sending
/// the same content can skip the upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentFile {
    /// MD5 digest of the file contents.
    pub md5_digest: Vec<u8>,
    /// File size in bytes.
    pub file_size: i64,
    /// Whether the file was sent as a document or a photo.
    pub kind: FileKind,
    /// Server-assigned file identifier.
    pub id: i64,
    /// Server-assigned access hash.
    pub hash: i64,
}

/// One update-sequence checkpoint, keyed by `id` (0 for the account-wide
/// sequence, otherwise the channel identifier).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateState {
    /// 0 for the account-wide sequence, else the channel identifier.
    pub id: i64,
    /// Persistent timestamp of the last processed update.
    pub pts: i32,
    /// Secondary persistent timestamp.
    pub qts: i32,
    /// Time of the last processed update.
    pub date: DateTime<Utc>,
    /// Sequence number of the last processed updates container.
    pub seq: i32,
}

/// Pluggable session persistence for an MTProto client.
///
/// All operations are point reads and single-statement (or single-
/// transaction) writes; absence is reported as `Ok(None)`, never as an
/// error. Once [`close`](Self::close) has been called, every other
/// operation fails with [`StoreError::Closed`].
#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Reads the persisted session, if one exists.
    ///
    /// A freshly migrated, empty schema yields `Ok(None)`.
    async fn load(&self) -> Result<Option<SessionData>, StoreError>;

    /// Persists the session, replacing any previous one.
    ///
    /// Atomic with respect to concurrent readers: a reader observes either
    /// the old row or the new one, never a partial write.
    async fn save(&self, session: &SessionData) -> Result<(), StoreError>;

    /// Removes the persisted session (explicit logout).
    async fn delete(&self) -> Result<(), StoreError>;

    /// Upserts one entity-cache row; a later write for the same id
    /// overwrites the earlier one.
    async fn cache_entity(&self, entity: &CachedEntity) -> Result<(), StoreError>;

    /// Upserts a batch of entity-cache rows in one statement.
    async fn cache_entities(&self, entities: &[CachedEntity]) -> Result<(), StoreError>;

    /// Point lookup by peer identifier.
    async fn get_entity(&self, id: i64) -> Result<Option<CachedEntity>, StoreError>;

    /// Lookup by username. When several cached rows claim the same
    /// username, the most recently written one wins and the username is
    /// cleared from the stale rows.
    async fn get_entity_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CachedEntity>, StoreError>;

    /// Upserts one sent-file cache row.
    async fn cache_file(&self, file: &SentFile) -> Result<(), StoreError>;

    /// Point lookup of a previously uploaded file by digest, size and kind.
    async fn get_file(
        &self,
        md5_digest: &[u8],
        file_size: i64,
        kind: FileKind,
    ) -> Result<Option<SentFile>, StoreError>;

    /// Upserts the checkpoint row for `state.id`.
    async fn set_update_state(&self, state: &UpdateState) -> Result<(), StoreError>;

    /// Reads the checkpoint row for one sequence.
    async fn get_update_state(&self, id: i64) -> Result<Option<UpdateState>, StoreError>;

    /// Reads every checkpoint row.
    async fn get_update_states(&self) -> Result<Vec<UpdateState>, StoreError>;

    /// Releases the database connection. Safe to call more than once;
    /// afterwards every other operation fails with [`StoreError::Closed`].
    async fn close(&self) -> Result<(), StoreError>;
}
