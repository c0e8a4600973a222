//! # MTProto Session Store for Sea-ORM with PostgreSQL
//!
//! A PostgreSQL session storage backend for MTProto messaging clients,
//! using [Sea-ORM](https://crates.io/crates/sea-orm) as the database
//! abstraction layer.
//!
//! Instead of the client library's default file-backed or in-memory
//! session, this crate persists the authorization state — data-center
//! routing, the authorization key, the cache of observed peers, the cache
//! of uploaded files and the update-sequence checkpoints — into a set of
//! tables inside a PostgreSQL schema. One schema holds one client identity,
//! so several bots or accounts can share a database by using one schema
//! each.
//!
//! ## Features
//!
//! - Persistent session storage in PostgreSQL (one schema per client)
//! - The [`SessionStorage`] contract mirroring a client library's
//!   pluggable session interface
//! - Idempotent, last-write-wins entity and sent-file caches
//! - Update-sequence checkpointing for event-processing resumption
//! - Optional `migration` feature providing the schema migrator
//!
//! ## Quick Start
//!
//! ```no_run
//! use mtproto_session_seaorm_store::{SessionStorage, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StoreConfig::new("telegram", "bot_alpha", "postgres", "postgres")
//!     .connect()
//!     .await?;
//!
//! match store.load().await? {
//!     Some(session) => println!("resuming session on DC {}", session.dc_id),
//!     None => println!("no session yet; the client will log in"),
//! }
//!
//! store.close().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Database Schema
//!
//! Four tables, created by [`migration::Migrator`]:
//!
//! | Table        | Keyed by                        | Holds                               |
//! |--------------|---------------------------------|-------------------------------------|
//! | sessions     | dc_id (at most one row)         | Address, port, authorization key    |
//! | entities     | id                              | Access hash, kind, naming metadata  |
//! | sent_files   | md5_digest + file_size + kind   | Server-side file reference          |
//! | update_state | id (0 = account-wide)           | pts/qts/date/seq checkpoint         |
//!
//! ## Error Handling
//!
//! All operations return [`StoreError`], which separates connectivity
//! failures, missing-schema failures, constraint violations and
//! use-after-close, so a caller can tell "run the migrations" apart from
//! "the database is down". The store never retries internally.

pub mod entity;

mod config;
mod error;
mod postgres_store;
mod storage;

#[cfg(feature = "migration")]
pub mod migration;

pub use config::StoreConfig;
pub use entity::cached_entity::EntityKind;
pub use entity::sent_file::FileKind;
pub use error::StoreError;
pub use postgres_store::PostgresStore;
pub use storage::{CachedEntity, SentFile, SessionData, SessionStorage, UpdateState};
