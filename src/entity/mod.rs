//! Sea-ORM entity models backing the PostgreSQL session store.
//!
//! Each submodule maps one table of the session schema. The tables live in
//! the schema selected at connection time through `search_path`, so the
//! models themselves carry no schema qualifier.
//!
//! These entities are used internally by [`PostgresStore`](crate::PostgresStore);
//! they are exported for callers that need to query the tables directly
//! (reporting, manual cleanup) or to feed them into schema tooling.

pub mod cached_entity;
pub mod sent_file;
pub mod session;
pub mod update_state;
