//! Session entity model.
//!
//! Maps the `sessions` table holding the client's authorization state.
//! The table is expected to contain at most one row; `PostgresStore::save`
//! enforces this by replacing the table contents transactionally.

use sea_orm::entity::prelude::*;

/// One persisted session: which data center the client is bound to, how to
/// reach it, and the authorization key negotiated with it.
///
/// # Database Schema
///
/// | Column         | Type                 | Description                        |
/// |----------------|----------------------|------------------------------------|
/// | dc_id          | INTEGER (Primary Key)| Data center identifier             |
/// | server_address | TEXT                 | Data center host                   |
/// | port           | INTEGER              | Data center port                   |
/// | auth_key       | BYTEA                | Authorization key bytes            |
/// | takeout_id     | INTEGER (nullable)   | Active takeout session, if any     |
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    /// Identifier of the data center this session is authorized against.
    #[sea_orm(primary_key, auto_increment = false)]
    pub dc_id: i32,

    /// Host address of the data center.
    #[sea_orm(column_type = "Text")]
    pub server_address: String,

    /// TCP port of the data center.
    pub port: i32,

    /// The authorization key negotiated with the data center. Possessing
    /// these bytes is equivalent to being logged in.
    pub auth_key: Vec<u8>,

    /// Identifier of an in-progress takeout (data export) session.
    pub takeout_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
