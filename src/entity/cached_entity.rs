//! Entity-cache model.
//!
//! Maps the `entities` table: a best-effort cache from a peer's numeric
//! identifier to the access hash needed to reference it later, together
//! with whatever identifying metadata was seen alongside it. Rows are
//! upserted opportunistically and never required to be complete.

use sea_orm::entity::prelude::*;

/// Kind of peer a cached entity row refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum EntityKind {
    /// A user account (including bots).
    #[sea_orm(string_value = "user")]
    User,
    /// A small group chat.
    #[sea_orm(string_value = "chat")]
    Chat,
    /// A channel or supergroup.
    #[sea_orm(string_value = "channel")]
    Channel,
}

/// One cached peer.
///
/// `date` records when the row was last written (unix seconds); the store
/// uses it to pick the newest row when a username lookup matches more than
/// one peer.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "entities")]
pub struct Model {
    /// Numeric peer identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Access hash required to reference the peer in API calls.
    pub hash: i64,

    /// What kind of peer this is.
    pub kind: EntityKind,

    /// Public username, if the peer has one.
    #[sea_orm(column_type = "Text", nullable)]
    pub username: Option<String>,

    /// Phone number, for user peers that exposed one.
    pub phone: Option<i64>,

    /// Display name at the time the row was cached.
    #[sea_orm(column_type = "Text", nullable)]
    pub name: Option<String>,

    /// Unix timestamp (seconds) of the last write to this row.
    pub date: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
