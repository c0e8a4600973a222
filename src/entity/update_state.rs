//! Update-state model.
//!
//! Maps the `update_state` table: one checkpoint row per update sequence
//! (id 0 for the account-wide sequence, otherwise the channel identifier),
//! overwritten on each checkpoint so event processing can resume where it
//! left off.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "update_state")]
pub struct Model {
    /// 0 for the account-wide sequence, else the channel identifier.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,

    /// Persistent timestamp of the last processed update.
    pub pts: i32,

    /// Secondary persistent timestamp (secret chats and some channels).
    pub qts: i32,

    /// Unix timestamp (seconds) of the last processed update.
    pub date: i64,

    /// Sequence number of the last processed updates container.
    pub seq: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
