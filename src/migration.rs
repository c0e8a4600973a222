//! Schema migrations for the session tables.
//!
//! Run [`Migrator`] once per schema before opening a store, e.g. from an
//! application's setup path:
//!
//! ```no_run
//! use mtproto_session_seaorm_store::migration::Migrator;
//! use sea_orm_migration::MigratorTrait;
//!
//! # async fn example(conn: &sea_orm::DatabaseConnection) -> Result<(), sea_orm::DbErr> {
//! Migrator::up(conn, None).await?;
//! # Ok(())
//! # }
//! ```

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_session_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Keep our bookkeeping table out of the way of the application's own
    // migrations in the same schema.
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("mtproto_session_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20240101_000001_create_session_tables::Migration,
        )]
    }
}
