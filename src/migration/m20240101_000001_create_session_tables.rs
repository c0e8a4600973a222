use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::DcId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::ServerAddress).text().not_null())
                    .col(ColumnDef::new(Sessions::Port).integer().not_null())
                    .col(ColumnDef::new(Sessions::AuthKey).binary().not_null())
                    .col(ColumnDef::new(Sessions::TakeoutId).integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Entities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entities::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Entities::Hash).big_integer().not_null())
                    .col(ColumnDef::new(Entities::Kind).string().not_null())
                    .col(ColumnDef::new(Entities::Username).text().null())
                    .col(ColumnDef::new(Entities::Phone).big_integer().null())
                    .col(ColumnDef::new(Entities::Name).text().null())
                    .col(ColumnDef::new(Entities::Date).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Username lookups are the only non-primary-key access path.
        manager
            .create_index(
                Index::create()
                    .name("idx_entities_username")
                    .table(Entities::Table)
                    .col(Entities::Username)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SentFiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SentFiles::Md5Digest).binary().not_null())
                    .col(ColumnDef::new(SentFiles::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(SentFiles::Kind).string().not_null())
                    .col(ColumnDef::new(SentFiles::Id).big_integer().not_null())
                    .col(ColumnDef::new(SentFiles::Hash).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(SentFiles::Md5Digest)
                            .col(SentFiles::FileSize)
                            .col(SentFiles::Kind),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UpdateState::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UpdateState::Id)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UpdateState::Pts).integer().not_null())
                    .col(ColumnDef::new(UpdateState::Qts).integer().not_null())
                    .col(ColumnDef::new(UpdateState::Date).big_integer().not_null())
                    .col(ColumnDef::new(UpdateState::Seq).integer().not_null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UpdateState::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SentFiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Entities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sessions {
    Table,
    DcId,
    ServerAddress,
    Port,
    AuthKey,
    TakeoutId,
}

#[derive(DeriveIden)]
enum Entities {
    Table,
    Id,
    Hash,
    Kind,
    Username,
    Phone,
    Name,
    Date,
}

#[derive(DeriveIden)]
enum SentFiles {
    Table,
    Md5Digest,
    FileSize,
    Kind,
    Id,
    Hash,
}

#[derive(DeriveIden)]
enum UpdateState {
    Table,
    Id,
    Pts,
    Qts,
    Date,
    Seq,
}
