use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::CookieId).string_len(64).not_null())
                    .col(ColumnDef::new(Users::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_users_cookie_id")
                    .table(Users::Table)
                    .col(Users::CookieId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SearchHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SearchHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SearchHistory::UserId).integer().not_null())
                    .col(ColumnDef::new(SearchHistory::CityName).string().not_null())
                    .col(ColumnDef::new(SearchHistory::SearchedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_search_history_user_id")
                            .from(SearchHistory::Table, SearchHistory::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Per-user history and suggestion lookups
        manager
            .create_index(
                Index::create()
                    .name("ix_search_history_user_id")
                    .table(SearchHistory::Table)
                    .col(SearchHistory::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Global stats grouping
        manager
            .create_index(
                Index::create()
                    .name("ix_search_history_city_name")
                    .table(SearchHistory::Table)
                    .col(SearchHistory::CityName)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SearchHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    CookieId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SearchHistory {
    Table,
    Id,
    UserId,
    CityName,
    SearchedAt,
}
