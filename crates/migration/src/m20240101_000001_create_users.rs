//! Create `users` table. Username and email are globally unique.
use sea_orm_migration::{prelude::*, schema::*};

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
                    .col(uuid(Users::Id).primary_key())
                    .col(string_len(Users::Username, 64).unique_key().not_null())
                    .col(string_len(Users::Email, 255).unique_key().not_null())
                    .col(string_len(Users::Password, 255).not_null())
                    .col(string_len(Users::Role, 16).not_null().default("user"))
                    .col(ColumnDef::new(Users::FullName).string_len(128).null())
                    .col(ColumnDef::new(Users::Bio).text().null())
                    .col(ColumnDef::new(Users::Avatar).text().null())
                    .col(json_binary(Users::Languages).not_null())
                    .col(timestamp_with_time_zone(Users::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Id, Username, Email, Password, Role, FullName, Bio, Avatar, Languages, CreatedAt }
