//! Create `services` table owned by a provider user.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(uuid(Services::Id).primary_key())
                    .col(string_len(Services::Title, 200).not_null())
                    .col(ColumnDef::new(Services::Description).text().null())
                    .col(decimal_len(Services::Price, 12, 2).not_null())
                    .col(string_len(Services::Location, 200).not_null())
                    .col(uuid(Services::ProviderId).not_null())
                    .col(string_len(Services::Category, 64).not_null())
                    .col(json_binary(Services::Images).not_null())
                    .col(json_binary(Services::Availability).not_null())
                    .col(timestamp_with_time_zone(Services::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_services_provider")
                            .from(Services::Table, Services::ProviderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Services::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Services { Table, Id, Title, Description, Price, Location, ProviderId, Category, Images, Availability, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
