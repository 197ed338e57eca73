use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trips::Table)
                    .if_not_exists()
                    .col(uuid(Trips::Id).primary_key())
                    .col(string_len(Trips::Title, 200).not_null())
                    .col(ColumnDef::new(Trips::Description).text().null())
                    .col(uuid(Trips::UserId).not_null())
                    .col(string_len(Trips::Destination, 200).not_null())
                    .col(ColumnDef::new(Trips::StartDate).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Trips::EndDate).timestamp_with_time_zone().null())
                    .col(boolean(Trips::IsPrivate).not_null().default(false))
                    .col(json_binary(Trips::Members).not_null())
                    .col(json_binary(Trips::Itinerary).not_null())
                    .col(timestamp_with_time_zone(Trips::CreatedAt).not_null())
                    .check(Expr::cust("start_date IS NULL OR end_date IS NULL OR start_date <= end_date"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trips_user")
                            .from(Trips::Table, Trips::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Trips::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Trips { Table, Id, Title, Description, UserId, Destination, StartDate, EndDate, IsPrivate, Members, Itinerary, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }
