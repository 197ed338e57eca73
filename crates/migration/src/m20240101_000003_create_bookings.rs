//! Create `bookings` table: reservations against a service.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(uuid(Bookings::Id).primary_key())
                    .col(uuid(Bookings::UserId).not_null())
                    .col(uuid(Bookings::ServiceId).not_null())
                    .col(timestamp_with_time_zone(Bookings::StartDate).not_null())
                    .col(ColumnDef::new(Bookings::EndDate).timestamp_with_time_zone().null())
                    .col(string_len(Bookings::Status, 16).not_null().default("pending"))
                    .col(decimal_len(Bookings::TotalPrice, 12, 2).not_null())
                    .col(ColumnDef::new(Bookings::Notes).text().null())
                    .col(timestamp_with_time_zone(Bookings::CreatedAt).not_null())
                    .check(Expr::cust("end_date IS NULL OR start_date <= end_date"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_user")
                            .from(Bookings::Table, Bookings::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_service")
                            .from(Bookings::Table, Bookings::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Bookings::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Bookings { Table, Id, UserId, ServiceId, StartDate, EndDate, Status, TotalPrice, Notes, CreatedAt }

#[derive(DeriveIden)]
enum Users { Table, Id }

#[derive(DeriveIden)]
enum Services { Table, Id }
