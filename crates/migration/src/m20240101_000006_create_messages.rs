//! Create `messages` table. `context_id`/`context_type` are set together or not at all.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(uuid(Messages::Id).primary_key())
                    .col(uuid(Messages::SenderId).not_null())
                    .col(uuid(Messages::ReceiverId).not_null())
                    .col(string_len(Messages::ConversationId, 200).not_null())
                    .col(text(Messages::Message).not_null())
                    .col(string_len(Messages::Status, 16).not_null().default("unread"))
                    .col(string_len(Messages::MessageType, 32).not_null())
                    .col(ColumnDef::new(Messages::ContextId).uuid().null())
                    .col(ColumnDef::new(Messages::ContextType).string_len(16).null())
                    .col(timestamp_with_time_zone(Messages::CreatedAt).not_null())
                    .check(Expr::cust("(context_id IS NULL) = (context_type IS NULL)"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_sender")
                            .from(Messages::Table, Messages::SenderId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_messages_receiver")
                            .from(Messages::Table, Messages::ReceiverId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Messages::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    Id,
    SenderId,
    ReceiverId,
    ConversationId,
    Message,
    Status,
    MessageType,
    ContextId,
    ContextType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
