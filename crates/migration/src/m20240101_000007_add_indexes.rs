use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Services: catalogue filters
        manager
            .create_index(
                Index::create()
                    .name("idx_services_category")
                    .table(Services::Table)
                    .col(Services::Category)
                    .to_owned(),
            )
            .await?;

        // Bookings: per-user listing
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .to_owned(),
            )
            .await?;

        // Posts: per-trip listing
        manager
            .create_index(
                Index::create()
                    .name("idx_posts_trip")
                    .table(Posts::Table)
                    .col(Posts::TripId)
                    .to_owned(),
            )
            .await?;

        // Messages: conversation timeline and inbox
        manager
            .create_index(
                Index::create()
                    .name("idx_messages_conversation_created")
                    .table(Messages::Table)
                    .col(Messages::ConversationId)
                    .col(Messages::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_messages_receiver_status")
                    .table(Messages::Table)
                    .col(Messages::ReceiverId)
                    .col(Messages::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_messages_receiver_status").table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_messages_conversation_created").table(Messages::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_posts_trip").table(Posts::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bookings_user").table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_services_category").table(Services::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Services { Table, Category }

#[derive(DeriveIden)]
enum Bookings { Table, UserId }

#[derive(DeriveIden)]
enum Posts { Table, TripId }

#[derive(DeriveIden)]
enum Messages { Table, ConversationId, CreatedAt, ReceiverId, Status }
