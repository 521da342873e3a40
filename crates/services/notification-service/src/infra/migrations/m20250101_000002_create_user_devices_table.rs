//! Migration: Create user_devices table (push tokens).

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserDevices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserDevices::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserDevices::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserDevices::FcmToken).text().null())
                    .col(
                        ColumnDef::new(UserDevices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_devices_user_id")
                    .table(UserDevices::Table)
                    .col(UserDevices::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserDevices::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum UserDevices {
    Table,
    Id,
    UserId,
    FcmToken,
    CreatedAt,
}
