use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Banners::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Banners::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Banners::Title).string().not_null())
                    .col(ColumnDef::new(Banners::Link).string())
                    .col(ColumnDef::new(Banners::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Banners::ImagePublicId).string().not_null())
                    .col(
                        ColumnDef::new(Banners::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Banners::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Banners {
    Table,
    Id,
    Title,
    Link,
    ImageUrl,
    ImagePublicId,
    CreatedAt,
}
