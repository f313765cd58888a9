use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Orders::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Orders::UserId).uuid().not_null())
                    .col(ColumnDef::new(Orders::ShippingName).string().not_null())
                    .col(ColumnDef::new(Orders::ShippingPhone).string().not_null())
                    .col(ColumnDef::new(Orders::AddressLine).string().not_null())
                    .col(ColumnDef::new(Orders::City).string().not_null())
                    .col(ColumnDef::new(Orders::State).string().not_null())
                    .col(ColumnDef::new(Orders::Pincode).string().not_null())
                    .col(ColumnDef::new(Orders::Landmark).string())
                    .col(ColumnDef::new(Orders::FullAddress).text().not_null())
                    .col(ColumnDef::new(Orders::Items).json_binary().not_null())
                    .col(ColumnDef::new(Orders::Subtotal).double().not_null())
                    .col(ColumnDef::new(Orders::ShippingCost).double().not_null())
                    .col(
                        ColumnDef::new(Orders::CodCharges)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Orders::Discount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Orders::TotalAmount).double().not_null())
                    .col(ColumnDef::new(Orders::PaymentMethod).string().not_null())
                    .col(ColumnDef::new(Orders::PaymentStatus).string().not_null())
                    .col(ColumnDef::new(Orders::OrderStatus).string().not_null())
                    .col(ColumnDef::new(Orders::CashfreeOrderId).string().unique_key())
                    .col(ColumnDef::new(Orders::PaymentSessionId).string())
                    .col(ColumnDef::new(Orders::Notes).text())
                    .col(ColumnDef::new(Orders::DeliveryPreference).string())
                    .col(
                        ColumnDef::new(Orders::Timeline)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Orders::Table, Orders::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Orders::Table)
                    .col(Orders::UserId)
                    .col(Orders::CreatedAt)
                    .name("idx_orders_user_id_created_at")
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Orders::Table)
                    .col(Orders::OrderStatus)
                    .col(Orders::CreatedAt)
                    .name("idx_orders_order_status_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Orders {
    Table,
    Id,
    UserId,
    ShippingName,
    ShippingPhone,
    AddressLine,
    City,
    State,
    Pincode,
    Landmark,
    FullAddress,
    Items,
    Subtotal,
    ShippingCost,
    CodCharges,
    Discount,
    TotalAmount,
    PaymentMethod,
    PaymentStatus,
    OrderStatus,
    CashfreeOrderId,
    PaymentSessionId,
    Notes,
    DeliveryPreference,
    Timeline,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
