use sea_orm::entity::prelude::*;

/// Customer order.
///
/// Status columns hold the lowercase strings of the `gka_domain::order` enums.
/// `items` and `timeline` are JSON arrays.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub shipping_name: String,
    pub shipping_phone: String,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub landmark: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub full_address: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
    pub subtotal: f64,
    pub shipping_cost: f64,
    pub cod_charges: f64,
    pub discount: f64,
    pub total_amount: f64,
    pub payment_method: String,
    pub payment_status: String,
    pub order_status: String,
    #[sea_orm(unique)]
    pub cashfree_order_id: Option<String>,
    pub payment_session_id: Option<String>,
    pub notes: Option<String>,
    pub delivery_preference: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub timeline: Json,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
