use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use gka_domain::order::OrderStatus;
use gka_domain::pagination::PageRequest;
use gka_domain::pricing::OrderTotals;
use gka_domain::user::UserRole;
use gka_store_schema::{banners, carts, categories, orders, outbox_events, products, users};

use crate::domain::repository::{
    BannerRepository, CartRepository, CategoryRepository, OrderRepository, OutboxRepository,
    ProductRepository, UserRepository,
};
use crate::domain::types::{
    Banner, BannerPatch, CartItem, Category, CategoryPatch, Order, OrderGuard, OutboxEvent,
    Product, ProductPatch, ShippingAddress, User,
};
use crate::error::StoreServiceError;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn create(&self, user: &User) -> Result<(), StoreServiceError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            phone: Set(user.phone.clone()),
            role: Set(i16::from(user.role.as_u8())),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreServiceError::EmailAlreadyRegistered),
            Err(e) => Err(anyhow::Error::new(e).context("create user").into()),
        }
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<bool, StoreServiceError> {
        let mut update = users::Entity::update_many()
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id));
        if let Some(name) = name {
            update = update.col_expr(users::Column::Name, Expr::value(name));
        }
        if let Some(phone) = phone {
            update = update.col_expr(users::Column::Phone, Expr::value(phone));
        }
        let result = update.exec(&self.db).await.context("update user profile")?;
        Ok(result.rows_affected > 0)
    }

    async fn list(&self, page: PageRequest) -> Result<Vec<User>, StoreServiceError> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(models
            .into_iter()
            .map(user_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn set_role(&self, id: Uuid, role: UserRole) -> Result<bool, StoreServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Role, Expr::value(i16::from(role.as_u8())))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set user role")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_admins_created_after(
        &self,
        after: DateTime<Utc>,
    ) -> Result<Vec<User>, StoreServiceError> {
        let models = users::Entity::find()
            .filter(users::Column::Role.eq(i16::from(UserRole::Admin.as_u8())))
            .filter(users::Column::CreatedAt.gt(after))
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list admins created after")?;
        Ok(models
            .into_iter()
            .map(user_from_model)
            .collect::<anyhow::Result<_>>()?)
    }
}

fn user_from_model(model: users::Model) -> anyhow::Result<User> {
    let role = u8::try_from(model.role)
        .ok()
        .and_then(UserRole::from_u8)
        .with_context(|| format!("unknown role {} for user {}", model.role, model.id))?;
    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password_hash,
        phone: model.phone,
        role,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

/// `%term%` with LIKE wildcards in the term escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

impl ProductRepository for DbProductRepository {
    async fn list(
        &self,
        category_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<Product>, StoreServiceError> {
        let mut query = products::Entity::find();
        if let Some(category_id) = category_id {
            query = query.filter(products::Column::CategoryId.eq(category_id));
        }
        let models = query
            .order_by_desc(products::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError> {
        let model = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find product by id")?;
        Ok(model.map(product_from_model))
    }

    async fn search(&self, query: &str, limit: u64) -> Result<Vec<Product>, StoreServiceError> {
        let pattern = like_pattern(query);
        let models = products::Entity::find()
            .filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(products::Column::Name))).like(&pattern))
                    .add(
                        Expr::expr(Func::lower(Expr::col(products::Column::Description)))
                            .like(&pattern),
                    ),
            )
            .order_by_desc(products::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("search products")?;
        Ok(models.into_iter().map(product_from_model).collect())
    }

    async fn create(&self, product: &Product) -> Result<(), StoreServiceError> {
        products::ActiveModel {
            id: Set(product.id),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            price: Set(product.price),
            original_price: Set(product.original_price),
            category_id: Set(product.category_id),
            image_url: Set(product.image_url.clone()),
            image_public_id: Set(product.image_public_id.clone()),
            in_stock: Set(product.in_stock),
            created_at: Set(product.created_at),
            updated_at: Set(product.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create product")?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, StoreServiceError> {
        let Some(model) = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find product for update")?
        else {
            return Ok(None);
        };
        let mut active = model.into_active_model();
        if let Some(name) = &patch.name {
            active.name = Set(name.clone());
        }
        if let Some(description) = &patch.description {
            active.description = Set(description.clone());
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(original_price) = patch.original_price {
            active.original_price = Set(original_price);
        }
        if let Some(category_id) = patch.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(image_url) = &patch.image_url {
            active.image_url = Set(image_url.clone());
        }
        if let Some(image_public_id) = &patch.image_public_id {
            active.image_public_id = Set(image_public_id.clone());
        }
        if let Some(in_stock) = patch.in_stock {
            active.in_stock = Set(in_stock);
        }
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await.context("update product")?;
        Ok(Some(product_from_model(model)))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Product>, StoreServiceError> {
        let Some(model) = products::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find product for delete")?
        else {
            return Ok(None);
        };
        products::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete product")?;
        Ok(Some(product_from_model(model)))
    }
}

fn product_from_model(model: products::Model) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        original_price: model.original_price,
        category_id: model.category_id,
        image_url: model.image_url,
        image_public_id: model.image_public_id,
        in_stock: model.in_stock,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Category repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCategoryRepository {
    pub db: DatabaseConnection,
}

impl CategoryRepository for DbCategoryRepository {
    async fn list(&self) -> Result<Vec<Category>, StoreServiceError> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
            .context("list categories")?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn create(&self, category: &Category) -> Result<(), StoreServiceError> {
        let result = categories::ActiveModel {
            id: Set(category.id),
            name: Set(category.name.clone()),
            image_url: Set(category.image_url.clone()),
            image_public_id: Set(category.image_public_id.clone()),
            created_at: Set(category.created_at),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreServiceError::CategoryAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("create category").into()),
        }
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &CategoryPatch,
    ) -> Result<Option<Category>, StoreServiceError> {
        let Some(model) = categories::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find category for update")?
        else {
            return Ok(None);
        };
        let mut active = model.into_active_model();
        if let Some(name) = &patch.name {
            active.name = Set(name.clone());
        }
        if let Some(image_url) = &patch.image_url {
            active.image_url = Set(image_url.clone());
        }
        if let Some(image_public_id) = &patch.image_public_id {
            active.image_public_id = Set(image_public_id.clone());
        }
        match active.update(&self.db).await {
            Ok(model) => Ok(Some(category_from_model(model))),
            Err(e) if is_unique_violation(&e) => Err(StoreServiceError::CategoryAlreadyExists),
            Err(e) => Err(anyhow::Error::new(e).context("update category").into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Category>, StoreServiceError> {
        let Some(model) = categories::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find category for delete")?
        else {
            return Ok(None);
        };
        categories::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete category")?;
        Ok(Some(category_from_model(model)))
    }
}

fn category_from_model(model: categories::Model) -> Category {
    Category {
        id: model.id,
        name: model.name,
        image_url: model.image_url,
        image_public_id: model.image_public_id,
        created_at: model.created_at,
    }
}

// ── Banner repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBannerRepository {
    pub db: DatabaseConnection,
}

impl BannerRepository for DbBannerRepository {
    async fn list(&self) -> Result<Vec<Banner>, StoreServiceError> {
        let models = banners::Entity::find()
            .order_by_desc(banners::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list banners")?;
        Ok(models.into_iter().map(banner_from_model).collect())
    }

    async fn create(&self, banner: &Banner) -> Result<(), StoreServiceError> {
        banners::ActiveModel {
            id: Set(banner.id),
            title: Set(banner.title.clone()),
            link: Set(banner.link.clone()),
            image_url: Set(banner.image_url.clone()),
            image_public_id: Set(banner.image_public_id.clone()),
            created_at: Set(banner.created_at),
        }
        .insert(&self.db)
        .await
        .context("create banner")?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &BannerPatch,
    ) -> Result<Option<Banner>, StoreServiceError> {
        let Some(model) = banners::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find banner for update")?
        else {
            return Ok(None);
        };
        let mut active = model.into_active_model();
        if let Some(title) = &patch.title {
            active.title = Set(title.clone());
        }
        if let Some(link) = &patch.link {
            active.link = Set(link.clone());
        }
        if let Some(image_url) = &patch.image_url {
            active.image_url = Set(image_url.clone());
        }
        if let Some(image_public_id) = &patch.image_public_id {
            active.image_public_id = Set(image_public_id.clone());
        }
        let model = active.update(&self.db).await.context("update banner")?;
        Ok(Some(banner_from_model(model)))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Banner>, StoreServiceError> {
        let Some(model) = banners::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find banner for delete")?
        else {
            return Ok(None);
        };
        banners::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete banner")?;
        Ok(Some(banner_from_model(model)))
    }
}

fn banner_from_model(model: banners::Model) -> Banner {
    Banner {
        id: model.id,
        title: model.title,
        link: model.link,
        image_url: model.image_url,
        image_public_id: model.image_public_id,
        created_at: model.created_at,
    }
}

// ── Cart repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCartRepository {
    pub db: DatabaseConnection,
}

impl CartRepository for DbCartRepository {
    async fn get(&self, user_id: Uuid) -> Result<Vec<CartItem>, StoreServiceError> {
        let Some(model) = carts::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .context("find cart")?
        else {
            return Ok(Vec::new());
        };
        let items = serde_json::from_value(model.items).context("decode cart items")?;
        Ok(items)
    }

    async fn replace(&self, user_id: Uuid, items: &[CartItem]) -> Result<(), StoreServiceError> {
        let items = serde_json::to_value(items).context("encode cart items")?;
        carts::Entity::insert(carts::ActiveModel {
            user_id: Set(user_id),
            items: Set(items),
            updated_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(carts::Column::UserId)
                .update_columns([carts::Column::Items, carts::Column::UpdatedAt])
                .to_owned(),
        )
        .exec(&self.db)
        .await
        .context("upsert cart")?;
        Ok(())
    }
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn create(&self, order: &Order) -> Result<(), StoreServiceError> {
        let items = serde_json::to_value(&order.items).context("encode order items")?;
        let timeline = serde_json::to_value(&order.timeline).context("encode order timeline")?;
        orders::ActiveModel {
            id: Set(order.id),
            user_id: Set(order.user_id),
            shipping_name: Set(order.shipping.name.clone()),
            shipping_phone: Set(order.shipping.phone.clone()),
            address_line: Set(order.shipping.address_line.clone()),
            city: Set(order.shipping.city.clone()),
            state: Set(order.shipping.state.clone()),
            pincode: Set(order.shipping.pincode.clone()),
            landmark: Set(order.shipping.landmark.clone()),
            full_address: Set(order.full_address.clone()),
            items: Set(items),
            subtotal: Set(order.totals.subtotal),
            shipping_cost: Set(order.totals.shipping_cost),
            cod_charges: Set(order.totals.cod_charges),
            discount: Set(order.totals.discount),
            total_amount: Set(order.totals.total_amount),
            payment_method: Set(order.payment_method.as_str().to_owned()),
            payment_status: Set(order.payment_status.as_str().to_owned()),
            order_status: Set(order.order_status.as_str().to_owned()),
            cashfree_order_id: Set(order.cashfree_order_id.clone()),
            payment_session_id: Set(order.payment_session_id.clone()),
            notes: Set(order.notes.clone()),
            delivery_preference: Set(order.delivery_preference.clone()),
            timeline: Set(timeline),
            created_at: Set(order.created_at),
            updated_at: Set(order.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create order")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, StoreServiceError> {
        let model = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order by id")?;
        Ok(model.map(order_from_model).transpose()?)
    }

    async fn find_by_cashfree_id(
        &self,
        cashfree_order_id: &str,
    ) -> Result<Option<Order>, StoreServiceError> {
        let model = orders::Entity::find()
            .filter(orders::Column::CashfreeOrderId.eq(cashfree_order_id))
            .one(&self.db)
            .await
            .context("find order by cashfree id")?;
        Ok(model.map(order_from_model).transpose()?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, StoreServiceError> {
        let models = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list orders by user")?;
        Ok(models
            .into_iter()
            .map(order_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn list(
        &self,
        status: Option<OrderStatus>,
        page: PageRequest,
    ) -> Result<Vec<Order>, StoreServiceError> {
        let mut query = orders::Entity::find();
        if let Some(status) = status {
            query = query.filter(orders::Column::OrderStatus.eq(status.as_str()));
        }
        let models = query
            .order_by_desc(orders::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list orders")?;
        Ok(models
            .into_iter()
            .map(order_from_model)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn update_guarded(
        &self,
        order: &Order,
        guard: OrderGuard,
    ) -> Result<bool, StoreServiceError> {
        let timeline = serde_json::to_value(&order.timeline).context("encode order timeline")?;
        let result = orders::Entity::update_many()
            .col_expr(
                orders::Column::PaymentStatus,
                Expr::value(order.payment_status.as_str()),
            )
            .col_expr(
                orders::Column::OrderStatus,
                Expr::value(order.order_status.as_str()),
            )
            .col_expr(orders::Column::Timeline, Expr::value(timeline))
            .col_expr(orders::Column::UpdatedAt, Expr::value(order.updated_at))
            .filter(orders::Column::Id.eq(order.id))
            .filter(orders::Column::PaymentStatus.eq(guard.payment_status.as_str()))
            .filter(orders::Column::OrderStatus.eq(guard.order_status.as_str()))
            .exec(&self.db)
            .await
            .context("guarded order update")?;
        Ok(result.rows_affected > 0)
    }
}

fn order_from_model(model: orders::Model) -> anyhow::Result<Order> {
    let shipping = ShippingAddress {
        name: model.shipping_name,
        phone: model.shipping_phone,
        address_line: model.address_line,
        city: model.city,
        state: model.state,
        pincode: model.pincode,
        landmark: model.landmark,
    };
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        shipping,
        full_address: model.full_address,
        items: serde_json::from_value(model.items).context("decode order items")?,
        totals: OrderTotals {
            subtotal: model.subtotal,
            shipping_cost: model.shipping_cost,
            cod_charges: model.cod_charges,
            discount: model.discount,
            total_amount: model.total_amount,
        },
        payment_method: model.payment_method.parse()?,
        payment_status: model.payment_status.parse()?,
        order_status: model.order_status.parse()?,
        cashfree_order_id: model.cashfree_order_id,
        payment_session_id: model.payment_session_id,
        notes: model.notes,
        delivery_preference: model.delivery_preference,
        timeline: serde_json::from_value(model.timeline).context("decode order timeline")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Outbox repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOutboxRepository {
    pub db: DatabaseConnection,
}

impl OutboxRepository for DbOutboxRepository {
    async fn enqueue(&self, event: &OutboxEvent) -> Result<(), StoreServiceError> {
        let now = Utc::now();
        outbox_events::ActiveModel {
            id: Set(event.id),
            kind: Set(event.kind.clone()),
            payload: Set(event.payload.clone()),
            idempotency_key: Set(event.idempotency_key.clone()),
            attempts: Set(0),
            last_error: Set(None),
            created_at: Set(now),
            next_attempt_at: Set(now),
            processed_at: Set(None),
            failed_at: Set(None),
        }
        .insert(&self.db)
        .await
        .context("enqueue outbox event")?;
        Ok(())
    }
}
