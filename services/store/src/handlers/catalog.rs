use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gka_domain::pagination::PageRequest;

use crate::domain::types::{Banner, BannerPatch, Category, CategoryPatch, Product, ProductPatch};
use crate::error::StoreServiceError;
use crate::handlers::{JsonBody, non_blank, nullable, ok};
use crate::state::AppState;
use crate::usecase::catalog::{
    CreateBannerInput, CreateBannerUseCase, CreateCategoryInput, CreateCategoryUseCase,
    CreateProductInput, CreateProductUseCase, DeleteBannerUseCase, DeleteCategoryUseCase,
    DeleteProductUseCase, GetProductUseCase, ListBannersUseCase, ListCategoriesUseCase,
    ListProductsUseCase, SearchProductsUseCase, UpdateBannerUseCase, UpdateCategoryUseCase,
    UpdateProductUseCase,
};

// ── Views ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub category_id: Option<Uuid>,
    pub image_url: String,
    pub image_public_id: String,
    pub in_stock: bool,
    #[serde(serialize_with = "gka_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "gka_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductView {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            original_price: p.original_price,
            category_id: p.category_id,
            image_url: p.image_url,
            image_public_id: p.image_public_id,
            in_stock: p.in_stock,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct CategoryView {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub image_public_id: String,
    #[serde(serialize_with = "gka_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryView {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            image_url: c.image_url,
            image_public_id: c.image_public_id,
            created_at: c.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct BannerView {
    pub id: Uuid,
    pub title: String,
    pub link: Option<String>,
    pub image_url: String,
    pub image_public_id: String,
    #[serde(serialize_with = "gka_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<Banner> for BannerView {
    fn from(b: Banner) -> Self {
        Self {
            id: b.id,
            title: b.title,
            link: b.link,
            image_url: b.image_url,
            image_public_id: b.image_public_id,
            created_at: b.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ProductsBody {
    pub products: Vec<ProductView>,
}

#[derive(Serialize)]
pub struct ProductBody {
    pub product: ProductView,
}

#[derive(Serialize)]
pub struct CategoriesBody {
    pub categories: Vec<CategoryView>,
}

#[derive(Serialize)]
pub struct CategoryBody {
    pub category: CategoryView,
}

#[derive(Serialize)]
pub struct BannersBody {
    pub banners: Vec<BannerView>,
}

#[derive(Serialize)]
pub struct BannerBody {
    pub banner: BannerView,
}

// ── GET /getdata/products ────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct ProductListQuery {
    pub category: Option<Uuid>,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_products(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<impl IntoResponse, StoreServiceError> {
    let query: ProductListQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|e| StoreServiceError::InvalidInput(format!("invalid query: {e}")))?
        .unwrap_or_default();
    let usecase = ListProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase
        .execute(
            query.category,
            PageRequest::from_query(query.per_page, query.page),
        )
        .await?;
    Ok(ok(ProductsBody {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

// ── GET /getdata/products/{id} ───────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = GetProductUseCase {
        repo: state.product_repo(),
    };
    let product = usecase.execute(id).await?;
    Ok(ok(ProductBody {
        product: product.into(),
    }))
}

// ── GET /getdata/search ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = SearchProductsUseCase {
        repo: state.product_repo(),
    };
    let products = usecase.execute(&query.q).await?;
    Ok(ok(ProductsBody {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

// ── GET /getdata/categories ──────────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = ListCategoriesUseCase {
        repo: state.category_repo(),
    };
    let categories = usecase.execute().await?;
    Ok(ok(CategoriesBody {
        categories: categories.into_iter().map(Into::into).collect(),
    }))
}

// ── GET /getdata/banners ─────────────────────────────────────────────────────

pub async fn list_banners(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = ListBannersUseCase {
        repo: state.banner_repo(),
    };
    let banners = usecase.execute().await?;
    Ok(ok(BannersBody {
        banners: banners.into_iter().map(Into::into).collect(),
    }))
}

// ── POST /admin/products ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    #[serde(alias = "category")]
    pub category_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub in_stock: Option<bool>,
}

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateProductRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let price = body.price.ok_or(StoreServiceError::MissingField("price"))?;
    let usecase = CreateProductUseCase {
        repo: state.product_repo(),
    };
    let product = usecase
        .execute(CreateProductInput {
            name: body.name.unwrap_or_default(),
            description: body.description,
            price,
            original_price: body.original_price,
            category_id: body.category_id,
            image_url: body.image_url.unwrap_or_default(),
            image_public_id: body.image_public_id.unwrap_or_default(),
            in_stock: body.in_stock.unwrap_or(true),
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        ok(ProductBody {
            product: product.into(),
        }),
    ))
}

// ── PATCH /admin/products/{id} ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "nullable")]
    pub original_price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable", alias = "category")]
    pub category_id: Option<Option<Uuid>>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub in_stock: Option<bool>,
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdateProductRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = UpdateProductUseCase {
        repo: state.product_repo(),
    };
    let product = usecase
        .execute(
            id,
            ProductPatch {
                name: body.name,
                description: body.description,
                price: body.price,
                original_price: body.original_price,
                category_id: body.category_id,
                image_url: non_blank(body.image_url),
                image_public_id: non_blank(body.image_public_id),
                in_stock: body.in_stock,
            },
        )
        .await?;
    Ok(ok(ProductBody {
        product: product.into(),
    }))
}

// ── DELETE /admin/products/{id} ──────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = DeleteProductUseCase {
        repo: state.product_repo(),
        images: state.image_store(),
    };
    let product = usecase.execute(id).await?;
    Ok(ok(ProductBody {
        product: product.into(),
    }))
}

// ── POST /admin/categories ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateCategoryRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = CreateCategoryUseCase {
        repo: state.category_repo(),
    };
    let category = usecase
        .execute(CreateCategoryInput {
            name: body.name.unwrap_or_default(),
            image_url: body.image_url.unwrap_or_default(),
            image_public_id: body.image_public_id.unwrap_or_default(),
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        ok(CategoryBody {
            category: category.into(),
        }),
    ))
}

// ── PATCH /admin/categories/{id} ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdateCategoryRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = UpdateCategoryUseCase {
        repo: state.category_repo(),
    };
    let category = usecase
        .execute(
            id,
            CategoryPatch {
                name: body.name,
                image_url: non_blank(body.image_url),
                image_public_id: non_blank(body.image_public_id),
            },
        )
        .await?;
    Ok(ok(CategoryBody {
        category: category.into(),
    }))
}

// ── DELETE /admin/categories/{id} ────────────────────────────────────────────

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = DeleteCategoryUseCase {
        repo: state.category_repo(),
        images: state.image_store(),
    };
    let category = usecase.execute(id).await?;
    Ok(ok(CategoryBody {
        category: category.into(),
    }))
}

// ── POST /admin/banners ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateBannerRequest {
    pub title: Option<String>,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

pub async fn create_banner(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateBannerRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = CreateBannerUseCase {
        repo: state.banner_repo(),
    };
    let banner = usecase
        .execute(CreateBannerInput {
            title: body.title.unwrap_or_default(),
            link: body.link,
            image_url: body.image_url.unwrap_or_default(),
            image_public_id: body.image_public_id.unwrap_or_default(),
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        ok(BannerBody {
            banner: banner.into(),
        }),
    ))
}

// ── PATCH /admin/banners/{id} ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateBannerRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub link: Option<Option<String>>,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
}

pub async fn update_banner(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdateBannerRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = UpdateBannerUseCase {
        repo: state.banner_repo(),
    };
    let banner = usecase
        .execute(
            id,
            BannerPatch {
                title: non_blank(body.title),
                link: body.link.map(non_blank),
                image_url: non_blank(body.image_url),
                image_public_id: non_blank(body.image_public_id),
            },
        )
        .await?;
    Ok(ok(BannerBody {
        banner: banner.into(),
    }))
}

// ── DELETE /admin/banners/{id} ───────────────────────────────────────────────

pub async fn delete_banner(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = DeleteBannerUseCase {
        repo: state.banner_repo(),
        images: state.image_store(),
    };
    let banner = usecase.execute(id).await?;
    Ok(ok(BannerBody {
        banner: banner.into(),
    }))
}
