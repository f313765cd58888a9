use chrono::Utc;
use uuid::Uuid;

use gka_domain::pagination::PageRequest;

use crate::domain::repository::{BannerRepository, CategoryRepository, ImageStore, ProductRepository};
use crate::domain::types::{
    Banner, BannerPatch, Category, CategoryPatch, Product, ProductPatch, SEARCH_LIMIT,
};
use crate::error::StoreServiceError;
use crate::usecase::user::require;

/// Best-effort removal of a hosted image after its row is gone.
async fn destroy_image<I: ImageStore>(images: &I, public_id: &str) {
    if public_id.is_empty() {
        return;
    }
    if let Err(e) = images.destroy(public_id).await {
        tracing::warn!(public_id, error = %e, "failed to destroy image");
    }
}

/// Trim a patched text field. A blank replacement is rejected.
fn patched(value: Option<String>, field: &'static str) -> Result<Option<String>, StoreServiceError> {
    value.map(|v| require(&v, field)).transpose()
}

fn check_price(price: f64, field: &str) -> Result<(), StoreServiceError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(StoreServiceError::InvalidInput(format!("{field} must be positive")));
    }
    Ok(())
}

// ── Products ─────────────────────────────────────────────────────────────────

pub struct ListProductsUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> ListProductsUseCase<R> {
    pub async fn execute(
        &self,
        category_id: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Vec<Product>, StoreServiceError> {
        self.repo.list(category_id, page).await
    }
}

pub struct GetProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> GetProductUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Product, StoreServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(StoreServiceError::ProductNotFound)
    }
}

pub struct SearchProductsUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> SearchProductsUseCase<R> {
    pub async fn execute(&self, query: &str) -> Result<Vec<Product>, StoreServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(vec![]);
        }
        self.repo.search(query, SEARCH_LIMIT).await
    }
}

pub struct CreateProductInput {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub category_id: Option<Uuid>,
    pub image_url: String,
    pub image_public_id: String,
    pub in_stock: bool,
}

pub struct CreateProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> CreateProductUseCase<R> {
    pub async fn execute(&self, input: CreateProductInput) -> Result<Product, StoreServiceError> {
        let name = require(&input.name, "name")?;
        check_price(input.price, "price")?;
        if let Some(original) = input.original_price {
            check_price(original, "original_price")?;
        }
        let now = Utc::now();
        let product = Product {
            id: Uuid::now_v7(),
            name,
            description: input.description.trim().to_owned(),
            price: input.price,
            original_price: input.original_price,
            category_id: input.category_id,
            image_url: require(&input.image_url, "image_url")?,
            image_public_id: require(&input.image_public_id, "image_public_id")?,
            in_stock: input.in_stock,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&product).await?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }
}

pub struct UpdateProductUseCase<R: ProductRepository> {
    pub repo: R,
}

impl<R: ProductRepository> UpdateProductUseCase<R> {
    pub async fn execute(
        &self,
        id: Uuid,
        mut patch: ProductPatch,
    ) -> Result<Product, StoreServiceError> {
        if patch.is_empty() {
            return Err(StoreServiceError::MissingData);
        }
        if let Some(price) = patch.price {
            check_price(price, "price")?;
        }
        if let Some(Some(original)) = patch.original_price {
            check_price(original, "original_price")?;
        }
        patch.name = patched(patch.name, "name")?;
        patch.description = patch.description.map(|d| d.trim().to_owned());
        patch.image_url = patched(patch.image_url, "image_url")?;
        patch.image_public_id = patched(patch.image_public_id, "image_public_id")?;
        self.repo
            .update(id, &patch)
            .await?
            .ok_or(StoreServiceError::ProductNotFound)
    }
}

pub struct DeleteProductUseCase<R: ProductRepository, I: ImageStore> {
    pub repo: R,
    pub images: I,
}

impl<R: ProductRepository, I: ImageStore> DeleteProductUseCase<R, I> {
    pub async fn execute(&self, id: Uuid) -> Result<Product, StoreServiceError> {
        let removed = self
            .repo
            .delete(id)
            .await?
            .ok_or(StoreServiceError::ProductNotFound)?;
        destroy_image(&self.images, &removed.image_public_id).await;
        tracing::info!(product_id = %id, "product deleted");
        Ok(removed)
    }
}

// ── Categories ───────────────────────────────────────────────────────────────

pub struct ListCategoriesUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> ListCategoriesUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Category>, StoreServiceError> {
        self.repo.list().await
    }
}

pub struct CreateCategoryInput {
    pub name: String,
    pub image_url: String,
    pub image_public_id: String,
}

pub struct CreateCategoryUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> CreateCategoryUseCase<R> {
    pub async fn execute(&self, input: CreateCategoryInput) -> Result<Category, StoreServiceError> {
        let category = Category {
            id: Uuid::now_v7(),
            name: require(&input.name, "name")?,
            image_url: require(&input.image_url, "image_url")?,
            image_public_id: require(&input.image_public_id, "image_public_id")?,
            created_at: Utc::now(),
        };
        self.repo.create(&category).await?;
        Ok(category)
    }
}

pub struct UpdateCategoryUseCase<R: CategoryRepository> {
    pub repo: R,
}

impl<R: CategoryRepository> UpdateCategoryUseCase<R> {
    pub async fn execute(
        &self,
        id: Uuid,
        mut patch: CategoryPatch,
    ) -> Result<Category, StoreServiceError> {
        if patch.is_empty() {
            return Err(StoreServiceError::MissingData);
        }
        patch.name = patched(patch.name, "name")?;
        patch.image_url = patched(patch.image_url, "image_url")?;
        patch.image_public_id = patched(patch.image_public_id, "image_public_id")?;
        self.repo
            .update(id, &patch)
            .await?
            .ok_or(StoreServiceError::CategoryNotFound)
    }
}

/// Products in a deleted category stay listed, uncategorized.
pub struct DeleteCategoryUseCase<R: CategoryRepository, I: ImageStore> {
    pub repo: R,
    pub images: I,
}

impl<R: CategoryRepository, I: ImageStore> DeleteCategoryUseCase<R, I> {
    pub async fn execute(&self, id: Uuid) -> Result<Category, StoreServiceError> {
        let removed = self
            .repo
            .delete(id)
            .await?
            .ok_or(StoreServiceError::CategoryNotFound)?;
        destroy_image(&self.images, &removed.image_public_id).await;
        Ok(removed)
    }
}

// ── Banners ──────────────────────────────────────────────────────────────────

pub struct ListBannersUseCase<R: BannerRepository> {
    pub repo: R,
}

impl<R: BannerRepository> ListBannersUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Banner>, StoreServiceError> {
        self.repo.list().await
    }
}

pub struct CreateBannerInput {
    pub title: String,
    pub link: Option<String>,
    pub image_url: String,
    pub image_public_id: String,
}

pub struct CreateBannerUseCase<R: BannerRepository> {
    pub repo: R,
}

impl<R: BannerRepository> CreateBannerUseCase<R> {
    pub async fn execute(&self, input: CreateBannerInput) -> Result<Banner, StoreServiceError> {
        let banner = Banner {
            id: Uuid::now_v7(),
            title: require(&input.title, "title")?,
            link: input
                .link
                .map(|l| l.trim().to_owned())
                .filter(|l| !l.is_empty()),
            image_url: require(&input.image_url, "image_url")?,
            image_public_id: require(&input.image_public_id, "image_public_id")?,
            created_at: Utc::now(),
        };
        self.repo.create(&banner).await?;
        Ok(banner)
    }
}

pub struct UpdateBannerUseCase<R: BannerRepository> {
    pub repo: R,
}

impl<R: BannerRepository> UpdateBannerUseCase<R> {
    pub async fn execute(&self, id: Uuid, mut patch: BannerPatch) -> Result<Banner, StoreServiceError> {
        if patch.is_empty() {
            return Err(StoreServiceError::MissingData);
        }
        patch.title = patched(patch.title, "title")?;
        // A blank link clears it.
        patch.link = patch
            .link
            .map(|l| l.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()));
        patch.image_url = patched(patch.image_url, "image_url")?;
        patch.image_public_id = patched(patch.image_public_id, "image_public_id")?;
        self.repo
            .update(id, &patch)
            .await?
            .ok_or(StoreServiceError::BannerNotFound)
    }
}

pub struct DeleteBannerUseCase<R: BannerRepository, I: ImageStore> {
    pub repo: R,
    pub images: I,
}

impl<R: BannerRepository, I: ImageStore> DeleteBannerUseCase<R, I> {
    pub async fn execute(&self, id: Uuid) -> Result<Banner, StoreServiceError> {
        let removed = self
            .repo
            .delete(id)
            .await?
            .ok_or(StoreServiceError::BannerNotFound)?;
        destroy_image(&self.images, &removed.image_public_id).await;
        Ok(removed)
    }
}
