use uuid::Uuid;

use crate::domain::repository::CartRepository;
use crate::domain::types::CartItem;
use crate::error::StoreServiceError;

pub struct GetCartUseCase<R: CartRepository> {
    pub repo: R,
}

impl<R: CartRepository> GetCartUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<CartItem>, StoreServiceError> {
        self.repo.get(user_id).await
    }
}

/// Overwrites the whole cart with what the storefront holds.
pub struct ReplaceCartUseCase<R: CartRepository> {
    pub repo: R,
}

impl<R: CartRepository> ReplaceCartUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        items: Vec<CartItem>,
    ) -> Result<Vec<CartItem>, StoreServiceError> {
        for item in &items {
            if item.id.trim().is_empty() {
                return Err(StoreServiceError::MissingField("items.id"));
            }
            if item.qty == 0 {
                return Err(StoreServiceError::InvalidInput("qty must be at least 1".into()));
            }
            if !item.price.is_finite() || item.price < 0.0 {
                return Err(StoreServiceError::InvalidInput("price must not be negative".into()));
            }
        }
        self.repo.replace(user_id, &items).await?;
        Ok(items)
    }
}
