use axum::{extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};

use gka_auth_types::identity::Identity;

use crate::domain::types::CartItem;
use crate::error::StoreServiceError;
use crate::handlers::{JsonBody, ok};
use crate::state::AppState;
use crate::usecase::cart::{GetCartUseCase, ReplaceCartUseCase};

#[derive(Serialize)]
pub struct CartBody {
    pub items: Vec<CartItem>,
}

// ── GET /cart ────────────────────────────────────────────────────────────────

pub async fn get_cart(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let usecase = GetCartUseCase {
        repo: state.cart_repo(),
    };
    let items = usecase.execute(identity.user_id).await?;
    Ok(ok(CartBody { items }))
}

// ── POST /cart ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ReplaceCartRequest {
    pub items: Option<Vec<CartItem>>,
}

pub async fn replace_cart(
    identity: Identity,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ReplaceCartRequest>,
) -> Result<impl IntoResponse, StoreServiceError> {
    let items = body.items.ok_or(StoreServiceError::MissingField("items"))?;
    let usecase = ReplaceCartUseCase {
        repo: state.cart_repo(),
    };
    let items = usecase.execute(identity.user_id, items).await?;
    Ok(ok(CartBody { items }))
}
