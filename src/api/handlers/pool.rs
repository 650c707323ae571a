//! Pool handlers: create, list, list by owner, get.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CreatePoolRequest, PoolDto};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::domain::Address;
use crate::error::{ErrorResponse, LedgerError};

/// `POST /pools` — Create a new liquidity pool.
///
/// # Errors
///
/// Returns [`LedgerError`] on validation failure or a duplicate address.
#[utoipa::path(
    post,
    path = "/api/pools",
    tag = "Pools",
    summary = "Create a liquidity pool",
    description = "Creates a pool at the given address. `totalLiquidity` defaults to 0.",
    request_body = CreatePoolRequest,
    responses(
        (status = 201, description = "Pool created", body = PoolDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Address already in use", body = ErrorResponse),
    )
)]
pub async fn create_pool(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePoolRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let new_pool = req.into_new_pool()?;
    let pool = state.ledger.create_pool(new_pool).await?;
    Ok((StatusCode::CREATED, Json(PoolDto::from(pool))))
}

/// `GET /pools` — List all pools.
///
/// # Errors
///
/// Returns [`LedgerError`] on storage failures.
#[utoipa::path(
    get,
    path = "/api/pools",
    tag = "Pools",
    summary = "List pools",
    responses(
        (status = 200, description = "All pools", body = Vec<PoolDto>),
    )
)]
pub async fn list_pools(State(state): State<AppState>) -> Result<impl IntoResponse, LedgerError> {
    let pools = state.ledger.list_pools().await?;
    Ok(Json(pools.into_iter().map(PoolDto::from).collect::<Vec<_>>()))
}

/// `GET /pools/owner/:address` — List pools owned by an account.
///
/// # Errors
///
/// Returns [`LedgerError`] on storage failures.
#[utoipa::path(
    get,
    path = "/api/pools/owner/{address}",
    tag = "Pools",
    summary = "List pools by owner",
    params(
        ("address" = String, Path, description = "Owner account address"),
    ),
    responses(
        (status = 200, description = "Pools whose owner matches exactly", body = Vec<PoolDto>),
    )
)]
pub async fn list_pools_by_owner(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> Result<impl IntoResponse, LedgerError> {
    let owner = Address::parse(&owner)?;
    let pools = state.ledger.pools_by_owner(&owner).await?;
    Ok(Json(pools.into_iter().map(PoolDto::from).collect::<Vec<_>>()))
}

/// `GET /pools/:address` — Get one pool.
///
/// # Errors
///
/// Returns [`LedgerError::PoolNotFound`] if the pool does not exist.
#[utoipa::path(
    get,
    path = "/api/pools/{address}",
    tag = "Pools",
    summary = "Get pool details",
    params(
        ("address" = String, Path, description = "Pool address"),
    ),
    responses(
        (status = 200, description = "Pool details", body = PoolDto),
        (status = 404, description = "Pool not found", body = ErrorResponse),
    )
)]
pub async fn get_pool(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, LedgerError> {
    let address = Address::parse(&address)?;
    let pool = state.ledger.pool(&address).await?;
    Ok(Json(PoolDto::from(pool)))
}

/// Pool routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pools", get(list_pools).post(create_pool))
        .route("/pools/owner/{address}", get(list_pools_by_owner))
        .route("/pools/{address}", get(get_pool))
}
