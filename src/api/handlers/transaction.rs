//! Transaction handlers: record, list, list by address.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{CreateTransactionRequest, TransactionDto};
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::domain::Address;
use crate::error::{ErrorResponse, LedgerError};

/// `POST /transactions` — Record a transaction.
///
/// A `migrate_liquidity` transaction also debits `fromAddress` and credits
/// `toAddress` when both pools exist.
///
/// # Errors
///
/// Returns [`LedgerError`] on validation failure, insufficient liquidity,
/// a concurrent balance change, or (under the reject policy) an unknown pool.
#[utoipa::path(
    post,
    path = "/api/transactions",
    tag = "Transactions",
    summary = "Record a transaction",
    description = "Records a ledger transaction. Migrations move `amount` from the source pool to the destination pool atomically with the record.",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = TransactionDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Pool not found (reject policy)", body = ErrorResponse),
        (status = 409, description = "Pool balance changed concurrently", body = ErrorResponse),
        (status = 422, description = "Insufficient liquidity", body = ErrorResponse),
    )
)]
pub async fn create_transaction(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTransactionRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let record = req.into_new_transaction()?;
    let tx = state.ledger.record_transaction(record).await?;
    Ok((StatusCode::CREATED, Json(TransactionDto::from(tx))))
}

/// `GET /transactions` — List all transactions.
///
/// # Errors
///
/// Returns [`LedgerError`] on storage failures.
#[utoipa::path(
    get,
    path = "/api/transactions",
    tag = "Transactions",
    summary = "List transactions",
    responses(
        (status = 200, description = "All transactions", body = Vec<TransactionDto>),
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, LedgerError> {
    let txs = state.ledger.list_transactions().await?;
    Ok(Json(txs.into_iter().map(TransactionDto::from).collect::<Vec<_>>()))
}

/// `GET /transactions/:address` — List transactions from or to an address.
///
/// # Errors
///
/// Returns [`LedgerError`] on storage failures.
#[utoipa::path(
    get,
    path = "/api/transactions/{address}",
    tag = "Transactions",
    summary = "List transactions by address",
    params(
        ("address" = String, Path, description = "Account or pool address"),
    ),
    responses(
        (status = 200, description = "Transactions where the address is sender or receiver", body = Vec<TransactionDto>),
    )
)]
pub async fn list_transactions_by_address(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<impl IntoResponse, LedgerError> {
    let address = Address::parse(&address)?;
    let txs = state.ledger.transactions_for(&address).await?;
    Ok(Json(txs.into_iter().map(TransactionDto::from).collect::<Vec<_>>()))
}

/// Transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/{address}", get(list_transactions_by_address))
}
