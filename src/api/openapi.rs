//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::dto::{CreatePoolRequest, CreateTransactionRequest, PoolDto, TransactionDto, WalletResponse};
use super::handlers::{pool, system, transaction, wallet};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification, served by Swagger UI when the
/// `swagger-ui` feature is enabled.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "liquidity-ledger",
        description = "Liquidity pools and pool-to-pool migrations. Amounts are integers in the smallest unit."
    ),
    paths(
        pool::create_pool,
        pool::list_pools,
        pool::list_pools_by_owner,
        pool::get_pool,
        transaction::create_transaction,
        transaction::list_transactions,
        transaction::list_transactions_by_address,
        wallet::connect_wallet,
        system::health_handler,
    ),
    components(schemas(
        CreatePoolRequest,
        PoolDto,
        CreateTransactionRequest,
        TransactionDto,
        WalletResponse,
        ErrorResponse,
        ErrorBody,
        system::HealthResponse,
    )),
    tags(
        (name = "Pools", description = "Liquidity pool management"),
        (name = "Transactions", description = "Ledger transactions and migrations"),
        (name = "Wallet", description = "Simulated wallet"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;
