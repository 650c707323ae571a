//! Simulated wallet handler.

use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::WalletResponse;
use crate::app_state::AppState;
use crate::domain::SimulatedWallet;

/// `POST /wallet/connect` — Create a simulated wallet.
#[utoipa::path(
    post,
    path = "/api/wallet/connect",
    tag = "Wallet",
    summary = "Connect a simulated wallet",
    description = "Returns a random account address with a fixed starting balance. No chain is contacted.",
    responses(
        (status = 200, description = "Simulated wallet", body = WalletResponse),
    )
)]
pub async fn connect_wallet() -> impl IntoResponse {
    let wallet = SimulatedWallet::connect();
    tracing::debug!(address = %wallet.address, "simulated wallet connected");
    Json(WalletResponse::from(wallet))
}

/// Wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/wallet/connect", post(connect_wallet))
}
