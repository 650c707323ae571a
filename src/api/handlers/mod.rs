//! REST endpoint handlers organized by resource.

pub mod pool;
pub mod system;
pub mod transaction;
pub mod wallet;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(pool::routes())
        .merge(transaction::routes())
        .merge(wallet::routes())
}
