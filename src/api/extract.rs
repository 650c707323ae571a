//! JSON body extractor that reports rejections as [`LedgerError`].
//!
//! Axum's own `Json` rejects malformed bodies with plain-text 4xx
//! responses; wrapping it keeps every validation failure a 400 with the
//! structured error body.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::LedgerError;

/// `Json<T>` whose rejection is [`LedgerError::InvalidRequest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = LedgerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| LedgerError::InvalidRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}
