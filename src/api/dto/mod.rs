//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names are camelCase on the wire. Amounts are plain JSON integers
//! in the smallest unit; clients scale by 100 for display.

pub mod pool_dto;
pub mod transaction_dto;
pub mod wallet_dto;

pub use pool_dto::*;
pub use transaction_dto::*;
pub use wallet_dto::*;
