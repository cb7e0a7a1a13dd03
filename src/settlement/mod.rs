//! Settlement of resolved rounds against the user's stored balance.
//!
//! The engine decides who won; settlement decides what that does to the
//! user's funds. The two are decoupled: a failed settlement never changes a
//! round's outcome.
//!
//! - [`HttpSettlement`]: the backend's REST API
//! - [`Ledger`]: balances held in process

pub mod http;
pub mod ledger;
pub mod wire;

pub use http::HttpSettlement;
pub use ledger::Ledger;
pub use wire::{FundsResponse, ResultCode, SettlementRequest, UserId};

use thiserror::Error;

/// Errors from querying or updating a balance.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("settlement request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("settlement service returned {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid settlement URL: {0} (expected http or https)")]
    InvalidUrl(String),
    #[error("invalid wager: {0}")]
    InvalidWager(f64),
    #[error("wager {wager} exceeds balance {balance}")]
    InsufficientFunds { wager: f64, balance: f64 },
}

/// A service that owns user balances.
pub trait Settlement {
    /// Current balance of `user`.
    fn balance(&mut self, user: &UserId) -> Result<f64, SettlementError>;

    /// Apply a resolved round and return the updated balance.
    fn settle(&mut self, request: &SettlementRequest) -> Result<FundsResponse, SettlementError>;
}

impl<S: Settlement + ?Sized> Settlement for Box<S> {
    fn balance(&mut self, user: &UserId) -> Result<f64, SettlementError> {
        (**self).balance(user)
    }

    fn settle(&mut self, request: &SettlementRequest) -> Result<FundsResponse, SettlementError> {
        (**self).settle(request)
    }
}
