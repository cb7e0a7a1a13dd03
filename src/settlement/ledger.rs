//! In-process balances, for offline play and tests.

use rustc_hash::FxHashMap;
use tracing::info;

use super::wire::{FundsResponse, SettlementRequest, UserId};
use super::{Settlement, SettlementError};
use crate::engine::Outcome;

/// Balances kept in memory.
///
/// Accounts open on first use with the opening balance. Each settled round
/// moves the balance by the even-money payoff of its outcome.
#[derive(Debug, Clone)]
pub struct Ledger {
    opening_balance: f64,
    balances: FxHashMap<UserId, f64>,
}

impl Ledger {
    /// Create a ledger whose accounts open with `opening_balance`.
    pub fn new(opening_balance: f64) -> Self {
        Self {
            opening_balance,
            balances: FxHashMap::default(),
        }
    }

    /// Builder method: seed an account with a balance.
    pub fn with_account(mut self, user: UserId, balance: f64) -> Self {
        self.balances.insert(user, balance);
        self
    }

    /// Current balance of `user`, opening the account if needed.
    pub fn funds(&mut self, user: &UserId) -> f64 {
        *self
            .balances
            .entry(user.clone())
            .or_insert(self.opening_balance)
    }

    /// Number of accounts touched so far.
    pub fn num_accounts(&self) -> usize {
        self.balances.len()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(crate::table::DEFAULT_STARTING_BALANCE)
    }
}

impl Settlement for Ledger {
    fn balance(&mut self, user: &UserId) -> Result<f64, SettlementError> {
        Ok(self.funds(user))
    }

    fn settle(&mut self, request: &SettlementRequest) -> Result<FundsResponse, SettlementError> {
        let wager = request.wager;
        if !wager.is_finite() || wager <= 0.0 {
            return Err(SettlementError::InvalidWager(wager));
        }

        let opening = self.opening_balance;
        let balance = self
            .balances
            .entry(request.user_id.clone())
            .or_insert(opening);
        if wager > *balance {
            return Err(SettlementError::InsufficientFunds {
                wager,
                balance: *balance,
            });
        }

        *balance += Outcome::from(request.result).payoff(wager);
        info!(user = %request.user_id, result = ?request.result, wager, balance = *balance, "ledger settled");
        Ok(FundsResponse { balance: *balance })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(outcome: Outcome, wager: f64) -> SettlementRequest {
        SettlementRequest::new(UserId::Number(1), outcome, wager)
    }

    #[test]
    fn test_accounts_open_with_opening_balance() {
        let mut ledger = Ledger::new(1000.0);
        assert_eq!(ledger.balance(&UserId::Number(9)).unwrap(), 1000.0);
        assert_eq!(ledger.num_accounts(), 1);
    }

    #[test]
    fn test_even_money_settlement() {
        let mut ledger = Ledger::new(1000.0);
        assert_eq!(ledger.settle(&request(Outcome::Won, 50.0)).unwrap().balance, 1050.0);
        assert_eq!(ledger.settle(&request(Outcome::Lost, 20.0)).unwrap().balance, 1030.0);
        assert_eq!(ledger.settle(&request(Outcome::Tied, 30.0)).unwrap().balance, 1030.0);
    }

    #[test]
    fn test_rejects_bad_wagers() {
        let mut ledger = Ledger::new(100.0);
        assert!(matches!(
            ledger.settle(&request(Outcome::Won, 0.0)),
            Err(SettlementError::InvalidWager(_))
        ));
        assert!(matches!(
            ledger.settle(&request(Outcome::Won, f64::NAN)),
            Err(SettlementError::InvalidWager(_))
        ));
        assert!(matches!(
            ledger.settle(&request(Outcome::Lost, 100.5)),
            Err(SettlementError::InsufficientFunds { .. })
        ));
        // Rejections leave the balance alone
        assert_eq!(ledger.balance(&UserId::Number(1)).unwrap(), 100.0);
    }

    #[test]
    fn test_seeded_account() {
        let mut ledger = Ledger::new(1000.0).with_account(UserId::Text("ana".into()), 5.0);
        let ana = UserId::Text("ana".into());
        assert_eq!(ledger.funds(&ana), 5.0);

        let req = SettlementRequest::new(ana.clone(), Outcome::Lost, 5.0);
        assert_eq!(ledger.settle(&req).unwrap().balance, 0.0);
    }
}
