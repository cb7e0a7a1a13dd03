//! A blackjack table: wagers, rounds and settlement.
//!
//! The table sequences one round at a time:
//!
//! ```text
//! place_bet ──► hit* ──► stand ──► settle ──► RoundReport
//!                 └── bust ──────► settle ──► RoundReport
//! ```
//!
//! Wagers are validated here, before the engine deals. Once a round is
//! resolved its outcome is final; settlement is attempted afterwards and a
//! failure is reported next to the outcome, leaving the known balance as it
//! was.

pub mod config;

pub use config::{ConfigError, TableConfig, DEFAULT_STARTING_BALANCE};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::engine::{Hand, Outcome, Round, RoundError};
use crate::settlement::{Settlement, SettlementError, SettlementRequest};

/// Errors from driving a table.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    /// Wager is zero, negative or not a number.
    #[error("enter a valid amount greater than 0 (got {0})")]
    InvalidWager(f64),
    /// Wager exceeds the known balance.
    #[error("insufficient funds: wager {wager} exceeds balance {balance}")]
    InsufficientFunds { wager: f64, balance: f64 },
    /// A bet was placed while a round is still open.
    #[error("a round is already in progress")]
    RoundInProgress,
    /// Hit or stand without an open round.
    #[error("no round in progress; place a bet first")]
    NoActiveRound,
    #[error(transparent)]
    Round(#[from] RoundError),
}

/// What became of the funds side of a round.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Service applied the round; this is the new balance.
    Settled { balance: f64 },
    /// Service could not be reached or refused the round.
    Failed { message: String },
}

/// Everything known about a finished round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundReport {
    pub outcome: Outcome,
    pub player: Hand,
    pub dealer: Hand,
    pub player_total: u32,
    pub dealer_total: u32,
    pub wager: f64,
    pub settlement: SettlementStatus,
}

impl RoundReport {
    /// Check if the player busted.
    pub fn player_bust(&self) -> bool {
        self.player.is_bust()
    }

    /// New balance, if settlement succeeded.
    pub fn balance(&self) -> Option<f64> {
        match self.settlement {
            SettlementStatus::Settled { balance } => Some(balance),
            SettlementStatus::Failed { .. } => None,
        }
    }
}

/// Result of a hit.
#[derive(Debug, Clone, PartialEq)]
pub enum Turn {
    /// Player is still in; this is the new total.
    Continue { total: u32 },
    /// Player busted; the round is over.
    Resolved(RoundReport),
}

/// A single-seat table bound to one user and one settlement backend.
pub struct Table<S: Settlement> {
    config: TableConfig,
    settlement: S,
    rng: StdRng,
    balance: f64,
    round: Option<Round>,
    rounds_played: u64,
}

impl<S: Settlement> Table<S> {
    /// Create a table. The balance starts at `config.starting_balance`.
    pub fn new(config: TableConfig, settlement: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            balance: config.starting_balance,
            config,
            settlement,
            rng,
            round: None,
            rounds_played: 0,
        })
    }

    /// Query the settlement service for the current balance.
    ///
    /// On failure the last known balance is kept and the error returned.
    pub fn refresh_balance(&mut self) -> Result<f64, SettlementError> {
        match self.settlement.balance(&self.config.user_id) {
            Ok(balance) => {
                self.balance = balance;
                Ok(balance)
            }
            Err(e) => {
                warn!(user = %self.config.user_id, error = %e, "could not fetch balance");
                Err(e)
            }
        }
    }

    /// Validate a wager and deal a new round.
    pub fn place_bet(&mut self, wager: f64) -> Result<&Round, TableError> {
        if self.round.is_some() {
            return Err(TableError::RoundInProgress);
        }
        if !wager.is_finite() || wager <= 0.0 {
            return Err(TableError::InvalidWager(wager));
        }
        if wager > self.balance {
            return Err(TableError::InsufficientFunds {
                wager,
                balance: self.balance,
            });
        }

        let mut round = Round::new(wager);
        round.deal(&mut self.rng)?;
        Ok(&*self.round.insert(round))
    }

    /// Draw a card for the player.
    pub fn hit(&mut self) -> Result<Turn, TableError> {
        let round = self.round.as_mut().ok_or(TableError::NoActiveRound)?;
        let total = round.hit(&mut self.rng)?;

        if round.is_resolved() {
            Ok(Turn::Resolved(self.close_round()?))
        } else {
            Ok(Turn::Continue { total })
        }
    }

    /// Stand, let the dealer play, and settle.
    pub fn stand(&mut self) -> Result<RoundReport, TableError> {
        let round = self.round.as_mut().ok_or(TableError::NoActiveRound)?;
        round.stand(&mut self.rng)?;
        self.close_round()
    }

    fn close_round(&mut self) -> Result<RoundReport, TableError> {
        let round = self.round.take().ok_or(TableError::NoActiveRound)?;
        let outcome = round.outcome().ok_or(RoundError::InvalidPhase {
            action: "settle",
            actual: round.phase(),
        })?;
        self.rounds_played += 1;

        info!(
            outcome = %outcome,
            player = round.player().total(),
            dealer = round.dealer().total(),
            wager = round.wager(),
            "round resolved"
        );

        let request = SettlementRequest::new(self.config.user_id.clone(), outcome, round.wager());
        let settlement = match self.settlement.settle(&request) {
            Ok(funds) => {
                self.balance = funds.balance;
                SettlementStatus::Settled {
                    balance: funds.balance,
                }
            }
            Err(e) => {
                warn!(error = %e, "settlement failed; outcome stands");
                SettlementStatus::Failed {
                    message: format!("error updating funds: {}", e),
                }
            }
        };

        Ok(RoundReport {
            outcome,
            player_total: round.player().total(),
            dealer_total: round.dealer().total(),
            player: round.player().clone(),
            dealer: round.dealer().clone(),
            wager: round.wager(),
            settlement,
        })
    }

    /// Last known balance.
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// The open round, if any.
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Rounds resolved at this table.
    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    /// The table's configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The settlement backend.
    pub fn settlement(&self) -> &S {
        &self.settlement
    }
}
