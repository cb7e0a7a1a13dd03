//! # Blackjack Table
//!
//! A blackjack hand engine with the pieces needed to run it as a casino
//! table: a per-round state machine, wager validation, and settlement of
//! results against a remote balance service.
//!
//! ## Features
//!
//! - **Pure Hand Engine**: card draws, soft/hard Ace scoring, dealer stand-on-17
//! - **Round State Machine**: an owned value per round, no shared game state
//! - **Settlement**: REST client for the casino backend or an in-process ledger
//! - **Simulation**: parallel Monte Carlo play under a fixed player policy
//!
//! ## Quick Start
//!
//! ```
//! use blackjack_table::settlement::Ledger;
//! use blackjack_table::table::{Table, TableConfig, Turn};
//!
//! let config = TableConfig::default().with_seed(42);
//! let mut table = Table::new(config, Ledger::new(1000.0)).unwrap();
//!
//! table.place_bet(25.0).unwrap();
//! let report = match table.hit().unwrap() {
//!     Turn::Continue { .. } => table.stand().unwrap(),
//!     Turn::Resolved(report) => report,
//! };
//! println!("{} -> balance {:?}", report.outcome, report.balance());
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: Cards, hands, scoring and round resolution
//! - [`settlement`]: Balance service wire format and backends
//! - [`table`]: Wager validation and round sequencing
//! - [`sim`]: Batch simulation and statistics
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Table (per user)                         │
//! │  - Wager validation       - Round sequencing                    │
//! │  - Balance tracking       - Settlement reporting                │
//! └─────────────────────────────────────────────────────────────────┘
//!                │                                   │
//!                ▼                                   ▼
//!         ┌─────────────┐                   ┌─────────────────┐
//!         │ Hand Engine │                   │   Settlement    │
//!         │ Round / FSM │                   │ HTTP  │ Ledger  │
//!         └─────────────┘                   └─────────────────┘
//!                ▲
//!                │
//!         ┌─────────────┐
//!         │  Simulator  │
//!         └─────────────┘
//! ```

#![warn(missing_docs)]

/// Blackjack hand engine.
///
/// Pure rules for dealing, scoring and resolving a round.
pub mod engine;

/// Settlement of resolved rounds against stored balances.
pub mod settlement;

/// Round sequencing for a single seat.
pub mod table;

/// Monte Carlo simulation.
pub mod sim;

// Re-export commonly used types at crate root for convenience
pub use engine::{Card, Hand, Outcome, Phase, Rank, Round, Suit};
pub use settlement::{HttpSettlement, Ledger, Settlement, UserId};
pub use table::{RoundReport, Table, TableConfig, Turn};
