//! Monte Carlo play of many blackjack rounds.
//!
//! A [`Policy`] makes the player's hit/stand decisions and a [`Simulator`]
//! plays rounds under it in parallel, collecting [`SimStats`].
//!
//! ```
//! use blackjack_table::sim::{SimConfig, Simulator, StandOn};
//!
//! let sim = Simulator::new(StandOn::new(16), SimConfig::default().with_seed(1)).unwrap();
//! let stats = sim.run(1_000).unwrap();
//! assert_eq!(stats.won + stats.lost + stats.tied, 1_000);
//! ```

pub mod policy;
pub mod simulator;

pub use policy::{AlwaysStand, Decision, Policy, StandOn};
pub use simulator::{play_round, SimConfig, SimError, SimStats, Simulator};
