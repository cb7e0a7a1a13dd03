//! Per-round state machine.
//!
//! ```text
//! NotStarted ──deal──► Dealt ──hit──► PlayerTurn ──hit──► PlayerTurn
//!                        │               │    │
//!                        │             stand  └──hit (bust)──► Resolved (lost)
//!                        │               ▼
//!                        └───stand───► DealerTurn ──draw to 17──► Resolved
//! ```
//!
//! A `Round` owns both hands for its lifetime and is discarded once resolved;
//! the next round starts from a fresh value. It records the wager only so it
//! can report a payoff. Funds live elsewhere.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use super::card::Card;
use super::hand::Hand;
use super::{deal_initial, player_hit, stand_and_resolve};

/// Result of a resolved round, from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Player wins even money.
    Won,
    /// Player loses the wager.
    Lost,
    /// Push; the wager is returned.
    Tied,
}

impl Outcome {
    /// Sign of the payoff: +1, -1 or 0.
    pub fn sign(self) -> i8 {
        match self {
            Outcome::Won => 1,
            Outcome::Lost => -1,
            Outcome::Tied => 0,
        }
    }

    /// Net change to the player's funds for the given wager.
    pub fn payoff(self, wager: f64) -> f64 {
        wager * f64::from(self.sign())
    }

    /// Lowercase name ("won", "lost", "tied").
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Won => "won",
            Outcome::Lost => "lost",
            Outcome::Tied => "tied",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a round is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    Dealt,
    PlayerTurn,
    DealerTurn,
    Resolved,
}

impl Phase {
    /// Check if the player may still hit or stand.
    pub fn awaits_player(self) -> bool {
        matches!(self, Phase::Dealt | Phase::PlayerTurn)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::NotStarted => write!(f, "NotStarted"),
            Phase::Dealt => write!(f, "Dealt"),
            Phase::PlayerTurn => write!(f, "PlayerTurn"),
            Phase::DealerTurn => write!(f, "DealerTurn"),
            Phase::Resolved => write!(f, "Resolved"),
        }
    }
}

/// Errors from driving a round out of order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    /// Operation not allowed in the current phase.
    #[error("cannot {action} while round is {actual}")]
    InvalidPhase {
        /// The attempted operation.
        action: &'static str,
        /// Phase the round was in.
        actual: Phase,
    },
}

/// One round of blackjack: a player hand, a dealer hand and a wager.
#[derive(Debug, Clone)]
pub struct Round {
    wager: f64,
    player: Hand,
    dealer: Hand,
    phase: Phase,
    outcome: Option<Outcome>,
}

impl Round {
    /// Create a round that has not been dealt yet.
    pub fn new(wager: f64) -> Self {
        Self {
            wager,
            player: Hand::new(),
            dealer: Hand::new(),
            phase: Phase::NotStarted,
            outcome: None,
        }
    }

    /// Deal two cards to the player and one to the dealer.
    pub fn deal<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), RoundError> {
        self.expect(self.phase == Phase::NotStarted, "deal")?;

        let (player, dealer) = deal_initial(rng);
        debug!(player = ?player, dealer = ?dealer, "dealt");
        self.player = player;
        self.dealer = dealer;
        self.phase = Phase::Dealt;
        Ok(())
    }

    /// Draw one card for the player.
    ///
    /// Returns the new player total. A bust resolves the round as lost on
    /// the spot; the dealer draws nothing further.
    pub fn hit<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<u32, RoundError> {
        self.expect(self.phase.awaits_player(), "hit")?;

        let hand = std::mem::take(&mut self.player);
        self.player = player_hit(hand, rng);
        let total = self.player.total();
        debug!(player = ?self.player, total, "player hit");

        if self.player.is_bust() {
            self.finish(Outcome::Lost);
        } else {
            self.phase = Phase::PlayerTurn;
        }
        Ok(total)
    }

    /// Stand: the dealer draws to 17 and the round is resolved.
    pub fn stand<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Outcome, RoundError> {
        self.expect(self.phase.awaits_player(), "stand")?;

        self.phase = Phase::DealerTurn;
        let dealer = std::mem::take(&mut self.dealer);
        let (dealer, outcome) = stand_and_resolve(&self.player, dealer, rng);
        debug!(dealer = ?dealer, total = dealer.total(), "dealer stood");
        self.dealer = dealer;
        self.finish(outcome);
        Ok(outcome)
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.phase = Phase::Resolved;
    }

    fn expect(&self, allowed: bool, action: &'static str) -> Result<(), RoundError> {
        if allowed {
            Ok(())
        } else {
            Err(RoundError::InvalidPhase {
                action,
                actual: self.phase,
            })
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Check if the round has an outcome.
    pub fn is_resolved(&self) -> bool {
        self.phase == Phase::Resolved
    }

    /// Outcome, once resolved.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Net change to funds, once resolved.
    pub fn payoff(&self) -> Option<f64> {
        self.outcome.map(|o| o.payoff(self.wager))
    }

    /// The wager this round was played for.
    pub fn wager(&self) -> f64 {
        self.wager
    }

    /// Player's hand.
    pub fn player(&self) -> &Hand {
        &self.player
    }

    /// Dealer's hand.
    pub fn dealer(&self) -> &Hand {
        &self.dealer
    }

    /// Dealer's face-up card, if dealt.
    pub fn dealer_up_card(&self) -> Option<Card> {
        self.dealer.up_card()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_outcome_payoff() {
        assert_eq!(Outcome::Won.payoff(25.0), 25.0);
        assert_eq!(Outcome::Lost.payoff(25.0), -25.0);
        assert_eq!(Outcome::Tied.payoff(25.0), 0.0);
    }

    #[test]
    fn test_outcome_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Outcome::Tied).unwrap(), "\"tied\"");
        let parsed: Outcome = serde_json::from_str("\"won\"").unwrap();
        assert_eq!(parsed, Outcome::Won);
    }

    #[test]
    fn test_deal_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut round = Round::new(10.0);
        assert_eq!(round.phase(), Phase::NotStarted);

        round.deal(&mut rng).unwrap();
        assert_eq!(round.phase(), Phase::Dealt);
        assert_eq!(round.player().len(), 2);
        assert_eq!(round.dealer().len(), 1);
        assert!(round.outcome().is_none());
        assert!(round.payoff().is_none());
    }

    #[test]
    fn test_cannot_act_before_deal_or_deal_twice() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut round = Round::new(10.0);

        let err = round.hit(&mut rng).unwrap_err();
        assert_eq!(
            err,
            RoundError::InvalidPhase {
                action: "hit",
                actual: Phase::NotStarted
            }
        );
        assert!(round.stand(&mut rng).is_err());

        round.deal(&mut rng).unwrap();
        assert!(round.deal(&mut rng).is_err());
    }

    #[test]
    fn test_stand_resolves_and_is_terminal() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut round = Round::new(10.0);
        round.deal(&mut rng).unwrap();

        let outcome = round.stand(&mut rng).unwrap();
        assert_eq!(round.phase(), Phase::Resolved);
        assert_eq!(round.outcome(), Some(outcome));
        assert_eq!(round.payoff(), Some(outcome.payoff(10.0)));
        assert!(round.dealer().total() >= 17);

        assert!(round.hit(&mut rng).is_err());
        assert!(round.stand(&mut rng).is_err());
    }

    #[test]
    fn test_hit_until_bust_skips_dealer() {
        // Keep hitting until bust across many seeds; the dealer must keep one card
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut round = Round::new(5.0);
            round.deal(&mut rng).unwrap();

            while round.phase().awaits_player() {
                round.hit(&mut rng).unwrap();
            }

            assert!(round.player().is_bust());
            assert_eq!(round.outcome(), Some(Outcome::Lost));
            assert_eq!(round.payoff(), Some(-5.0));
            assert_eq!(round.dealer().len(), 1, "dealer drew after player bust");
        }
    }

    #[test]
    fn test_hit_without_bust_moves_to_player_turn() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let mut round = Round::new(1.0);
            round.deal(&mut rng).unwrap();
            let total = round.hit(&mut rng).unwrap();
            if total <= 21 {
                assert_eq!(round.phase(), Phase::PlayerTurn);
                return;
            }
        }
        panic!("no non-busting hit in 100 rounds");
    }
}
