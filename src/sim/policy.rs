//! Player decision policies for simulated rounds.

use std::fmt;

use super::simulator::SimError;
use crate::engine::{Card, Hand, BLACKJACK, DEALER_STANDS_ON};

/// A player decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Hit,
    Stand,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Hit => write!(f, "Hit"),
            Decision::Stand => write!(f, "Stand"),
        }
    }
}

/// Decides whether the player hits or stands.
///
/// Policies are shared across simulation threads, so they must be `Sync`.
pub trait Policy: Send + Sync {
    /// Choose an action given the player's hand and the dealer's up card.
    fn decide(&self, player: &Hand, dealer_up: Card) -> Decision;

    /// Short name for reports.
    fn name(&self) -> String;
}

/// Hit below a fixed total, stand at or above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandOn {
    pub threshold: u32,
}

impl StandOn {
    /// Create a policy that stands on `threshold`.
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    /// Create a policy, rejecting thresholds outside 1..=21.
    pub fn checked(threshold: u32) -> Result<Self, SimError> {
        if threshold == 0 || threshold > BLACKJACK {
            return Err(SimError::InvalidThreshold(threshold));
        }
        Ok(Self::new(threshold))
    }
}

impl Default for StandOn {
    /// Mirror the dealer.
    fn default() -> Self {
        Self::new(DEALER_STANDS_ON)
    }
}

impl Policy for StandOn {
    fn decide(&self, player: &Hand, _dealer_up: Card) -> Decision {
        if player.total() < self.threshold {
            Decision::Hit
        } else {
            Decision::Stand
        }
    }

    fn name(&self) -> String {
        format!("stand-on-{}", self.threshold)
    }
}

/// Never draw past the initial two cards.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysStand;

impl Policy for AlwaysStand {
    fn decide(&self, _player: &Hand, _dealer_up: Card) -> Decision {
        Decision::Stand
    }

    fn name(&self) -> String {
        "always-stand".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stand_on_threshold() {
        let policy = StandOn::new(17);
        let up = Card::parse("Th").unwrap();
        assert_eq!(policy.decide(&Hand::parse("Ts6c").unwrap(), up), Decision::Hit);
        assert_eq!(policy.decide(&Hand::parse("Ts7c").unwrap(), up), Decision::Stand);
        // Soft 17 also stands
        assert_eq!(policy.decide(&Hand::parse("As6c").unwrap(), up), Decision::Stand);
        assert_eq!(policy.name(), "stand-on-17");
    }

    #[test]
    fn test_checked_threshold() {
        assert!(StandOn::checked(0).is_err());
        assert!(StandOn::checked(22).is_err());
        assert_eq!(StandOn::checked(21).unwrap().threshold, 21);
    }

    #[test]
    fn test_default_mirrors_dealer() {
        assert_eq!(StandOn::default().threshold, DEALER_STANDS_ON);
    }

    #[test]
    fn test_always_stand() {
        let up = Card::parse("2d").unwrap();
        assert_eq!(AlwaysStand.decide(&Hand::parse("2s3c").unwrap(), up), Decision::Stand);
    }
}
