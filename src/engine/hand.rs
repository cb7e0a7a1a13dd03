//! Hands and hand scoring.
//!
//! A hand's total is never stored. It is recomputed from the cards on every
//! query, because which Aces count as 1 can change as cards are added.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::card::Card;

/// Target total; anything above busts.
pub const BLACKJACK: u32 = 21;

/// Amount removed from the total when a soft Ace is counted as 1.
const ACE_DOWNGRADE: u32 = 10;

/// Score a sequence of cards.
///
/// Every Ace starts at 11. While the total exceeds 21 and some Ace has not
/// yet been downgraded, one Ace is downgraded to 1. The result may still be
/// above 21, which is a bust.
pub fn score_cards(cards: &[Card]) -> u32 {
    let (total, _) = score_with_soft_aces(cards);
    total
}

/// Score and the number of Aces still counted as 11.
fn score_with_soft_aces(cards: &[Card]) -> (u32, usize) {
    let mut total: u32 = cards.iter().map(Card::score).sum();
    let mut soft_aces = cards.iter().filter(|c| c.is_ace()).count();

    while total > BLACKJACK && soft_aces > 0 {
        total -= ACE_DOWNGRADE;
        soft_aces -= 1;
    }

    (total, soft_aces)
}

/// An ordered sequence of cards held by the player or the dealer.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Create an empty hand.
    pub fn new() -> Self {
        Self {
            cards: Vec::with_capacity(6),
        }
    }

    /// Create a hand from cards.
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Parse a hand from a string like "AsKd" or "As Kd 9c".
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.replace(' ', "");
        if s.len() % 2 != 0 || !s.is_ascii() {
            return None;
        }

        let mut cards = Vec::with_capacity(s.len() / 2);
        for i in (0..s.len()).step_by(2) {
            cards.push(Card::parse(&s[i..i + 2])?);
        }
        Some(Self::from_cards(cards))
    }

    /// Append a card.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Get the cards in the order they were dealt.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of cards in the hand.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the hand has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Current total, with Aces downgraded as needed.
    pub fn total(&self) -> u32 {
        score_cards(&self.cards)
    }

    /// Check if the total exceeds 21.
    pub fn is_bust(&self) -> bool {
        self.total() > BLACKJACK
    }

    /// Check if at least one Ace is still counted as 11.
    pub fn is_soft(&self) -> bool {
        let (_, soft_aces) = score_with_soft_aces(&self.cards);
        soft_aces > 0
    }

    /// Two-card 21. Reported for display only; it pays like any other win.
    pub fn is_natural(&self) -> bool {
        self.cards.len() == 2 && self.total() == BLACKJACK
    }

    /// First card, shown face up.
    pub fn up_card(&self) -> Option<Card> {
        self.cards.first().copied()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", card.pretty())?;
        }
        write!(f, " ({})", self.total())
    }
}

impl fmt::Debug for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for card in &self.cards {
            write!(f, "{}", card)?;
        }
        write!(f, "]")
    }
}
