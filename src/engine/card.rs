//! Card representation for blackjack.
//!
//! This module provides the card types dealt by the hand engine:
//! - `Rank`: 2 through 10, Jack, Queen, King, Ace
//! - `Suit`: one of four suits (no gameplay effect)
//! - `Card`: a rank and suit pair with a derived blackjack score
//!
//! Cards are drawn from an effectively infinite shoe: every draw picks a rank
//! and a suit uniformly and independently, with replacement.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank characters for display, indexed by `Rank as usize`.
const RANK_CHARS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];

/// Suit characters for display, indexed by `Suit as usize`.
const SUIT_CHARS: [char; 4] = ['s', 'h', 'd', 'c'];

/// Rank of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// All thirteen ranks in ascending order.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Face score: numeric ranks their value, J/Q/K 10, Ace 11 (soft).
    #[inline]
    pub fn score(self) -> u32 {
        match self {
            Rank::Jack | Rank::Queen | Rank::King => 10,
            Rank::Ace => 11,
            numeric => numeric as u32 + 2,
        }
    }

    /// Check if this rank is an Ace.
    #[inline]
    pub fn is_ace(self) -> bool {
        self == Rank::Ace
    }

    /// Get rank character for display.
    pub fn to_char(self) -> char {
        RANK_CHARS[self as usize]
    }

    /// Parse a rank character ('2'-'9', 'T', 'J', 'Q', 'K', 'A').
    pub fn from_char(c: char) -> Option<Self> {
        let index = RANK_CHARS.iter().position(|&r| r == c.to_ascii_uppercase())?;
        Some(Self::ALL[index])
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Ten => write!(f, "10"),
            other => write!(f, "{}", other.to_char()),
        }
    }
}

/// Suit of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    /// All four suits.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Get suit character for display.
    pub fn to_char(self) -> char {
        SUIT_CHARS[self as usize]
    }

    /// Parse a suit character ('s', 'h', 'd', 'c').
    pub fn from_char(c: char) -> Option<Self> {
        let index = SUIT_CHARS.iter().position(|&s| s == c.to_ascii_lowercase())?;
        Some(Self::ALL[index])
    }

    /// Unicode symbol for terminal output.
    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => '♠',
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
        }
    }
}

/// A single playing card.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    /// Create a new card.
    #[inline]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Draw a card from an infinite shoe.
    ///
    /// Rank and suit are chosen uniformly and independently; there is no
    /// deck to exhaust.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let rank = Rank::ALL[rng.gen_range(0..Rank::ALL.len())];
        let suit = Suit::ALL[rng.gen_range(0..Suit::ALL.len())];
        Self { rank, suit }
    }

    /// Parse a card from a string like "As", "Th", "7c".
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let rank = Rank::from_char(chars.next()?)?;
        let suit = Suit::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Self::new(rank, suit))
    }

    /// Get the card's rank.
    #[inline]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Get the card's suit.
    #[inline]
    pub fn suit(&self) -> Suit {
        self.suit
    }

    /// Face score of this card, counting an Ace as 11.
    #[inline]
    pub fn score(&self) -> u32 {
        self.rank.score()
    }

    /// Check if this card is an Ace.
    #[inline]
    pub fn is_ace(&self) -> bool {
        self.rank.is_ace()
    }

    /// Rank followed by suit symbol, e.g. "10♥".
    pub fn pretty(&self) -> String {
        format!("{}{}", self.rank, self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
