//! Blackjack hand engine.
//!
//! Pure rules for dealing, scoring and resolving one round of a 21-point card
//! comparison game. Nothing in here performs I/O; the only source of
//! non-determinism is the random number generator supplied by the caller, so
//! a seeded generator replays a round exactly.
//!
//! # Rules
//!
//! - Cards come from an infinite shoe (see [`Card::draw`]).
//! - Aces count 11 and drop to 1 one at a time while the hand is over 21.
//! - The player gets two cards, the dealer one. The dealer's second card is
//!   only drawn once the player stands.
//! - The dealer draws while under 17 and stands on any 17 or more.
//! - No insurance, splits, doubles or natural bonus; every win pays 1:1.
//!
//! # Usage
//!
//! ```
//! use blackjack_table::engine::{deal_initial, player_hit, stand_and_resolve};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let (mut player, dealer) = deal_initial(&mut rng);
//! if player.total() < 12 {
//!     player = player_hit(player, &mut rng);
//! }
//! if !player.is_bust() {
//!     let (dealer, outcome) = stand_and_resolve(&player, dealer, &mut rng);
//!     assert!(dealer.total() >= 17);
//!     println!("{} vs {}: {}", player, dealer, outcome);
//! }
//! ```

pub mod card;
pub mod hand;
pub mod round;

pub use card::{Card, Rank, Suit};
pub use hand::{score_cards, Hand, BLACKJACK};
pub use round::{Outcome, Phase, Round, RoundError};

use rand::Rng;

/// The dealer stands on this total or higher, soft or hard.
pub const DEALER_STANDS_ON: u32 = 17;

/// Draw one card from the infinite shoe.
pub fn draw_card<R: Rng + ?Sized>(rng: &mut R) -> Card {
    Card::draw(rng)
}

/// Total of a hand, with soft Aces downgraded as needed.
pub fn score_hand(cards: &[Card]) -> u32 {
    score_cards(cards)
}

/// Deal a new round: two cards to the player, one to the dealer.
pub fn deal_initial<R: Rng + ?Sized>(rng: &mut R) -> (Hand, Hand) {
    let mut player = Hand::new();
    let mut dealer = Hand::new();
    player.push(Card::draw(rng));
    player.push(Card::draw(rng));
    dealer.push(Card::draw(rng));
    (player, dealer)
}

/// Append one card to the player's hand.
///
/// The caller checks [`Hand::is_bust`] afterwards; a busted player loses
/// without the dealer drawing.
pub fn player_hit<R: Rng + ?Sized>(mut hand: Hand, rng: &mut R) -> Hand {
    hand.push(Card::draw(rng));
    hand
}

/// Draw dealer cards from `next_card` while the dealer is under 17.
pub fn dealer_draw<F>(dealer: &mut Hand, mut next_card: F)
where
    F: FnMut() -> Card,
{
    while dealer.total() < DEALER_STANDS_ON {
        dealer.push(next_card());
    }
}

/// Compare final totals.
///
/// A busted player loses regardless of the dealer; otherwise a busted dealer
/// loses. Remaining ties go to neither side.
pub fn resolve(player_total: u32, dealer_total: u32) -> Outcome {
    if player_total > BLACKJACK {
        Outcome::Lost
    } else if dealer_total > BLACKJACK || player_total > dealer_total {
        Outcome::Won
    } else if player_total == dealer_total {
        Outcome::Tied
    } else {
        Outcome::Lost
    }
}

/// Play out the dealer's hand and decide the round.
///
/// Returns the completed dealer hand and the outcome. Funds are untouched.
pub fn stand_and_resolve<R: Rng + ?Sized>(
    player: &Hand,
    mut dealer: Hand,
    rng: &mut R,
) -> (Hand, Outcome) {
    dealer_draw(&mut dealer, || Card::draw(&mut *rng));
    let outcome = resolve(player.total(), dealer.total());
    (dealer, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hand(s: &str) -> Hand {
        Hand::parse(s).unwrap()
    }

    /// Feeds a fixed card sequence to `dealer_draw`.
    fn scripted(cards: &str) -> impl FnMut() -> Card {
        let cards = hand(cards).cards().to_vec();
        let mut iter = cards.into_iter();
        move || iter.next().expect("script ran out of cards")
    }

    #[test]
    fn test_score_hand_examples() {
        assert_eq!(score_hand(hand("AsKh").cards()), 21);
        assert_eq!(score_hand(hand("AsAd9h").cards()), 21);
        assert_eq!(score_hand(hand("Ts9h5d").cards()), 24);
        assert_eq!(score_hand(&[]), 0);
    }

    #[test]
    fn test_deal_initial_counts() {
        let mut rng = StdRng::seed_from_u64(11);
        let (player, dealer) = deal_initial(&mut rng);
        assert_eq!(player.len(), 2);
        assert_eq!(dealer.len(), 1);
    }

    #[test]
    fn test_player_hit_appends_one_card() {
        let mut rng = StdRng::seed_from_u64(12);
        let before = hand("2s3h");
        let after = player_hit(before.clone(), &mut rng);
        assert_eq!(after.len(), 3);
        assert_eq!(&after.cards()[..2], before.cards());
    }

    #[test]
    fn test_resolve_table() {
        assert_eq!(resolve(20, 18), Outcome::Won);
        assert_eq!(resolve(18, 18), Outcome::Tied);
        assert_eq!(resolve(17, 18), Outcome::Lost);
        assert_eq!(resolve(12, 22), Outcome::Won);
        assert_eq!(resolve(21, 26), Outcome::Won);
        // Player bust loses even against a dealer bust
        assert_eq!(resolve(23, 22), Outcome::Lost);
    }

    #[test]
    fn test_dealer_stops_at_17() {
        let mut dealer = hand("Ts");
        dealer_draw(&mut dealer, scripted("7h9c"));
        assert_eq!(dealer.total(), 17);
        assert_eq!(dealer.len(), 2);
    }

    #[test]
    fn test_dealer_stands_on_soft_17() {
        let mut dealer = hand("As");
        dealer_draw(&mut dealer, scripted("6h9c"));
        assert_eq!(dealer.total(), 17);
        assert!(dealer.is_soft());
        assert_eq!(dealer.len(), 2);
    }

    #[test]
    fn test_dealer_keeps_drawing_after_soft_bust() {
        // A + 5 = soft 16, + K = hard 16, + 2 = 18
        let mut dealer = hand("As");
        dealer_draw(&mut dealer, scripted("5hKc2d9s"));
        assert_eq!(dealer.total(), 18);
        assert_eq!(dealer.len(), 4);
    }

    #[test]
    fn test_dealer_busts() {
        let mut dealer = hand("Ts");
        dealer_draw(&mut dealer, scripted("6hKc"));
        assert_eq!(dealer.total(), 26);
        assert!(dealer.is_bust());
    }

    #[test]
    fn test_dealer_threshold_over_random_sequences() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..5_000 {
            let player = hand("Ts8h");
            let start = Hand::from_cards(vec![draw_card(&mut rng)]);
            let (dealer, outcome) = stand_and_resolve(&player, start, &mut rng);

            assert!(dealer.total() >= DEALER_STANDS_ON);
            // Every prefix before the last card was under 17
            let cards = dealer.cards();
            for n in 1..cards.len() {
                assert!(score_hand(&cards[..n]) < DEALER_STANDS_ON);
            }
            assert_eq!(outcome, resolve(18, dealer.total()));
        }
    }

    #[test]
    fn test_stand_player_20_vs_dealer_18_wins() {
        let player = hand("KsQh");
        let mut dealer = hand("9c");
        dealer_draw(&mut dealer, scripted("9d"));
        assert_eq!(resolve(player.total(), dealer.total()), Outcome::Won);
    }

    #[test]
    fn test_stand_against_dealer_at_17_draws_nothing() {
        let mut rng = StdRng::seed_from_u64(5);
        let player = hand("Ts7h");
        let dealer = hand("Kd7c");
        let (dealer, outcome) = stand_and_resolve(&player, dealer, &mut rng);
        assert_eq!(dealer.len(), 2);
        assert_eq!(outcome, Outcome::Tied);
    }
}
