use std::fmt;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Number of cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// The four French suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

/// Card color, derived from the suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Suit {
    /// All four suits, in canonical order.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn color(self) -> Color {
        match self {
            Suit::Diamonds | Suit::Hearts => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    /// Single-character symbol used in CLI rendering.
    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Clubs => "C",
            Suit::Diamonds => "D",
            Suit::Hearts => "H",
            Suit::Spades => "S",
        }
    }
}

/// Card rank; the ordinal runs from 0 (Ace) to 12 (King).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Ace,
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
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
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
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// A playing card. Suit and rank never change once built; only the face
/// flag is mutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    suit: Suit,
    rank: Rank,
    face_up: bool,
}

impl Card {
    /// A new face-down card.
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Card {
            suit,
            rank,
            face_up: false,
        }
    }

    /// A new face-up card.
    pub fn face_up(suit: Suit, rank: Rank) -> Self {
        Card {
            suit,
            rank,
            face_up: true,
        }
    }

    pub fn suit(self) -> Suit {
        self.suit
    }

    pub fn rank(self) -> Rank {
        self.rank
    }

    pub fn color(self) -> Color {
        self.suit.color()
    }

    pub fn is_face_up(self) -> bool {
        self.face_up
    }

    pub fn set_face_up(&mut self, face_up: bool) {
        self.face_up = face_up;
    }

    /// `true` when `other` is exactly one rank above this card, whatever
    /// the suits.
    pub fn is_ranked_before(self, other: Card) -> bool {
        self.rank.ordinal() + 1 == other.rank.ordinal()
    }

    pub fn is_opposite_color(self, other: Card) -> bool {
        self.color() != other.color()
    }

    pub fn is_same_suit(self, other: Card) -> bool {
        self.suit == other.suit
    }

    /// Identity of the card regardless of which way it faces.
    pub fn identity(self) -> (Suit, Rank) {
        (self.suit, self.rank)
    }

    pub fn label(self) -> String {
        format!("{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One face-down card per (suit, rank), in canonical order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);

    for &suit in &Suit::ALL {
        for &rank in &Rank::ALL {
            deck.push(Card::new(suit, rank));
        }
    }

    debug_assert_eq!(deck.len(), DECK_SIZE, "Deck must have exactly 52 cards");
    deck
}

/// A full deck shuffled with the given random source.
pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    let mut deck = full_deck();
    deck.shuffle(rng);
    deck
}

/// A full deck shuffled from a seed; the same seed always yields the same
/// order.
pub fn seeded_deck(seed: u64) -> Vec<Card> {
    let mut rng = SmallRng::seed_from_u64(seed);
    shuffled_deck(&mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn colors_follow_suits() {
        assert_eq!(Suit::Hearts.color(), Color::Red);
        assert_eq!(Suit::Diamonds.color(), Color::Red);
        assert_eq!(Suit::Clubs.color(), Color::Black);
        assert_eq!(Suit::Spades.color(), Color::Black);
    }

    #[test]
    fn rank_ordinals_span_ace_to_king() {
        assert_eq!(Rank::Ace.ordinal(), 0);
        assert_eq!(Rank::King.ordinal(), 12);
        assert_eq!(Rank::ALL[6], Rank::Seven);
    }

    #[test]
    fn ranked_before_is_suit_agnostic() {
        let seven = Card::new(Suit::Hearts, Rank::Seven);
        let eight = Card::new(Suit::Hearts, Rank::Eight);
        let eight_clubs = Card::new(Suit::Clubs, Rank::Eight);
        assert!(seven.is_ranked_before(eight));
        assert!(seven.is_ranked_before(eight_clubs));
        assert!(!eight.is_ranked_before(seven));
        assert!(seven.is_opposite_color(eight_clubs));
        assert!(!seven.is_opposite_color(eight));
        assert!(seven.is_same_suit(eight));
    }

    #[test]
    fn face_flag_is_the_only_mutable_part() {
        let mut card = Card::new(Suit::Spades, Rank::Ace);
        assert!(!card.is_face_up());
        card.set_face_up(true);
        assert!(card.is_face_up());
        assert_eq!(card.identity(), (Suit::Spades, Rank::Ace));
        assert_eq!(card.label(), "AS");
        assert_eq!(Card::new(Suit::Hearts, Rank::Ten).to_string(), "10H");
    }

    #[test]
    fn full_deck_has_no_duplicates() {
        let deck = full_deck();
        assert_eq!(deck.len(), DECK_SIZE);
        let ids: HashSet<_> = deck.iter().map(|c| c.identity()).collect();
        assert_eq!(ids.len(), DECK_SIZE);
        assert!(deck.iter().all(|c| !c.is_face_up()));
    }

    #[test]
    fn seeded_deck_is_reproducible() {
        assert_eq!(seeded_deck(42), seeded_deck(42));
        assert_ne!(seeded_deck(42), seeded_deck(43));
        let ids: HashSet<_> = seeded_deck(7).iter().map(|c| c.identity()).collect();
        assert_eq!(ids.len(), DECK_SIZE);
    }
}
