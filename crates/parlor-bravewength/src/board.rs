//! The 5x5 word board.

use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::{Serialize, Serializer};

pub const BOARD_SIZE: usize = 25;

const BLACK_CARDS: usize = 1;
const TEAL_CARDS: usize = 9;
const PURPLE_CARDS: usize = 8;

/// What a card turns out to be. `Hidden` is only ever a *discovered* type,
/// meaning the card has not been revealed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CardType {
    Neutral = 0,
    Teal = 1,
    Purple = 2,
    Black = 3,
    Hidden = 4,
}

impl CardType {
    /// ASCII digit used in the 25-character board strings on the wire.
    pub fn ascii(self) -> u8 {
        self as u8 + b'0'
    }

    pub fn team(self) -> crate::Team {
        match self {
            CardType::Teal => crate::Team::Teal,
            CardType::Purple => crate::Team::Purple,
            _ => crate::Team::None,
        }
    }
}

impl Serialize for CardType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// Board state: the words on the table, the true layout, and what has been
/// revealed so far.
pub struct Board {
    deck: Arc<[String]>,
    pub(crate) words: [String; BOARD_SIZE],
    pub(crate) full_types: [CardType; BOARD_SIZE],
    pub(crate) disc_types: [CardType; BOARD_SIZE],
}

impl Board {
    /// Creates an unshuffled board over the given deck; `reset` deals the
    /// first layout.
    pub(crate) fn new(deck: Arc<[String]>) -> Board {
        Board {
            deck,
            words: std::array::from_fn(|_| String::new()),
            full_types: [CardType::Neutral; BOARD_SIZE],
            disc_types: [CardType::Hidden; BOARD_SIZE],
        }
    }

    /// Deals a fresh layout: 25 distinct words drawn from the deck, one
    /// black card, nine teal, eight purple, the rest neutral, everything
    /// placed uniformly at random and nothing discovered.
    pub(crate) fn reset(&mut self) {
        let mut rng = rand::rng();

        for (word, deck_index) in self
            .words
            .iter_mut()
            .zip(rand::seq::index::sample(&mut rng, self.deck.len(), BOARD_SIZE))
        {
            word.clone_from(&self.deck[deck_index]);
        }

        let mut types = [CardType::Neutral; BOARD_SIZE];
        types[..BLACK_CARDS].fill(CardType::Black);
        types[BLACK_CARDS..BLACK_CARDS + TEAL_CARDS].fill(CardType::Teal);
        types[BLACK_CARDS + TEAL_CARDS..BLACK_CARDS + TEAL_CARDS + PURPLE_CARDS]
            .fill(CardType::Purple);
        types.shuffle(&mut rng);

        self.full_types = types;
        self.disc_types = [CardType::Hidden; BOARD_SIZE];
    }

    /// Counts discovered cards of the given type.
    pub(crate) fn discovered(&self, card_type: CardType) -> usize {
        self.disc_types.iter().filter(|t| **t == card_type).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn deck() -> Arc<[String]> {
        (0..200).map(|i| format!("word{i}")).collect()
    }

    #[test]
    fn test_reset_deals_exact_type_multiset() {
        let mut board = Board::new(deck());
        for _ in 0..20 {
            board.reset();
            let count =
                |t: CardType| board.full_types.iter().filter(|ft| **ft == t).count();
            assert_eq!(count(CardType::Black), 1);
            assert_eq!(count(CardType::Teal), 9);
            assert_eq!(count(CardType::Purple), 8);
            assert_eq!(count(CardType::Neutral), 7);
            assert_eq!(count(CardType::Hidden), 0);
        }
    }

    #[test]
    fn test_reset_deals_distinct_words() {
        let mut board = Board::new(deck());
        board.reset();
        let unique: HashSet<&String> = board.words.iter().collect();
        assert_eq!(unique.len(), BOARD_SIZE);
    }

    #[test]
    fn test_reset_hides_everything_again() {
        let mut board = Board::new(deck());
        board.reset();
        board.disc_types[3] = board.full_types[3];
        board.reset();
        assert!(board.disc_types.iter().all(|t| *t == CardType::Hidden));
    }

    #[test]
    fn test_ascii_digits() {
        assert_eq!(CardType::Neutral.ascii(), b'0');
        assert_eq!(CardType::Teal.ascii(), b'1');
        assert_eq!(CardType::Purple.ascii(), b'2');
        assert_eq!(CardType::Black.ascii(), b'3');
        assert_eq!(CardType::Hidden.ascii(), b'4');
    }
}
