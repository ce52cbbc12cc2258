//! A seat at the table and its card bookkeeping.
//!
//! Each hand owns four face-down cards: three roses and one skull. Cards
//! are tracked as counts plus the skull's position within whichever stack
//! it currently sits in — the actual roses are interchangeable.

use rand::Rng;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HandStatus {
    /// Nobody sits here.
    Unclaimed = 0,
    /// Owned by the client recorded on the hand.
    Claimed = 1,
    /// The owner walked out mid-game; the seat keeps playing out its
    /// cards' fate but takes no more turns.
    Left = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SkullStatus {
    /// Somewhere in the held stack, at the hand's skull position.
    InHand = 0,
    /// Somewhere in the played stack, at the hand's skull position.
    Played = 1,
    /// Permanently lost to a successful skull hunt.
    Gone = 2,
}

#[derive(Debug, Clone)]
pub struct Hand {
    pub(crate) status: HandStatus,
    pub(crate) owner: Uuid,
    /// Held and played always sum to at most four.
    pub(crate) held: u8,
    pub(crate) played: u8,
    pub(crate) skull_status: SkullStatus,
    /// Index within the held or played stack per `skull_status`;
    /// meaningless once the skull is gone.
    pub(crate) skull_pos: u8,
    /// Successful bids; two wins the game.
    pub(crate) score: u8,
}

impl Default for Hand {
    fn default() -> Hand {
        Hand {
            status: HandStatus::Unclaimed,
            owner: Uuid::nil(),
            held: 0,
            played: 0,
            skull_status: SkullStatus::InHand,
            skull_pos: 0,
            score: 0,
        }
    }
}

impl Hand {
    /// Deals the hand back to four held cards with the skull hidden at a
    /// random position, and zeroes the score.
    pub(crate) fn reset_cards_and_score(&mut self) {
        self.held = 4;
        self.played = 0;
        self.skull_status = SkullStatus::InHand;
        self.skull_pos = rand::rng().random_range(0..4);
        self.score = 0;
    }

    /// A hand with no cards at all is out of the game and is skipped by
    /// turn advancement.
    pub(crate) fn has_cards(&self) -> bool {
        self.held + self.played > 0
    }

    /// Returns the played stack to the back of the held stack. The skull,
    /// if it was played, keeps its offset within the returning cards.
    pub(crate) fn reclaim_played(&mut self) {
        if self.skull_status == SkullStatus::Played {
            self.skull_status = SkullStatus::InHand;
            self.skull_pos += self.held;
        }
        self.held += self.played;
        self.played = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_deals_four_cards_with_hidden_skull() {
        let mut hand = Hand::default();
        for _ in 0..32 {
            hand.reset_cards_and_score();
            assert_eq!(hand.held, 4);
            assert_eq!(hand.played, 0);
            assert_eq!(hand.skull_status, SkullStatus::InHand);
            assert!(hand.skull_pos < 4);
            assert_eq!(hand.score, 0);
        }
    }

    #[test]
    fn test_reclaim_restores_played_skull_position() {
        let mut hand = Hand::default();
        hand.held = 1;
        hand.played = 3;
        hand.skull_status = SkullStatus::Played;
        hand.skull_pos = 2;

        hand.reclaim_played();

        assert_eq!(hand.held, 4);
        assert_eq!(hand.played, 0);
        assert_eq!(hand.skull_status, SkullStatus::InHand);
        // Played cards append behind the one held card.
        assert_eq!(hand.skull_pos, 3);
    }

    #[test]
    fn test_reclaim_with_skull_already_in_hand() {
        let mut hand = Hand::default();
        hand.held = 2;
        hand.played = 2;
        hand.skull_status = SkullStatus::InHand;
        hand.skull_pos = 1;

        hand.reclaim_played();

        assert_eq!(hand.held, 4);
        assert_eq!(hand.skull_pos, 1);
    }

    #[test]
    fn test_has_cards() {
        let mut hand = Hand::default();
        assert!(!hand.has_cards());
        hand.played = 1;
        assert!(hand.has_cards());
    }
}
