//! Table-level state: phases, turn order, bids.

use std::sync::Arc;

use uuid::Uuid;

use parlor_room::{GameState, Member};

use crate::hand::{Hand, HandStatus};

/// Seats at the table. Must not exceed 16 because `passed` is a u16
/// bitset of seat indices.
pub const MAX_PLAYERS: usize = 6;

/// Where the table is in a round.
///
/// The order is load-bearing: everything after `Aborted` counts as an
/// active game (see [`Phase::active`]), so new variants must keep the
/// inactive states at the front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Phase {
    /// Fresh lobby; nobody has dealt yet.
    NoGame = 0,
    /// A game finished with a winner.
    Winner = 1,
    /// A game was abandoned without one.
    Aborted = 2,
    /// Going around the circle playing cards face down.
    Play = 3,
    /// Going around the circle raising (or passing on) the bid.
    Bid = 4,
    /// The winning bidder flips played cards hunting roses.
    Pick = 5,
    /// The bidder flipped a skull and may rearrange their hand before
    /// paying for it.
    BidderShuffle = 6,
    /// The skull's owner takes one of the bidder's cards, unseen.
    TakeCard = 7,
}

impl Phase {
    pub fn active(self) -> bool {
        self > Phase::Aborted
    }
}

pub(crate) struct SkullState {
    pub(crate) hands: [Hand; MAX_PLAYERS],
    pub(crate) phase: Phase,
    /// Players locked in at the last restart; live hands occupy seats
    /// `0..nplayers`.
    pub(crate) nplayers: usize,
    /// Seat whose turn it is.
    pub(crate) turn: usize,
    /// Total cards played across all seats, bounding bids.
    pub(crate) total_played: u8,
    pub(crate) bid: u8,
    /// Seat that last raised the bid.
    pub(crate) bidder: usize,
    /// Bitset of seats that passed on the current bidding round.
    pub(crate) passed: u16,
    /// Seat whose skull the bidder flipped; it takes a card from them.
    pub(crate) taker: usize,
    /// Client that won the game; only valid in [`Phase::Winner`].
    pub(crate) winner: Uuid,
}

impl SkullState {
    pub(crate) fn new() -> SkullState {
        SkullState {
            hands: Default::default(),
            phase: Phase::NoGame,
            nplayers: 0,
            turn: 0,
            total_played: 0,
            bid: 0,
            bidder: 0,
            passed: 0,
            taker: 0,
            winner: Uuid::nil(),
        }
    }

    /// Compacts claimed seats to the front, unclaims the rest (including
    /// seats whose owners left), and deals every live hand afresh.
    pub(crate) fn lock_in_players(&mut self) {
        self.nplayers = 0;

        for i in 0..MAX_PLAYERS {
            if self.hands[i].status == HandStatus::Claimed {
                let mut hand = self.hands[i].clone();
                hand.reset_cards_and_score();
                self.hands[self.nplayers] = hand;
                self.nplayers += 1;
            }
        }

        for hand in &mut self.hands[self.nplayers..] {
            hand.status = HandStatus::Unclaimed;
            hand.reset_cards_and_score();
        }
    }

    /// Seat currently claimed by the client, for turn-based requests.
    pub(crate) fn seat_of(&self, client: Uuid) -> Option<usize> {
        (0..MAX_PLAYERS)
            .find(|&i| self.hands[i].status == HandStatus::Claimed && self.hands[i].owner == client)
    }

    /// Seat associated with the client whether they are present or have
    /// left it, for join/leave bookkeeping.
    pub(crate) fn occupied_seat_of(&self, client: Uuid) -> Option<usize> {
        (0..MAX_PLAYERS)
            .find(|&i| self.hands[i].status != HandStatus::Unclaimed && self.hands[i].owner == client)
    }

    /// Advances `turn` to the next seat that still holds any cards,
    /// wrapping around the live seats, and during bidding also skipping
    /// seats that already passed. Gives up after one full lap.
    pub(crate) fn next_turn(&mut self) {
        for _ in 0..self.nplayers {
            self.turn = (self.turn + 1) % self.nplayers;

            let passed_out =
                self.phase == Phase::Bid && (1u16 << self.turn) & self.passed != 0;
            if !passed_out && self.hands[self.turn].has_cards() {
                break;
            }
        }
    }

    /// Ends a bidding round: everyone takes their played cards back.
    pub(crate) fn reclaim_played_cards(&mut self) {
        self.total_played = 0;
        for hand in &mut self.hands[..self.nplayers] {
            hand.reclaim_played();
        }
    }
}

impl GameState for SkullState {
    fn initialize(&mut self, members: &[Arc<Member>]) {
        self.broadcast_state(members);
    }

    fn admit(&mut self, member: &Member) {
        member.send(self.encode_full_state(member.id()));
    }

    fn handle(&mut self, members: &[Arc<Member>], source: &Member, payload: &[u8]) {
        self.handle_request(members, source, payload);
    }

    fn teardown(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_ordering_defines_active() {
        assert!(!Phase::NoGame.active());
        assert!(!Phase::Winner.active());
        assert!(!Phase::Aborted.active());
        assert!(Phase::Play.active());
        assert!(Phase::Bid.active());
        assert!(Phase::Pick.active());
        assert!(Phase::BidderShuffle.active());
        assert!(Phase::TakeCard.active());
    }

    #[test]
    fn test_lock_in_compacts_claimed_seats() {
        let mut state = SkullState::new();
        state.hands[1].status = HandStatus::Claimed;
        state.hands[1].owner = Uuid::from_bytes([1; 16]);
        state.hands[4].status = HandStatus::Claimed;
        state.hands[4].owner = Uuid::from_bytes([2; 16]);
        state.hands[5].status = HandStatus::Left;

        state.lock_in_players();

        assert_eq!(state.nplayers, 2);
        assert_eq!(state.hands[0].owner, Uuid::from_bytes([1; 16]));
        assert_eq!(state.hands[1].owner, Uuid::from_bytes([2; 16]));
        for hand in &state.hands[2..] {
            assert_eq!(hand.status, HandStatus::Unclaimed);
        }
        for hand in &state.hands[..2] {
            assert_eq!(hand.held, 4);
            assert_eq!(hand.score, 0);
        }
    }

    #[test]
    fn test_next_turn_skips_empty_hands() {
        let mut state = SkullState::new();
        state.nplayers = 3;
        for i in 0..3 {
            state.hands[i].status = HandStatus::Claimed;
            state.hands[i].held = 4;
        }
        // Seat 1 has run out of cards entirely.
        state.hands[1].held = 0;

        state.turn = 0;
        state.next_turn();
        assert_eq!(state.turn, 2);
    }

    #[test]
    fn test_next_turn_skips_passed_seats_in_bid_phase() {
        let mut state = SkullState::new();
        state.nplayers = 4;
        for i in 0..4 {
            state.hands[i].status = HandStatus::Claimed;
            state.hands[i].held = 4;
        }
        state.phase = Phase::Bid;
        state.passed = 0b0110; // seats 1 and 2 are out

        state.turn = 0;
        state.next_turn();
        assert_eq!(state.turn, 3);
    }
}
