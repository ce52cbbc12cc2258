//! Request handling: every opcode a player can send the game.
//!
//! Bodies are untrusted bytes; anything misshapen or out of range is
//! dropped without feedback. State-dependent checks (phase, whose turn)
//! run against the current table before anything mutates.

use std::sync::Arc;

use parlor_room::Member;

use crate::game_state::{Phase, SkullState};
use crate::hand::{HandStatus, SkullStatus};
use crate::MAX_PLAYERS;

/// Claim a seat; body is a seat index in `[0, 5]`.
pub const REQ_JOIN: u8 = 0;
/// Give up your seat (marked "left" if a game is running).
pub const REQ_LEAVE: u8 = 1;
/// Deal a fresh game with the currently claimed seats.
pub const REQ_RESTART: u8 = 2;
/// Abandon the running game without a winner.
pub const REQ_ABORT: u8 = 3;
/// Play a held card face down; body is a held-stack index.
pub const REQ_PLAY: u8 = 4;
/// Raise the bid; body is the new amount.
pub const REQ_BID: u8 = 5;
/// Drop out of the current bidding round.
pub const REQ_PASS: u8 = 6;
/// Flip the top played card of a seat; body is a seat index.
pub const REQ_PICK: u8 = 7;
/// Rearrange two held cards; body is two held-stack indices.
pub const REQ_MOVE_CARD: u8 = 8;
/// Bidder is done rearranging after their skull blunder.
pub const REQ_DONE_SHUFFLING: u8 = 9;
/// Take one of the bidder's held cards; body is a held-stack index.
pub const REQ_TAKE_CARD: u8 = 10;

/// Successful bids needed to win.
const WINNING_SCORE: u8 = 2;

impl SkullState {
    pub(crate) fn handle_request(
        &mut self,
        members: &[Arc<Member>],
        source: &Member,
        payload: &[u8],
    ) {
        let Some((&op, body)) = payload.split_first() else {
            return;
        };
        let src_id = source.id();

        match op {
            REQ_JOIN => {
                let &[seat] = body else {
                    return;
                };
                let seat = seat as usize;
                if seat >= MAX_PLAYERS {
                    return;
                }

                let existing = self.occupied_seat_of(src_id);
                let active = self.phase.active();

                // Rejoining your own seat is a no-op; mid-game you can
                // neither slide into an empty seat nor abandon the one you
                // hold, and a claimed seat is never up for grabs. A "left"
                // seat, though, can be taken over — that is how a
                // substitute steps in.
                if existing == Some(seat)
                    || (existing.is_some() && active)
                    || (active && self.hands[seat].status == HandStatus::Unclaimed)
                    || self.hands[seat].status == HandStatus::Claimed
                {
                    return;
                }

                self.hands[seat].status = HandStatus::Claimed;
                self.hands[seat].owner = src_id;

                if let Some(old) = existing {
                    // No game running (checked above), so this is just a
                    // seat swap before the deal.
                    self.hands[old].status = HandStatus::Unclaimed;
                }

                self.broadcast_state(members);
            }

            REQ_LEAVE => {
                let Some(seat) = self.occupied_seat_of(src_id) else {
                    return;
                };
                self.hands[seat].status = if self.phase.active() {
                    HandStatus::Left
                } else {
                    HandStatus::Unclaimed
                };
                self.broadcast_state(members);
            }

            REQ_RESTART => {
                self.phase = Phase::Play;
                self.turn = 0;
                self.total_played = 0;
                self.bid = 0;
                self.passed = 0;
                self.lock_in_players();
                self.broadcast_state(members);
            }

            REQ_ABORT => {
                if !self.phase.active() {
                    return;
                }
                self.phase = Phase::Aborted;
                self.broadcast_state(members);
            }

            REQ_PLAY => {
                let Some(seat) = self.seat_of(src_id) else {
                    return;
                };
                if self.phase != Phase::Play || self.turn != seat {
                    return;
                }
                let &[card] = body else {
                    return;
                };
                let hand = &mut self.hands[seat];
                if card >= hand.held {
                    return;
                }

                if hand.skull_status == SkullStatus::InHand {
                    if card == hand.skull_pos {
                        // Playing the skull: it goes on top of the played
                        // stack.
                        hand.skull_status = SkullStatus::Played;
                        hand.skull_pos = hand.played;
                    } else if card < hand.skull_pos {
                        // A card below the skull leaves the stack, so the
                        // skull shifts down.
                        hand.skull_pos -= 1;
                    }
                }

                hand.played += 1;
                hand.held -= 1;
                self.total_played += 1;
                self.next_turn();
                self.broadcast_state(members);
            }

            REQ_BID => {
                let Some(seat) = self.seat_of(src_id) else {
                    return;
                };
                if !(self.phase == Phase::Play || self.phase == Phase::Bid)
                    || self.turn != seat
                {
                    return;
                }
                let &[amount] = body else {
                    return;
                };
                // Bids only go up, and never past the cards on the table.
                if amount <= self.bid || amount > self.total_played {
                    return;
                }

                self.bid = amount;
                self.bidder = seat;

                if self.bid < self.total_played {
                    self.phase = Phase::Bid;
                    self.next_turn();
                } else {
                    // Nobody can outbid a maximal bid; straight to picking.
                    self.phase = Phase::Pick;
                    self.passed = 0;
                }
                self.broadcast_state(members);
            }

            REQ_PASS => {
                let Some(seat) = self.seat_of(src_id) else {
                    return;
                };
                if self.phase != Phase::Bid || self.turn != seat {
                    return;
                }

                self.passed |= 1 << seat;
                self.next_turn();

                // Back around to the most recent bidder: the bid stands
                // and they must now deliver on it.
                if self.turn == self.bidder {
                    self.phase = Phase::Pick;
                    self.passed = 0;
                }
                self.broadcast_state(members);
            }

            REQ_PICK => {
                let Some(seat) = self.seat_of(src_id) else {
                    return;
                };
                if self.phase != Phase::Pick || self.turn != seat {
                    return;
                }
                let &[target] = body else {
                    return;
                };
                let target = target as usize;
                if target >= self.nplayers || self.hands[target].played == 0 {
                    return;
                }

                // Decrement first so the top of the stack and the skull
                // position can be compared directly.
                self.hands[target].played -= 1;

                let flipped_skull = self.hands[target].skull_status == SkullStatus::Played
                    && self.hands[target].skull_pos == self.hands[target].played;

                if flipped_skull {
                    // The flipped skull goes back into the played count so
                    // the reclaim returns it to its owner's hand; only a
                    // take-card can actually destroy it.
                    self.hands[target].played += 1;
                    // The bidder pays: the skull's owner will take one of
                    // their cards once they finish rearranging.
                    self.phase = Phase::BidderShuffle;
                    self.bid = 0;
                    self.taker = target;
                    self.reclaim_played_cards();
                } else {
                    // The bid counts down to zero instead of a separate
                    // "picked so far" counter.
                    self.bid -= 1;

                    if self.bid == 0 {
                        self.hands[seat].score += 1;

                        if self.hands[seat].score >= WINNING_SCORE {
                            self.phase = Phase::Winner;
                            self.winner = src_id;
                        } else {
                            // Bidder leads the next round; turn already
                            // points at them.
                            self.phase = Phase::Play;
                            self.reclaim_played_cards();
                        }
                    }
                }
                self.broadcast_state(members);
            }

            REQ_MOVE_CARD => {
                if !self.phase.active() {
                    return;
                }
                let Some(seat) = self.seat_of(src_id) else {
                    return;
                };
                let &[from, to] = body else {
                    return;
                };
                let hand = &mut self.hands[seat];
                if from == to || from >= hand.held || to >= hand.held {
                    return;
                }

                // Only the skull's position is tracked; roses are
                // interchangeable, so "moving" one of them is all show.
                if hand.skull_status == SkullStatus::InHand {
                    if from == hand.skull_pos {
                        hand.skull_pos = to;
                    } else if to == hand.skull_pos {
                        hand.skull_pos = from;
                    }
                }
                self.broadcast_state(members);
            }

            REQ_DONE_SHUFFLING => {
                if self.phase != Phase::BidderShuffle {
                    return;
                }
                let Some(seat) = self.seat_of(src_id) else {
                    return;
                };
                if self.turn != seat {
                    return;
                }

                self.phase = Phase::TakeCard;
                self.turn = self.taker;
                self.broadcast_state(members);
            }

            REQ_TAKE_CARD => {
                let Some(seat) = self.seat_of(src_id) else {
                    return;
                };
                if self.phase != Phase::TakeCard || self.turn != seat {
                    return;
                }
                let &[card] = body else {
                    return;
                };
                let bidder = &mut self.hands[self.bidder];
                if card >= bidder.held {
                    return;
                }

                if bidder.skull_status == SkullStatus::InHand {
                    if card == bidder.skull_pos {
                        bidder.skull_status = SkullStatus::Gone;
                    } else if card < bidder.skull_pos {
                        bidder.skull_pos -= 1;
                    }
                }

                bidder.held -= 1;
                // Taker leads the next round; turn already points at them.
                self.phase = Phase::Play;
                self.broadcast_state(members);
            }

            _ => {}
        }
    }
}
