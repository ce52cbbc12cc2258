//! Serialization of outbound game state.
//!
//! Skull has exactly one outbound message: a full-state snapshot, encoded
//! per recipient because skull locations are secret. A client sees true
//! status and position for its own seat only; for everyone else's seat the
//! skull field says either "taken" (public knowledge — the whole table
//! watched it happen) or "unknown".

use std::sync::Arc;

use uuid::Uuid;

use parlor_room::Member;

use crate::game_state::SkullState;
use crate::hand::{HandStatus, SkullStatus};
use crate::MAX_PLAYERS;

/// The one outbound kind: a complete table snapshot.
pub const STATE_FULL: u8 = 0;

/// Skull byte sent for seats whose skull state the viewer may not know.
pub const SKULL_UNKNOWN: u8 = 0xFF;

/// Position byte sent whenever the true position is withheld or gone.
pub const SKULL_NO_POS: u8 = 0xFF;

/// Bytes per encoded seat: status, owner, held, played, score, skull
/// status, skull position.
const SEAT_LEN: usize = 1 + 16 + 1 + 1 + 1 + 1 + 1;

impl SkullState {
    /// Encodes the table as seen by `viewer`. Inactive phases describe all
    /// six seats so lobbies render fully; active phases describe only the
    /// locked-in seats.
    pub(crate) fn encode_full_state(&self, viewer: Uuid) -> Vec<u8> {
        let nseats = if self.phase.active() {
            self.nplayers
        } else {
            MAX_PLAYERS
        };

        let mut msg = parlor_protocol::alloc_game_frame(1 + 9 + 16 + 1 + nseats * SEAT_LEN);
        msg.push(STATE_FULL);
        msg.push(self.phase as u8);
        msg.push(self.turn as u8);
        msg.push(self.total_played);
        msg.push(self.bid);
        msg.push(self.bidder as u8);
        msg.extend_from_slice(&self.passed.to_be_bytes());
        msg.push(self.taker as u8);
        msg.extend_from_slice(self.winner.as_bytes());
        msg.push(nseats as u8);

        for hand in &self.hands[..nseats] {
            msg.push(hand.status as u8);
            msg.extend_from_slice(hand.owner.as_bytes());
            msg.push(hand.held);
            msg.push(hand.played);
            msg.push(hand.score);

            let own = hand.status != HandStatus::Unclaimed && hand.owner == viewer;
            if own {
                msg.push(hand.skull_status as u8);
                msg.push(if hand.skull_status == SkullStatus::Gone {
                    SKULL_NO_POS
                } else {
                    hand.skull_pos
                });
            } else if hand.skull_status == SkullStatus::Gone {
                msg.push(SkullStatus::Gone as u8);
                msg.push(SKULL_NO_POS);
            } else {
                msg.push(SKULL_UNKNOWN);
                msg.push(SKULL_NO_POS);
            }
        }

        msg
    }

    pub(crate) fn broadcast_state(&self, members: &[Arc<Member>]) {
        for member in members {
            member.send(self.encode_full_state(member.id()));
        }
    }
}
