//! Serialization of outbound game state.
//!
//! Two kinds exist: the board (with the event log and turn bookkeeping
//! riding along) and the roles map. Both are JSON payloads behind the
//! game-scope binary envelope: scope byte, kind byte, UTF-8 body. Failing
//! to serialize either is a bug in this crate, not a runtime condition, so
//! encoding panics rather than limping along.

use std::sync::Arc;

use serde::Serialize;

use parlor_room::Member;

use crate::board::BOARD_SIZE;
use crate::game_state::BravewengthState;
use crate::{GameEvent, Role, Team};

/// Board snapshot, tailored per viewer class.
pub const STATE_BOARD: u8 = 0;
/// The full client-id-to-role map.
pub const STATE_ROLES: u8 = 1;

/// `full_types` value sent to players who must not see the layout yet.
const ALL_HIDDEN: &str = "4444444444444444444444444";

#[derive(Serialize)]
struct BoardStateBody<'a> {
    words: &'a [String],
    disc_types: String,
    full_types: String,
    current_turn: Role,
    current_clue: &'a str,
    game_ended: bool,
    winner: Team,
    log: &'a [GameEvent],
}

impl BravewengthState {
    /// Encodes the board for one viewer class. Knowers get the true
    /// layout; everyone else gets all-hidden until the game ends, at which
    /// point the layout becomes public.
    pub(crate) fn encode_board_state(&self, show_full_layout: bool) -> Vec<u8> {
        let disc_types: String = self
            .board
            .disc_types
            .iter()
            .map(|t| t.ascii() as char)
            .collect();

        let full_types = if show_full_layout || self.game_ended {
            self.board
                .full_types
                .iter()
                .map(|t| t.ascii() as char)
                .collect()
        } else {
            ALL_HIDDEN.to_owned()
        };
        debug_assert_eq!(full_types.len(), BOARD_SIZE);

        let body = serde_json::to_vec(&BoardStateBody {
            words: &self.board.words,
            disc_types,
            full_types,
            current_turn: self.current_turn,
            current_clue: &self.current_clue,
            game_ended: self.game_ended,
            winner: self.winner,
            log: &self.log,
        })
        .expect("board state is always representable as JSON");

        let mut msg = parlor_protocol::alloc_game_frame(1 + body.len());
        msg.push(STATE_BOARD);
        msg.extend_from_slice(&body);
        msg
    }

    pub(crate) fn encode_roles_state(&self) -> Vec<u8> {
        let body = serde_json::to_vec(&self.roles)
            .expect("roles map is always representable as JSON");
        let mut msg = parlor_protocol::alloc_game_frame(1 + body.len());
        msg.push(STATE_ROLES);
        msg.extend_from_slice(&body);
        msg
    }

    /// Sends every member the board variant matching their viewer class.
    /// Both variants are encoded once; fan-out just clones bytes.
    pub(crate) fn broadcast_board_state(&self, members: &[Arc<Member>]) {
        let knower_view = self.encode_board_state(true);
        let hidden_view = self.encode_board_state(false);

        for member in members {
            let frame = if self.role_of(member.id()).is_knower() {
                knower_view.clone()
            } else {
                hidden_view.clone()
            };
            member.send(frame);
        }
    }

    pub(crate) fn broadcast_roles_state(&self, members: &[Arc<Member>]) {
        let msg = self.encode_roles_state();
        for member in members {
            member.send(msg.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_protocol::SCOPE_GAME;

    fn deck() -> Arc<[String]> {
        (0..200).map(|i| format!("word{i}")).collect()
    }

    fn board_json(frame: &[u8]) -> serde_json::Value {
        assert_eq!(frame[0], SCOPE_GAME);
        assert_eq!(frame[1], STATE_BOARD);
        serde_json::from_slice(&frame[2..]).unwrap()
    }

    #[test]
    fn test_board_state_hides_layout_from_non_knowers() {
        let state = BravewengthState::new(deck());

        let hidden = board_json(&state.encode_board_state(false));
        assert_eq!(hidden["full_types"], ALL_HIDDEN);
        assert_eq!(hidden["disc_types"], ALL_HIDDEN);
        assert_eq!(hidden["game_ended"], false);
        assert_eq!(hidden["winner"], 0);
        assert_eq!(hidden["current_turn"], 4);
        assert_eq!(hidden["words"].as_array().unwrap().len(), BOARD_SIZE);

        let full = board_json(&state.encode_board_state(true));
        let layout = full["full_types"].as_str().unwrap();
        assert_eq!(layout.len(), BOARD_SIZE);
        assert_ne!(layout, ALL_HIDDEN);
        assert!(layout.bytes().all(|b| (b'0'..=b'3').contains(&b)));
    }

    #[test]
    fn test_board_state_reveals_layout_once_game_ends() {
        let mut state = BravewengthState::new(deck());
        state.game_ended = true;

        let frame = state.encode_board_state(false);
        let body = board_json(&frame);
        assert_ne!(body["full_types"], ALL_HIDDEN);
    }

    #[test]
    fn test_roles_state_round_trips_as_json_map() {
        let mut state = BravewengthState::new(deck());
        let id = uuid::Uuid::new_v4();
        state.roles.insert(id, Role::PurpleKnower);

        let frame = state.encode_roles_state();
        assert_eq!(frame[0], SCOPE_GAME);
        assert_eq!(frame[1], STATE_ROLES);
        let map: serde_json::Value = serde_json::from_slice(&frame[2..]).unwrap();
        assert_eq!(map[id.to_string()], 2);
    }
}
