//! Request handling: every opcode a player can send the game.
//!
//! Validation that depends only on the payload shape happens first;
//! validation that depends on game state (whose turn it is, what has been
//! revealed) happens against the current state. Anything invalid is
//! dropped without feedback — a well-behaved client never sends it, and a
//! desynced one isn't helped by more bytes.

use std::sync::Arc;

use parlor_room::Member;

use crate::board::{CardType, BOARD_SIZE};
use crate::events::{EventKind, GameEvent};
use crate::game_state::BravewengthState;
use crate::{Role, Team};

/// Change your own role; body is one byte in `[0, 4]`.
pub const REQ_SET_ROLE: u8 = 0;
/// Reserved for team randomization; currently accepted and ignored.
pub const REQ_RANDOMIZE_TEAMS: u8 = 1;
/// Deal a fresh board, discarding any game in progress.
pub const REQ_NEW_GAME: u8 = 2;
/// End the current game with no winner so roles can be reshuffled.
pub const REQ_END_GAME: u8 = 3;
/// Give a clue; body is the clue text.
pub const REQ_GIVE_CLUE: u8 = 4;
/// Reveal a card; body is one byte in `[0, 25)`.
pub const REQ_REVEAL_CARD: u8 = 5;
/// End your own turn early instead of revealing another card.
pub const REQ_END_TURN: u8 = 6;

/// Teal needs 9 discoveries to win, purple 8.
const TEAL_TARGET: usize = 9;
const PURPLE_TARGET: usize = 8;

impl BravewengthState {
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
        let src_role = self.role_of(src_id);

        match op {
            REQ_SET_ROLE => {
                let &[raw] = body else {
                    return;
                };
                let Some(new_role) = Role::from_byte(raw) else {
                    return;
                };
                // Knowers have seen the layout: while a game is running
                // they may move between knower seats but never become a
                // seeker or spectator. No-op changes are dropped too.
                if new_role == src_role
                    || (!self.game_ended && src_role.is_knower() && !new_role.is_knower())
                {
                    return;
                }

                if new_role == Role::Spectator {
                    self.roles.remove(&src_id);
                } else {
                    self.roles.insert(src_id, new_role);
                }
                self.broadcast_roles_state(members);

                // Crossing the knower boundary changes what this player is
                // allowed to see, so refresh their board view.
                if src_role.is_knower() != new_role.is_knower() {
                    source.send(self.encode_board_state(new_role.is_knower()));
                }
            }

            REQ_RANDOMIZE_TEAMS => {}

            REQ_NEW_GAME => {
                self.reset_round();
                self.log_event(GameEvent::new(src_id, src_role, EventKind::GameStarted));
                self.broadcast_board_state(members);
            }

            REQ_END_GAME => {
                if self.game_ended {
                    return;
                }
                self.game_ended = true;
                self.winner = Team::None;
                self.log_event(GameEvent::new(src_id, src_role, EventKind::GameEnded));
                self.broadcast_board_state(members);
            }

            REQ_GIVE_CLUE => {
                if self.game_ended || self.current_turn != src_role || !src_role.is_knower() {
                    return;
                }
                let Ok(clue) = std::str::from_utf8(body) else {
                    return;
                };

                self.current_turn = self.current_turn.next_turn();
                self.current_clue = clue.to_owned();

                let mut event = GameEvent::new(src_id, src_role, EventKind::ClueGiven);
                event.clue = clue.to_owned();
                self.log_event(event);
                self.broadcast_board_state(members);
            }

            REQ_REVEAL_CARD => {
                let &[index] = body else {
                    return;
                };
                let index = index as usize;
                if index >= BOARD_SIZE
                    || self.game_ended
                    || self.current_turn != src_role
                    || !src_role.is_seeker()
                    || self.board.disc_types[index] != CardType::Hidden
                {
                    return;
                }

                let revealed = self.board.full_types[index];
                self.board.disc_types[index] = revealed;

                let mut event = GameEvent::new(src_id, src_role, EventKind::CardRevealed);
                event.word = self.board.words[index].clone();
                event.card_type = revealed;
                self.log_event(event);

                if revealed == CardType::Black {
                    // Revealing the black card hands the game to the
                    // opposing team.
                    self.game_ended = true;
                    self.winner = match src_role.team() {
                        Team::Teal => Team::Purple,
                        _ => Team::Teal,
                    };
                } else if revealed == CardType::Neutral {
                    self.current_turn = self.current_turn.next_turn();
                } else {
                    if self.board.discovered(CardType::Teal) >= TEAL_TARGET {
                        self.game_ended = true;
                        self.winner = Team::Teal;
                    } else if self.board.discovered(CardType::Purple) >= PURPLE_TARGET {
                        self.game_ended = true;
                        self.winner = Team::Purple;
                    } else if revealed.team() != src_role.team() {
                        self.current_turn = self.current_turn.next_turn();
                    }
                    // Matching your own team's card keeps your turn going.
                }

                if self.game_ended {
                    self.log_event(GameEvent::new(src_id, src_role, EventKind::GameEnded));
                }
                self.broadcast_board_state(members);
            }

            REQ_END_TURN => {
                if self.game_ended || self.current_turn != src_role || !src_role.is_seeker() {
                    return;
                }
                self.current_turn = self.current_turn.next_turn();
                self.log_event(GameEvent::new(src_id, src_role, EventKind::TurnEnded));
                self.broadcast_board_state(members);
            }

            _ => {}
        }
    }
}
