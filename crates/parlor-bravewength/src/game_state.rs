//! Per-room game instance state.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use parlor_room::{GameState, Member};

use crate::board::Board;
use crate::{GameEvent, Role, Team};

pub(crate) struct BravewengthState {
    pub(crate) board: Board,

    /// Role per client id; absent means spectator.
    pub(crate) roles: HashMap<Uuid, Role>,

    /// Whose kind of player is up. Frozen once the game ends.
    pub(crate) current_turn: Role,

    /// The standing clue while a seeker is up; empty while a knower is.
    pub(crate) current_clue: String,

    pub(crate) game_ended: bool,

    /// Only meaningful once `game_ended` is set; `Team::None` there means
    /// the game was ended early and nobody won.
    pub(crate) winner: Team,

    pub(crate) log: Vec<GameEvent>,
}

impl BravewengthState {
    pub(crate) fn new(deck: Arc<[String]>) -> BravewengthState {
        let mut state = BravewengthState {
            board: Board::new(deck),
            roles: HashMap::new(),
            current_turn: Role::TealKnower,
            current_clue: String::new(),
            game_ended: false,
            winner: Team::None,
            log: Vec::new(),
        };
        state.reset_round();
        state
    }

    /// Deals a fresh board and rewinds the turn/clue/log machinery.
    pub(crate) fn reset_round(&mut self) {
        self.board.reset();
        self.current_turn = Role::TealKnower;
        self.current_clue.clear();
        self.game_ended = false;
        self.winner = Team::None;
        self.log.clear();
    }

    pub(crate) fn role_of(&self, id: Uuid) -> Role {
        self.roles.get(&id).copied().unwrap_or(Role::Spectator)
    }

    pub(crate) fn log_event(&mut self, event: GameEvent) {
        self.log.push(event);
    }
}

impl GameState for BravewengthState {
    fn initialize(&mut self, members: &[Arc<Member>]) {
        // Everyone starts as a spectator, so there is no roles map worth
        // announcing yet; the board is all anyone needs.
        self.broadcast_board_state(members);
    }

    fn admit(&mut self, member: &Member) {
        member.send(self.encode_board_state(self.role_of(member.id()).is_knower()));
    }

    fn handle(&mut self, members: &[Arc<Member>], source: &Member, payload: &[u8]) {
        self.handle_request(members, source, payload);
    }

    fn teardown(&mut self) {
        self.roles.clear();
        self.log.clear();
    }
}
