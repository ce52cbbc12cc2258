//! The room event loop.
//!
//! Each room runs in its own Tokio task, communicating with the outside
//! world through three channels: member registration, member departure,
//! and inbound request frames. The loop is a single sequential consumer —
//! it alone touches the member list, the chat buffer, and the game
//! instance, so none of them need synchronization.

use std::sync::Arc;

use tokio::sync::mpsc;

use parlor_protocol::{self as protocol, room_op, ChatBuffer, SCOPE_GAME};

use crate::member::Enqueue;
use crate::{GameRegistry, GameState, Member, RoomClosed};

/// Most members a room will hold; registrations beyond this are refused.
pub const ROOM_MEMBER_CAP: usize = 15;

/// Inbound request frames buffer up to this many entries before readers
/// start applying backpressure to their sockets.
const REQUEST_CHANNEL_CAPACITY: usize = 100;

/// Longest accepted member or room display name, in bytes. The wire format
/// length-prefixes names with a single byte.
const MAX_NAME_LEN: usize = 255;

/// A raw frame from a member, tagged with who sent it.
pub struct Request {
    pub origin: Arc<Member>,
    pub frame: Vec<u8>,
}

/// Handle for feeding a running room. Cheap to clone; the server directory
/// and every member session hold one.
#[derive(Clone)]
pub struct RoomHandle {
    id: u32,
    name: Arc<str>,
    register_tx: mpsc::Sender<Arc<Member>>,
    unregister_tx: mpsc::Sender<Arc<Member>>,
    request_tx: mpsc::Sender<Request>,
}

impl RoomHandle {
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hands a freshly constructed member to the room for admission.
    pub async fn register(&self, member: Arc<Member>) -> Result<(), RoomClosed> {
        self.register_tx
            .send(member)
            .await
            .map_err(|_| RoomClosed(self.id))
    }

    /// Tells the room a member's connection is gone.
    pub async fn unregister(&self, member: Arc<Member>) -> Result<(), RoomClosed> {
        self.unregister_tx
            .send(member)
            .await
            .map_err(|_| RoomClosed(self.id))
    }

    /// Forwards one inbound frame. Blocks once the room's request buffer
    /// is full, which is exactly the backpressure a flooding reader needs.
    pub async fn request(&self, origin: Arc<Member>, frame: Vec<u8>) -> Result<(), RoomClosed> {
        self.request_tx
            .send(Request { origin, frame })
            .await
            .map_err(|_| RoomClosed(self.id))
    }
}

/// A room: an ordered member list, chat history, and at most one game.
pub struct Room {
    id: u32,
    name: String,
    members: Vec<Arc<Member>>,
    chat: ChatBuffer,
    /// Id of the running game; empty exactly when `game` is `None`.
    game_id: String,
    game: Option<Box<dyn GameState>>,
    registry: Arc<GameRegistry>,
    /// Set on the first successful admission; the loop only shuts down
    /// once a room that has served someone empties out.
    served: bool,
    register_rx: mpsc::Receiver<Arc<Member>>,
    unregister_rx: mpsc::Receiver<Arc<Member>>,
    request_rx: mpsc::Receiver<Request>,
}

impl Room {
    /// Creates a room and its handle. The caller is responsible for
    /// spawning [`Room::run`] and for directory bookkeeping around it.
    pub fn new(id: u32, name: String, registry: Arc<GameRegistry>) -> (Room, RoomHandle) {
        let (register_tx, register_rx) = mpsc::channel(1);
        let (unregister_tx, unregister_rx) = mpsc::channel(1);
        let (request_tx, request_rx) = mpsc::channel(REQUEST_CHANNEL_CAPACITY);

        let handle = RoomHandle {
            id,
            name: name.clone().into(),
            register_tx,
            unregister_tx,
            request_tx,
        };
        let room = Room {
            id,
            name,
            members: Vec::new(),
            chat: ChatBuffer::new(),
            game_id: String::new(),
            game: None,
            registry,
            served: false,
            register_rx,
            unregister_rx,
            request_rx,
        };
        (room, handle)
    }

    /// Serves the room until the last member departs. Dropping the room on
    /// return closes the request channel, which readers observe as their
    /// cue to hang up.
    pub async fn run(mut self) {
        tracing::info!(room_id = self.id, name = %self.name, "room opened");

        loop {
            tokio::select! {
                Some(member) = self.register_rx.recv() => self.admit(member),
                Some(member) = self.unregister_rx.recv() => self.remove(&member),
                Some(request) = self.request_rx.recv() => self.dispatch(request),
                else => break,
            }

            if self.served && self.members.is_empty() {
                break;
            }
        }

        if let Some(mut game) = self.game.take() {
            game.teardown();
        }
        tracing::info!(room_id = self.id, "room closed");
    }

    // -----------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------

    fn admit(&mut self, member: Arc<Member>) {
        // A register carrying an id we already track is a reconnect racing
        // ahead of the old connection's teardown; the stale member gives
        // way so client ids stay unique in the list.
        if let Some(i) = self.members.iter().position(|m| m.id() == member.id()) {
            let stale = self.members.swap_remove(i);
            stale.close_queue();
            tracing::debug!(
                room_id = self.id,
                client_id = %stale.id(),
                "displaced stale connection"
            );
            self.broadcast(protocol::encode_delete_members(&[stale.id()]));
        }

        if self.members.len() >= ROOM_MEMBER_CAP {
            member.close_queue();
            tracing::debug!(room_id = self.id, client_id = %member.id(), "room full");
            return;
        }

        // The queue is freshly created and empty, so these always fit.
        member.send(protocol::encode_init(
            self.id,
            member.id(),
            &self.name,
            &self.game_id,
        ));
        member.send(protocol::encode_all_chat(&self.chat));

        self.members.push(Arc::clone(&member));
        self.served = true;

        let name = member.name();
        self.broadcast(protocol::encode_set_members(&[(member.id(), name.as_str())]));

        if let Some(game) = self.game.as_mut() {
            game.admit(&member);
        }
        self.sweep_closed();

        tracing::info!(
            room_id = self.id,
            client_id = %member.id(),
            members = self.members.len(),
            "member joined"
        );
    }

    /// Removes a member if it is still present. Lookup is by pointer
    /// identity: an unregister from a connection that was already evicted
    /// (or displaced by a reconnect) must not touch its successor.
    fn remove(&mut self, target: &Arc<Member>) {
        let Some(i) = self.members.iter().position(|m| Arc::ptr_eq(m, target)) else {
            return;
        };
        let member = self.members.swap_remove(i);
        member.close_queue();
        tracing::info!(
            room_id = self.id,
            client_id = %member.id(),
            members = self.members.len(),
            "member left"
        );
        self.broadcast(protocol::encode_delete_members(&[member.id()]));
    }

    // -----------------------------------------------------------------
    // Request dispatch
    // -----------------------------------------------------------------

    fn dispatch(&mut self, request: Request) {
        let Request { origin, frame } = request;

        if frame.len() < 2 || frame[0] > SCOPE_GAME {
            return;
        }
        // Frames from a member we already dropped would resurrect a ghost.
        if !self.members.iter().any(|m| Arc::ptr_eq(m, &origin)) {
            return;
        }

        if frame[0] == SCOPE_GAME {
            if let Some(game) = self.game.as_mut() {
                game.handle(&self.members, &origin, &frame[1..]);
            } else {
                return;
            }
            self.sweep_closed();
            return;
        }

        let body = &frame[2..];
        match frame[1] {
            room_op::SET_NAME => self.set_member_name(&origin, body),
            room_op::BOOT_GAME => self.boot_game(body),
            room_op::KILL_GAME => self.kill_game(),
            room_op::CHAT_MESSAGE => self.chat_message(&origin, body),
            _ => {}
        }
    }

    fn set_member_name(&mut self, origin: &Arc<Member>, body: &[u8]) {
        if body.is_empty() || body.len() > MAX_NAME_LEN {
            return;
        }
        let Ok(name) = std::str::from_utf8(body) else {
            return;
        };
        origin.set_name(name.to_owned());
        self.broadcast(protocol::encode_set_members(&[(origin.id(), name)]));
    }

    fn boot_game(&mut self, body: &[u8]) {
        if self.game.is_some() || body.is_empty() {
            return;
        }
        let Ok(id) = std::str::from_utf8(body) else {
            return;
        };
        let Some(game) = self.registry.get(id).cloned() else {
            return;
        };

        self.game_id = id.to_owned();
        self.broadcast(protocol::encode_set_game(&self.game_id));

        self.game = Some(game.new_instance());
        if let Some(state) = self.game.as_mut() {
            state.initialize(&self.members);
        }
        self.sweep_closed();

        tracing::info!(room_id = self.id, game = %self.game_id, "game booted");
    }

    fn kill_game(&mut self) {
        let Some(mut game) = self.game.take() else {
            return;
        };
        game.teardown();
        self.game_id.clear();
        self.broadcast(protocol::encode_set_game(""));
        tracing::info!(room_id = self.id, "game killed");
    }

    fn chat_message(&mut self, origin: &Arc<Member>, body: &[u8]) {
        // The buffer enforces the length bounds.
        if self.chat.append(origin.id(), body) {
            self.broadcast(protocol::encode_new_chat(origin.id(), body));
        }
    }

    // -----------------------------------------------------------------
    // Fan-out
    // -----------------------------------------------------------------

    /// Queues a frame on every member. A member whose queue is full (or
    /// already closed) is evicted mid-iteration by swap-removal; the member
    /// pulled into the vacated slot is visited next, so nobody is skipped.
    /// Room-scope messages are idempotent on the client, so a member that
    /// sees one twice across an eviction shuffle is unharmed.
    fn broadcast(&mut self, frame: Vec<u8>) {
        let mut evicted = Vec::new();

        let mut i = 0;
        while i < self.members.len() {
            match self.members[i].enqueue(frame.clone()) {
                Enqueue::Sent => i += 1,
                Enqueue::Full | Enqueue::Closed => {
                    let member = self.members.swap_remove(i);
                    member.close_queue();
                    evicted.push(member);
                }
            }
        }

        for member in evicted {
            tracing::info!(
                room_id = self.id,
                client_id = %member.id(),
                "evicted unresponsive member"
            );
            self.broadcast(protocol::encode_delete_members(&[member.id()]));
        }
    }

    /// Finishes evictions a game started: [`Member::send`] closes the
    /// queue of an unresponsive peer, but the list mutation has to wait
    /// until the game call returns its borrowed member slice.
    fn sweep_closed(&mut self) {
        while let Some(i) = self.members.iter().position(|m| m.queue_closed()) {
            let member = self.members.swap_remove(i);
            tracing::info!(
                room_id = self.id,
                client_id = %member.id(),
                "evicted unresponsive member"
            );
            self.broadcast(protocol::encode_delete_members(&[member.id()]));
        }
    }
}
