//! Integration tests for the room event loop using a recording mock game.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use parlor_protocol::{room_op, room_state, SCOPE_GAME, SCOPE_ROOM};
use parlor_room::{Game, GameRegistry, GameState, Member, Room, RoomHandle, ROOM_MEMBER_CAP};

// =========================================================================
// Mock game: records every hook call and echoes inbound opcodes.
// =========================================================================

type CallLog = Arc<Mutex<Vec<String>>>;

struct MockGame {
    log: CallLog,
}

struct MockState {
    log: CallLog,
}

impl Game for MockGame {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn version(&self) -> u32 {
        0
    }

    fn new_instance(&self) -> Box<dyn GameState> {
        Box::new(MockState {
            log: Arc::clone(&self.log),
        })
    }
}

impl GameState for MockState {
    fn initialize(&mut self, members: &[Arc<Member>]) {
        self.log.lock().push(format!("initialize:{}", members.len()));
    }

    fn admit(&mut self, member: &Member) {
        self.log.lock().push(format!("admit:{}", member.id()));
    }

    fn handle(&mut self, members: &[Arc<Member>], source: &Member, payload: &[u8]) {
        self.log
            .lock()
            .push(format!("handle:{}:{:?}", source.id(), payload));
        // Echo the payload back to everyone, game-scoped.
        for m in members {
            let mut frame = parlor_protocol::alloc_game_frame(payload.len());
            frame.extend_from_slice(payload);
            m.send(frame);
        }
    }

    fn teardown(&mut self) {
        self.log.lock().push("teardown".into());
    }
}

// =========================================================================
// Helpers
// =========================================================================

const ROOM_ID: u32 = 7;

fn uid(n: u8) -> Uuid {
    Uuid::from_bytes([n; 16])
}

/// Spawns a room named "R" with the mock game registered.
fn spawn_room() -> (RoomHandle, CallLog) {
    let log = CallLog::default();
    let registry = Arc::new(GameRegistry::new([Arc::new(MockGame {
        log: Arc::clone(&log),
    }) as Arc<dyn Game>]));
    let (room, handle) = Room::new(ROOM_ID, "R".into(), registry);
    tokio::spawn(room.run());
    (handle, log)
}

async fn join(handle: &RoomHandle, id: Uuid, name: &str) -> (Arc<Member>, mpsc::Receiver<Vec<u8>>) {
    let (member, rx) = Member::new(id, name.into());
    handle.register(Arc::clone(&member)).await.unwrap();
    (member, rx)
}

async fn recv(rx: &mut mpsc::Receiver<Vec<u8>>) -> Vec<u8> {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for a frame")
        .expect("queue closed unexpectedly")
}

fn room_frame(op: u8, body: &[u8]) -> Vec<u8> {
    let mut frame = vec![SCOPE_ROOM, op];
    frame.extend_from_slice(body);
    frame
}

fn chat(text: &str) -> Vec<u8> {
    room_frame(room_op::CHAT_MESSAGE, text.as_bytes())
}

/// Asserts a frame is `set-members` carrying exactly the given entries.
fn assert_set_members(frame: &[u8], expected: &[(Uuid, &str)]) {
    assert_eq!(&frame[..2], &[SCOPE_ROOM, room_state::SET_MEMBERS]);
    let mut rest = &frame[2..];
    let mut entries = Vec::new();
    while !rest.is_empty() {
        let id = Uuid::from_slice(&rest[..16]).unwrap();
        let len = rest[16] as usize;
        let name = std::str::from_utf8(&rest[17..17 + len]).unwrap();
        entries.push((id, name.to_owned()));
        rest = &rest[17 + len..];
    }
    let expected: Vec<(Uuid, String)> = expected
        .iter()
        .map(|(id, name)| (*id, (*name).to_owned()))
        .collect();
    assert_eq!(entries, expected);
}

fn assert_delete_members(frame: &[u8], expected: &[Uuid]) {
    assert_eq!(&frame[..2], &[SCOPE_ROOM, room_state::DELETE_MEMBERS]);
    let ids: Vec<Uuid> = frame[2..]
        .chunks(16)
        .map(|c| Uuid::from_slice(c).unwrap())
        .collect();
    assert_eq!(ids, expected);
}

fn assert_set_game(frame: &[u8], expected: &str) {
    assert_eq!(&frame[..2], &[SCOPE_ROOM, room_state::SET_GAME]);
    assert_eq!(frame[2] as usize, expected.len());
    assert_eq!(&frame[3..], expected.as_bytes());
}

/// Decodes an `all-chat` frame into (counter, line contents).
fn decode_all_chat(frame: &[u8]) -> (u16, Vec<Vec<u8>>) {
    assert_eq!(&frame[..2], &[SCOPE_ROOM, room_state::ALL_CHAT]);
    let total = u16::from_be_bytes([frame[2], frame[3]]);
    let mut lines = Vec::new();
    let mut rest = &frame[4..];
    while !rest.is_empty() {
        let len = rest[16] as usize;
        lines.push(rest[17..17 + len].to_vec());
        rest = &rest[17 + len..];
    }
    (total, lines)
}

// =========================================================================
// Admission and departure
// =========================================================================

#[tokio::test]
async fn test_admission_sends_init_chat_then_roster_entry() {
    let (handle, _) = spawn_room();
    let (_a, mut rx_a) = join(&handle, uid(1), "alice").await;

    // init: room id, our client id, room name, no game.
    let init = recv(&mut rx_a).await;
    assert_eq!(&init[..2], &[SCOPE_ROOM, room_state::INIT]);
    assert_eq!(&init[2..6], &ROOM_ID.to_be_bytes());
    assert_eq!(&init[6..22], uid(1).as_bytes());
    assert_eq!(init[22], 1);
    assert_eq!(init[23], b'R');
    assert_eq!(init[24], 0);
    assert_eq!(init.len(), 25);

    let (total, lines) = decode_all_chat(&recv(&mut rx_a).await);
    assert_eq!(total, 0);
    assert!(lines.is_empty());

    assert_set_members(&recv(&mut rx_a).await, &[(uid(1), "alice")]);
}

#[tokio::test]
async fn test_second_join_is_announced_incrementally() {
    let (handle, _) = spawn_room();
    let (_a, mut rx_a) = join(&handle, uid(1), "alice").await;
    for _ in 0..3 {
        recv(&mut rx_a).await;
    }

    let (_b, mut rx_b) = join(&handle, uid(2), "bob").await;

    // The existing member sees just the newcomer, never a full roster.
    assert_set_members(&recv(&mut rx_a).await, &[(uid(2), "bob")]);

    // The newcomer gets the standard admission sequence.
    let init = recv(&mut rx_b).await;
    assert_eq!(&init[..2], &[SCOPE_ROOM, room_state::INIT]);
    recv(&mut rx_b).await; // all-chat
    assert_set_members(&recv(&mut rx_b).await, &[(uid(2), "bob")]);
}

#[tokio::test]
async fn test_unregister_broadcasts_departure() {
    let (handle, _) = spawn_room();
    let (_a, mut rx_a) = join(&handle, uid(1), "alice").await;
    for _ in 0..3 {
        recv(&mut rx_a).await;
    }
    let (b, mut rx_b) = join(&handle, uid(2), "bob").await;
    recv(&mut rx_a).await; // bob's set-members

    handle.unregister(Arc::clone(&b)).await.unwrap();

    assert_delete_members(&recv(&mut rx_a).await, &[uid(2)]);
    // Bob's own queue ends after his admission frames.
    for _ in 0..3 {
        recv(&mut rx_b).await;
    }
    assert!(
        tokio::time::timeout(Duration::from_secs(1), rx_b.recv())
            .await
            .unwrap()
            .is_none(),
        "departed member's queue should be closed"
    );
}

#[tokio::test]
async fn test_room_exits_when_last_member_leaves() {
    let (handle, _) = spawn_room();
    let (a, mut rx_a) = join(&handle, uid(1), "alice").await;

    handle.unregister(a).await.unwrap();

    // Our queue closing means the removal went through, at which point the
    // empty room is already shutting down.
    while tokio::time::timeout(Duration::from_secs(1), rx_a.recv())
        .await
        .unwrap()
        .is_some()
    {}

    // The loop drops its channels on exit; new work is refused.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    loop {
        let (member, _rx) = Member::new(uid(3), "late".into());
        if handle.register(member).await.is_err() {
            break;
        }
        assert!(tokio::time::Instant::now() < deadline, "room never shut down");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn test_room_at_capacity_rejects_member() {
    let (handle, _) = spawn_room();

    let mut rxs = Vec::new();
    for i in 0..ROOM_MEMBER_CAP {
        let (_m, mut rx) = join(&handle, uid(i as u8 + 1), "p").await;
        for _ in 0..3 {
            recv(&mut rx).await;
        }
        rxs.push(rx);
    }

    let (_late, mut rx_late) = join(&handle, uid(200), "late").await;
    assert!(
        tokio::time::timeout(Duration::from_secs(1), rx_late.recv())
            .await
            .unwrap()
            .is_none(),
        "member over the cap should be closed without any frames"
    );
}

#[tokio::test]
async fn test_reconnect_displaces_stale_member() {
    let (handle, _) = spawn_room();
    let (_a, mut rx_a) = join(&handle, uid(1), "alice").await;
    for _ in 0..3 {
        recv(&mut rx_a).await;
    }
    let (_b, mut rx_b) = join(&handle, uid(2), "bob").await;
    recv(&mut rx_a).await;

    // Same client id, new connection.
    let (_a2, mut rx_a2) = join(&handle, uid(1), "alice").await;

    // The stale connection is closed out...
    assert!(
        tokio::time::timeout(Duration::from_secs(1), rx_a.recv())
            .await
            .unwrap()
            .is_none()
    );
    // ...bob watches alice leave and rejoin...
    for _ in 0..3 {
        recv(&mut rx_b).await; // own admission frames
    }
    assert_delete_members(&recv(&mut rx_b).await, &[uid(1)]);
    assert_set_members(&recv(&mut rx_b).await, &[(uid(1), "alice")]);
    // ...and the new connection is admitted normally.
    let init = recv(&mut rx_a2).await;
    assert_eq!(&init[..2], &[SCOPE_ROOM, room_state::INIT]);
}

// =========================================================================
// Room-scope requests
// =========================================================================

#[tokio::test]
async fn test_set_name_rebroadcasts_member() {
    let (handle, _) = spawn_room();
    let (a, mut rx_a) = join(&handle, uid(1), "alice").await;
    for _ in 0..3 {
        recv(&mut rx_a).await;
    }

    handle
        .request(Arc::clone(&a), room_frame(room_op::SET_NAME, b"neo"))
        .await
        .unwrap();
    assert_set_members(&recv(&mut rx_a).await, &[(uid(1), "neo")]);
    assert_eq!(a.name(), "neo");

    // Same name again: same broadcast, nothing else changes.
    handle
        .request(Arc::clone(&a), room_frame(room_op::SET_NAME, b"neo"))
        .await
        .unwrap();
    assert_set_members(&recv(&mut rx_a).await, &[(uid(1), "neo")]);
    assert_eq!(a.name(), "neo");
}

#[tokio::test]
async fn test_malformed_frames_are_dropped_silently() {
    let (handle, _) = spawn_room();
    let (a, mut rx_a) = join(&handle, uid(1), "alice").await;
    for _ in 0..3 {
        recv(&mut rx_a).await;
    }

    for bad in [
        vec![],                                  // too short
        vec![SCOPE_ROOM],                        // no opcode
        vec![9, 0, 1, 2],                        // unknown scope
        vec![SCOPE_ROOM, 99],                    // unknown opcode
        room_frame(room_op::SET_NAME, b""),      // empty name
        room_frame(room_op::CHAT_MESSAGE, b""),  // empty chat line
        chat(&"x".repeat(101)),                  // oversized chat line
        vec![SCOPE_GAME, 0],                     // game frame with no game
    ] {
        handle.request(Arc::clone(&a), bad).await.unwrap();
    }

    // A valid chat line still goes straight through.
    handle.request(Arc::clone(&a), chat("hi")).await.unwrap();
    let frame = recv(&mut rx_a).await;
    assert_eq!(&frame[..2], &[SCOPE_ROOM, room_state::NEW_CHAT]);
    assert_eq!(&frame[2..18], uid(1).as_bytes());
    assert_eq!(frame[18], 2);
    assert_eq!(&frame[19..], b"hi");
}

#[tokio::test]
async fn test_chat_overflow_history_for_late_joiner() {
    let (handle, _) = spawn_room();
    let (a, mut rx_a) = join(&handle, uid(1), "alice").await;
    for _ in 0..3 {
        recv(&mut rx_a).await;
    }

    for i in 0..75u32 {
        handle
            .request(Arc::clone(&a), chat(&format!("line {i}")))
            .await
            .unwrap();
    }
    // Drain our own copies; seeing the last one means all 75 are stored.
    for _ in 0..75 {
        recv(&mut rx_a).await;
    }

    let (_b, mut rx_b) = join(&handle, uid(2), "bob").await;
    recv(&mut rx_b).await; // init
    let (total, lines) = decode_all_chat(&recv(&mut rx_b).await);
    assert_eq!(total, 75);
    assert_eq!(lines.len(), 50);
    assert_eq!(lines[0], b"line 25".to_vec());
    assert_eq!(lines[49], b"line 74".to_vec());
}

// =========================================================================
// Game lifecycle
// =========================================================================

#[tokio::test]
async fn test_boot_and_kill_game() {
    let (handle, log) = spawn_room();
    let (a, mut rx_a) = join(&handle, uid(1), "alice").await;
    for _ in 0..3 {
        recv(&mut rx_a).await;
    }

    handle
        .request(Arc::clone(&a), room_frame(room_op::BOOT_GAME, b"mock"))
        .await
        .unwrap();
    assert_set_game(&recv(&mut rx_a).await, "mock");

    // A game frame reaches the instance, minus the scope byte.
    handle
        .request(Arc::clone(&a), vec![SCOPE_GAME, 42, 1, 2])
        .await
        .unwrap();
    let echoed = recv(&mut rx_a).await;
    assert_eq!(echoed, vec![SCOPE_GAME, 42, 1, 2]);

    handle
        .request(Arc::clone(&a), room_frame(room_op::KILL_GAME, b""))
        .await
        .unwrap();
    assert_set_game(&recv(&mut rx_a).await, "");

    let calls = log.lock().clone();
    assert_eq!(calls[0], "initialize:1");
    assert!(calls[1].starts_with(&format!("handle:{}", uid(1))));
    assert_eq!(calls[2], "teardown");

    // With the game gone, game frames are dropped again.
    handle
        .request(Arc::clone(&a), vec![SCOPE_GAME, 42])
        .await
        .unwrap();
    handle.request(Arc::clone(&a), chat("ping")).await.unwrap();
    let frame = recv(&mut rx_a).await;
    assert_eq!(frame[1], room_state::NEW_CHAT, "game frame should not produce output");
}

#[tokio::test]
async fn test_boot_rejects_unknown_and_double_boot() {
    let (handle, log) = spawn_room();
    let (a, mut rx_a) = join(&handle, uid(1), "alice").await;
    for _ in 0..3 {
        recv(&mut rx_a).await;
    }

    handle
        .request(Arc::clone(&a), room_frame(room_op::BOOT_GAME, b"nope"))
        .await
        .unwrap();
    handle
        .request(Arc::clone(&a), room_frame(room_op::BOOT_GAME, b""))
        .await
        .unwrap();
    handle
        .request(Arc::clone(&a), room_frame(room_op::BOOT_GAME, b"mock"))
        .await
        .unwrap();
    assert_set_game(&recv(&mut rx_a).await, "mock");

    // Booting on top of a running game is ignored.
    handle
        .request(Arc::clone(&a), room_frame(room_op::BOOT_GAME, b"mock"))
        .await
        .unwrap();
    handle.request(Arc::clone(&a), chat("still here")).await.unwrap();
    let frame = recv(&mut rx_a).await;
    assert_eq!(frame[1], room_state::NEW_CHAT);
    assert_eq!(log.lock().iter().filter(|c| c.starts_with("initialize")).count(), 1);
}

#[tokio::test]
async fn test_mid_game_joiner_is_admitted_to_game() {
    let (handle, log) = spawn_room();
    let (a, mut rx_a) = join(&handle, uid(1), "alice").await;
    for _ in 0..3 {
        recv(&mut rx_a).await;
    }
    handle
        .request(Arc::clone(&a), room_frame(room_op::BOOT_GAME, b"mock"))
        .await
        .unwrap();
    assert_set_game(&recv(&mut rx_a).await, "mock");

    let (_b, mut rx_b) = join(&handle, uid(2), "bob").await;
    let init = recv(&mut rx_b).await;
    // init carries the running game's id (room name "R" occupies byte 23).
    assert_eq!(init[24] as usize, "mock".len());
    assert_eq!(&init[25..29], b"mock");

    assert!(log
        .lock()
        .iter()
        .any(|c| *c == format!("admit:{}", uid(2))));
}

// =========================================================================
// Backpressure
// =========================================================================

#[tokio::test]
async fn test_unresponsive_member_is_evicted_mid_broadcast() {
    let (handle, _) = spawn_room();
    let (a, rx_a) = join(&handle, uid(1), "alice").await;

    // Keep alice healthy by draining her queue into an unbounded side
    // channel we can inspect afterwards.
    let (tx, mut drained) = mpsc::unbounded_channel();
    let mut rx_a = rx_a;
    tokio::spawn(async move {
        while let Some(frame) = rx_a.recv().await {
            let _ = tx.send(frame);
        }
    });

    // Bob joins and then never reads a single frame.
    let (_b, _rx_b) = join(&handle, uid(2), "bob").await;

    // Flood with chat until bob's queue overflows and he is evicted.
    for i in 0..120u32 {
        handle
            .request(Arc::clone(&a), chat(&format!("spam {i}")))
            .await
            .unwrap();
    }

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(1), drained.recv())
            .await
            .expect("no eviction observed")
            .expect("alice should stay connected");
        if frame[1] == room_state::DELETE_MEMBERS && frame[0] == SCOPE_ROOM {
            assert_eq!(&frame[2..18], uid(2).as_bytes());
            break;
        }
        assert!(tokio::time::Instant::now() < deadline);
    }
}
