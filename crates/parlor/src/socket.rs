//! Per-connection reader and writer tasks.
//!
//! Each member session owns exactly two tasks. The *reader* copies
//! inbound frames into the room's request channel, tagged with the member
//! they came from; it never touches room state. The *writer* drains the
//! member's bounded send queue onto the socket and keeps the connection
//! alive with periodic pings. Room-side queue closure is the writer's
//! signal to say a proper goodbye and hang up.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::time::timeout;

use parlor_room::{Member, RoomHandle};

/// Largest inbound frame accepted; enough for a paragraph of chat in a
/// language with wide UTF-8 encodings.
pub(crate) const MAX_FRAME_SIZE: usize = 512;

/// How often the writer pings the peer. Must be shorter than
/// [`PONG_WAIT`] so a healthy peer always answers in time.
const PING_INTERVAL: Duration = Duration::from_secs(50);

/// How long the reader tolerates silence before declaring the peer dead.
const PONG_WAIT: Duration = Duration::from_secs(60);

/// How long any single socket write may take.
const WRITE_WAIT: Duration = Duration::from_secs(10);

/// Runs a member session to completion: spawns the writer, drives the
/// reader, and unregisters from the room when the connection dies.
pub(crate) async fn run_session(
    socket: WebSocket,
    member: Arc<Member>,
    queue: mpsc::Receiver<Vec<u8>>,
    room: RoomHandle,
) {
    let (sink, stream) = socket.split();
    let writer = tokio::spawn(write_pump(sink, queue));

    read_pump(stream, &member, &room).await;

    if room.unregister(Arc::clone(&member)).await.is_err() {
        // The room is already gone, so nothing will ever close our send
        // queue; cut the writer loose instead of waiting for it.
        writer.abort();
    }
    let _ = writer.await;

    tracing::debug!(client_id = %member.id(), "session ended");
}

/// Copies inbound frames into the room until the peer closes, errors, or
/// goes silent past the pong deadline.
async fn read_pump(mut stream: SplitStream<WebSocket>, member: &Arc<Member>, room: &RoomHandle) {
    loop {
        let message = match timeout(PONG_WAIT, stream.next()).await {
            Ok(Some(Ok(message))) => message,
            // Closed, errored, or dead air past the deadline.
            _ => return,
        };

        let frame = match message {
            Message::Binary(data) => data.to_vec(),
            Message::Text(text) => text.as_bytes().to_vec(),
            Message::Pong(stamp) => {
                // Our pings carry a send timestamp, so the echo gives a
                // round-trip estimate for free.
                if let Ok(sent) = <[u8; 8]>::try_from(stamp.as_ref()) {
                    let rtt = unix_millis().saturating_sub(u64::from_be_bytes(sent));
                    tracing::trace!(client_id = %member.id(), rtt_ms = rtt, "pong");
                }
                continue;
            }
            // The websocket layer answers pings on its own.
            Message::Ping(_) => continue,
            Message::Close(_) => return,
        };

        if room.request(Arc::clone(member), frame).await.is_err() {
            return;
        }
    }
}

/// Drains the send queue onto the socket, pinging on an interval. Exits
/// on queue closure (after a graceful close frame) or any write failure.
async fn write_pump(mut sink: SplitSink<WebSocket, Message>, mut queue: mpsc::Receiver<Vec<u8>>) {
    let mut ping = tokio::time::interval(PING_INTERVAL);
    ping.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick fires immediately; swallow it.
    ping.tick().await;

    loop {
        tokio::select! {
            frame = queue.recv() => match frame {
                Some(frame) => {
                    if send(&mut sink, Message::Binary(frame.into())).await.is_err() {
                        return;
                    }
                }
                None => {
                    // The room closed the queue. Without this the peer
                    // would see the connection just die instead of a
                    // normal closure.
                    let _ = send(&mut sink, Message::Close(None)).await;
                    return;
                }
            },
            _ = ping.tick() => {
                let stamp = unix_millis().to_be_bytes();
                if send(&mut sink, Message::Ping(stamp.to_vec().into())).await.is_err() {
                    return;
                }
            }
        }
    }
}

async fn send(sink: &mut SplitSink<WebSocket, Message>, message: Message) -> Result<(), ()> {
    match timeout(WRITE_WAIT, sink.send(message)).await {
        Ok(Ok(())) => Ok(()),
        _ => Err(()),
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
