//! A member is one transport connection's presence inside a room.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Bound on each member's outbound queue. A peer that lets this many frames
/// pile up is not keeping up with the game and gets disconnected.
pub const SEND_QUEUE_CAPACITY: usize = 100;

pub(crate) enum Enqueue {
    Sent,
    Full,
    Closed,
}

/// One connected client: a stable id, a display name, and a bounded queue
/// of outbound frames drained by the connection's writer task.
///
/// The room loop is the only code that mutates a member (rename, queue
/// closure), but members are shared with the connection tasks through an
/// `Arc`, so those fields sit behind cheap locks. Identity inside the loop
/// is pointer identity — two connections from the same client are distinct
/// members even though they share a client id.
pub struct Member {
    id: Uuid,
    name: RwLock<String>,
    queue: Mutex<Option<mpsc::Sender<Vec<u8>>>>,
}

impl Member {
    /// Creates a member and the receiving half of its send queue. The
    /// receiver belongs to the connection's writer task; it yields `None`
    /// once the room closes the queue.
    pub fn new(id: Uuid, name: String) -> (Arc<Member>, mpsc::Receiver<Vec<u8>>) {
        let (tx, rx) = mpsc::channel(SEND_QUEUE_CAPACITY);
        let member = Arc::new(Member {
            id,
            name: RwLock::new(name),
            queue: Mutex::new(Some(tx)),
        });
        (member, rx)
    }

    /// The client id presented at join time. Stable across reconnects.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The current display name.
    pub fn name(&self) -> String {
        self.name.read().clone()
    }

    pub(crate) fn set_name(&self, name: String) {
        *self.name.write() = name;
    }

    /// Queues a frame for delivery without blocking. If the queue is full
    /// the peer is presumed unresponsive and the queue is closed on the
    /// spot; the room loop notices the closure and finishes the eviction.
    ///
    /// Only safe to call from the owning room's loop (games call it from
    /// inside their hooks, which run on that loop).
    pub fn send(&self, frame: Vec<u8>) {
        if let Enqueue::Full = self.enqueue(frame) {
            self.close_queue();
        }
    }

    pub(crate) fn enqueue(&self, frame: Vec<u8>) -> Enqueue {
        match self.queue.lock().as_ref() {
            None => Enqueue::Closed,
            Some(tx) => match tx.try_send(frame) {
                Ok(()) => Enqueue::Sent,
                Err(mpsc::error::TrySendError::Full(_)) => Enqueue::Full,
                Err(mpsc::error::TrySendError::Closed(_)) => Enqueue::Closed,
            },
        }
    }

    /// Drops the sending half of the queue, which the writer task observes
    /// as end-of-stream. Idempotent: the queue closes exactly once, and a
    /// closed queue is never written again.
    pub(crate) fn close_queue(&self) {
        drop(self.queue.lock().take());
    }

    pub(crate) fn queue_closed(&self) -> bool {
        self.queue.lock().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member() -> (Arc<Member>, mpsc::Receiver<Vec<u8>>) {
        Member::new(Uuid::new_v4(), "tester".into())
    }

    #[test]
    fn test_send_delivers_in_order() {
        let (m, mut rx) = member();
        m.send(vec![1]);
        m.send(vec![2]);
        assert_eq!(rx.try_recv().unwrap(), vec![1]);
        assert_eq!(rx.try_recv().unwrap(), vec![2]);
    }

    #[test]
    fn test_full_queue_closes_exactly_once() {
        let (m, mut rx) = member();
        for i in 0..SEND_QUEUE_CAPACITY {
            m.send(vec![i as u8]);
        }
        assert!(!m.queue_closed());

        // One frame over the bound: the member is written off.
        m.send(vec![0xFF]);
        assert!(m.queue_closed());

        // Everything queued before the overflow is still deliverable, and
        // the stream then ends.
        for _ in 0..SEND_QUEUE_CAPACITY {
            assert!(rx.try_recv().is_ok());
        }
        assert!(rx.try_recv().is_err());
        assert!(rx.blocking_recv().is_none());
    }

    #[test]
    fn test_send_after_close_is_a_no_op() {
        let (m, mut rx) = member();
        m.close_queue();
        m.send(vec![9]);
        assert!(rx.blocking_recv().is_none());
    }

    #[test]
    fn test_rename() {
        let (m, _rx) = member();
        assert_eq!(m.name(), "tester");
        m.set_name("renamed".into());
        assert_eq!(m.name(), "renamed");
    }
}
