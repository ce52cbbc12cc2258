//! Fixed-capacity chat scrollback.

use uuid::Uuid;

/// Number of chat lines retained per room.
pub const CHAT_SCROLLBACK: usize = 50;

/// Longest accepted chat line in bytes. Must stay below 256 because the wire
/// format spends a single byte on the line length.
pub const CHAT_LINE_MAX: usize = 100;

#[derive(Clone, Copy)]
struct Line {
    sender: [u8; 16],
    len: u8,
    text: [u8; CHAT_LINE_MAX],
}

const EMPTY_LINE: Line = Line {
    sender: [0; 16],
    len: 0,
    text: [0; CHAT_LINE_MAX],
};

/// Circular store of the most recent [`CHAT_SCROLLBACK`] chat lines.
///
/// `total` counts every line ever accepted, not just the retained ones, so
/// clients can tell how much history scrolled away before they joined. It is
/// a u16 and simply wraps; a room would need tens of thousands of messages
/// for that to be observable.
pub struct ChatBuffer {
    lines: [Line; CHAT_SCROLLBACK],
    total: u16,
}

impl ChatBuffer {
    pub fn new() -> Self {
        Self {
            lines: [EMPTY_LINE; CHAT_SCROLLBACK],
            total: 0,
        }
    }

    /// Total number of lines ever accepted (wrapping).
    pub fn total_sent(&self) -> u16 {
        self.total
    }

    /// Accepts a chat line, overwriting the oldest retained one if the
    /// buffer is full. Returns false (leaving the buffer untouched) if the
    /// line is empty or longer than [`CHAT_LINE_MAX`].
    pub fn append(&mut self, sender: Uuid, msg: &[u8]) -> bool {
        if msg.is_empty() || msg.len() > CHAT_LINE_MAX {
            return false;
        }

        let line = &mut self.lines[self.total as usize % CHAT_SCROLLBACK];
        line.sender = *sender.as_bytes();
        line.len = msg.len() as u8;
        line.text[..msg.len()].copy_from_slice(msg);
        self.total = self.total.wrapping_add(1);

        true
    }

    fn retained(&self) -> usize {
        (self.total as usize).min(CHAT_SCROLLBACK)
    }

    /// Size in bytes of the encoded history, so the encoder can allocate
    /// exactly once: 2 bytes of counter, then 16-byte sender id + 1-byte
    /// length + contents per retained line.
    pub fn encoded_len(&self) -> usize {
        let mut len = 2 + self.retained() * (16 + 1);
        for line in &self.lines[..self.retained()] {
            len += line.len as usize;
        }
        len
    }

    /// Appends the counter followed by the retained lines in chronological
    /// order. When the buffer has wrapped, the oldest line sits right after
    /// the most recently written slot.
    pub fn append_history(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(&self.total.to_be_bytes());

        let retained = self.retained();
        let start = if retained < CHAT_SCROLLBACK {
            0
        } else {
            self.total as usize % CHAT_SCROLLBACK
        };

        for i in 0..retained {
            let line = &self.lines[(start + i) % CHAT_SCROLLBACK];
            dst.extend_from_slice(&line.sender);
            dst.push(line.len);
            dst.extend_from_slice(&line.text[..line.len as usize]);
        }
    }
}

impl Default for ChatBuffer {
    fn default() -> Self {
        Self::new()
    }
}
