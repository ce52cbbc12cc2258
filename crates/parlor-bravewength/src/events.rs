//! The append-only game log.
//!
//! Every state change worth narrating lands in the log as one flat struct;
//! fields that don't apply to a given kind are just left empty. Clients
//! can discriminate on `kind` and ignore the rest.

use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::{CardType, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventKind {
    GameStarted = 0,
    GameEnded = 1,
    ClueGiven = 2,
    CardRevealed = 3,
    TurnEnded = 4,
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

#[derive(Clone, Serialize)]
pub struct GameEvent {
    /// Client id of the player that caused the event.
    pub src: Uuid,
    /// That player's role at the time.
    pub role: Role,
    pub kind: EventKind,
    pub clue: String,
    pub word: String,
    pub card_type: CardType,
}

impl GameEvent {
    pub(crate) fn new(src: Uuid, role: Role, kind: EventKind) -> GameEvent {
        GameEvent {
            src,
            role,
            kind,
            clue: String::new(),
            word: String::new(),
            card_type: CardType::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_flat() {
        let mut event = GameEvent::new(Uuid::nil(), Role::TealKnower, EventKind::ClueGiven);
        event.clue = "ocean".into();

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["src"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(value["role"], 4);
        assert_eq!(value["kind"], 2);
        assert_eq!(value["clue"], "ocean");
        assert_eq!(value["word"], "");
        assert_eq!(value["card_type"], 0);
    }
}
