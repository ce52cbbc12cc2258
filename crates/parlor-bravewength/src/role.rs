//! Player roles and teams.

use serde::{Serialize, Serializer};

/// Role of a player in the room. Everyone starts (and can return to)
/// spectator; the other four roles are the two seats on each team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Role {
    Spectator = 0,
    PurpleSeeker = 1,
    PurpleKnower = 2,
    TealSeeker = 3,
    TealKnower = 4,
}

impl Role {
    pub fn from_byte(b: u8) -> Option<Role> {
        match b {
            0 => Some(Role::Spectator),
            1 => Some(Role::PurpleSeeker),
            2 => Some(Role::PurpleKnower),
            3 => Some(Role::TealSeeker),
            4 => Some(Role::TealKnower),
            _ => None,
        }
    }

    pub fn is_seeker(self) -> bool {
        matches!(self, Role::PurpleSeeker | Role::TealSeeker)
    }

    /// Knowers see the full card layout and are therefore locked out of
    /// non-knower roles while a game is running.
    pub fn is_knower(self) -> bool {
        matches!(self, Role::PurpleKnower | Role::TealKnower)
    }

    pub fn team(self) -> Team {
        match self {
            Role::Spectator => Team::None,
            Role::PurpleSeeker | Role::PurpleKnower => Team::Purple,
            Role::TealSeeker | Role::TealKnower => Team::Teal,
        }
    }

    /// The role whose turn comes after this one. Play cycles
    /// teal knower → teal seeker → purple knower → purple seeker → repeat.
    pub fn next_turn(self) -> Role {
        match self {
            Role::TealKnower => Role::TealSeeker,
            Role::TealSeeker => Role::PurpleKnower,
            Role::PurpleKnower => Role::PurpleSeeker,
            _ => Role::TealKnower,
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}

/// A winning side; `None` covers games nobody won (cancelled or ongoing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Team {
    None = 0,
    Teal = 1,
    Purple = 2,
}

impl Serialize for Team {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(*self as u8)
    }
}
