//! Functional roles a participant prefers to play.

use std::fmt;
use std::str::FromStr;

use crate::error::TeamForgeError;

/// One of the five closed role variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Strategist,
    Attacker,
    Defender,
    Supporter,
    Coordinator,
}

impl Role {
    /// All roles in declaration order.
    pub const ALL: [Role; 5] = [
        Role::Strategist,
        Role::Attacker,
        Role::Defender,
        Role::Supporter,
        Role::Coordinator,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Strategist => "Strategist",
            Role::Attacker => "Attacker",
            Role::Defender => "Defender",
            Role::Supporter => "Supporter",
            Role::Coordinator => "Coordinator",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::Strategist => "Focuses on tactics and planning",
            Role::Attacker => "Frontline player with offensive tactics",
            Role::Defender => "Protects and supports team stability",
            Role::Supporter => "Jack-of-all-trades, adapts roles",
            Role::Coordinator => "Communication lead, keeps team organized",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Role {
    type Err = TeamForgeError;

    /// Parses a role case-insensitively from its name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.display_name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TeamForgeError::InvalidParticipant(format!("unknown role: {s}")))
    }
}
