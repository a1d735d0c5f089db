//! Agents and the actions they choose each day

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// An action in the survival game
///
/// Indices follow the environment's discrete action space:
/// 0 = attack, 1 = forage, 2 = none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Competitive action. Only pays off against a foraging opponent.
    Attack,
    /// Cooperative action. Success depends on the weather and the opponent.
    Forage,
    /// Placeholder recorded before the first round. Never selectable.
    #[default]
    None,
}

impl Action {
    /// Size of the discrete action space.
    pub const COUNT: usize = 3;

    /// Action mask handed to agents: `none` is always masked out.
    pub const MASK: [u8; Self::COUNT] = [1, 1, 0];

    /// Index of this action in the discrete action space.
    pub fn index(self) -> u8 {
        match self {
            Action::Attack => 0,
            Action::Forage => 1,
            Action::None => 2,
        }
    }

    /// Decode an action index, failing fast on anything outside {0, 1, 2}.
    pub fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Action::Attack),
            1 => Ok(Action::Forage),
            2 => Ok(Action::None),
            other => Err(GameError::InvalidActionIndex(other)),
        }
    }

    /// Whether an agent may choose this action.
    pub fn is_selectable(self) -> bool {
        Self::MASK[self.index() as usize] == 1
    }
}

impl TryFrom<u8> for Action {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self> {
        Action::from_index(index)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Attack => "attack",
            Action::Forage => "forage",
            Action::None => "none",
        };
        f.write_str(name)
    }
}

/// Identity of one of the two agents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentId {
    Player1,
    Player2,
}

impl AgentId {
    /// Both agents, in resolution order.
    pub const ALL: [AgentId; 2] = [AgentId::Player1, AgentId::Player2];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentId::Player1 => "player1",
            AgentId::Player2 => "player2",
        }
    }

}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for action in [Action::Attack, Action::Forage, Action::None] {
            assert_eq!(Action::from_index(action.index()).unwrap(), action);
        }
    }

    #[test]
    fn test_invalid_index_fails_fast() {
        for index in [3u8, 7, 255] {
            let err = Action::try_from(index).unwrap_err();
            assert!(matches!(err, GameError::InvalidActionIndex(i) if i == index));
        }
    }

    #[test]
    fn test_none_is_masked() {
        assert!(Action::Attack.is_selectable());
        assert!(Action::Forage.is_selectable());
        assert!(!Action::None.is_selectable());
        assert_eq!(Action::default(), Action::None);
    }

    #[test]
    fn test_agent_names() {
        assert_eq!(AgentId::Player1.to_string(), "player1");
        assert_eq!(serde_json::to_string(&AgentId::Player2).unwrap(), "\"player2\"");
        assert_eq!(serde_json::to_string(&Action::Forage).unwrap(), "\"forage\"");
    }
}
