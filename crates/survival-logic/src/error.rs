//! Error types for configuration and usage failures
//!
//! Configuration errors surface when an environment is constructed and are
//! never retried. Usage errors come from driving an environment incorrectly
//! (bad action index, stepping a finished episode).

use thiserror::Error;

use crate::action::AgentId;

/// Errors produced by the survival game engine
#[derive(Debug, Error)]
pub enum GameError {
    /// A configuration constant is out of its permitted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No candidate regime satisfies T > R > P > S and 2R > T + S.
    #[error("no candidate regime forms a social dilemma for gain={gain}, cost={cost}")]
    NoValidRegimes { gain: i32, cost: i32 },

    /// The configured regime index does not exist after filtering.
    #[error("regime index {index} out of range: only {available} valid regimes")]
    RegimeIndexOutOfRange { index: usize, available: usize },

    /// A JSON configuration could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// An action index outside {0, 1, 2}.
    #[error("invalid action index {0}: expected 0 (attack), 1 (forage) or 2 (none)")]
    InvalidActionIndex(u8),

    /// The placeholder action was chosen; it is masked out of the action space.
    #[error("{agent} chose the masked action `none`")]
    MaskedAction { agent: AgentId },

    /// The action map did not contain an entry for an active agent.
    #[error("no action supplied for {agent}")]
    MissingAction { agent: AgentId },

    /// The day counter already reached zero.
    #[error("episode already truncated; reset before stepping again")]
    EpisodeFinished,

    /// A round was requested before the first reset.
    #[error("environment stepped before reset")]
    NotReset,
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_agent() {
        let err = GameError::MaskedAction { agent: AgentId::Player2 };
        assert_eq!(err.to_string(), "player2 chose the masked action `none`");

        let err = GameError::MissingAction { agent: AgentId::Player1 };
        assert_eq!(err.to_string(), "no action supplied for player1");
    }

    #[test]
    fn test_json_errors_convert() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: GameError = parse.unwrap_err().into();
        assert!(matches!(err, GameError::ConfigParse(_)));
    }

    #[test]
    fn test_regime_index_message() {
        let err = GameError::RegimeIndexOutOfRange { index: 1, available: 1 };
        assert_eq!(err.to_string(), "regime index 1 out of range: only 1 valid regimes");
    }
}
