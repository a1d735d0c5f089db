//! Mutable per-episode state

use serde::{Deserialize, Serialize};

use crate::action::{Action, AgentId};
use crate::regime::Regime;

/// Everything that changes while an episode runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeState {
    pub days_left: u32,
    pub player1_life_points: i32,
    pub player2_life_points: i32,
    pub player1_action: Action,
    pub player2_action: Action,
    pub regime: Regime,
}

impl EpisodeState {
    /// Fresh state: full day horizon, placeholder actions.
    pub fn new(
        num_days: u32,
        player1_life_points: i32,
        player2_life_points: i32,
        regime: Regime,
    ) -> Self {
        Self {
            days_left: num_days,
            player1_life_points,
            player2_life_points,
            player1_action: Action::None,
            player2_action: Action::None,
            regime,
        }
    }

    pub fn life_points(&self, agent: AgentId) -> i32 {
        match agent {
            AgentId::Player1 => self.player1_life_points,
            AgentId::Player2 => self.player2_life_points,
        }
    }

    pub fn action(&self, agent: AgentId) -> Action {
        match agent {
            AgentId::Player1 => self.player1_action,
            AgentId::Player2 => self.player2_action,
        }
    }

    pub fn is_alive(&self, agent: AgentId) -> bool {
        self.life_points(agent) != 0
    }

    /// The day horizon is exhausted.
    pub fn is_over(&self) -> bool {
        self.days_left == 0
    }

    /// -1 for an agent with no life points left, else 0
    pub fn liveness_penalty(&self, agent: AgentId) -> f32 {
        if self.is_alive(agent) {
            0.0
        } else {
            -1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::regime::regime_for;

    fn state(life1: i32, life2: i32) -> EpisodeState {
        let regime = regime_for(&GameConfig::standard()).unwrap();
        EpisodeState::new(2, life1, life2, regime)
    }

    #[test]
    fn test_new_state_uses_placeholders() {
        let s = state(3, 1);
        assert_eq!(s.days_left, 2);
        assert_eq!(s.action(AgentId::Player1), Action::None);
        assert_eq!(s.action(AgentId::Player2), Action::None);
        assert!(!s.is_over());
    }

    #[test]
    fn test_liveness_penalty() {
        let s = state(0, 2);
        assert_eq!(s.liveness_penalty(AgentId::Player1), -1.0);
        assert_eq!(s.liveness_penalty(AgentId::Player2), 0.0);
        assert!(!s.is_alive(AgentId::Player1));
        assert_eq!(s.life_points(AgentId::Player2), 2);
    }
}
