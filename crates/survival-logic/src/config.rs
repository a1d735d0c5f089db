//! Game constants and their validation

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::regime::Variant;

/// Constants governing one environment
///
/// Life points live in `[0, max_life_points - 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Payoff for a successful forage or attack.
    pub gain: i32,
    /// Payoff for a failed or passive event. Must be negative.
    pub cost: i32,
    /// Payoff credited to a dead agent.
    pub gain_dead: i32,
    /// Days per episode; the episode truncates when they run out.
    pub num_days: u32,
    /// Exclusive upper bound on life points.
    pub max_life_points: i32,
    /// Which valid regime an episode plays under.
    pub regime_index: usize,
    /// Payoff-table variant.
    pub variant: Variant,
}

impl GameConfig {
    /// Two days, four life points, second valid regime
    pub fn standard() -> Self {
        Self {
            gain: 1,
            cost: -1,
            gain_dead: 0,
            num_days: 2,
            max_life_points: 4,
            regime_index: 1,
            variant: Variant::CertainAttack,
        }
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Parse a JSON config; absent fields keep their standard values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Highest life-point value an agent can hold.
    pub fn life_ceiling(&self) -> i32 {
        self.max_life_points - 1
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_days == 0 {
            return Err(GameError::InvalidConfig("num_days must be at least 1".into()));
        }
        if self.max_life_points < 2 {
            return Err(GameError::InvalidConfig(format!(
                "max_life_points must be at least 2, got {}",
                self.max_life_points
            )));
        }
        if self.gain <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "gain must be positive, got {}",
                self.gain
            )));
        }
        if self.cost >= 0 {
            return Err(GameError::InvalidConfig(format!(
                "cost must be negative, got {}",
                self.cost
            )));
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::standard()
    }
}
