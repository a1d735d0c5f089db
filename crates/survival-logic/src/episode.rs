//! Scripted strategies and full-episode replay

use serde::{Deserialize, Serialize};

use crate::action::{Action, AgentId};
use crate::config::GameConfig;
use crate::env::{AgentMap, SurvivalEnv};
use crate::error::Result;
use crate::random::EpisodeRng;
use crate::regime::{Regime, Variant};

/// Baseline behaviour for one agent
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Forage every day.
    AlwaysForage,
    /// Attack every day.
    AlwaysAttack,
    /// Forage with `forage_bias` percent probability, else attack.
    Random { forage_bias: u8 },
    /// Forage first, then repeat the opponent's previous action.
    TitForTat,
}

impl Strategy {
    /// Choose today's action
    ///
    /// # Arguments
    /// * `opponent_last` - Opponent's action yesterday, `None` on the first day
    /// * `rng` - The agent's own random stream
    pub fn choose(&self, opponent_last: Action, rng: &mut EpisodeRng) -> Action {
        match self {
            Strategy::AlwaysForage => Action::Forage,
            Strategy::AlwaysAttack => Action::Attack,
            Strategy::Random { forage_bias } => {
                if rng.next_percent() < *forage_bias {
                    Action::Forage
                } else {
                    Action::Attack
                }
            }
            Strategy::TitForTat => match opponent_last {
                Action::None => Action::Forage,
                other => other,
            },
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::TitForTat
    }
}

/// A single replayed day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub day: u32,
    pub action_a: Action,
    pub action_b: Action,
    pub success_a: bool,
    pub success_b: bool,
    pub payoff_a: i32,
    pub payoff_b: i32,
    pub life_a: i32,
    pub life_b: i32,
    pub reward_a: f32,
    pub reward_b: f32,
    pub truncated: bool,
}

/// A complete replayed episode
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    pub variant: Variant,
    pub regime: Regime,
    pub initial_life_a: i32,
    pub initial_life_b: i32,
    pub rounds: Vec<RoundRecord>,
    pub final_life_a: i32,
    pub final_life_b: i32,
    pub total_reward_a: f32,
    pub total_reward_b: f32,
}

/// Play a whole episode between two scripted strategies
///
/// # Arguments
/// * `config` - Game constants and payoff variant
/// * `strategy_a` - Behaviour of player1
/// * `strategy_b` - Behaviour of player2
/// * `seed` - 32-byte randomness seed
/// * `episode_index` - Index of this episode under `seed`
///
/// Strategies draw from their own streams, so a random strategy never
/// shifts the environment's outcome draws.
pub fn run_episode(
    config: &GameConfig,
    strategy_a: &Strategy,
    strategy_b: &Strategy,
    seed: &[u8; 32],
    episode_index: u32,
) -> Result<EpisodeResult> {
    let env_rng = EpisodeRng::new(seed, episode_index);
    let mut rng_a = env_rng.for_agent(AgentId::Player1);
    let mut rng_b = env_rng.for_agent(AgentId::Player2);

    let mut env = SurvivalEnv::new(config.clone(), env_rng)?;
    let initial = env.begin_episode();
    let start = initial[&AgentId::Player1].values;

    let mut rounds = Vec::with_capacity(config.num_days as usize);
    let (mut last_a, mut last_b) = (Action::None, Action::None);
    let (mut total_a, mut total_b) = (0.0f32, 0.0f32);

    for day in 0..config.num_days {
        let action_a = strategy_a.choose(last_b, &mut rng_a);
        let action_b = strategy_b.choose(last_a, &mut rng_b);

        let actions: AgentMap<Action> =
            [(AgentId::Player1, action_a), (AgentId::Player2, action_b)].into();
        let step = env.play_round(&actions)?;
        let reward_a = step.rewards.get(&AgentId::Player1).copied().unwrap_or(0.0);
        let reward_b = step.rewards.get(&AgentId::Player2).copied().unwrap_or(0.0);
        total_a += reward_a;
        total_b += reward_b;

        if let Some(outcome) = env.last_outcome() {
            rounds.push(RoundRecord {
                day,
                action_a,
                action_b,
                success_a: outcome.success.0,
                success_b: outcome.success.1,
                payoff_a: outcome.payoffs.0,
                payoff_b: outcome.payoffs.1,
                life_a: outcome.life_points.0,
                life_b: outcome.life_points.1,
                reward_a,
                reward_b,
                truncated: outcome.truncated,
            });
        }

        last_a = action_a;
        last_b = action_b;
    }

    let (final_life_a, final_life_b) = rounds
        .last()
        .map(|r| (r.life_a, r.life_b))
        .unwrap_or((start[1], start[2]));

    Ok(EpisodeResult {
        variant: config.variant,
        regime: *env.regime(),
        initial_life_a: start[1],
        initial_life_b: start[2],
        rounds,
        final_life_a,
        final_life_b,
        total_reward_a: total_a,
        total_reward_b: total_b,
    })
}
