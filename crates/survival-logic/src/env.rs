//! Parallel multi-agent environment surface
//!
//! `ParallelEnv` is the minimal reset/step/space contract a training
//! framework drives. `SurvivalEnv` implements it on top of the regime
//! selector and round resolver, with no dependency on any framework.

use std::collections::BTreeMap;

use log::info;
use rand::{Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::action::{Action, AgentId};
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::random::EpisodeRng;
use crate::regime::{regime_for, Regime};
use crate::resolver::{resolve_round, RoundOutcome};
use crate::state::EpisodeState;

/// Per-agent values, ordered by agent
pub type AgentMap<T> = BTreeMap<AgentId, T>;

/// Auxiliary step information; always empty for this environment
pub type Info = BTreeMap<String, String>;

/// Shape of an action or observation space
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpaceInfo {
    /// `n` discrete choices.
    Discrete(usize),
    /// Bounded numeric box.
    Box { low: f32, high: f32, shape: Vec<usize> },
}

/// What each agent sees after reset or a step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// `[days_left, player1 life, player2 life, player1 action, player2 action]`
    pub values: [i32; 5],
    pub action_mask: [u8; Action::COUNT],
}

impl Observation {
    pub const LEN: usize = 5;

    fn from_state(state: &EpisodeState) -> Self {
        Self {
            values: [
                i32::try_from(state.days_left).unwrap_or(i32::MAX),
                state.life_points(AgentId::Player1),
                state.life_points(AgentId::Player2),
                i32::from(state.action(AgentId::Player1).index()),
                i32::from(state.action(AgentId::Player2).index()),
            ],
            action_mask: Action::MASK,
        }
    }
}

/// Result of stepping every active agent once
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepResult<O> {
    pub observations: AgentMap<O>,
    pub rewards: AgentMap<f32>,
    pub terminations: AgentMap<bool>,
    pub truncations: AgentMap<bool>,
    pub infos: AgentMap<Info>,
}

impl<O> StepResult<O> {
    /// Every agent is terminated or truncated.
    pub fn all_done(&self) -> bool {
        self.terminations.iter().all(|(agent, terminated)| {
            *terminated || self.truncations.get(agent).copied().unwrap_or(false)
        })
    }
}

/// Minimal parallel multi-agent environment contract
pub trait ParallelEnv {
    type Observation;
    type Action;

    /// Every agent that can ever take part.
    fn possible_agents(&self) -> &[AgentId];

    /// Agents still acting in the current episode.
    fn agents(&self) -> &[AgentId];

    /// Start a new episode, optionally reseeding the random source.
    fn reset(&mut self, seed: Option<u64>) -> Result<AgentMap<Self::Observation>>;

    /// Advance one round with one action per active agent.
    fn step(&mut self, actions: &AgentMap<Self::Action>) -> Result<StepResult<Self::Observation>>;

    fn observation_space(&self, agent: AgentId) -> SpaceInfo;

    fn action_space(&self, agent: AgentId) -> SpaceInfo;
}

/// The two-agent survival game
pub struct SurvivalEnv<R = EpisodeRng> {
    config: GameConfig,
    regime: Regime,
    rng: R,
    state: Option<EpisodeState>,
    agents: Vec<AgentId>,
    last_outcome: Option<RoundOutcome>,
}

impl<R: RngCore> SurvivalEnv<R> {
    /// Validate the configuration and fix the episode regime
    ///
    /// Configuration errors (bad constants, no valid regime, regime index
    /// out of range) surface here rather than mid-episode.
    pub fn new(config: GameConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let regime = regime_for(&config)?;
        Ok(Self {
            config,
            regime,
            rng,
            state: None,
            agents: Vec::new(),
            last_outcome: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn regime(&self) -> &Regime {
        &self.regime
    }

    pub fn state(&self) -> Option<&EpisodeState> {
        self.state.as_ref()
    }

    /// Agents still acting; empty before the first reset and after truncation.
    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    /// Outcome of the most recent round, if one has been played this episode.
    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    /// Start an episode with life points drawn from [1, max_life_points - 1]
    pub fn begin_episode(&mut self) -> AgentMap<Observation> {
        let player1 = self.rng.gen_range(1..self.config.max_life_points);
        let player2 = self.rng.gen_range(1..self.config.max_life_points);
        self.install(player1, player2)
    }

    /// Start an episode with explicit life points
    pub fn begin_episode_with(
        &mut self,
        player1: i32,
        player2: i32,
    ) -> Result<AgentMap<Observation>> {
        let ceiling = self.config.life_ceiling();
        for (agent, life) in AgentId::ALL.into_iter().zip([player1, player2]) {
            if !(0..=ceiling).contains(&life) {
                return Err(GameError::InvalidConfig(format!(
                    "{agent} life points {life} outside [0, {ceiling}]"
                )));
            }
        }
        Ok(self.install(player1, player2))
    }

    fn install(&mut self, player1: i32, player2: i32) -> AgentMap<Observation> {
        let state = EpisodeState::new(self.config.num_days, player1, player2, self.regime);
        info!(
            "episode start: days={} life=({}, {}) regime pS={:.2} pR={:.2} pT={:.2} variant={:?}",
            state.days_left,
            player1,
            player2,
            self.regime.p_s,
            self.regime.p_r,
            self.regime.p_t,
            self.config.variant,
        );
        self.agents = AgentId::ALL.to_vec();
        self.last_outcome = None;
        self.state = Some(state);
        self.observations()
    }

    /// Resolve one round
    ///
    /// Mid-episode rounds return zero rewards. The round that exhausts the
    /// day horizon returns the liveness penalty and truncates every agent.
    pub fn play_round(&mut self, actions: &AgentMap<Action>) -> Result<StepResult<Observation>> {
        let state = self.state.as_mut().ok_or(GameError::NotReset)?;
        if state.is_over() {
            return Err(GameError::EpisodeFinished);
        }

        let mut chosen = [Action::None; 2];
        for (slot, agent) in chosen.iter_mut().zip(AgentId::ALL) {
            *slot = *actions.get(&agent).ok_or(GameError::MissingAction { agent })?;
        }

        let outcome = resolve_round(state, &self.config, chosen[0], chosen[1], &mut self.rng)?;

        let acting = std::mem::take(&mut self.agents);
        let truncated = outcome.truncated;
        let rewards = acting
            .iter()
            .map(|&agent| {
                let reward = if truncated { state.liveness_penalty(agent) } else { 0.0 };
                (agent, reward)
            })
            .collect();
        let terminations = acting.iter().map(|&agent| (agent, false)).collect();
        let truncations = acting.iter().map(|&agent| (agent, truncated)).collect();
        let infos = acting.iter().map(|&agent| (agent, Info::new())).collect();

        if truncated {
            info!(
                "episode truncated: final life=({}, {})",
                state.player1_life_points, state.player2_life_points
            );
        } else {
            self.agents = acting;
        }
        self.last_outcome = Some(outcome);

        Ok(StepResult {
            observations: self.observations(),
            rewards,
            terminations,
            truncations,
            infos,
        })
    }

    fn observations(&self) -> AgentMap<Observation> {
        match &self.state {
            Some(state) => {
                let observation = Observation::from_state(state);
                AgentId::ALL.into_iter().map(|agent| (agent, observation.clone())).collect()
            }
            None => AgentMap::new(),
        }
    }

    fn observation_bound(&self) -> f32 {
        let days = i32::try_from(self.config.num_days).unwrap_or(i32::MAX);
        days.max(self.config.life_ceiling()).max(i32::from(Action::None.index())) as f32
    }
}

impl<R: RngCore + SeedableRng> ParallelEnv for SurvivalEnv<R> {
    type Observation = Observation;
    type Action = Action;

    fn possible_agents(&self) -> &[AgentId] {
        &AgentId::ALL
    }

    fn agents(&self) -> &[AgentId] {
        SurvivalEnv::agents(self)
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<AgentMap<Observation>> {
        if let Some(seed) = seed {
            self.rng = R::seed_from_u64(seed);
        }
        Ok(self.begin_episode())
    }

    fn step(&mut self, actions: &AgentMap<Action>) -> Result<StepResult<Observation>> {
        self.play_round(actions)
    }

    fn observation_space(&self, _agent: AgentId) -> SpaceInfo {
        SpaceInfo::Box {
            low: 0.0,
            high: self.observation_bound(),
            shape: vec![1, Observation::LEN],
        }
    }

    fn action_space(&self, _agent: AgentId) -> SpaceInfo {
        SpaceInfo::Discrete(Action::COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn both(action: Action) -> AgentMap<Action> {
        AgentId::ALL.into_iter().map(|agent| (agent, action)).collect()
    }

    fn seeded_env(config: GameConfig) -> SurvivalEnv {
        SurvivalEnv::new(config, EpisodeRng::new(&[42u8; 32], 0)).unwrap()
    }

    #[test]
    fn test_construction_surfaces_config_errors() {
        let config = GameConfig { gain: 5, ..GameConfig::standard() };
        let err = SurvivalEnv::new(config, StepRng::new(0, 0)).err().unwrap();
        assert!(matches!(err, GameError::NoValidRegimes { .. }));

        let config = GameConfig { regime_index: 3, ..GameConfig::standard() };
        let err = SurvivalEnv::new(config, StepRng::new(0, 0)).err().unwrap();
        assert!(matches!(err, GameError::RegimeIndexOutOfRange { index: 3, available: 3 }));
    }

    #[test]
    fn test_reset_observation() {
        let mut env = seeded_env(GameConfig::standard());
        let obs = env.reset(Some(7)).unwrap();
        assert_eq!(obs.len(), 2);
        let o = &obs[&AgentId::Player1];
        assert_eq!(o.values[0], 2);
        assert!((1..=3).contains(&o.values[1]));
        assert!((1..=3).contains(&o.values[2]));
        assert_eq!(&o.values[3..], &[2, 2]);
        assert_eq!(o.action_mask, [1, 1, 0]);
        assert_eq!(obs[&AgentId::Player1], obs[&AgentId::Player2]);
        assert_eq!(env.agents(), &AgentId::ALL);
    }

    #[test]
    fn test_reset_seed_is_reproducible() {
        let mut a = seeded_env(GameConfig::standard());
        let other_rng = EpisodeRng::new(&[9u8; 32], 4);
        let mut b = SurvivalEnv::new(GameConfig::standard(), other_rng).unwrap();
        assert_eq!(a.reset(Some(11)).unwrap(), b.reset(Some(11)).unwrap());
    }

    #[test]
    fn test_step_before_reset() {
        let mut env = seeded_env(GameConfig::standard());
        let err = env.step(&both(Action::Forage)).unwrap_err();
        assert!(matches!(err, GameError::NotReset));
    }

    #[test]
    fn test_missing_and_masked_actions() {
        let mut env = seeded_env(GameConfig::standard());
        env.reset(None).unwrap();

        let mut partial = AgentMap::new();
        partial.insert(AgentId::Player1, Action::Forage);
        let err = env.step(&partial).unwrap_err();
        assert!(matches!(err, GameError::MissingAction { agent: AgentId::Player2 }));

        let err = env.step(&both(Action::None)).unwrap_err();
        assert!(matches!(err, GameError::MaskedAction { agent: AgentId::Player1 }));
        assert_eq!(env.state().unwrap().days_left, 2);
    }

    #[test]
    fn test_truncation_clears_agents() {
        let mut env = seeded_env(GameConfig::standard());
        env.reset(None).unwrap();

        let first = env.step(&both(Action::Attack)).unwrap();
        assert_eq!(first.rewards.values().copied().collect::<Vec<_>>(), vec![0.0, 0.0]);
        assert!(first.truncations.values().all(|t| !t));
        assert!(!first.all_done());
        assert_eq!(env.agents().len(), 2);

        let last = env.step(&both(Action::Attack)).unwrap();
        assert!(last.truncations.values().all(|t| *t));
        assert!(last.terminations.values().all(|t| !t));
        assert!(last.all_done());
        assert!(env.agents().is_empty());
        assert!(last.infos.values().all(Info::is_empty));

        let err = env.step(&both(Action::Attack)).unwrap_err();
        assert!(matches!(err, GameError::EpisodeFinished));
    }

    #[test]
    fn test_final_reward_is_liveness_penalty() {
        // Mutual attack costs 1 per day under the default variant
        let mut env = SurvivalEnv::new(GameConfig::standard(), StepRng::new(0, 0)).unwrap();
        env.begin_episode_with(1, 3).unwrap();

        let mid = env.play_round(&both(Action::Attack)).unwrap();
        assert_eq!(mid.rewards[&AgentId::Player1], 0.0, "mid-episode rewards are always zero");
        assert_eq!(mid.observations[&AgentId::Player1].values[1], 0);

        let last = env.play_round(&both(Action::Attack)).unwrap();
        assert_eq!(last.rewards[&AgentId::Player1], -1.0);
        assert_eq!(last.rewards[&AgentId::Player2], 0.0);
    }

    #[test]
    fn test_agents_with_unseedable_rng() {
        let mut env = SurvivalEnv::new(GameConfig::standard(), StepRng::new(0, 0)).unwrap();
        assert!(env.agents().is_empty());

        env.begin_episode_with(2, 2).unwrap();
        assert_eq!(env.agents(), &AgentId::ALL);

        env.play_round(&both(Action::Forage)).unwrap();
        assert_eq!(env.agents().len(), 2);
        env.play_round(&both(Action::Forage)).unwrap();
        assert!(env.agents().is_empty());
    }

    #[test]
    fn test_explicit_life_points_validated() {
        let mut env = SurvivalEnv::new(GameConfig::standard(), StepRng::new(0, 0)).unwrap();
        assert!(env.begin_episode_with(4, 1).is_err());
        assert!(env.begin_episode_with(-1, 1).is_err());
        assert!(env.begin_episode_with(0, 3).is_ok());
    }

    #[test]
    fn test_spaces() {
        let env = seeded_env(GameConfig::standard());
        assert_eq!(env.action_space(AgentId::Player1), SpaceInfo::Discrete(3));
        assert_eq!(
            env.observation_space(AgentId::Player2),
            SpaceInfo::Box { low: 0.0, high: 3.0, shape: vec![1, 5] }
        );

        let long = seeded_env(GameConfig { num_days: 10, ..GameConfig::standard() });
        assert!(matches!(
            long.observation_space(AgentId::Player1),
            SpaceInfo::Box { high, .. } if high == 10.0
        ));
    }

    #[test]
    fn test_last_outcome_tracks_rounds() {
        let mut env = seeded_env(GameConfig::standard());
        env.reset(None).unwrap();
        assert!(env.last_outcome().is_none());
        env.step(&both(Action::Forage)).unwrap();
        let outcome = env.last_outcome().unwrap();
        assert_eq!(outcome.actions, (Action::Forage, Action::Forage));
        assert_eq!(outcome.days_left, 1);
    }
}
