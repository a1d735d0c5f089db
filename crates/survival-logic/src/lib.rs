//! Survival Logic
//!
//! Core dynamics for a two-agent survival game used as a reinforcement
//! learning environment. Each day both agents attack or forage; a hidden
//! weather regime sets the success odds so that the one-day game stays a
//! social dilemma, and life points gate what each agent can still do.
//! This crate is compiled to:
//! - Native (for training loops driving `ParallelEnv`)
//! - WASM (for frontend episode replay)

mod action;
mod config;
mod env;
mod episode;
mod error;
mod random;
mod regime;
mod resolver;
mod state;

#[cfg(feature = "wasm")]
mod wasm;

pub use action::{Action, AgentId};
pub use config::GameConfig;
pub use env::{AgentMap, Info, Observation, ParallelEnv, SpaceInfo, StepResult, SurvivalEnv};
pub use episode::{run_episode, EpisodeResult, RoundRecord, Strategy};
pub use error::{GameError, Result};
pub use random::EpisodeRng;
pub use regime::{
    candidate_success_probabilities, generate_regimes, regime_for, select_regime, Regime, Variant,
};
pub use resolver::{apply_payoff, resolve_round, round_payoffs, success_probability, RoundOutcome};
pub use state::EpisodeState;
