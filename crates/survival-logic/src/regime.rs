//! Weather regimes and their selection
//!
//! A regime fixes the success probabilities for every pair of actions and
//! the expected payoffs they imply. Only regimes whose payoffs keep the
//! one-day game a social dilemma (T > R > P > S and 2R > T + S) are ever
//! handed to an episode.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::{GameError, Result};

/// Number of candidate lone-forager success probabilities swept.
const CANDIDATE_COUNT: u32 = 9;

/// Mutual-attack success probability, shared by every candidate.
const MUTUAL_ATTACK_SUCCESS: f64 = 0.0;

/// Payoff-table variant
///
/// The two variants differ in the attacker's success probability and in
/// how the both-forage and both-attack rounds are scored:
///
/// | | `CertainAttack` | `RiskyAttack` |
/// |---|---|---|
/// | pT | 1.0 | 0.8 |
/// | both forage gain | both draws succeed | player1's draw succeeds |
/// | both attack | (cost, cost) | (2·cost, 2·cost) |
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    CertainAttack,
    RiskyAttack,
}

impl Variant {
    /// Probability that a lone attacker succeeds against a forager (pT).
    pub fn attack_success(self) -> f64 {
        match self {
            Variant::CertainAttack => 1.0,
            Variant::RiskyAttack => 0.8,
        }
    }
}

/// Success probabilities and expected payoffs for one weather type
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Regime {
    /// Both forage.
    pub p_r: f64,
    /// Lone forager against an attacker.
    pub p_s: f64,
    /// Lone attacker against a forager.
    pub p_t: f64,
    /// Both attack.
    pub p_p: f64,
    pub r: f64,
    pub s: f64,
    pub t: f64,
    pub p: f64,
}

impl Regime {
    /// Build a regime from its probabilities, deriving R, S, T and P.
    ///
    /// The sucker payoff additionally carries the cost of being attacked
    /// with probability pT.
    pub fn from_probabilities(
        p_r: f64,
        p_s: f64,
        p_t: f64,
        p_p: f64,
        gain: i32,
        cost: i32,
    ) -> Self {
        let gain = f64::from(gain);
        let cost = f64::from(cost);
        Self {
            p_r,
            p_s,
            p_t,
            p_p,
            r: expected(p_r, gain, cost),
            s: expected(p_s, gain, cost) + p_t * cost,
            t: expected(p_t, gain, cost),
            p: expected(p_p, gain, cost),
        }
    }

    /// Candidate regime for a given lone-forager success probability.
    ///
    /// Mutual foraging succeeds unless both independent attempts fail.
    pub fn candidate(p_s: f64, variant: Variant, gain: i32, cost: i32) -> Self {
        let p_r = 1.0 - (1.0 - p_s) * (1.0 - p_s);
        let p_t = variant.attack_success();
        Self::from_probabilities(p_r, p_s, p_t, MUTUAL_ATTACK_SUCCESS, gain, cost)
    }

    /// T > R > P > S and 2R > T + S.
    pub fn is_social_dilemma(&self) -> bool {
        self.t > self.r && self.r > self.p && self.p > self.s && 2.0 * self.r > self.t + self.s
    }
}

fn expected(p: f64, gain: f64, cost: f64) -> f64 {
    p * gain + (1.0 - p) * cost
}

/// Lone-forager success probabilities swept when generating regimes: 0.1 to 0.9
pub fn candidate_success_probabilities() -> impl Iterator<Item = f64> {
    (1..=CANDIDATE_COUNT).map(|i| f64::from(i) / 10.0)
}

/// All valid regimes for a configuration, in sweep order
pub fn generate_regimes(config: &GameConfig) -> Vec<Regime> {
    candidate_success_probabilities()
        .map(|p_s| Regime::candidate(p_s, config.variant, config.gain, config.cost))
        .filter(Regime::is_social_dilemma)
        .collect()
}

/// Pick the regime at `index` from a filtered sequence
pub fn select_regime(regimes: &[Regime], index: usize) -> Result<Regime> {
    regimes.get(index).copied().ok_or(GameError::RegimeIndexOutOfRange {
        index,
        available: regimes.len(),
    })
}

/// Generate and select the regime a configuration plays under
pub fn regime_for(config: &GameConfig) -> Result<Regime> {
    let regimes = generate_regimes(config);
    if regimes.is_empty() {
        return Err(GameError::NoValidRegimes { gain: config.gain, cost: config.cost });
    }
    select_regime(&regimes, config.regime_index)
}
