//! Round resolution
//!
//! Turns two simultaneous actions into success draws, payoffs and updated
//! life points. One call resolves one day atomically.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::action::{Action, AgentId};
use crate::config::GameConfig;
use crate::error::{GameError, Result};
use crate::regime::{Regime, Variant};
use crate::state::EpisodeState;

/// Everything that happened in one resolved day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub actions: (Action, Action),
    pub probabilities: (f64, f64),
    pub draws: (f64, f64),
    pub success: (bool, bool),
    pub payoffs: (i32, i32),
    pub life_points: (i32, i32),
    pub days_left: u32,
    /// The day horizon ran out with this round.
    pub truncated: bool,
}

/// Success probability of `own` against `other`
///
/// A dead opponent turns every attack into a mutual-attack attempt and
/// every forage into a lone forage.
pub fn success_probability(
    regime: &Regime,
    own: Action,
    other: Action,
    other_life_points: i32,
) -> f64 {
    if other_life_points != 0 {
        match (own, other) {
            (Action::Forage, Action::Forage) => regime.p_r,
            (Action::Forage, Action::Attack) => regime.p_s,
            (Action::Attack, Action::Forage) => regime.p_t,
            _ => regime.p_p,
        }
    } else {
        match own {
            Action::Forage => regime.p_s,
            _ => regime.p_p,
        }
    }
}

/// Payoff pair for one day given the actions, liveness and success draws
///
/// Returns (player1, player2). Dead agents always receive `gain_dead`.
/// Combined payoffs saturate at the `i32` bounds.
pub fn round_payoffs(
    config: &GameConfig,
    actions: (Action, Action),
    life_points: (i32, i32),
    success: (bool, bool),
) -> (i32, i32) {
    let (gain, cost, dead) = (config.gain, config.cost, config.gain_dead);
    let (success1, success2) = success;

    match (life_points.0 != 0, life_points.1 != 0) {
        (true, true) => match actions {
            (Action::Forage, Action::Forage) => {
                let mutual = match config.variant {
                    Variant::CertainAttack => success1 && success2,
                    // Only player1's draw decides the shared harvest
                    Variant::RiskyAttack => success1,
                };
                if mutual {
                    (gain, gain)
                } else {
                    (cost, cost)
                }
            }
            (Action::Forage, Action::Attack) => {
                forager_vs_attacker(success1, success2, gain, cost)
            }
            (Action::Attack, Action::Forage) => {
                let (forager, attacker) = forager_vs_attacker(success2, success1, gain, cost);
                (attacker, forager)
            }
            // Both attack. `None` never gets here through `resolve_round`.
            _ => match config.variant {
                Variant::CertainAttack => (cost, cost),
                Variant::RiskyAttack => {
                    let doubled = cost.saturating_add(cost);
                    (doubled, doubled)
                }
            },
        },
        (true, false) => (lone_survivor(actions.0, success1, gain, cost), dead),
        (false, true) => (dead, lone_survivor(actions.1, success2, gain, cost)),
        (false, false) => (dead, dead),
    }
}

/// Returns (forager payoff, attacker payoff).
fn forager_vs_attacker(
    forager_success: bool,
    attacker_success: bool,
    gain: i32,
    cost: i32,
) -> (i32, i32) {
    match (forager_success, attacker_success) {
        (true, true) => (gain.saturating_add(cost), gain),
        (true, false) => (gain, cost),
        (false, true) => (cost.saturating_add(cost), gain),
        (false, false) => (cost, cost),
    }
}

/// Attacking a dead opponent always costs; foraging alone pays on success.
fn lone_survivor(action: Action, success: bool, gain: i32, cost: i32) -> i32 {
    match action {
        Action::Forage if success => gain,
        _ => cost,
    }
}

/// Add a payoff and saturate into [0, max_life_points - 1]
pub fn apply_payoff(life_points: i32, payoff: i32, max_life_points: i32) -> i32 {
    life_points.saturating_add(payoff).clamp(0, max_life_points - 1)
}

/// Resolve one day and advance `state`
///
/// Draws exactly two uniform values (player1 then player2) from `rng`,
/// whether or not the branch taken consults them. An attempt succeeds
/// when its draw is at most its success probability.
pub fn resolve_round<R: Rng + ?Sized>(
    state: &mut EpisodeState,
    config: &GameConfig,
    player1_action: Action,
    player2_action: Action,
    rng: &mut R,
) -> Result<RoundOutcome> {
    if state.is_over() {
        return Err(GameError::EpisodeFinished);
    }
    for (agent, action) in AgentId::ALL.into_iter().zip([player1_action, player2_action]) {
        if !action.is_selectable() {
            return Err(GameError::MaskedAction { agent });
        }
    }

    state.player1_action = player1_action;
    state.player2_action = player2_action;

    let prob1 = success_probability(
        &state.regime,
        player1_action,
        player2_action,
        state.player2_life_points,
    );
    let prob2 = success_probability(
        &state.regime,
        player2_action,
        player1_action,
        state.player1_life_points,
    );

    let draw1: f64 = rng.gen();
    let draw2: f64 = rng.gen();
    let success = (draw1 <= prob1, draw2 <= prob2);

    let payoffs = round_payoffs(
        config,
        (player1_action, player2_action),
        (state.player1_life_points, state.player2_life_points),
        success,
    );

    state.player1_life_points =
        apply_payoff(state.player1_life_points, payoffs.0, config.max_life_points);
    state.player2_life_points =
        apply_payoff(state.player2_life_points, payoffs.1, config.max_life_points);
    state.days_left -= 1;

    debug!(
        "day resolved: actions=({}, {}) draws=({:.3}, {:.3}) success={:?} payoffs={:?} \
         life=({}, {}) days_left={}",
        player1_action,
        player2_action,
        draw1,
        draw2,
        success,
        payoffs,
        state.player1_life_points,
        state.player2_life_points,
        state.days_left,
    );

    Ok(RoundOutcome {
        actions: (player1_action, player2_action),
        probabilities: (prob1, prob2),
        draws: (draw1, draw2),
        success,
        payoffs,
        life_points: (state.player1_life_points, state.player2_life_points),
        days_left: state.days_left,
        truncated: state.is_over(),
    })
}
