//! WASM bindings for frontend episode replay

#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::{generate_regimes, run_episode, GameConfig, Strategy};

fn parse_config(json: &str) -> Result<GameConfig, JsError> {
    if json.trim().is_empty() {
        return Ok(GameConfig::standard());
    }
    GameConfig::from_json(json).map_err(|e| JsError::new(&e.to_string()))
}

fn parse_strategy(json: &str) -> Result<Strategy, JsError> {
    serde_json::from_str(json).map_err(|e| JsError::new(&format!("Invalid strategy: {}", e)))
}

/// Replay an episode with full day-by-day details
///
/// # Arguments
/// * `config_json` - JSON GameConfig; empty string for the standard config
/// * `strategy_a_json` - JSON Strategy for player1, e.g. `"TitForTat"`
/// * `strategy_b_json` - JSON Strategy for player2, e.g. `{"Random": {"forage_bias": 60}}`
/// * `seed` - 32-byte randomness seed
/// * `episode_index` - Index of this episode
///
/// # Returns
/// JSON serialized EpisodeResult
#[wasm_bindgen]
pub fn replay_episode(
    config_json: &str,
    strategy_a_json: &str,
    strategy_b_json: &str,
    seed: &[u8],
    episode_index: u32,
) -> Result<JsValue, JsError> {
    let config = parse_config(config_json)?;
    let strategy_a = parse_strategy(strategy_a_json)?;
    let strategy_b = parse_strategy(strategy_b_json)?;

    let seed_arr: [u8; 32] = seed.try_into()
        .map_err(|_| JsError::new("Seed must be exactly 32 bytes"))?;

    let result = run_episode(&config, &strategy_a, &strategy_b, &seed_arr, episode_index)
        .map_err(|e| JsError::new(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// List every valid regime for a configuration, in sweep order
#[wasm_bindgen]
pub fn get_regimes(config_json: &str) -> Result<JsValue, JsError> {
    let config = parse_config(config_json)?;
    let regimes = generate_regimes(&config);

    serde_wasm_bindgen::to_value(&regimes)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Standard configuration as JSON, for the frontend's settings form
#[wasm_bindgen]
pub fn get_default_config() -> Result<String, JsError> {
    serde_json::to_string(&GameConfig::standard())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}
