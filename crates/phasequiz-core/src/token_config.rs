//! Token configuration rules: bounds validation, active selection, and
//! the default per-phase records written on first start.

use phasequiz_types::{TokenConfigInput, TokenConfiguration};
use serde_json::json;

use crate::error::QuizError;
use crate::progress::validate_phase_number;

/// Check that `min_tokens` does not exceed `max_tokens`.
///
/// # Errors
///
/// Returns [`QuizError::Validation`] when `min_tokens > max_tokens`.
pub fn validate_token_bounds(min_tokens: i32, max_tokens: i32) -> Result<(), QuizError> {
    if min_tokens > max_tokens {
        return Err(QuizError::validation(format!(
            "min_tokens ({min_tokens}) cannot be greater than max_tokens ({max_tokens})"
        )));
    }
    Ok(())
}

/// Validate a token configuration write.
///
/// # Errors
///
/// Returns [`QuizError::Validation`] for an invalid phase number or
/// inverted bounds.
pub fn validate_token_config(input: &TokenConfigInput) -> Result<(), QuizError> {
    validate_phase_number(input.phase_number)?;
    validate_token_bounds(input.min_tokens, input.max_tokens)
}

/// Active configurations in phase order.
pub fn select_active(configs: &[TokenConfiguration]) -> Vec<TokenConfiguration> {
    let mut active: Vec<TokenConfiguration> =
        configs.iter().filter(|c| c.is_active).cloned().collect();
    active.sort_by_key(|c| c.phase_number);
    active
}

/// The token configuration written for each phase on a fresh install.
pub fn default_token_configs() -> Vec<TokenConfigInput> {
    let seed = |phase_number, max_tokens, config_data| TokenConfigInput {
        phase_number,
        min_tokens: 0,
        max_tokens,
        config_data,
        is_active: true,
    };
    vec![
        seed(
            1,
            180,
            json!({
                "time_limit": 180,
                "anagram_tokens": 30,
                "word_search_tokens": 30,
                "description": "Anagrams and word search against a three minute clock",
            }),
        ),
        seed(
            2,
            150,
            json!({
                "challenge_tokens": 50,
                "challenges": [
                    "technology_for_older_adults",
                    "fast_fashion_waste_zones",
                    "water_sustainability_in_agriculture",
                ],
                "description": "Entrepreneurship challenge stories",
            }),
        ),
        seed(3, 100, json!({"description": "Phase 3"})),
        seed(4, 100, json!({"description": "Phase 4"})),
        seed(5, 100, json!({"description": "Phase 5"})),
    ]
}
