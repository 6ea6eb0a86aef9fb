//! Phase configuration rules and defaults.

use phasequiz_types::{PhaseConfigInput, PhaseConfiguration};
use serde_json::json;

use crate::error::QuizError;
use crate::progress::validate_phase_number;

/// Validate a phase configuration write.
///
/// # Errors
///
/// Returns [`QuizError::Validation`] for an invalid phase number, a
/// blank name, or a non-positive time limit.
pub fn validate_phase_config(input: &PhaseConfigInput) -> Result<(), QuizError> {
    validate_phase_number(input.phase_number)?;
    if input.name.trim().is_empty() {
        return Err(QuizError::validation("name must not be empty"));
    }
    if let Some(limit) = input.time_limit
        && limit <= 0
    {
        return Err(QuizError::validation(format!(
            "time_limit must be positive when set, got {limit}"
        )));
    }
    Ok(())
}

/// Enabled configurations in phase order.
pub fn select_enabled(configs: &[PhaseConfiguration]) -> Vec<PhaseConfiguration> {
    let mut enabled: Vec<PhaseConfiguration> =
        configs.iter().filter(|c| c.is_enabled).cloned().collect();
    enabled.sort_by_key(|c| c.phase_number);
    enabled
}

/// The phase configuration written for each phase on a fresh install.
pub fn default_phase_configs() -> Vec<PhaseConfigInput> {
    let mut configs = vec![
        PhaseConfigInput {
            phase_number: 1,
            name: "Anagrams and Word Search".to_owned(),
            description: "Entrepreneurship anagrams and word search puzzles".to_owned(),
            time_limit: Some(180),
            is_enabled: true,
            config_data: json!({"type": "timed_challenges"}),
        },
        PhaseConfigInput {
            phase_number: 2,
            name: "Challenge Stories".to_owned(),
            description: "Stories about real entrepreneurship challenges".to_owned(),
            time_limit: None,
            is_enabled: true,
            config_data: json!({"type": "challenge_stories"}),
        },
    ];
    configs.extend((3..=5).map(|phase_number| PhaseConfigInput {
        phase_number,
        name: format!("Phase {phase_number}"),
        description: format!("Description of phase {phase_number}"),
        time_limit: None,
        is_enabled: true,
        config_data: json!({}),
    }));
    configs
}
