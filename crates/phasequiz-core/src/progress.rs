//! Session progress engine.
//!
//! Records phase completions against a [`SessionRecord`], keeps the
//! derived token total in sync, advances the current phase, and marks
//! games complete. Everything here is synchronous and operates on an
//! in-memory record; stores load the record, call into this module, and
//! write the result back inside one atomic unit.
//!
//! # Invariants
//!
//! - `total_tokens` equals the sum of `tokens_earned` over the session's
//!   results after every call. It is recomputed from scratch, never
//!   incremented, so overwrites and out-of-order completions stay correct.
//! - `current_phase` never decreases and never exceeds
//!   [`FINISHED_PHASE`](phasequiz_types::FINISHED_PHASE).
//! - At most one result exists per phase. Re-recording a phase replaces
//!   its tokens, time, and answers but keeps its original `completed_at`.

use chrono::{DateTime, Utc};
use phasequiz_types::{
    GameSession, PhaseCompletion, PhaseResult, PhaseResultId, SessionProgress, SessionRecord,
    TOTAL_PHASES, is_valid_phase,
};

use crate::error::QuizError;

/// Longest accepted team name, in characters.
pub const MAX_TEAM_NAME_LEN: usize = 128;

/// Check that `phase_number` names a playable phase.
///
/// # Errors
///
/// Returns [`QuizError::Validation`] for zero, negative, or
/// out-of-range phase numbers.
pub fn validate_phase_number(phase_number: i32) -> Result<(), QuizError> {
    if phase_number <= 0 {
        return Err(QuizError::validation(format!(
            "phase_number must be a positive integer, got {phase_number}"
        )));
    }
    if !is_valid_phase(phase_number) {
        return Err(QuizError::validation(format!(
            "phase_number must be at most {TOTAL_PHASES}, got {phase_number}"
        )));
    }
    Ok(())
}

/// Normalize and check a team name.
///
/// Returns the trimmed name.
///
/// # Errors
///
/// Returns [`QuizError::Validation`] if the name is blank or longer than
/// [`MAX_TEAM_NAME_LEN`] characters.
pub fn validate_team_name(team_name: &str) -> Result<String, QuizError> {
    let trimmed = team_name.trim();
    if trimmed.is_empty() {
        return Err(QuizError::validation("team_name must not be empty"));
    }
    if trimmed.chars().count() > MAX_TEAM_NAME_LEN {
        return Err(QuizError::validation(format!(
            "team_name must be at most {MAX_TEAM_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Start a new session for `team_name`.
///
/// # Errors
///
/// Returns [`QuizError::Validation`] if the team name is rejected.
pub fn start_session(team_name: &str, now: DateTime<Utc>) -> Result<GameSession, QuizError> {
    let name = validate_team_name(team_name)?;
    Ok(GameSession::new(&name, now))
}

/// Sum of tokens over `results`.
pub fn total_tokens(results: &[PhaseResult]) -> i64 {
    results
        .iter()
        .map(|r| i64::from(r.tokens_earned))
        .fold(0_i64, i64::saturating_add)
}

/// The phase a session moves to after completing `completed_phase`.
///
/// Completing the current phase or a later one jumps to the phase after
/// it. Completing an earlier phase leaves progress untouched.
pub const fn next_phase(current_phase: i32, completed_phase: i32) -> i32 {
    if completed_phase >= current_phase {
        completed_phase.saturating_add(1)
    } else {
        current_phase
    }
}

/// Record a phase completion on `record`.
///
/// Upserts the result for `completion.phase_number`, recomputes the
/// token total, and advances the current phase. `now` becomes the
/// session's `updated_at`, and the result's `completed_at` when the
/// result is new.
///
/// # Errors
///
/// Returns [`QuizError::Validation`] if the phase number is not a valid
/// phase. The record is left unchanged in that case.
pub fn complete_phase(
    record: &mut SessionRecord,
    completion: PhaseCompletion,
    now: DateTime<Utc>,
) -> Result<SessionProgress, QuizError> {
    validate_phase_number(completion.phase_number)?;

    let answers = completion
        .answers_data
        .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

    let existing = record
        .phase_results
        .iter_mut()
        .find(|r| r.phase_number == completion.phase_number);

    let (phase_result, created) = if let Some(result) = existing {
        result.tokens_earned = completion.tokens_earned;
        result.time_spent = completion.time_spent;
        result.answers_data = answers;
        (result.clone(), false)
    } else {
        let result = PhaseResult {
            id: PhaseResultId::new(),
            session_id: record.session.id,
            phase_number: completion.phase_number,
            tokens_earned: completion.tokens_earned,
            time_spent: completion.time_spent,
            answers_data: answers,
            completed_at: now,
        };
        record.phase_results.push(result.clone());
        record.phase_results.sort_by_key(|r| r.phase_number);
        (result, true)
    };

    let session = &mut record.session;
    session.total_tokens = total_tokens(&record.phase_results);
    session.current_phase = next_phase(session.current_phase, completion.phase_number);
    session.updated_at = now;

    Ok(SessionProgress {
        session: session.clone(),
        phase_result,
        created,
    })
}

/// Mark the game finished.
///
/// Always overwrites `completed_at`, so calling this again after
/// completion moves the timestamp forward.
pub fn complete_game(session: &mut GameSession, now: DateTime<Utc>) {
    session.completed = true;
    session.completed_at = Some(now);
    session.updated_at = now;
}
