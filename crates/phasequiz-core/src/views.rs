//! Derived read-only views over stored records.

use phasequiz_types::{GameSession, SessionRecord, SessionSummary};

/// Seconds the session has lasted.
///
/// For completed sessions this is creation to completion; otherwise it
/// is creation to the last update.
pub fn session_duration_secs(session: &GameSession) -> i64 {
    let end = match (session.completed, session.completed_at) {
        (true, Some(done)) => done,
        _ => session.updated_at,
    };
    end.signed_duration_since(session.created_at).num_seconds()
}

/// Number of phases with a recorded result.
pub fn phases_completed(record: &SessionRecord) -> u32 {
    u32::try_from(record.phase_results.len()).unwrap_or(u32::MAX)
}

/// List-endpoint projection of a session.
pub fn summarize(record: &SessionRecord) -> SessionSummary {
    let s = &record.session;
    SessionSummary {
        id: s.id,
        team_name: s.team_name.clone(),
        total_tokens: s.total_tokens,
        current_phase: s.current_phase,
        phases_completed: phases_completed(record),
        completed: s.completed,
        created_at: s.created_at,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use phasequiz_types::PhaseCompletion;

    use super::*;
    use crate::progress::complete_phase;

    #[test]
    fn duration_uses_completion_when_finished() {
        let t0 = Utc::now();
        let mut session = GameSession::new("Lynx", t0);
        session.updated_at = t0 + TimeDelta::seconds(40);
        assert_eq!(session_duration_secs(&session), 40);

        session.completed = true;
        session.completed_at = Some(t0 + TimeDelta::seconds(300));
        assert_eq!(session_duration_secs(&session), 300);
    }

    #[test]
    fn summary_counts_results() {
        let now = Utc::now();
        let mut record = SessionRecord {
            session: GameSession::new("Lynx", now),
            phase_results: Vec::new(),
        };
        for phase_number in [1, 2] {
            let completion = PhaseCompletion {
                phase_number,
                tokens_earned: 10,
                time_spent: None,
                answers_data: None,
            };
            complete_phase(&mut record, completion, now).unwrap();
        }
        let summary = summarize(&record);
        assert_eq!(summary.phases_completed, 2);
        assert_eq!(summary.total_tokens, 20);
        assert_eq!(summary.current_phase, 3);
        assert_eq!(summary.team_name, "Lynx");
    }
}
