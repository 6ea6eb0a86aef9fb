//! Question bank rules and random sampling.

use phasequiz_types::{Question, QuestionInput};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::QuizError;
use crate::filter::QuestionFilter;
use crate::progress::validate_phase_number;

/// Lowest difficulty rating.
pub const MIN_DIFFICULTY: i32 = 1;
/// Highest difficulty rating.
pub const MAX_DIFFICULTY: i32 = 5;

/// Validate a question write.
///
/// # Errors
///
/// Returns [`QuizError::Validation`] for an invalid phase, a blank
/// prompt, a difficulty outside 1..=5, or a negative token value.
pub fn validate_question(input: &QuestionInput) -> Result<(), QuizError> {
    validate_phase_number(input.phase_number)?;
    if input.question_text.trim().is_empty() {
        return Err(QuizError::validation("question_text must not be empty"));
    }
    if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&input.difficulty) {
        return Err(QuizError::validation(format!(
            "difficulty must be between {MIN_DIFFICULTY} and {MAX_DIFFICULTY}, got {}",
            input.difficulty
        )));
    }
    if input.tokens_value < 0 {
        return Err(QuizError::validation("tokens_value must not be negative"));
    }
    Ok(())
}

/// Pick up to `count` active questions matching `filter`, uniformly at
/// random and without replacement.
///
/// When fewer questions match than requested, all of them are returned
/// in random order.
pub fn select_random_questions<R: Rng + ?Sized>(
    pool: Vec<Question>,
    filter: &QuestionFilter,
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let active = filter.clone().active();
    let mut matching: Vec<Question> = pool.into_iter().filter(|q| active.matches(q)).collect();
    matching.shuffle(rng);
    matching.truncate(count);
    matching
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Utc;
    use phasequiz_types::{QuestionId, QuestionType};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn question(phase_number: i32, question_type: QuestionType, is_active: bool) -> Question {
        Question {
            id: QuestionId::new(),
            phase_number,
            question_type,
            question_text: "Unscramble: PRETNRUEENR".to_owned(),
            answer_data: serde_json::json!({"answer": "ENTREPRENEUR"}),
            difficulty: 2,
            tokens_value: 10,
            is_active,
            created_at: Utc::now(),
        }
    }

    fn input() -> QuestionInput {
        QuestionInput {
            phase_number: 1,
            question_type: QuestionType::Anagram,
            question_text: "Unscramble".to_owned(),
            answer_data: serde_json::json!({}),
            difficulty: 3,
            tokens_value: 10,
            is_active: true,
        }
    }

    #[test]
    fn undersupply_returns_every_match() {
        let pool = vec![
            question(1, QuestionType::Anagram, true),
            question(1, QuestionType::Anagram, true),
            question(1, QuestionType::WordSearch, true),
            question(1, QuestionType::Anagram, false),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let picked = select_random_questions(pool, &QuestionFilter::default(), 100, &mut rng);
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|q| q.is_active));
    }

    #[test]
    fn sample_is_without_replacement() {
        let pool: Vec<Question> =
            (0..20).map(|_| question(2, QuestionType::MultipleChoice, true)).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let picked = select_random_questions(pool, &QuestionFilter::default(), 5, &mut rng);
        assert_eq!(picked.len(), 5);
        let ids: HashSet<QuestionId> = picked.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn filters_apply_before_sampling() {
        let pool = vec![
            question(1, QuestionType::Anagram, true),
            question(2, QuestionType::Anagram, true),
            question(1, QuestionType::TrueFalse, true),
        ];
        let filter = QuestionFilter {
            phase: Some(1),
            question_type: Some(QuestionType::Anagram),
            active_only: false,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let picked = select_random_questions(pool, &filter, 5, &mut rng);
        assert_eq!(picked.len(), 1);
        assert!(picked.iter().all(|q| q.phase_number == 1 && q.question_type == QuestionType::Anagram));
    }

    #[test]
    fn zero_count_and_empty_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = vec![question(1, QuestionType::Anagram, true)];
        assert!(select_random_questions(pool, &QuestionFilter::default(), 0, &mut rng).is_empty());
        assert!(select_random_questions(Vec::new(), &QuestionFilter::default(), 5, &mut rng).is_empty());
    }

    #[test]
    fn question_validation() {
        assert!(validate_question(&input()).is_ok());
        assert!(validate_question(&QuestionInput { difficulty: 0, ..input() }).is_err());
        assert!(validate_question(&QuestionInput { difficulty: 6, ..input() }).is_err());
        assert!(validate_question(&QuestionInput { phase_number: 7, ..input() }).is_err());
        assert!(validate_question(&QuestionInput { question_text: " ".to_owned(), ..input() }).is_err());
        assert!(validate_question(&QuestionInput { tokens_value: -1, ..input() }).is_err());
    }
}
