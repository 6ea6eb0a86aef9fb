//! Reward tables and token calculation.
//!
//! A [`RewardTable`] says how many tokens each kind of achievement is
//! worth in each phase. The default table is served to clients that
//! have no stored configuration; the presets are alternative game modes
//! an administrator can pick from.

use serde::{Deserialize, Serialize};

/// Phase 1 rewards: timed anagram and word-search challenges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedPhaseRewards {
    /// Awarded for finishing the phase.
    pub completion: i32,
    /// Awarded for finishing with time to spare.
    pub time_bonus: i32,
    /// Awarded for solving every anagram.
    pub perfect_anagram: i32,
    /// Awarded for finding every word.
    pub perfect_word_search: i32,
}

/// Phase 2 rewards: challenge stories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPhaseRewards {
    /// Awarded for reading the story through.
    pub completion: i32,
    /// Awarded for picking a challenge.
    pub challenge_selection: i32,
}

/// Rewards for a phase scored by a single right-or-wrong answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRewards {
    /// Awarded for a correct answer.
    pub correct: i32,
    /// Awarded for an incorrect answer.
    pub incorrect: i32,
}

impl AnswerRewards {
    /// Tokens for an answer.
    pub const fn award(&self, is_correct: bool) -> i32 {
        if is_correct { self.correct } else { self.incorrect }
    }
}

/// Token values for every phase of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardTable {
    /// Anagrams and word search.
    pub phase1: TimedPhaseRewards,
    /// Challenge stories.
    pub phase2: StoryPhaseRewards,
    /// Phase 3 question.
    pub phase3: AnswerRewards,
    /// Phase 4 question.
    pub phase4: AnswerRewards,
    /// Phase 5 question.
    pub phase5: AnswerRewards,
}

impl Default for RewardTable {
    fn default() -> Self {
        DEFAULT_REWARDS
    }
}

/// The standard reward table.
pub const DEFAULT_REWARDS: RewardTable = RewardTable {
    phase1: TimedPhaseRewards {
        completion: 15,
        time_bonus: 10,
        perfect_anagram: 5,
        perfect_word_search: 5,
    },
    phase2: StoryPhaseRewards {
        completion: 20,
        challenge_selection: 5,
    },
    phase3: AnswerRewards {
        correct: 25,
        incorrect: 5,
    },
    phase4: AnswerRewards {
        correct: 30,
        incorrect: 10,
    },
    phase5: AnswerRewards {
        correct: 35,
        incorrect: 15,
    },
};

const HIGH_STAKES: RewardTable = RewardTable {
    phase1: TimedPhaseRewards {
        completion: 20,
        time_bonus: 15,
        perfect_anagram: 10,
        perfect_word_search: 10,
    },
    phase2: StoryPhaseRewards {
        completion: 30,
        challenge_selection: 10,
    },
    phase3: AnswerRewards {
        correct: 40,
        incorrect: 0,
    },
    phase4: AnswerRewards {
        correct: 50,
        incorrect: 0,
    },
    phase5: AnswerRewards {
        correct: 60,
        incorrect: 0,
    },
};

const LEARNING_FOCUSED: RewardTable = RewardTable {
    phase1: TimedPhaseRewards {
        completion: 20,
        time_bonus: 5,
        perfect_anagram: 3,
        perfect_word_search: 3,
    },
    phase2: StoryPhaseRewards {
        completion: 25,
        challenge_selection: 10,
    },
    phase3: AnswerRewards {
        correct: 20,
        incorrect: 15,
    },
    phase4: AnswerRewards {
        correct: 25,
        incorrect: 20,
    },
    phase5: AnswerRewards {
        correct: 30,
        incorrect: 25,
    },
};

const COMPETITIVE: RewardTable = RewardTable {
    phase1: TimedPhaseRewards {
        completion: 25,
        time_bonus: 20,
        perfect_anagram: 15,
        perfect_word_search: 15,
    },
    phase2: StoryPhaseRewards {
        completion: 35,
        challenge_selection: 5,
    },
    phase3: AnswerRewards {
        correct: 50,
        incorrect: 5,
    },
    phase4: AnswerRewards {
        correct: 60,
        incorrect: 5,
    },
    phase5: AnswerRewards {
        correct: 75,
        incorrect: 5,
    },
};

/// A named reward table offered as a game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RewardPreset {
    /// Stable identifier, e.g. `high-stakes`.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description of the mode.
    pub description: &'static str,
    /// The rewards.
    pub config: RewardTable,
}

/// All built-in presets. `balanced` is the default table.
pub const PRESETS: [RewardPreset; 4] = [
    RewardPreset {
        id: "balanced",
        name: "Balanced",
        description: "Even token distribution for a standard game",
        config: DEFAULT_REWARDS,
    },
    RewardPreset {
        id: "high-stakes",
        name: "High Stakes",
        description: "Bigger rewards, nothing for wrong answers",
        config: HIGH_STAKES,
    },
    RewardPreset {
        id: "learning-focused",
        name: "Learning Focused",
        description: "Rewards participation over perfection",
        config: LEARNING_FOCUSED,
    },
    RewardPreset {
        id: "competitive",
        name: "Competitive",
        description: "Top rewards for fast, perfect answers",
        config: COMPETITIVE,
    },
];

/// Look up a preset by identifier.
pub fn preset(id: &str) -> Option<&'static RewardPreset> {
    PRESETS.iter().find(|p| p.id == id)
}

/// What a team achieved in phase 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedPhaseOutcome {
    /// Whether the phase was finished.
    pub completed: bool,
    /// Seconds left on the clock.
    pub time_remaining: i32,
    /// Length of the clock in seconds.
    pub total_time: i32,
    /// Every anagram solved.
    pub perfect_anagram: bool,
    /// Every word found.
    pub perfect_word_search: bool,
}

/// Computes token awards from a [`RewardTable`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenCalculator {
    rewards: RewardTable,
}

impl TokenCalculator {
    /// A calculator over `rewards`.
    pub const fn new(rewards: RewardTable) -> Self {
        Self { rewards }
    }

    /// The table in use.
    pub const fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    /// Tokens for phase 1.
    ///
    /// Nothing is awarded unless the phase was completed. The time bonus
    /// is paid in full with more than half the clock left and halved
    /// (rounding down) with more than a quarter left.
    pub fn phase1(&self, outcome: &TimedPhaseOutcome) -> i32 {
        if !outcome.completed {
            return 0;
        }
        let r = &self.rewards.phase1;
        let mut tokens = r.completion;

        if outcome.time_remaining > 0 && outcome.total_time > 0 {
            let remaining = i64::from(outcome.time_remaining);
            let total = i64::from(outcome.total_time);
            if remaining.saturating_mul(2) > total {
                tokens = tokens.saturating_add(r.time_bonus);
            } else if remaining.saturating_mul(4) > total {
                tokens = tokens.saturating_add(r.time_bonus.div_euclid(2));
            }
        }
        if outcome.perfect_anagram {
            tokens = tokens.saturating_add(r.perfect_anagram);
        }
        if outcome.perfect_word_search {
            tokens = tokens.saturating_add(r.perfect_word_search);
        }
        tokens
    }

    /// Tokens for phase 2.
    pub const fn phase2(&self, challenge_selected: bool, story_read: bool) -> i32 {
        let r = &self.rewards.phase2;
        let mut tokens = 0_i32;
        if challenge_selected {
            tokens = tokens.saturating_add(r.challenge_selection);
        }
        if story_read {
            tokens = tokens.saturating_add(r.completion);
        }
        tokens
    }

    /// Tokens for an answer in phases 3 to 5. Other phases earn nothing.
    pub const fn answer(&self, phase_number: i32, is_correct: bool) -> i32 {
        match phase_number {
            3 => self.rewards.phase3.award(is_correct),
            4 => self.rewards.phase4.award(is_correct),
            5 => self.rewards.phase5.award(is_correct),
            _ => 0,
        }
    }

    /// The most a team can earn across the whole game.
    pub fn max_possible(&self) -> i64 {
        let r = &self.rewards;
        [
            r.phase1.completion,
            r.phase1.time_bonus,
            r.phase1.perfect_anagram,
            r.phase1.perfect_word_search,
            r.phase2.completion,
            r.phase2.challenge_selection,
            r.phase3.correct,
            r.phase4.correct,
            r.phase5.correct,
        ]
        .into_iter()
        .map(i64::from)
        .fold(0, i64::saturating_add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn outcome(time_remaining: i32) -> TimedPhaseOutcome {
        TimedPhaseOutcome {
            completed: true,
            time_remaining,
            total_time: 180,
            perfect_anagram: false,
            perfect_word_search: false,
        }
    }

    #[test]
    fn default_table_serializes_with_client_field_names() {
        let json = serde_json::to_value(DEFAULT_REWARDS).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "phase1": {"completion": 15, "timeBonus": 10, "perfectAnagram": 5, "perfectWordSearch": 5},
                "phase2": {"completion": 20, "challengeSelection": 5},
                "phase3": {"correct": 25, "incorrect": 5},
                "phase4": {"correct": 30, "incorrect": 10},
                "phase5": {"correct": 35, "incorrect": 15},
            })
        );
    }

    #[test]
    fn time_bonus_tiers() {
        let calc = TokenCalculator::default();
        assert_eq!(calc.phase1(&outcome(120)), 25);
        assert_eq!(calc.phase1(&outcome(90)), 20);
        assert_eq!(calc.phase1(&outcome(46)), 20);
        assert_eq!(calc.phase1(&outcome(45)), 15);
        assert_eq!(calc.phase1(&outcome(0)), 15);
    }

    #[test]
    fn half_bonus_rounds_down() {
        let calc = TokenCalculator::new(HIGH_STAKES);
        assert_eq!(calc.phase1(&outcome(60)), 20 + 7);
    }

    #[test]
    fn incomplete_phase1_earns_nothing() {
        let calc = TokenCalculator::default();
        let o = TimedPhaseOutcome {
            completed: false,
            perfect_anagram: true,
            ..outcome(170)
        };
        assert_eq!(calc.phase1(&o), 0);
    }

    #[test]
    fn perfect_bonuses_stack() {
        let calc = TokenCalculator::default();
        let o = TimedPhaseOutcome {
            perfect_anagram: true,
            perfect_word_search: true,
            ..outcome(170)
        };
        assert_eq!(calc.phase1(&o), 35);
    }

    #[test]
    fn story_and_answer_phases() {
        let calc = TokenCalculator::default();
        assert_eq!(calc.phase2(true, true), 25);
        assert_eq!(calc.phase2(false, true), 20);
        assert_eq!(calc.phase2(false, false), 0);
        assert_eq!(calc.answer(3, true), 25);
        assert_eq!(calc.answer(4, false), 10);
        assert_eq!(calc.answer(5, true), 35);
        assert_eq!(calc.answer(1, true), 0);
    }

    #[test]
    fn max_possible_sums_best_outcomes() {
        assert_eq!(TokenCalculator::default().max_possible(), 150);
        assert_eq!(TokenCalculator::new(COMPETITIVE).max_possible(), 300);
    }

    #[test]
    fn presets_are_addressable_by_id() {
        assert_eq!(PRESETS.len(), 4);
        assert_eq!(preset("balanced").map(|p| p.config), Some(DEFAULT_REWARDS));
        assert_eq!(preset("high-stakes").map(|p| p.config.phase3.incorrect), Some(0));
        assert!(preset("unknown").is_none());
    }
}
