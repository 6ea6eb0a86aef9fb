//! Phase numbering shared by every part of the game.
//!
//! Phases are numbered `1..=TOTAL_PHASES`. A session whose
//! `current_phase` equals [`FINISHED_PHASE`] has completed the last phase.

/// Number of sequential phases in a game.
pub const TOTAL_PHASES: i32 = 5;

/// The phase every new session starts in.
pub const FIRST_PHASE: i32 = 1;

/// One past the last phase; the highest value `current_phase` can take.
pub const FINISHED_PHASE: i32 = TOTAL_PHASES + 1;

/// Whether `phase_number` names one of the game's phases.
pub const fn is_valid_phase(phase_number: i32) -> bool {
    phase_number >= FIRST_PHASE && phase_number <= TOTAL_PHASES
}

/// Iterate over all phase numbers in order.
pub fn all_phases() -> impl Iterator<Item = i32> {
    FIRST_PHASE..=TOTAL_PHASES
}

/// Display label for a phase, as shown next to configuration records.
pub fn phase_name(phase_number: i32) -> String {
    match phase_number {
        1 => "Phase 1 - Anagrams & Word Search".to_owned(),
        2 => "Phase 2 - Challenge Stories".to_owned(),
        n => format!("Phase {n}"),
    }
}
