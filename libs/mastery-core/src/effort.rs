//! Effort scoring for practice attempts.
//!
//! Converts raw behavioral signals from a single question attempt into the
//! engagement score consumed by the mastery update rule. Adjustments are
//! independent and additive; more than one may apply to the same attempt.

const BASE_SCORE: f64 = 0.5;
const DELIBERATION_BONUS: f64 = 0.2;
const GUESSING_PENALTY: f64 = 0.3;
const REVISION_BONUS: f64 = 0.15;
const CORRECT_DELIBERATION_BONUS: f64 = 0.1;

const DELIBERATION_SECONDS: f64 = 20.0;
const GUESSING_SECONDS: f64 = 5.0;
const CORRECT_DELIBERATION_SECONDS: f64 = 10.0;

/// Score a single attempt's engagement quality into [0, 1].
///
/// Time spent above 20 s earns a deliberation bonus; under 5 s is treated
/// as guessing and penalized. A changed answer signals engagement, and a
/// correct answer reached with deliberation (over 10 s) earns a small
/// extra credit so lucky fast guesses do not.
pub fn compute_effort(time_spent_seconds: f64, revision_count: u32, is_correct: bool) -> f64 {
    let mut score = BASE_SCORE;

    if time_spent_seconds > DELIBERATION_SECONDS {
        score += DELIBERATION_BONUS;
    }
    if time_spent_seconds < GUESSING_SECONDS {
        score -= GUESSING_PENALTY;
    }
    if revision_count > 0 {
        score += REVISION_BONUS;
    }
    if is_correct && time_spent_seconds > CORRECT_DELIBERATION_SECONDS {
        score += CORRECT_DELIBERATION_BONUS;
    }

    score.clamp(0.0, 1.0)
}
