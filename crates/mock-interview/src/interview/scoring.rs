use super::questions::Question;

/// Upper bound applied after the time bonus; no lower bound is applied.
pub const MAX_QUESTION_SCORE: i32 = 100;

const TIME_BONUS_WEIGHT: f64 = 20.0;

/// Answer length thresholds, longest first: (exclusive minimum length, base score).
const LENGTH_BANDS: [(usize, i32); 4] = [(200, 95), (100, 85), (50, 75), (20, 60)];

/// Heuristic score for one answered question.
///
/// The base comes from the answer length band; the time bonus is
/// `20 * (limit - spent) / limit`, negative when overtime. The sum is rounded
/// to the nearest integer and capped at [`MAX_QUESTION_SCORE`]. A recorded time of
/// zero counts as no recorded time and earns no bonus.
pub fn score_question(question: &Question) -> i32 {
    let answer = match question.answer.as_deref() {
        Some(answer) if !answer.is_empty() => answer,
        _ => return 0,
    };

    let base = base_score(answer.chars().count());
    let bonus = question
        .time_spent_secs
        .filter(|spent| *spent > 0)
        .map(|spent| time_bonus(question.time_limit_secs, spent))
        .unwrap_or(0.0);

    let total = (f64::from(base) + bonus).round() as i32;
    total.min(MAX_QUESTION_SCORE)
}

fn base_score(length: usize) -> i32 {
    LENGTH_BANDS
        .iter()
        .find(|(threshold, _)| length > *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(0)
}

fn time_bonus(limit: u32, spent: u32) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    let remaining = f64::from(limit) - f64::from(spent);
    TIME_BONUS_WEIGHT * remaining / f64::from(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::questions::{Difficulty, QuestionBank};

    fn answered(difficulty: Difficulty, answer: &str, spent: u32) -> Question {
        let mut question = QuestionBank::generate()
            .into_iter()
            .find(|q| q.difficulty == difficulty)
            .expect("bank covers every difficulty");
        question.answer = Some(answer.to_string());
        question.time_spent_secs = Some(spent);
        question
    }

    #[test]
    fn short_easy_answer_earns_band_plus_bonus() {
        let question = answered(
            Difficulty::Easy,
            "JavaScript let, const, var differ in scope",
            5,
        );
        assert_eq!(score_question(&question), 75);
    }

    #[test]
    fn missing_or_empty_answer_scores_zero() {
        let mut question = answered(Difficulty::Hard, "", 120);
        assert_eq!(score_question(&question), 0);

        question.answer = None;
        assert_eq!(score_question(&question), 0);
    }

    #[test]
    fn length_bands_use_exclusive_thresholds() {
        let limit = Difficulty::Medium.time_limit_secs();
        let at = |len: usize| {
            score_question(&answered(Difficulty::Medium, &"x".repeat(len), limit))
        };
        assert_eq!(at(20), 0);
        assert_eq!(at(21), 60);
        assert_eq!(at(50), 60);
        assert_eq!(at(51), 75);
        assert_eq!(at(101), 85);
        assert_eq!(at(201), 95);
    }

    #[test]
    fn score_is_capped_at_one_hundred() {
        let question = answered(Difficulty::Hard, &"y".repeat(400), 1);
        assert_eq!(score_question(&question), MAX_QUESTION_SCORE);
    }

    #[test]
    fn zero_time_spent_earns_no_bonus() {
        let question = answered(Difficulty::Medium, &"y".repeat(60), 0);
        assert_eq!(score_question(&question), 75);

        let mut question = answered(Difficulty::Medium, &"y".repeat(60), 1);
        assert_eq!(score_question(&question), 95);
        question.time_spent_secs = None;
        assert_eq!(score_question(&question), 75);
    }

    #[test]
    fn overtime_is_not_lower_clamped() {
        // 21 characters in the 60 band, spent twice the limit: 60 - 20
        let question = answered(Difficulty::Easy, &"z".repeat(21), 40);
        assert_eq!(score_question(&question), 40);

        // no base, pure penalty
        let question = answered(Difficulty::Easy, "short", 40);
        assert_eq!(score_question(&question), -20);
    }

    #[test]
    fn more_time_left_never_lowers_the_score() {
        let answer = "a reasonably sized answer about hooks and effects";
        let limit = Difficulty::Medium.time_limit_secs();
        let mut previous = i32::MIN;
        for spent in (1..=limit).rev() {
            let score = score_question(&answered(Difficulty::Medium, answer, spent));
            assert!(score >= previous, "spent {spent} dropped score to {score}");
            previous = score;
        }
    }

    #[test]
    fn longer_answers_never_score_lower() {
        let mut previous = i32::MIN;
        for len in 0..260 {
            let score = score_question(&answered(Difficulty::Easy, &"w".repeat(len), 10));
            assert!(score >= previous);
            previous = score;
        }
    }
}
