use serde::{Deserialize, Serialize};

use super::questions::{Question, QUESTIONS_PER_SESSION};

/// Score band selecting the wording of a session summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl PerformanceBand {
    pub const EXCELLENT_THRESHOLD: i32 = 80;
    pub const GOOD_THRESHOLD: i32 = 60;

    pub const fn from_score(score: i32) -> Self {
        if score >= Self::EXCELLENT_THRESHOLD {
            PerformanceBand::Excellent
        } else if score >= Self::GOOD_THRESHOLD {
            PerformanceBand::Good
        } else {
            PerformanceBand::NeedsImprovement
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "excellent",
            PerformanceBand::Good => "good",
            PerformanceBand::NeedsImprovement => "needs improvement",
        }
    }
}

/// Mean per-question score over the fixed question count, rounded to the nearest integer.
///
/// Unscored questions count as zero and the divisor never shrinks to the answered count.
pub fn final_score(questions: &[Question]) -> i32 {
    let total: i32 = questions.iter().map(|q| q.score.unwrap_or(0)).sum();
    (f64::from(total) / QUESTIONS_PER_SESSION as f64).round() as i32
}

/// Human readable verdict for a finished session.
pub fn summarize(questions: &[Question]) -> String {
    let score = final_score(questions);
    let answered = questions.iter().filter(|q| q.has_answer()).count();
    let total = QUESTIONS_PER_SESSION;

    match PerformanceBand::from_score(score) {
        PerformanceBand::Excellent => format!(
            "Excellent performance! Candidate demonstrated strong knowledge across {answered}/{total} questions with an average score of {score}%. Shows solid understanding of full-stack development concepts."
        ),
        PerformanceBand::Good => format!(
            "Good performance. Candidate answered {answered}/{total} questions with an average score of {score}%. Shows decent understanding but could benefit from more practice in some areas."
        ),
        PerformanceBand::NeedsImprovement => format!(
            "Needs improvement. Candidate completed {answered}/{total} questions with an average score of {score}%. Requires additional training in full-stack development fundamentals."
        ),
    }
}
