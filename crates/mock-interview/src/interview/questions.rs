use serde::{Deserialize, Serialize};

/// Number of questions asked in every session.
pub const QUESTIONS_PER_SESSION: usize = 6;

/// Difficulty band; each band carries a fixed time allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn time_limit_secs(self) -> u32 {
        match self {
            Difficulty::Easy => 20,
            Difficulty::Medium => 60,
            Difficulty::Hard => 120,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// A single interview question together with whatever the candidate submitted for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub difficulty: Difficulty,
    pub time_limit_secs: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent_secs: Option<u32>,
}

impl Question {
    fn unanswered(id: &str, text: &str, difficulty: Difficulty) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            difficulty,
            time_limit_secs: difficulty.time_limit_secs(),
            answer: None,
            score: None,
            time_spent_secs: None,
        }
    }

    /// True once a submission (possibly empty) has been recorded.
    pub fn is_submitted(&self) -> bool {
        self.answer.is_some()
    }

    /// True when the recorded answer carries any text.
    pub fn has_answer(&self) -> bool {
        self.answer.as_deref().is_some_and(|answer| !answer.is_empty())
    }
}

/// Static catalog the sessions are cloned from.
pub struct QuestionBank;

impl QuestionBank {
    /// Two Easy, two Medium, then two Hard questions; same content and order every call.
    pub fn generate() -> Vec<Question> {
        vec![
            Question::unanswered(
                "1",
                "What is the difference between let, const, and var in JavaScript?",
                Difficulty::Easy,
            ),
            Question::unanswered(
                "2",
                "Explain the concept of closures in JavaScript with an example.",
                Difficulty::Easy,
            ),
            Question::unanswered(
                "3",
                "What are React hooks and how do useState and useEffect work?",
                Difficulty::Medium,
            ),
            Question::unanswered(
                "4",
                "Explain the difference between SQL and NoSQL databases. When would you use each?",
                Difficulty::Medium,
            ),
            Question::unanswered(
                "5",
                "Design a REST API for a simple e-commerce system. Include endpoints for products, users, and orders.",
                Difficulty::Hard,
            ),
            Question::unanswered(
                "6",
                "How would you optimize a React application for performance? Discuss lazy loading, memoization, and bundle optimization.",
                Difficulty::Hard,
            ),
        ]
    }
}
