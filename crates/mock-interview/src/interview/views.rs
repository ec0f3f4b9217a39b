use chrono::{DateTime, Utc};
use serde::Serialize;

use super::candidate::{Candidate, CandidateId, CandidateStatus, ContactField};
use super::questions::{Difficulty, Question};
use super::session::{InterviewSession, SessionId, SessionPhase};
use super::state::InterviewState;

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub number: usize,
    pub text: String,
    pub difficulty: Difficulty,
    pub difficulty_label: &'static str,
    pub time_limit_secs: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent_secs: Option<u32>,
}

impl QuestionView {
    fn from_question(index: usize, question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            number: index + 1,
            text: question.text.clone(),
            difficulty: question.difficulty,
            difficulty_label: question.difficulty.label(),
            time_limit_secs: question.time_limit_secs,
            answer: question.answer.clone(),
            score: question.score,
            time_spent_secs: question.time_spent_secs,
        }
    }
}

/// Outbound snapshot of a session for the candidate-facing flow and the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshotView {
    pub session_id: SessionId,
    pub candidate_id: CandidateId,
    pub phase: SessionPhase,
    pub current_question_index: usize,
    pub total_questions: usize,
    pub is_active: bool,
    pub is_paused: bool,
    pub progress_pct: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_remaining_secs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionView>,
    pub questions: Vec<QuestionView>,
    pub answered_questions: usize,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl SessionSnapshotView {
    pub fn from_session(session: &InterviewSession) -> Self {
        let questions: Vec<QuestionView> = session
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionView::from_question(index, question))
            .collect();
        let total = questions.len();
        let index = session.current_question_index();
        let current_question = session
            .current_question()
            .map(|question| QuestionView::from_question(index, question));

        Self {
            session_id: session.id().clone(),
            candidate_id: session.candidate_id().clone(),
            phase: session.phase(),
            current_question_index: index,
            total_questions: total,
            is_active: session.is_active(),
            is_paused: session.is_paused(),
            progress_pct: progress_pct(index, total),
            time_remaining_secs: session.time_remaining_secs(),
            current_question,
            questions,
            answered_questions: session.answered_count(),
            started_at: session.started_at(),
            ended_at: session.ended_at(),
            final_score: session.final_score(),
            summary: session.summary().map(str::to_string),
        }
    }
}

fn progress_pct(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((done.min(total) * 100) / total) as u8
}

/// Candidate record without the raw resume payload.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummaryView {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_file_name: Option<String>,
    pub status: CandidateStatus,
    pub status_label: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<ContactField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&Candidate> for CandidateSummaryView {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            email: candidate.email.clone(),
            phone: candidate.phone.clone(),
            resume_file_name: candidate.resume_file_name.clone(),
            status: candidate.status,
            status_label: candidate.status.label(),
            missing_fields: candidate.missing_fields(),
            final_score: candidate.final_score,
            summary: candidate.summary.clone(),
            created_at: candidate.created_at,
            completed_at: candidate.completed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateDetailView {
    pub candidate: CandidateSummaryView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionSnapshotView>,
}

/// Interviewer dashboard: every candidate in registration order plus headline totals.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub total_candidates: usize,
    pub interviewing: usize,
    pub completed: usize,
    pub average_score: i32,
    pub candidates: Vec<CandidateSummaryView>,
}

impl DashboardView {
    pub fn from_state(state: &InterviewState) -> Self {
        let candidates: Vec<CandidateSummaryView> = state
            .candidates()
            .iter()
            .map(CandidateSummaryView::from)
            .collect();
        let count_status = |status: CandidateStatus| {
            candidates
                .iter()
                .filter(|candidate| candidate.status == status)
                .count()
        };

        let scores: Vec<i32> = candidates.iter().filter_map(|c| c.final_score).collect();
        let average_score = if scores.is_empty() {
            0
        } else {
            (f64::from(scores.iter().sum::<i32>()) / scores.len() as f64).round() as i32
        };

        Self {
            total_candidates: candidates.len(),
            interviewing: count_status(CandidateStatus::Interviewing),
            completed: count_status(CandidateStatus::Completed),
            average_score,
            candidates,
        }
    }
}

/// Offered when a restored session is still in progress.
#[derive(Debug, Clone, Serialize)]
pub struct ResumePromptView {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub session_id: SessionId,
    pub question_number: usize,
    pub total_questions: usize,
    pub progress_pct: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_remaining_secs: Option<u32>,
}

impl ResumePromptView {
    pub fn from_state(state: &InterviewState) -> Option<Self> {
        let session = state.current_session().filter(|s| s.is_active())?;
        let candidate = state.candidates().get(session.candidate_id())?;
        let index = session.current_question_index();
        let total = session.questions().len();

        Some(Self {
            candidate_id: candidate.id.clone(),
            candidate_name: candidate.name.clone(),
            session_id: session.id().clone(),
            question_number: index + 1,
            total_questions: total,
            progress_pct: progress_pct(index, total),
            current_question: session
                .current_question()
                .map(|question| QuestionView::from_question(index, question)),
            time_remaining_secs: session.time_remaining_secs(),
        })
    }
}
