//! Timed mock interviews: candidate intake, the six-question session state machine,
//! heuristic scoring, and the interviewer dashboard.
//!
//! `InterviewState` is the single owned aggregate. `InterviewService` serialises access to
//! it, persists a snapshot after every mutation and exposes the read models in `views`.
//! `QuestionTicker` drives the countdown and `interview_router` exposes all of it over HTTP.

pub mod candidate;
pub mod persistence;
pub mod questions;
pub mod router;
pub(crate) mod scoring;
pub mod service;
pub mod session;
pub mod state;
pub mod store;
pub(crate) mod summary;
pub mod ticker;
pub mod views;

#[cfg(test)]
mod tests;

pub use candidate::{
    Candidate, CandidateId, CandidatePatch, CandidateStatus, ContactDetails, ContactField,
    NewCandidate, ValidationError,
};
pub use persistence::{JsonFileSnapshotStore, MemorySnapshotStore, SnapshotError, SnapshotStore};
pub use questions::{Difficulty, Question, QuestionBank, QUESTIONS_PER_SESSION};
pub use router::{interview_router, AnswerRequest, DraftRequest, InterviewApi};
pub use scoring::{score_question, MAX_QUESTION_SCORE};
pub use service::InterviewService;
pub use session::{
    Advance, AnswerOutcome, InterviewSession, SessionError, SessionEvent, SessionId,
    SessionPhase, SessionTransition, TickOutcome,
};
pub use state::{InterviewError, InterviewState};
pub use store::{CandidateStore, StoreError};
pub use summary::{final_score, summarize, PerformanceBand};
pub use ticker::QuestionTicker;
pub use views::{
    CandidateDetailView, CandidateSummaryView, DashboardView, QuestionView, ResumePromptView,
    SessionSnapshotView,
};
