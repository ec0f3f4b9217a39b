//! Timed interview session state machine.
//!
//! A session is created active on its first question and moves forward one question at a
//! time, either on an explicit answer or when the countdown for the current question runs
//! out. Every entry point takes the current time as an argument so transitions can be
//! driven without a wall clock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::candidate::CandidateId;
use super::questions::{Question, QuestionBank};
use super::scoring::score_question;
use super::summary::{final_score, summarize};

/// Identifier wrapper for interview sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse lifecycle position of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum SessionPhase {
    Active { paused: bool },
    Completed,
}

/// Discrete inputs accepted by [`InterviewSession::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// One second of the countdown elapsed.
    Tick,
    /// Manual submission; records the answer and moves on in one step.
    Submit { answer: String, time_spent_secs: u32 },
    /// Countdown expiry for the tagged question; records the draft (or nothing) and moves on.
    TimeUp { question_index: usize },
    Pause,
    Resume,
    /// Finish immediately; unanswered questions score zero.
    End,
}

/// Result of a successful [`InterviewSession::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTransition {
    Ticked(TickOutcome),
    Answered(AnswerOutcome),
    Paused,
    Resumed,
    Ended(Advance),
}

/// Countdown state after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum TickOutcome {
    Running { question_index: usize, remaining_secs: u32 },
    Paused { question_index: usize, remaining_secs: u32 },
    /// The countdown sits at zero; the time-up path owns this question now.
    Expired { question_index: usize },
}

/// Where the session landed after leaving a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Advance {
    Next { question_index: usize },
    Completed { final_score: i32, summary: String },
}

impl Advance {
    pub fn is_completed(&self) -> bool {
        matches!(self, Advance::Completed { .. })
    }

    pub fn next_question_index(&self) -> Option<usize> {
        match self {
            Advance::Next { question_index } => Some(*question_index),
            Advance::Completed { .. } => None,
        }
    }
}

/// A recorded answer together with the resulting advance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub question_index: usize,
    pub score: i32,
    pub next: Advance,
}

/// Rejected transitions; the session is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("interview session is not active")]
    NotActive,
    #[error("interview session is paused")]
    Paused,
    #[error("question {question_index} already has a submission")]
    AlreadySubmitted { question_index: usize },
    #[error("time expired for question {question_index}")]
    TimeExpired { question_index: usize },
    #[error("time has not expired for question {question_index}")]
    TimeRemaining { question_index: usize },
    #[error("question {question_index} is no longer current (now on {current})")]
    StaleQuestion { question_index: usize, current: usize },
}

/// One candidate's run through the fixed question sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSession {
    id: SessionId,
    candidate_id: CandidateId,
    questions: Vec<Question>,
    current_question_index: usize,
    is_active: bool,
    is_paused: bool,
    started_at: DateTime<Utc>,
    #[serde(default)]
    ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    final_score: Option<i32>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    time_remaining_secs: Option<u32>,
    #[serde(default)]
    draft_answer: Option<String>,
}

impl InterviewSession {
    pub fn start(id: SessionId, candidate_id: CandidateId, now: DateTime<Utc>) -> Self {
        let questions = QuestionBank::generate();
        let time_remaining_secs = questions.first().map(|q| q.time_limit_secs);
        Self {
            id,
            candidate_id,
            questions,
            current_question_index: 0,
            is_active: true,
            is_paused: false,
            started_at: now,
            ended_at: None,
            final_score: None,
            summary: None,
            time_remaining_secs,
            draft_answer: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn candidate_id(&self) -> &CandidateId {
        &self.candidate_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn current_question(&self) -> Option<&Question> {
        if !self.is_active {
            return None;
        }
        self.questions.get(self.current_question_index)
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn phase(&self) -> SessionPhase {
        if self.is_active {
            SessionPhase::Active {
                paused: self.is_paused,
            }
        } else {
            SessionPhase::Completed
        }
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    pub fn final_score(&self) -> Option<i32> {
        self.final_score
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn time_remaining_secs(&self) -> Option<u32> {
        self.time_remaining_secs
    }

    pub fn draft_answer(&self) -> Option<&str> {
        self.draft_answer.as_deref()
    }

    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.has_answer()).count()
    }

    /// Single dispatch point: (state, event) -> transition.
    pub fn apply(
        &mut self,
        event: SessionEvent,
        now: DateTime<Utc>,
    ) -> Result<SessionTransition, SessionError> {
        match event {
            SessionEvent::Tick => self.tick().map(SessionTransition::Ticked),
            SessionEvent::Submit {
                answer,
                time_spent_secs,
            } => self
                .answer_and_advance(answer, time_spent_secs, now)
                .map(SessionTransition::Answered),
            SessionEvent::TimeUp { question_index } => self
                .time_up(question_index, now)
                .map(SessionTransition::Answered),
            SessionEvent::Pause => self.pause().map(|()| SessionTransition::Paused),
            SessionEvent::Resume => self.resume().map(|()| SessionTransition::Resumed),
            SessionEvent::End => self.end(now).map(SessionTransition::Ended),
        }
    }

    /// Records an answer on the current question and scores it. Does not advance.
    pub fn submit_answer(
        &mut self,
        answer: impl Into<String>,
        time_spent_secs: u32,
    ) -> Result<i32, SessionError> {
        let question_index = self.ensure_answerable()?;
        if self.time_remaining_secs == Some(0) {
            return Err(SessionError::TimeExpired { question_index });
        }
        Ok(self.record(question_index, answer.into(), time_spent_secs))
    }

    /// Moves to the next question, or finalises the session after the last one.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Advance, SessionError> {
        if !self.is_active {
            return Err(SessionError::NotActive);
        }

        self.current_question_index += 1;
        self.draft_answer = None;

        match self.questions.get(self.current_question_index) {
            Some(next) => {
                self.time_remaining_secs = Some(next.time_limit_secs);
                debug!(
                    session_id = %self.id,
                    question_index = self.current_question_index,
                    "advanced to next question"
                );
                Ok(Advance::Next {
                    question_index: self.current_question_index,
                })
            }
            None => {
                self.current_question_index = self.questions.len();
                Ok(self.finalize(now))
            }
        }
    }

    /// Submit and advance as one step so no timer callback can slip in between.
    pub fn answer_and_advance(
        &mut self,
        answer: impl Into<String>,
        time_spent_secs: u32,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        let question_index = self.current_question_index;
        let score = self.submit_answer(answer, time_spent_secs)?;
        let next = self.advance(now)?;
        Ok(AnswerOutcome {
            question_index,
            score,
            next,
        })
    }

    /// Decrements the countdown unless paused. Never goes below zero.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        if !self.is_active {
            return Err(SessionError::NotActive);
        }
        let question_index = self.current_question_index;
        let remaining = self.time_remaining_secs.unwrap_or(0);

        if self.is_paused {
            return Ok(TickOutcome::Paused {
                question_index,
                remaining_secs: remaining,
            });
        }
        if remaining == 0 {
            return Ok(TickOutcome::Expired { question_index });
        }

        let remaining = remaining - 1;
        self.time_remaining_secs = Some(remaining);
        if remaining == 0 {
            debug!(session_id = %self.id, question_index, "question time expired");
            Ok(TickOutcome::Expired { question_index })
        } else {
            Ok(TickOutcome::Running {
                question_index,
                remaining_secs: remaining,
            })
        }
    }

    /// Time-up path for the tagged question: records the draft answer (or an empty one)
    /// with the full time limit spent, then advances.
    pub fn time_up(
        &mut self,
        question_index: usize,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        let current = self.ensure_answerable()?;
        if question_index != current {
            return Err(SessionError::StaleQuestion {
                question_index,
                current,
            });
        }
        if self.time_remaining_secs != Some(0) {
            return Err(SessionError::TimeRemaining { question_index });
        }

        let time_limit = self.questions[current].time_limit_secs;
        let answer = self.draft_answer.take().unwrap_or_default();
        let score = self.record(current, answer, time_limit);
        let next = self.advance(now)?;
        Ok(AnswerOutcome {
            question_index: current,
            score,
            next,
        })
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        if !self.is_active {
            return Err(SessionError::NotActive);
        }
        self.is_paused = true;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), SessionError> {
        if !self.is_active {
            return Err(SessionError::NotActive);
        }
        self.is_paused = false;
        Ok(())
    }

    /// Keeps the in-progress answer so the time-up path can record it.
    pub fn save_draft(&mut self, draft: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_answerable()?;
        self.draft_answer = Some(draft.into());
        Ok(())
    }

    pub fn end(&mut self, now: DateTime<Utc>) -> Result<Advance, SessionError> {
        if !self.is_active {
            return Err(SessionError::NotActive);
        }
        Ok(self.finalize(now))
    }

    fn ensure_answerable(&self) -> Result<usize, SessionError> {
        if !self.is_active {
            return Err(SessionError::NotActive);
        }
        if self.is_paused {
            return Err(SessionError::Paused);
        }
        let index = self.current_question_index;
        match self.questions.get(index) {
            Some(question) if question.is_submitted() => Err(SessionError::AlreadySubmitted {
                question_index: index,
            }),
            Some(_) => Ok(index),
            None => Err(SessionError::NotActive),
        }
    }

    fn record(&mut self, index: usize, answer: String, time_spent_secs: u32) -> i32 {
        let question = &mut self.questions[index];
        question.answer = Some(answer);
        question.time_spent_secs = Some(time_spent_secs);
        let score = score_question(question);
        question.score = Some(score);
        self.draft_answer = None;
        debug!(
            session_id = %self.id,
            question_index = index,
            score,
            time_spent_secs,
            "answer recorded"
        );
        score
    }

    fn finalize(&mut self, now: DateTime<Utc>) -> Advance {
        let score = final_score(&self.questions);
        let summary = summarize(&self.questions);

        self.is_active = false;
        self.is_paused = false;
        self.ended_at = Some(now);
        self.final_score = Some(score);
        self.summary = Some(summary.clone());
        self.time_remaining_secs = None;
        self.draft_answer = None;

        Advance::Completed {
            final_score: score,
            summary,
        }
    }
}
