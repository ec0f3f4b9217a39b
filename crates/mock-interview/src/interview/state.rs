use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::candidate::{
    Candidate, CandidateId, CandidatePatch, CandidateStatus, ContactDetails, NewCandidate,
    ValidationError,
};
use super::session::{InterviewSession, SessionError, SessionEvent, SessionId, SessionTransition};
use super::store::{CandidateStore, StoreError};

/// Everything the interview flow mutates, threaded explicitly through each operation.
///
/// Sessions accumulate in start order; at most one of them is current.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterviewState {
    candidates: CandidateStore,
    #[serde(default)]
    sessions: Vec<InterviewSession>,
    #[serde(default)]
    current_session: Option<SessionId>,
    #[serde(default)]
    session_sequence: u64,
}

/// Errors raised by the interview flow.
#[derive(Debug, thiserror::Error)]
pub enum InterviewError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Snapshot(#[from] super::persistence::SnapshotError),
    #[error("no candidate is currently selected")]
    NoCurrentCandidate,
    #[error("no interview session is in progress")]
    NoActiveSession,
    #[error("candidate {id} is {} and cannot start an interview", .status.label())]
    CandidateNotReady {
        id: CandidateId,
        status: CandidateStatus,
    },
    #[error("candidate {0} already has an interview in progress")]
    SessionInProgress(CandidateId),
    #[error("answer must not be empty")]
    EmptyAnswer,
    #[error("interview state lock poisoned")]
    StatePoisoned,
}

impl InterviewState {
    pub fn candidates(&self) -> &CandidateStore {
        &self.candidates
    }

    pub fn sessions(&self) -> &[InterviewSession] {
        &self.sessions
    }

    pub fn current_candidate(&self) -> Option<&Candidate> {
        self.candidates.current()
    }

    pub fn current_session(&self) -> Option<&InterviewSession> {
        let id = self.current_session.as_ref()?;
        self.sessions.iter().find(|session| session.id() == id)
    }

    fn current_session_mut(&mut self) -> Option<&mut InterviewSession> {
        let id = self.current_session.as_ref()?;
        self.sessions.iter_mut().find(|session| session.id() == id)
    }

    /// Most recent session for the candidate, if any.
    pub fn latest_session_for(&self, candidate_id: &CandidateId) -> Option<&InterviewSession> {
        self.sessions
            .iter()
            .rev()
            .find(|session| session.candidate_id() == candidate_id)
    }

    /// Stores an uploaded candidate and makes it current.
    pub fn register_candidate(&mut self, upload: NewCandidate, now: DateTime<Utc>) -> Candidate {
        let candidate = self.candidates.add(upload, now);
        // freshly added, so the id is known
        let _ = self.candidates.set_current(&candidate.id);
        info!(
            candidate_id = %candidate.id,
            status = candidate.status.label(),
            "candidate registered"
        );
        candidate
    }

    pub fn update_candidate(
        &mut self,
        id: &CandidateId,
        patch: CandidatePatch,
    ) -> Result<Candidate, InterviewError> {
        Ok(self.candidates.update(id, patch)?)
    }

    /// Validates contact details and marks the candidate ready.
    pub fn complete_profile(
        &mut self,
        id: &CandidateId,
        details: ContactDetails,
    ) -> Result<Candidate, InterviewError> {
        details.validate()?;
        let candidate = self.candidates.update(id, details.into_patch())?;
        info!(candidate_id = %candidate.id, "candidate profile completed");
        Ok(candidate)
    }

    pub fn select_candidate(&mut self, id: &CandidateId) -> Result<(), InterviewError> {
        Ok(self.candidates.set_current(id)?)
    }

    /// Starts a session for the current candidate, who must be ready. Refused while any
    /// session is still running, so switching candidates never strands an interview.
    pub fn start_interview(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<&InterviewSession, InterviewError> {
        let candidate = self
            .candidates
            .current()
            .ok_or(InterviewError::NoCurrentCandidate)?;
        let candidate_id = candidate.id.clone();

        // one running interview at a time, whoever is current now
        if let Some(active) = self
            .current_session()
            .filter(|session| session.is_active())
        {
            return Err(InterviewError::SessionInProgress(
                active.candidate_id().clone(),
            ));
        }
        if candidate.status != CandidateStatus::Ready {
            return Err(InterviewError::CandidateNotReady {
                id: candidate_id,
                status: candidate.status,
            });
        }

        self.candidates.update(
            &candidate_id,
            CandidatePatch::status(CandidateStatus::Interviewing),
        )?;

        self.session_sequence += 1;
        let session_id = SessionId(format!("session-{:06}", self.session_sequence));
        let session = InterviewSession::start(session_id.clone(), candidate_id.clone(), now);
        self.sessions.push(session);
        self.current_session = Some(session_id.clone());

        info!(%session_id, %candidate_id, "interview session started");
        self.current_session().ok_or(InterviewError::NoActiveSession)
    }

    /// Feeds an event to the current session and writes completion back to the candidate.
    pub fn apply(
        &mut self,
        event: SessionEvent,
        now: DateTime<Utc>,
    ) -> Result<SessionTransition, InterviewError> {
        let session = self
            .current_session_mut()
            .ok_or(InterviewError::NoActiveSession)?;

        let transition = match session.apply(event, now) {
            Ok(transition) => transition,
            Err(err) => {
                warn!(session_id = %session.id(), error = %err, "session transition rejected");
                return Err(err.into());
            }
        };

        let completed = match &transition {
            SessionTransition::Answered(outcome) => outcome.next.is_completed(),
            SessionTransition::Ended(advance) => advance.is_completed(),
            _ => false,
        };
        if completed {
            self.record_completion(now)?;
        }
        Ok(transition)
    }

    pub fn save_draft(&mut self, draft: String) -> Result<(), InterviewError> {
        let session = self
            .current_session_mut()
            .ok_or(InterviewError::NoActiveSession)?;
        Ok(session.save_draft(draft)?)
    }

    fn record_completion(&mut self, now: DateTime<Utc>) -> Result<(), InterviewError> {
        let (candidate_id, score, summary) = {
            let session = self
                .current_session()
                .ok_or(InterviewError::NoActiveSession)?;
            (
                session.candidate_id().clone(),
                session.final_score().unwrap_or(0),
                session
                    .summary()
                    .unwrap_or("Interview completed.")
                    .to_string(),
            )
        };

        self.candidates
            .mark_completed(&candidate_id, score, summary, now)?;
        info!(%candidate_id, final_score = score, "interview completed");
        Ok(())
    }

    /// Pauses an active current session; used after restoring from a snapshot because no
    /// time elapsed while nothing was ticking.
    pub fn suspend_for_restore(&mut self) -> bool {
        match self.current_session_mut() {
            Some(session) if session.is_active() => session.pause().is_ok(),
            _ => false,
        }
    }

    /// Discards the current candidate, their sessions, and both current pointers.
    pub fn start_fresh(&mut self) -> Option<Candidate> {
        self.current_session = None;
        let id = self.candidates.current_id()?.clone();
        self.sessions.retain(|session| session.candidate_id() != &id);
        let removed = self.candidates.remove(&id);
        info!(candidate_id = %id, "current candidate discarded");
        removed
    }

    pub fn clear_current_session(&mut self) {
        self.current_session = None;
    }
}
