use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::candidate::{CandidateId, ContactDetails, NewCandidate};
use super::persistence::SnapshotStore;
use super::session::{AnswerOutcome, SessionError, SessionEvent, SessionTransition, TickOutcome};
use super::state::{InterviewError, InterviewState};
use super::store::StoreError;
use super::views::{
    CandidateDetailView, CandidateSummaryView, DashboardView, ResumePromptView,
    SessionSnapshotView,
};

/// Seconds between countdown checkpoints written to the snapshot store.
const TICK_CHECKPOINT_SECS: u32 = 5;

/// Facade serialising every interview mutation behind one lock; a mutation only takes
/// effect once its snapshot is saved.
pub struct InterviewService<S> {
    state: Mutex<InterviewState>,
    snapshots: Arc<S>,
}

impl<S> InterviewService<S>
where
    S: SnapshotStore + 'static,
{
    /// Starts from an empty state and ignores whatever the store holds.
    pub fn new(snapshots: Arc<S>) -> Self {
        Self {
            state: Mutex::new(InterviewState::default()),
            snapshots,
        }
    }

    /// Loads the last snapshot, pausing any session that was running when it was taken.
    pub fn restore(snapshots: Arc<S>) -> Result<Self, InterviewError> {
        let mut state = snapshots.load()?.unwrap_or_default();
        if state.suspend_for_restore() {
            info!("restored an unfinished interview; waiting for resume or start fresh");
            snapshots.save(&state)?;
        }
        Ok(Self {
            state: Mutex::new(state),
            snapshots,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, InterviewState>, InterviewError> {
        self.state.lock().map_err(|_| InterviewError::StatePoisoned)
    }

    fn persist(&self, state: &InterviewState) -> Result<(), InterviewError> {
        self.snapshots.save(state).map_err(|err| {
            warn!(error = %err, "failed to persist interview snapshot");
            InterviewError::from(err)
        })
    }

    /// Applies `change` to a copy of the state and swaps it in only once the copy is saved,
    /// so a rejected change or a failed save leaves the live state as it was.
    fn commit<T>(
        &self,
        change: impl FnOnce(&mut InterviewState) -> Result<T, InterviewError>,
    ) -> Result<T, InterviewError> {
        let mut state = self.lock()?;
        let mut next = state.clone();
        let value = change(&mut next)?;
        self.persist(&next)?;
        *state = next;
        Ok(value)
    }

    /// Registers an uploaded candidate and makes them current.
    pub fn register_candidate(
        &self,
        upload: NewCandidate,
    ) -> Result<CandidateSummaryView, InterviewError> {
        self.commit(|state| {
            let candidate = state.register_candidate(upload, Utc::now());
            Ok(CandidateSummaryView::from(&candidate))
        })
    }

    pub fn complete_profile(
        &self,
        id: &CandidateId,
        details: ContactDetails,
    ) -> Result<CandidateSummaryView, InterviewError> {
        self.commit(|state| {
            let candidate = state.complete_profile(id, details)?;
            Ok(CandidateSummaryView::from(&candidate))
        })
    }

    pub fn select_candidate(&self, id: &CandidateId) -> Result<(), InterviewError> {
        self.commit(|state| state.select_candidate(id))
    }

    pub fn start_interview(&self) -> Result<SessionSnapshotView, InterviewError> {
        self.commit(|state| {
            Ok(SessionSnapshotView::from_session(
                state.start_interview(Utc::now())?,
            ))
        })
    }

    /// Manual submission. Blank answers are rejected here; an omitted elapsed time is
    /// derived from the countdown.
    pub fn submit_answer(
        &self,
        answer: String,
        time_spent_secs: Option<u32>,
    ) -> Result<AnswerOutcome, InterviewError> {
        if answer.trim().is_empty() {
            return Err(InterviewError::EmptyAnswer);
        }

        self.commit(|state| {
            let time_spent_secs = match time_spent_secs {
                Some(spent) => spent,
                None => {
                    let session = state
                        .current_session()
                        .ok_or(InterviewError::NoActiveSession)?;
                    let limit = session
                        .current_question()
                        .map(|question| question.time_limit_secs)
                        .unwrap_or(0);
                    limit.saturating_sub(session.time_remaining_secs().unwrap_or(0))
                }
            };

            match state.apply(
                SessionEvent::Submit {
                    answer,
                    time_spent_secs,
                },
                Utc::now(),
            )? {
                SessionTransition::Answered(outcome) => Ok(outcome),
                _ => Err(InterviewError::NoActiveSession),
            }
        })
    }

    pub fn save_draft(&self, draft: String) -> Result<(), InterviewError> {
        self.commit(|state| state.save_draft(draft))
    }

    /// Clock tick for the question the caller's timer was armed for.
    ///
    /// The countdown lives in memory and is only checkpointed to the snapshot store every
    /// few seconds and on expiry; a failed checkpoint is logged and does not stop the clock.
    pub fn tick(&self, question_index: usize) -> Result<TickOutcome, InterviewError> {
        let mut state = self.lock()?;
        let current = state
            .current_session()
            .filter(|session| session.is_active())
            .ok_or(InterviewError::NoActiveSession)?
            .current_question_index();
        if current != question_index {
            warn!(question_index, current, "ignoring tick from superseded timer");
            return Err(SessionError::StaleQuestion {
                question_index,
                current,
            }
            .into());
        }

        let outcome = match state.apply(SessionEvent::Tick, Utc::now())? {
            SessionTransition::Ticked(outcome) => outcome,
            _ => return Err(InterviewError::NoActiveSession),
        };
        let checkpoint = match outcome {
            TickOutcome::Running { remaining_secs, .. } => {
                remaining_secs % TICK_CHECKPOINT_SECS == 0
            }
            TickOutcome::Expired { .. } => true,
            TickOutcome::Paused { .. } => false,
        };
        if checkpoint && self.persist(&state).is_err() {
            debug!(question_index, "countdown continues without a checkpoint");
        }
        Ok(outcome)
    }

    /// Time-up path: records the draft (or an empty answer) and advances.
    pub fn time_up(&self, question_index: usize) -> Result<AnswerOutcome, InterviewError> {
        let outcome = self.commit(|state| {
            match state.apply(SessionEvent::TimeUp { question_index }, Utc::now())? {
                SessionTransition::Answered(outcome) => Ok(outcome),
                _ => Err(InterviewError::NoActiveSession),
            }
        })?;
        info!(
            question_index,
            score = outcome.score,
            "question closed by timer"
        );
        Ok(outcome)
    }

    pub fn pause(&self) -> Result<SessionSnapshotView, InterviewError> {
        self.control(SessionEvent::Pause)
    }

    pub fn resume(&self) -> Result<SessionSnapshotView, InterviewError> {
        self.control(SessionEvent::Resume)
    }

    /// Finishes the current session now.
    pub fn end(&self) -> Result<SessionSnapshotView, InterviewError> {
        self.control(SessionEvent::End)
    }

    fn control(&self, event: SessionEvent) -> Result<SessionSnapshotView, InterviewError> {
        self.commit(|state| {
            state.apply(event, Utc::now())?;
            state
                .current_session()
                .map(SessionSnapshotView::from_session)
                .ok_or(InterviewError::NoActiveSession)
        })
    }

    /// Discards the current candidate and session.
    pub fn start_fresh(&self) -> Result<Option<CandidateSummaryView>, InterviewError> {
        self.commit(|state| {
            let removed = state.start_fresh();
            state.clear_current_session();
            Ok(removed.as_ref().map(CandidateSummaryView::from))
        })
    }

    pub fn current_session(&self) -> Result<Option<SessionSnapshotView>, InterviewError> {
        let state = self.lock()?;
        Ok(state.current_session().map(SessionSnapshotView::from_session))
    }

    pub fn current_candidate(&self) -> Result<Option<CandidateSummaryView>, InterviewError> {
        let state = self.lock()?;
        Ok(state.current_candidate().map(CandidateSummaryView::from))
    }

    pub fn resume_prompt(&self) -> Result<Option<ResumePromptView>, InterviewError> {
        let state = self.lock()?;
        Ok(ResumePromptView::from_state(&state))
    }

    pub fn dashboard(&self) -> Result<DashboardView, InterviewError> {
        let state = self.lock()?;
        Ok(DashboardView::from_state(&state))
    }

    pub fn candidate_detail(
        &self,
        id: &CandidateId,
    ) -> Result<CandidateDetailView, InterviewError> {
        let state = self.lock()?;
        let candidate = state
            .candidates()
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        Ok(CandidateDetailView {
            candidate: CandidateSummaryView::from(candidate),
            session: state
                .latest_session_for(id)
                .map(SessionSnapshotView::from_session),
        })
    }
}
