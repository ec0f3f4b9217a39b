use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::candidate::{Candidate, CandidateId, CandidatePatch, CandidateStatus, NewCandidate};

/// Insertion-ordered candidate records plus the "current candidate" pointer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateStore {
    candidates: Vec<Candidate>,
    #[serde(default)]
    current: Option<CandidateId>,
    #[serde(default)]
    sequence: u64,
}

/// Failures raised by candidate store lookups and updates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("candidate {0} not found")]
    NotFound(CandidateId),
    #[error("candidate status cannot move from {} back to {}", .from.label(), .to.label())]
    StatusRegression {
        from: CandidateStatus,
        to: CandidateStatus,
    },
}

impl CandidateStore {
    /// Assigns a fresh identifier and creation time, then appends the record.
    pub fn add(&mut self, candidate: NewCandidate, now: DateTime<Utc>) -> Candidate {
        self.sequence += 1;
        let status = candidate.initial_status();
        let record = Candidate {
            id: CandidateId(format!("cand-{:06}", self.sequence)),
            name: candidate.name,
            email: candidate.email,
            phone: candidate.phone,
            resume_file_name: candidate.resume_file_name,
            resume_data: candidate.resume_data,
            status,
            final_score: None,
            summary: None,
            created_at: now,
            completed_at: None,
        };
        self.candidates.push(record.clone());
        record
    }

    pub fn get(&self, id: &CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|candidate| &candidate.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Applies the patch field by field. A status in the patch must not move backwards.
    pub fn update(
        &mut self,
        id: &CandidateId,
        patch: CandidatePatch,
    ) -> Result<Candidate, StoreError> {
        let candidate = self
            .candidates
            .iter_mut()
            .find(|candidate| &candidate.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        if let Some(next) = patch.status {
            if !candidate.status.can_move_to(next) {
                return Err(StoreError::StatusRegression {
                    from: candidate.status,
                    to: next,
                });
            }
        }

        patch.apply(candidate);
        Ok(candidate.clone())
    }

    pub fn mark_completed(
        &mut self,
        id: &CandidateId,
        score: i32,
        summary: String,
        now: DateTime<Utc>,
    ) -> Result<Candidate, StoreError> {
        self.update(
            id,
            CandidatePatch {
                status: Some(CandidateStatus::Completed),
                final_score: Some(score),
                summary: Some(summary),
                completed_at: Some(now),
                ..CandidatePatch::default()
            },
        )
    }

    pub fn remove(&mut self, id: &CandidateId) -> Option<Candidate> {
        let index = self
            .candidates
            .iter()
            .position(|candidate| &candidate.id == id)?;
        if self.current.as_ref() == Some(id) {
            self.current = None;
        }
        Some(self.candidates.remove(index))
    }

    pub fn set_current(&mut self, id: &CandidateId) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NotFound(id.clone()));
        }
        self.current = Some(id.clone());
        Ok(())
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub fn current_id(&self) -> Option<&CandidateId> {
        self.current.as_ref()
    }

    pub fn current(&self) -> Option<&Candidate> {
        self.current.as_ref().and_then(|id| self.get(id))
    }
}
