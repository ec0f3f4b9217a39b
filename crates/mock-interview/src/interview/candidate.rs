use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl std::fmt::Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a candidate; only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    Incomplete,
    Ready,
    Interviewing,
    Completed,
}

impl CandidateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateStatus::Incomplete => "incomplete",
            CandidateStatus::Ready => "ready",
            CandidateStatus::Interviewing => "interviewing",
            CandidateStatus::Completed => "completed",
        }
    }

    /// Staying put counts as a valid move.
    pub fn can_move_to(self, next: CandidateStatus) -> bool {
        next >= self
    }
}

/// Stored candidate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_data: Option<String>,
    pub status: CandidateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Candidate {
    /// Required contact fields that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<ContactField> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push(ContactField::Name);
        }
        if self.email.trim().is_empty() {
            missing.push(ContactField::Email);
        }
        if self.phone.as_deref().map_or(true, |phone| phone.trim().is_empty()) {
            missing.push(ContactField::Phone);
        }
        missing
    }
}

/// Candidate fields supplied at registration; identity and timestamps are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCandidate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub resume_file_name: Option<String>,
    #[serde(default)]
    pub resume_data: Option<String>,
}

impl NewCandidate {
    /// Upload-time status: ready only when every contact field is already present.
    pub fn initial_status(&self) -> CandidateStatus {
        let phone_present = self
            .phone
            .as_deref()
            .is_some_and(|phone| !phone.trim().is_empty());
        if !self.name.trim().is_empty() && !self.email.trim().is_empty() && phone_present {
            CandidateStatus::Ready
        } else {
            CandidateStatus::Incomplete
        }
    }
}

/// Partial update. `None` leaves the stored value untouched; `Some` overrides it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub resume_file_name: Option<String>,
    #[serde(default)]
    pub resume_data: Option<String>,
    #[serde(default)]
    pub status: Option<CandidateStatus>,
    #[serde(default)]
    pub final_score: Option<i32>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl CandidatePatch {
    pub fn status(status: CandidateStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, candidate: &mut Candidate) {
        if let Some(name) = self.name {
            candidate.name = name;
        }
        if let Some(email) = self.email {
            candidate.email = email;
        }
        if let Some(phone) = self.phone {
            candidate.phone = Some(phone);
        }
        if let Some(file_name) = self.resume_file_name {
            candidate.resume_file_name = Some(file_name);
        }
        if let Some(data) = self.resume_data {
            candidate.resume_data = Some(data);
        }
        if let Some(status) = self.status {
            candidate.status = status;
        }
        if let Some(score) = self.final_score {
            candidate.final_score = Some(score);
        }
        if let Some(summary) = self.summary {
            candidate.summary = Some(summary);
        }
        if let Some(completed_at) = self.completed_at {
            candidate.completed_at = Some(completed_at);
        }
    }
}

/// Contact fields collected before an interview can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Email,
    Phone,
}

impl ContactField {
    pub const fn label(self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
        }
    }
}

/// Contact details submitted through the profile completion form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Rejected profile input, surfaced to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field(s): {}", join_labels(.0))]
    MissingFields(Vec<ContactField>),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("'{0}' is not a valid phone number")]
    InvalidPhone(String),
}

impl ValidationError {
    pub fn missing_fields(&self) -> &[ContactField] {
        match self {
            ValidationError::MissingFields(fields) => fields,
            _ => &[],
        }
    }
}

fn join_labels(fields: &[ContactField]) -> String {
    fields
        .iter()
        .map(|field| field.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("valid phone regex"))
}

impl ContactDetails {
    /// Checks presence first, then email shape, then the phone digits with punctuation stripped.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push(ContactField::Name);
        }
        if self.email.trim().is_empty() {
            missing.push(ContactField::Email);
        }
        if self.phone.trim().is_empty() {
            missing.push(ContactField::Phone);
        }
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        if !email_pattern().is_match(&self.email) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }

        let digits: String = self
            .phone
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect();
        if !phone_pattern().is_match(&digits) {
            return Err(ValidationError::InvalidPhone(self.phone.clone()));
        }

        Ok(())
    }

    pub(crate) fn into_patch(self) -> CandidatePatch {
        CandidatePatch {
            name: Some(self.name),
            email: Some(self.email),
            phone: Some(self.phone),
            status: Some(CandidateStatus::Ready),
            ..CandidatePatch::default()
        }
    }
}
