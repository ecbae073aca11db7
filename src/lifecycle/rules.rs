use std::fmt;

use thiserror::Error;

use super::status::{CandidateStatus, EntityType, JobStatus};

/// A status enumeration with a static transition table.
///
/// States missing from [`rules`](LifecycleStatus::rules) have no outgoing
/// edges; there is no implicit "any state" transition.
pub trait LifecycleStatus: Copy + Eq + fmt::Display + 'static {
    const ENTITY: EntityType;

    fn rules() -> &'static [(Self, &'static [Self])];
}

static JOB_RULES: &[(JobStatus, &[JobStatus])] = &[
    (JobStatus::Draft, &[JobStatus::Active, JobStatus::Archived]),
    (JobStatus::Active, &[JobStatus::Paused, JobStatus::Closed]),
    (JobStatus::Paused, &[JobStatus::Active, JobStatus::Closed]),
    (JobStatus::Closed, &[JobStatus::Archived]),
    (JobStatus::Archived, &[]),
];

static CANDIDATE_RULES: &[(CandidateStatus, &[CandidateStatus])] = &[
    (
        CandidateStatus::Applied,
        &[CandidateStatus::Screening, CandidateStatus::Rejected],
    ),
    (
        CandidateStatus::Screening,
        &[
            CandidateStatus::Interview,
            CandidateStatus::Rejected,
            CandidateStatus::OnHold,
        ],
    ),
    (
        CandidateStatus::Interview,
        &[
            CandidateStatus::Offer,
            CandidateStatus::Rejected,
            CandidateStatus::OnHold,
        ],
    ),
    (
        CandidateStatus::Offer,
        &[CandidateStatus::Hired, CandidateStatus::Rejected],
    ),
    (
        CandidateStatus::OnHold,
        &[
            CandidateStatus::Screening,
            CandidateStatus::Interview,
            CandidateStatus::Rejected,
        ],
    ),
    (CandidateStatus::Hired, &[]),
    (CandidateStatus::Rejected, &[]),
    (CandidateStatus::Withdrawn, &[]),
    (CandidateStatus::Archived, &[]),
];

impl LifecycleStatus for JobStatus {
    const ENTITY: EntityType = EntityType::Job;

    fn rules() -> &'static [(Self, &'static [Self])] {
        JOB_RULES
    }
}

impl LifecycleStatus for CandidateStatus {
    const ENTITY: EntityType = EntityType::Candidate;

    fn rules() -> &'static [(Self, &'static [Self])] {
        CANDIDATE_RULES
    }
}

/// A requested status change that the transition graph does not permit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid status transition from {from} to {to}")]
pub struct TransitionRejected {
    pub entity_type: EntityType,
    pub from: String,
    pub to: String,
    pub allowed: Vec<String>,
}

/// Decides whether a single-entity status change is legal.
pub struct TransitionValidator;

impl TransitionValidator {
    /// Statuses reachable in one step from `current`, in table order.
    pub fn allowed_next<S: LifecycleStatus>(current: S) -> &'static [S] {
        S::rules()
            .iter()
            .find(|(state, _)| *state == current)
            .map(|(_, next)| *next)
            .unwrap_or(&[])
    }

    /// String-level lookup used at the API boundary. An unknown status has
    /// no outgoing transitions.
    pub fn allowed_next_raw(entity_type: EntityType, current: &str) -> Vec<&'static str> {
        match entity_type {
            EntityType::Job => current
                .parse::<JobStatus>()
                .map(|s| Self::allowed_next(s).iter().map(|n| n.as_str()).collect())
                .unwrap_or_default(),
            EntityType::Candidate => current
                .parse::<CandidateStatus>()
                .map(|s| Self::allowed_next(s).iter().map(|n| n.as_str()).collect())
                .unwrap_or_default(),
        }
    }

    pub fn is_terminal<S: LifecycleStatus>(current: S) -> bool {
        Self::allowed_next(current).is_empty()
    }

    pub fn validate<S: LifecycleStatus>(
        current: S,
        requested: S,
    ) -> Result<(), TransitionRejected> {
        let allowed = Self::allowed_next(current);
        if allowed.contains(&requested) {
            Ok(())
        } else {
            Err(TransitionRejected {
                entity_type: S::ENTITY,
                from: current.to_string(),
                to: requested.to_string(),
                allowed: allowed.iter().map(ToString::to_string).collect(),
            })
        }
    }
}
