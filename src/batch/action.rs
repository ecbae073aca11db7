use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lifecycle::{CandidateStatus, EntityType, JobStatus};

/// Bulk actions available for jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobAction {
    Delete,
    Archive,
    Activate,
    Pause,
    Close,
}

impl JobAction {
    /// Status written by the action, `None` for deletion.
    pub fn target_status(self) -> Option<JobStatus> {
        match self {
            JobAction::Delete => None,
            JobAction::Archive => Some(JobStatus::Archived),
            JobAction::Activate => Some(JobStatus::Active),
            JobAction::Pause => Some(JobStatus::Paused),
            JobAction::Close => Some(JobStatus::Closed),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobAction::Delete => "delete",
            JobAction::Archive => "archive",
            JobAction::Activate => "activate",
            JobAction::Pause => "pause",
            JobAction::Close => "close",
        }
    }
}

/// Bulk actions available for candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateAction {
    Delete,
    Archive,
    Reject,
    MoveToScreening,
    MoveToInterview,
}

impl CandidateAction {
    pub fn target_status(self) -> Option<CandidateStatus> {
        match self {
            CandidateAction::Delete => None,
            CandidateAction::Archive => Some(CandidateStatus::Archived),
            CandidateAction::Reject => Some(CandidateStatus::Rejected),
            CandidateAction::MoveToScreening => Some(CandidateStatus::Screening),
            CandidateAction::MoveToInterview => Some(CandidateStatus::Interview),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CandidateAction::Delete => "delete",
            CandidateAction::Archive => "archive",
            CandidateAction::Reject => "reject",
            CandidateAction::MoveToScreening => "move-to-screening",
            CandidateAction::MoveToInterview => "move-to-interview",
        }
    }
}

/// One action applied to every target of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchAction {
    Job(JobAction),
    Candidate(CandidateAction),
}

impl BatchAction {
    pub fn entity_type(self) -> EntityType {
        match self {
            BatchAction::Job(_) => EntityType::Job,
            BatchAction::Candidate(_) => EntityType::Candidate,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BatchAction::Job(action) => action.as_str(),
            BatchAction::Candidate(action) => action.as_str(),
        }
    }

    pub fn is_delete(self) -> bool {
        matches!(
            self,
            BatchAction::Job(JobAction::Delete) | BatchAction::Candidate(CandidateAction::Delete)
        )
    }
}

impl fmt::Display for BatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<JobAction> for BatchAction {
    fn from(action: JobAction) -> Self {
        BatchAction::Job(action)
    }
}

impl From<CandidateAction> for BatchAction {
    fn from(action: CandidateAction) -> Self {
        BatchAction::Candidate(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_parse_from_wire_names() {
        let action: CandidateAction = serde_json::from_str("\"move-to-screening\"").unwrap();
        assert_eq!(action, CandidateAction::MoveToScreening);
        assert!(serde_json::from_str::<JobAction>("\"publish\"").is_err());
    }

    #[test]
    fn delete_has_no_target_status() {
        assert!(BatchAction::from(JobAction::Delete).is_delete());
        assert_eq!(JobAction::Delete.target_status(), None);
        assert_eq!(
            CandidateAction::Reject.target_status(),
            Some(CandidateStatus::Rejected)
        );
        assert!(!BatchAction::from(CandidateAction::Archive).is_delete());
    }

    #[test]
    fn wire_names_match_serde() {
        for action in [
            CandidateAction::Delete,
            CandidateAction::Archive,
            CandidateAction::Reject,
            CandidateAction::MoveToScreening,
            CandidateAction::MoveToInterview,
        ] {
            assert_eq!(
                serde_json::to_value(action).unwrap(),
                serde_json::Value::from(action.as_str())
            );
        }
        assert_eq!(BatchAction::from(JobAction::Activate).to_string(), "activate");
    }
}
