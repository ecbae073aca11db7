mod rules;
mod status;

pub use rules::{LifecycleStatus, TransitionRejected, TransitionValidator};
pub use status::{CandidateStatus, EntityType, JobStatus};
