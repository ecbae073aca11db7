mod action;
mod executor;

pub use action::{BatchAction, CandidateAction, JobAction};
pub use executor::{
    BatchExecutor, BatchItemResult, BatchOutcome, BatchRequest, BatchSummary,
    DEFAULT_MAX_BATCH_SIZE,
};
