//! recruitd: multi-tenant recruiting records with batch lifecycle
//! mutations, an operation ledger and snapshot-based rollback.

pub mod api;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod locks;
pub mod model;
pub mod rollback;
pub mod status_change;
pub mod store;
pub mod telemetry;
pub mod ui;

pub use error::RecruitError;
