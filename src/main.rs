use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use recruitd::api::{AppState, build_router};
use recruitd::batch::{BatchExecutor, BatchRequest, JobAction};
use recruitd::cli::{Cli, Command};
use recruitd::config::RecruitConfig;
use recruitd::ledger::OperationLedger;
use recruitd::lifecycle::{CandidateStatus, EntityType, JobStatus, TransitionValidator};
use recruitd::locks::TenantLocks;
use recruitd::model::{Actor, Job, Role, TenantId};
use recruitd::rollback::RollbackEngine;
use recruitd::store::{LogNotifier, MemoryDirectory, MemoryEntityStore};
use recruitd::telemetry;
use recruitd::ui::Report;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = RecruitConfig::load(cli.config.as_deref()).context("loading configuration")?;
    telemetry::init(&config.log_filter, cli.verbose);

    match cli.command {
        Command::Serve { bind } => serve(config, bind).await,
        Command::Transitions {
            entity_type,
            status,
        } => transitions(entity_type, &status),
        Command::Demo => demo().await,
    }
}

async fn serve(config: RecruitConfig, bind: Option<String>) -> Result<()> {
    let store = Arc::new(MemoryEntityStore::new());
    let seed = config.load_seed().context("loading seed entities")?;
    let seeded = seed.len();
    store.seed(seed).await;

    let state = AppState::new(
        &config,
        store,
        Arc::new(MemoryDirectory::new()),
        Arc::new(LogNotifier),
    );
    let app = build_router(state);

    let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, seeded, "recruitd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("recruitd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
    }
}

fn transitions(entity_type: EntityType, status: &str) -> Result<()> {
    // Reject typos instead of reporting them as terminal.
    match entity_type {
        EntityType::Job => {
            status.parse::<JobStatus>().map_err(anyhow::Error::msg)?;
        }
        EntityType::Candidate => {
            status.parse::<CandidateStatus>().map_err(anyhow::Error::msg)?;
        }
    }
    let allowed = TransitionValidator::allowed_next_raw(entity_type, status);
    Report::new().transitions(entity_type, status, &allowed);
    Ok(())
}

/// Activates three draft jobs in an in-memory store, then rolls the batch back.
async fn demo() -> Result<()> {
    let report = Report::new();
    let tenant = TenantId::new("demo");
    let actor = Actor::new("demo-recruiter", tenant.clone(), Role::Recruiter);

    let store = Arc::new(MemoryEntityStore::new());
    store
        .seed([
            Job::new(1, tenant.clone(), "Backend Engineer").into(),
            Job::new(2, tenant.clone(), "Product Designer").into(),
            Job::new(3, tenant, "Site Reliability Engineer").into(),
        ])
        .await;
    let ledger = Arc::new(OperationLedger::new());
    let locks = Arc::new(TenantLocks::new());

    let executor = BatchExecutor::new(
        store.clone(),
        ledger.clone(),
        Arc::new(LogNotifier),
        locks.clone(),
    );
    let rollback = RollbackEngine::new(
        store,
        ledger.clone(),
        Arc::new(MemoryDirectory::new()),
        locks,
    );

    report.heading("Bulk activate");
    let request =
        BatchRequest::new(JobAction::Activate, vec![1, 2, 3]).with_reason("demo launch");
    let outcome = executor.execute(&actor, request).await?;
    report.batch(&outcome);

    report.heading("Ledger");
    let page = ledger.list_by_tenant(&actor.tenant_id, 10, 0).await;
    report.json(&page);

    report.heading("Rollback");
    let undone = rollback.rollback(&outcome.operation_id, &actor).await?;
    report.rollback(&undone);

    Ok(())
}
