//! Single-entity status handlers, gated by the transition graph.
//!
//! GET   /jobs/:id/status-transitions
//! PATCH /jobs/:id/status
//! GET   /candidates/:id/status-transitions
//! PATCH /candidates/:id/status

use axum::extract::Path;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::api::AppState;
use crate::api::error::AppError;
use crate::lifecycle::EntityType;
use crate::model::{Actor, EntityId};
use crate::status_change::{StatusChange, TransitionOptions};

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

async fn transitions(
    state: AppState,
    actor: Actor,
    entity_type: EntityType,
    id: Result<Path<EntityId>, PathRejection>,
) -> Result<Json<TransitionOptions>, AppError> {
    let Path(id) = id?;
    let options = state.status.transitions(&actor, entity_type, id).await?;
    Ok(Json(options))
}

async fn change(
    state: AppState,
    actor: Actor,
    entity_type: EntityType,
    id: Result<Path<EntityId>, PathRejection>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<StatusChange>, AppError> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let change = state
        .status
        .change_status(&actor, entity_type, id, &body.status, body.reason.as_deref())
        .await?;
    Ok(Json(change))
}

pub async fn job_transitions(
    Extension(state): Extension<AppState>,
    Extension(actor): Extension<Actor>,
    id: Result<Path<EntityId>, PathRejection>,
) -> Result<Json<TransitionOptions>, AppError> {
    transitions(state, actor, EntityType::Job, id).await
}

pub async fn change_job_status(
    Extension(state): Extension<AppState>,
    Extension(actor): Extension<Actor>,
    id: Result<Path<EntityId>, PathRejection>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<StatusChange>, AppError> {
    change(state, actor, EntityType::Job, id, payload).await
}

pub async fn candidate_transitions(
    Extension(state): Extension<AppState>,
    Extension(actor): Extension<Actor>,
    id: Result<Path<EntityId>, PathRejection>,
) -> Result<Json<TransitionOptions>, AppError> {
    transitions(state, actor, EntityType::Candidate, id).await
}

pub async fn change_candidate_status(
    Extension(state): Extension<AppState>,
    Extension(actor): Extension<Actor>,
    id: Result<Path<EntityId>, PathRejection>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<StatusChange>, AppError> {
    change(state, actor, EntityType::Candidate, id, payload).await
}
