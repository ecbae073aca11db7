use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EntityId, TenantId};
use crate::lifecycle::{CandidateStatus, EntityType, JobStatus};

/// An open (or formerly open) position owned by one tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: EntityId,
    pub tenant_id: TenantId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: EntityId, tenant_id: TenantId, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            tenant_id,
            title: title.into(),
            department: None,
            location: None,
            status: JobStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = status;
        self
    }
}

/// A person in the hiring pipeline of one tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: EntityId,
    pub tenant_id: TenantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<EntityId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub status: CandidateStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(id: EntityId, tenant_id: TenantId, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            tenant_id,
            job_id: None,
            name: name.into(),
            email: None,
            status: CandidateStatus::Applied,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_status(mut self, status: CandidateStatus) -> Self {
        self.status = status;
        self
    }

    /// Appends a timestamped line to the free-text notes, keeping what is
    /// already there.
    pub fn append_note(&mut self, at: DateTime<Utc>, label: &str, text: &str) {
        let line = format!("[{}] {label}: {text}", at.to_rfc3339());
        self.notes = Some(match self.notes.take() {
            Some(existing) if !existing.is_empty() => format!("{existing}\n{line}"),
            _ => line,
        });
    }
}

/// Any tenant-scoped record the lifecycle engine can mutate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entityType", rename_all = "kebab-case")]
pub enum Entity {
    Job(Job),
    Candidate(Candidate),
}

impl Entity {
    pub fn id(&self) -> EntityId {
        match self {
            Entity::Job(job) => job.id,
            Entity::Candidate(candidate) => candidate.id,
        }
    }

    pub fn tenant_id(&self) -> &TenantId {
        match self {
            Entity::Job(job) => &job.tenant_id,
            Entity::Candidate(candidate) => &candidate.tenant_id,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Entity::Job(_) => EntityType::Job,
            Entity::Candidate(_) => EntityType::Candidate,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            Entity::Job(job) => job.status.as_str(),
            Entity::Candidate(candidate) => candidate.status.as_str(),
        }
    }

    /// Stamps `updated_at`.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        match self {
            Entity::Job(job) => job.updated_at = at,
            Entity::Candidate(candidate) => candidate.updated_at = at,
        }
    }
}

impl From<Job> for Entity {
    fn from(job: Job) -> Self {
        Entity::Job(job)
    }
}

impl From<Candidate> for Entity {
    fn from(candidate: Candidate) -> Self {
        Entity::Candidate(candidate)
    }
}

/// Full copy of an entity taken immediately before it was mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySnapshot {
    pub captured_at: DateTime<Utc>,
    pub entity: Entity,
}

impl EntitySnapshot {
    pub fn capture(entity: &Entity) -> Self {
        Self {
            captured_at: Utc::now(),
            entity: entity.clone(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.entity.id()
    }
}
