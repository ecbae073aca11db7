//! Boundary collaborators consumed by the lifecycle engine.
//!
//! Persistence, identity and notification delivery live outside this crate.
//! The engine only talks to them through the traits below; the in-memory
//! implementations back the server binary and the tests.

mod memory;
mod notify;
#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::lifecycle::EntityType;
use crate::model::{Actor, ActorId, Entity, EntityId, Role, TenantId};

pub use memory::{MemoryDirectory, MemoryEntityStore};
pub use notify::{LogNotifier, Notification, NotificationSink};

/// Tenant-scoped access to jobs and candidates.
///
/// Every call takes the tenant of the caller; an entity owned by another
/// tenant behaves exactly like a missing one.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get(
        &self,
        tenant: &TenantId,
        entity_type: EntityType,
        id: EntityId,
    ) -> Result<Option<Entity>, StoreError>;

    /// Overwrites an existing entity with the given state.
    async fn replace(&self, tenant: &TenantId, entity: Entity) -> Result<Entity, StoreError>;

    async fn delete(
        &self,
        tenant: &TenantId,
        entity_type: EntityType,
        id: EntityId,
    ) -> Result<(), StoreError>;

    /// Re-creates a previously deleted entity under its original id.
    async fn restore(&self, tenant: &TenantId, entity: Entity) -> Result<Entity, StoreError>;
}

/// Source of truth for an actor's role at the time of a request.
///
/// Roles are per tenant: the same actor id may hold different roles in
/// different tenants.
#[async_trait]
pub trait ActorDirectory: Send + Sync {
    async fn current_role(
        &self,
        tenant: &TenantId,
        actor: &ActorId,
    ) -> Result<Option<Role>, StoreError>;

    /// Refreshes the directory from an authenticated request.
    async fn record(&self, actor: &Actor) -> Result<(), StoreError>;
}
