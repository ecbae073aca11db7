use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ActorDirectory, EntityStore};
use crate::error::StoreError;
use crate::lifecycle::EntityType;
use crate::model::{Actor, ActorId, Entity, EntityId, Role, TenantId};

type Key = (EntityType, EntityId);

/// Process-local entity store.
#[derive(Default)]
pub struct MemoryEntityStore {
    entities: RwLock<HashMap<Key, Entity>>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads entities regardless of tenant, replacing any with the same key.
    pub async fn seed(&self, entities: impl IntoIterator<Item = Entity>) {
        let mut map = self.entities.write().await;
        for entity in entities {
            map.insert((entity.entity_type(), entity.id()), entity);
        }
    }

    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }
}

fn not_found(entity_type: EntityType, id: EntityId) -> StoreError {
    StoreError::NotFound {
        entity_type: entity_type.to_string(),
        id,
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn get(
        &self,
        tenant: &TenantId,
        entity_type: EntityType,
        id: EntityId,
    ) -> Result<Option<Entity>, StoreError> {
        let map = self.entities.read().await;
        Ok(map
            .get(&(entity_type, id))
            .filter(|entity| entity.tenant_id() == tenant)
            .cloned())
    }

    async fn replace(&self, tenant: &TenantId, entity: Entity) -> Result<Entity, StoreError> {
        let key = (entity.entity_type(), entity.id());
        let mut map = self.entities.write().await;
        match map.get_mut(&key) {
            Some(current) if current.tenant_id() == tenant && entity.tenant_id() == tenant => {
                *current = entity.clone();
                Ok(entity)
            }
            _ => Err(not_found(key.0, key.1)),
        }
    }

    async fn delete(
        &self,
        tenant: &TenantId,
        entity_type: EntityType,
        id: EntityId,
    ) -> Result<(), StoreError> {
        let mut map = self.entities.write().await;
        let owned = map
            .get(&(entity_type, id))
            .is_some_and(|entity| entity.tenant_id() == tenant);
        if !owned {
            return Err(not_found(entity_type, id));
        }
        map.remove(&(entity_type, id));
        Ok(())
    }

    async fn restore(&self, tenant: &TenantId, entity: Entity) -> Result<Entity, StoreError> {
        let key = (entity.entity_type(), entity.id());
        if entity.tenant_id() != tenant {
            return Err(not_found(key.0, key.1));
        }
        let mut map = self.entities.write().await;
        if map.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                entity_type: key.0.to_string(),
                id: key.1,
            });
        }
        map.insert(key, entity.clone());
        Ok(entity)
    }
}

/// Process-local role directory, keyed by tenant and actor.
#[derive(Default)]
pub struct MemoryDirectory {
    roles: RwLock<HashMap<(TenantId, ActorId), Role>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_role(&self, tenant: TenantId, actor: ActorId, role: Role) {
        self.roles.write().await.insert((tenant, actor), role);
    }
}

#[async_trait]
impl ActorDirectory for MemoryDirectory {
    async fn current_role(
        &self,
        tenant: &TenantId,
        actor: &ActorId,
    ) -> Result<Option<Role>, StoreError> {
        let key = (tenant.clone(), actor.clone());
        Ok(self.roles.read().await.get(&key).copied())
    }

    async fn record(&self, actor: &Actor) -> Result<(), StoreError> {
        self.set_role(actor.tenant_id.clone(), actor.id.clone(), actor.role)
            .await;
        Ok(())
    }
}
