//! Test doubles shared by the engine tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{EntityStore, MemoryEntityStore, Notification, NotificationSink};
use crate::error::StoreError;
use crate::lifecycle::EntityType;
use crate::model::{Entity, EntityId, TenantId};

/// Wraps the memory store and fails writes for selected ids.
///
/// Every call yields to the scheduler first, so concurrent callers without
/// external locking interleave item by item.
#[derive(Default)]
pub(crate) struct FlakyStore {
    pub inner: MemoryEntityStore,
    pub fail_writes: Mutex<HashSet<EntityId>>,
}

impl FlakyStore {
    pub fn fail_on(&self, id: EntityId) {
        self.fail_writes.lock().unwrap().insert(id);
    }

    pub fn heal(&self) {
        self.fail_writes.lock().unwrap().clear();
    }

    fn check(&self, id: EntityId) -> Result<(), StoreError> {
        if self.fail_writes.lock().unwrap().contains(&id) {
            Err(StoreError::Unavailable(format!("write to {id} refused")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl EntityStore for FlakyStore {
    async fn get(
        &self,
        tenant: &TenantId,
        entity_type: EntityType,
        id: EntityId,
    ) -> Result<Option<Entity>, StoreError> {
        tokio::task::yield_now().await;
        self.inner.get(tenant, entity_type, id).await
    }

    async fn replace(&self, tenant: &TenantId, entity: Entity) -> Result<Entity, StoreError> {
        tokio::task::yield_now().await;
        self.check(entity.id())?;
        self.inner.replace(tenant, entity).await
    }

    async fn delete(
        &self,
        tenant: &TenantId,
        entity_type: EntityType,
        id: EntityId,
    ) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        self.check(id)?;
        self.inner.delete(tenant, entity_type, id).await
    }

    async fn restore(&self, tenant: &TenantId, entity: Entity) -> Result<Entity, StoreError> {
        tokio::task::yield_now().await;
        self.check(entity.id())?;
        self.inner.restore(tenant, entity).await
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

pub(crate) struct FailingNotifier;

#[async_trait]
impl NotificationSink for FailingNotifier {
    async fn notify(&self, _notification: &Notification) -> anyhow::Result<()> {
        anyhow::bail!("mail relay unreachable")
    }
}
