//! Per-tenant mutual exclusion for lifecycle mutations.
//!
//! A batch, a rollback replay and a single status change all hold the lock of
//! their tenant for their whole duration, so a captured pre-image can never
//! contain another in-flight mutation of the same tenant.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::model::TenantId;

#[derive(Default)]
pub struct TenantLocks {
    locks: Mutex<HashMap<TenantId, Arc<Mutex<()>>>>,
}

/// Held for as long as the tenant must stay exclusive.
pub type TenantGuard = OwnedMutexGuard<()>;

impl TenantLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, tenant: &TenantId) -> TenantGuard {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(tenant.clone()).or_default())
        };
        lock.lock_owned().await
    }
}
