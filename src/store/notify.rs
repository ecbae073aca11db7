use async_trait::async_trait;
use serde::Serialize;

use crate::model::{ActorId, OperationId, TenantId};

/// A message addressed to one actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub actor_id: ActorId,
    pub tenant_id: TenantId,
    pub title: String,
    pub message: String,
    pub operation_id: Option<OperationId>,
}

/// Fire-and-forget delivery channel. Callers log failures and move on.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()>;
}

/// Delivers notifications to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn notify(&self, notification: &Notification) -> anyhow::Result<()> {
        tracing::info!(
            actor = %notification.actor_id,
            tenant = %notification.tenant_id,
            operation = ?notification.operation_id.as_ref().map(OperationId::as_str),
            "{}: {}",
            notification.title,
            notification.message
        );
        Ok(())
    }
}
