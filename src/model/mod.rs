mod actor;
mod entity;
mod ids;

pub use actor::{Actor, Role};
pub use entity::{Candidate, Entity, EntitySnapshot, Job};
pub use ids::{ActorId, EntityId, OperationId, TenantId};
