use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ids::{ActorId, TenantId};

/// Role an actor holds inside their tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Owner,
    Admin,
    Recruiter,
    HiringManager,
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Admin => write!(f, "admin"),
            Role::Recruiter => write!(f, "recruiter"),
            Role::HiringManager => write!(f, "hiring-manager"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "recruiter" => Ok(Role::Recruiter),
            "hiring-manager" | "hiring_manager" => Ok(Role::HiringManager),
            "viewer" => Ok(Role::Viewer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// The authenticated caller of an operation, as handed over by the
/// authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: ActorId,
    pub tenant_id: TenantId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<ActorId>, tenant_id: impl Into<TenantId>, role: Role) -> Self {
        Self {
            id: id.into(),
            tenant_id: tenant_id.into(),
            role,
        }
    }
}
