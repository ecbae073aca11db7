//! Authenticated-actor extraction.
//!
//! Authentication happens upstream; the gateway forwards the verified
//! identity in `x-actor-id`, `x-tenant-id` and `x-actor-role`. Requests
//! without them never reach a handler.

use axum::Extension;
use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use super::AppState;
use super::error::AppError;
use crate::error::RecruitError;
use crate::model::{Actor, Role};

pub const ACTOR_HEADER: &str = "x-actor-id";
pub const TENANT_HEADER: &str = "x-tenant-id";
pub const ROLE_HEADER: &str = "x-actor-role";

pub async fn authenticate(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let actor = actor_from_headers(request.headers())?;
    state.directory.record(&actor).await.map_err(RecruitError::from)?;
    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, RecruitError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RecruitError::Authentication(format!("missing {name} header")))
}

pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, RecruitError> {
    let id = header(headers, ACTOR_HEADER)?;
    let tenant = header(headers, TENANT_HEADER)?;
    let role = header(headers, ROLE_HEADER)?
        .parse::<Role>()
        .map_err(RecruitError::Authentication)?;
    Ok(Actor::new(id, tenant, role))
}
