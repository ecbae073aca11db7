//! HTTP surface of the service.

pub mod auth;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, patch, post};
use axum::{Extension, Router, middleware as axum_mw};
use tower_http::trace::TraceLayer;

use crate::batch::BatchExecutor;
use crate::config::RecruitConfig;
use crate::ledger::OperationLedger;
use crate::locks::TenantLocks;
use crate::rollback::RollbackEngine;
use crate::status_change::StatusService;
use crate::store::{ActorDirectory, EntityStore, NotificationSink};

#[derive(Debug, Clone, Copy)]
pub struct Paging {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

/// Everything the handlers need, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<BatchExecutor>,
    pub rollback: Arc<RollbackEngine>,
    pub status: Arc<StatusService>,
    pub ledger: Arc<OperationLedger>,
    pub directory: Arc<dyn ActorDirectory>,
    pub paging: Paging,
}

impl AppState {
    /// Wires the engine around the given collaborators. The ledger and the
    /// tenant locks are shared by every component.
    pub fn new(
        config: &RecruitConfig,
        store: Arc<dyn EntityStore>,
        directory: Arc<dyn ActorDirectory>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let ledger = Arc::new(OperationLedger::new());
        let locks = Arc::new(TenantLocks::new());

        let executor = BatchExecutor::new(
            Arc::clone(&store),
            Arc::clone(&ledger),
            notifier,
            Arc::clone(&locks),
        )
        .with_max_batch_size(config.max_batch_size);
        let rollback = RollbackEngine::new(
            Arc::clone(&store),
            Arc::clone(&ledger),
            Arc::clone(&directory),
            Arc::clone(&locks),
        )
        .with_elevated_roles(config.elevated_roles.clone());
        let status = StatusService::new(store, locks);

        Self {
            executor: Arc::new(executor),
            rollback: Arc::new(rollback),
            status: Arc::new(status),
            ledger,
            directory,
            paging: Paging {
                default_page_size: config.default_page_size,
                max_page_size: config.max_page_size,
            },
        }
    }
}

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/jobs/bulk", post(handlers::bulk::bulk_jobs))
        .route(
            "/jobs/:id/status-transitions",
            get(handlers::status::job_transitions),
        )
        .route(
            "/jobs/:id/status",
            patch(handlers::status::change_job_status),
        )
        .route("/candidates/bulk", post(handlers::bulk::bulk_candidates))
        .route(
            "/candidates/:id/status-transitions",
            get(handlers::status::candidate_transitions),
        )
        .route(
            "/candidates/:id/status",
            patch(handlers::status::change_candidate_status),
        )
        .route(
            "/bulk-operations",
            get(handlers::operations::list_operations),
        )
        .route(
            "/bulk-operations/:operation_id",
            get(handlers::operations::get_operation),
        )
        .route(
            "/bulk-operations/:operation_id/rollback",
            post(handlers::operations::rollback_operation),
        )
        .layer(axum_mw::from_fn(auth::authenticate));

    let public = Router::new().route("/health", get(handlers::health));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::lifecycle::JobStatus;
    use crate::model::{Candidate, Job, Role, TenantId};
    use crate::store::{LogNotifier, MemoryDirectory, MemoryEntityStore};

    struct TestApp {
        router: Router,
        directory: Arc<MemoryDirectory>,
    }

    async fn test_app() -> TestApp {
        let store = Arc::new(MemoryEntityStore::new());
        let acme = TenantId::new("acme");
        store
            .seed([
                Job::new(1, acme.clone(), "Backend Engineer").into(),
                Job::new(2, acme.clone(), "Frontend Engineer").into(),
                Job::new(3, acme.clone(), "Data Engineer").into(),
                Job::new(4, acme.clone(), "Recruiter")
                    .with_status(JobStatus::Archived)
                    .into(),
                Job::new(9, TenantId::new("globex"), "Spy").into(),
                Candidate::new(20, acme.clone(), "Ada").into(),
                Candidate::new(21, acme, "Grace").into(),
            ])
            .await;
        let directory = Arc::new(MemoryDirectory::new());
        let state = AppState::new(
            &RecruitConfig::default(),
            store,
            directory.clone(),
            Arc::new(LogNotifier),
        );
        TestApp {
            router: build_router(state),
            directory,
        }
    }

    fn request(
        method: &str,
        uri: &str,
        actor: (&str, &str, &str),
        body: Option<Value>,
    ) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(auth::ACTOR_HEADER, actor.0)
            .header(auth::TENANT_HEADER, actor.1)
            .header(auth::ROLE_HEADER, actor.2);
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    const RECRUITER: (&str, &str, &str) = ("u1", "acme", "recruiter");
    const COLLEAGUE: (&str, &str, &str) = ("u2", "acme", "recruiter");
    const ADMIN: (&str, &str, &str) = ("u9", "acme", "admin");
    const OUTSIDER: (&str, &str, &str) = ("x1", "globex", "admin");

    async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn job_status(app: &TestApp, id: i64) -> String {
        let (status, body) = send(
            app,
            request("GET", &format!("/jobs/{id}/status-transitions"), RECRUITER, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["currentStatus"].as_str().unwrap().to_string()
    }

    async fn activate_first_three(app: &TestApp) -> String {
        let (status, body) = send(
            app,
            request(
                "POST",
                "/jobs/bulk",
                RECRUITER,
                Some(json!({ "jobIds": [1, 2, 3], "action": "activate" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["operationId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_needs_no_auth() {
        let app = test_app().await;
        let resp = app
            .router
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_identity_is_401() {
        let app = test_app().await;
        let req = Request::builder()
            .method("POST")
            .uri("/jobs/bulk")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"jobIds":[1],"action":"activate"}"#))
            .unwrap();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].as_str().unwrap().contains("x-actor-id"));
    }

    #[tokio::test]
    async fn bulk_activate_then_rollback() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/jobs/bulk",
                RECRUITER,
                Some(json!({ "jobIds": [1, 2, 3], "action": "activate", "reason": "launch" })),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["rollbackAvailable"], true);
        assert_eq!(body["reason"], "launch");
        assert_eq!(
            body["summary"],
            json!({ "total": 3, "successful": 3, "failed": 0, "action": "activate" })
        );
        assert_eq!(body["results"].as_array().unwrap().len(), 3);
        for id in [1, 2, 3] {
            assert_eq!(job_status(&app, id).await, "active");
        }

        let operation_id = body["operationId"].as_str().unwrap().to_string();
        let (status, body) = send(
            &app,
            request(
                "POST",
                &format!("/bulk-operations/{operation_id}/rollback"),
                RECRUITER,
                Some(json!({ "confirm": true })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["operationId"], operation_id.as_str());
        for id in [1, 2, 3] {
            assert_eq!(job_status(&app, id).await, "draft");
        }

        let (status, _) = send(
            &app,
            request(
                "POST",
                &format!("/bulk-operations/{operation_id}/rollback"),
                RECRUITER,
                Some(json!({ "confirm": true })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_transition_lists_allowed() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            request(
                "PATCH",
                "/jobs/1/status",
                RECRUITER,
                Some(json!({ "status": "closed" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Invalid status transition"));
        assert_eq!(body["allowedTransitions"], json!(["active", "archived"]));
    }

    #[tokio::test]
    async fn terminal_job_bulk_vs_single() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/jobs/bulk",
                RECRUITER,
                Some(json!({ "jobIds": [4], "action": "archive" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["successful"], 1);

        let (status, body) = send(
            &app,
            request(
                "PATCH",
                "/jobs/4/status",
                RECRUITER,
                Some(json!({ "status": "archived" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["allowedTransitions"], json!([]));
    }

    #[tokio::test]
    async fn legal_patch_returns_change() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            request(
                "PATCH",
                "/candidates/20/status",
                RECRUITER,
                Some(json!({ "status": "screening", "reason": "good CV" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["previousStatus"], "applied");
        assert_eq!(body["newStatus"], "screening");
        assert_eq!(body["entity"]["entityType"], "candidate");

        let (_, body) = send(
            &app,
            request("GET", "/candidates/20/status-transitions", RECRUITER, None),
        )
        .await;
        assert_eq!(
            body["allowedTransitions"],
            json!(["interview", "rejected", "on-hold"])
        );
    }

    #[tokio::test]
    async fn foreign_id_aborts_bulk_with_404() {
        let app = test_app().await;
        let (status, _) = send(
            &app,
            request(
                "POST",
                "/jobs/bulk",
                RECRUITER,
                Some(json!({ "jobIds": [1, 9], "action": "close" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(job_status(&app, 1).await, "draft");

        let (_, page) = send(&app, request("GET", "/bulk-operations", RECRUITER, None)).await;
        assert_eq!(page["total"], 0);
    }

    #[tokio::test]
    async fn malformed_bulk_payloads_are_400() {
        let app = test_app().await;
        let bad_bodies = [
            json!({ "jobIds": [1], "action": "publish" }),
            json!({ "jobIds": [], "action": "pause" }),
            json!({ "jobIds": (1..=101).collect::<Vec<i64>>(), "action": "pause" }),
            json!({ "action": "pause" }),
        ];
        for body in bad_bodies {
            let (status, resp) =
                send(&app, request("POST", "/jobs/bulk", RECRUITER, Some(body.clone()))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body} -> {resp}");
        }
    }

    #[tokio::test]
    async fn candidate_bulk_reject_with_notes() {
        let app = test_app().await;
        let (status, body) = send(
            &app,
            request(
                "POST",
                "/candidates/bulk",
                RECRUITER,
                Some(json!({
                    "candidateIds": [21, 20],
                    "action": "reject",
                    "notes": "role closed"
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"][0]["id"], 21);
        assert_eq!(body["results"][0]["result"]["status"], "rejected");
        assert!(
            body["results"][1]["result"]["notes"]
                .as_str()
                .unwrap()
                .ends_with("Rejected: role closed")
        );
    }

    #[tokio::test]
    async fn ledger_listing_and_detail() {
        let app = test_app().await;
        let first = activate_first_three(&app).await;
        let (_, second) = send(
            &app,
            request(
                "POST",
                "/jobs/bulk",
                RECRUITER,
                Some(json!({ "jobIds": [2], "action": "pause" })),
            ),
        )
        .await;

        let (status, page) = send(
            &app,
            request("GET", "/bulk-operations?limit=1&offset=0", RECRUITER, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 2);
        assert_eq!(page["hasMore"], true);
        assert_eq!(page["operations"][0]["id"], second["operationId"]);
        assert_eq!(page["operations"][0]["affectedCount"], 1);
        assert_eq!(page["operations"][0]["entityType"], "job");

        let (status, detail) = send(
            &app,
            request("GET", &format!("/bulk-operations/{first}"), RECRUITER, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["affectedIds"], json!([1, 2, 3]));
        assert_eq!(detail["affectedCount"], 3);
        assert_eq!(detail["originalData"][0]["entity"]["status"], "draft");
        assert_eq!(detail["rollbackAvailable"], true);

        let (status, _) = send(
            &app,
            request("GET", &format!("/bulk-operations/{first}"), OUTSIDER, None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            request("GET", "/bulk-operations?limit=0", RECRUITER, None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rollback_requires_confirmation() {
        let app = test_app().await;
        let op = activate_first_three(&app).await;
        let uri = format!("/bulk-operations/{op}/rollback");

        for body in [Some(json!({})), Some(json!({ "confirm": false })), None] {
            let (status, _) = send(&app, request("POST", &uri, RECRUITER, body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
        assert_eq!(job_status(&app, 1).await, "active");
    }

    #[tokio::test]
    async fn rollback_by_colleague_needs_admin() {
        let app = test_app().await;
        let op = activate_first_three(&app).await;
        let uri = format!("/bulk-operations/{op}/rollback");

        let (status, body) = send(
            &app,
            request("POST", &uri, COLLEAGUE, Some(json!({ "confirm": true }))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Not authorized"));
        assert_eq!(job_status(&app, 2).await, "active");

        // The directory reflects the admin's role from their own request.
        let (status, _) = send(
            &app,
            request("POST", &uri, ADMIN, Some(json!({ "confirm": true }))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(job_status(&app, 2).await, "draft");
        assert_eq!(
            app.directory
                .current_role(&"acme".into(), &"u9".into())
                .await
                .unwrap(),
            Some(Role::Admin)
        );
    }

    #[tokio::test]
    async fn admin_role_does_not_cross_tenants() {
        let app = test_app().await;
        let op = activate_first_three(&app).await;

        // Same actor id, admin in another tenant.
        let (status, _) = send(
            &app,
            request("GET", "/bulk-operations", ("u2", "globex", "admin"), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &app,
            request(
                "POST",
                &format!("/bulk-operations/{op}/rollback"),
                COLLEAGUE,
                Some(json!({ "confirm": true })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(job_status(&app, 1).await, "active");
    }

    #[tokio::test]
    async fn unknown_operation_is_404() {
        let app = test_app().await;
        let (status, _) = send(
            &app,
            request("GET", "/bulk-operations/bulk_nope", RECRUITER, None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            request(
                "POST",
                "/bulk-operations/bulk_nope/rollback",
                RECRUITER,
                Some(json!({ "confirm": true })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
