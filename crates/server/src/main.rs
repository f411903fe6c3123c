// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use vigov::{GovernanceSnapshot, GovernanceState, InMemoryRepository};
use vigov_api::{
    ActorCapabilities, ApiError, ApiResult, AssignOwnerRequest, AssignRoleRequest,
    AssignmentActionRequest, AuditLogResponse, AuthError, AuthenticatedActor,
    AuthorizeAssignmentRequest, AuthorizeAssignmentResponse, CreateCenterRequest,
    ListAssignmentsResponse, ListUnitsResponse, TreeResponse, UnitPathResponse, UnitRequest,
    UnitsWithoutOwnerResponse, VisibleRecordsResponse, WriteResponse, approve_assignment,
    assign_owner, assign_role, audit_event, audit_log, authenticate, authorize_assignment,
    capabilities, create_center, create_unit, jurisdiction_tree, list_assignments, list_units,
    reject_assignment, revoke_assignment, unit_path, units_without_owner, update_unit,
    visible_records,
};
use vigov_audit::{AuditEvent, AuditSink, Cause, TracingAuditSink};
use vigov_domain::{
    ApprovalStatus, AssignmentStatus, RecordKind, RoleAssignment, RoleId, Scope, UserId,
};

/// Vehicle inspection governance server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON governance snapshot. If not provided, starts with an empty jurisdiction.
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Grants this user a national super admin assignment at startup
    #[arg(long)]
    bootstrap_admin: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Validate the snapshot and exit without serving
    #[arg(long)]
    check: bool,
}

/// Application state shared across handlers.
///
/// The repository sits behind a Mutex held for the whole
/// authenticate-apply-commit sequence, so writes are serialized.
#[derive(Clone)]
struct AppState {
    /// Governance state and the committed audit log.
    repository: Arc<Mutex<InMemoryRepository>>,
    /// Receives every committed audit event.
    audit_sink: Arc<dyn AuditSink>,
}

/// Envelope for state-changing requests.
///
/// Carries the acting user and the cause in addition to the request body.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct WriteApiRequest<T> {
    /// The user performing this action.
    actor_id: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The request body.
    #[serde(flatten)]
    request: T,
}

/// Envelope for read-only requests with a body.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ReadApiRequest<T> {
    /// The user performing this request.
    actor_id: String,
    /// The request body.
    #[serde(flatten)]
    request: T,
}

/// Query parameters identifying the acting user.
#[derive(Debug, Deserialize)]
struct ActorQuery {
    /// The user performing this request.
    actor_id: String,
}

/// Query parameters for the visible records endpoint.
#[derive(Debug, Deserialize)]
struct RecordsQuery {
    /// The user performing this request.
    actor_id: String,
    /// Restricts the listing to one record kind.
    #[serde(default)]
    kind: Option<RecordKind>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } | ApiError::Denied { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<AuthError> for HttpError {
    fn from(err: AuthError) -> Self {
        ApiError::from(err).into()
    }
}

/// The date assignments are evaluated on.
fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Authenticates the caller and runs a write against the repository.
///
/// The repository lock is held from authentication through commit. The
/// committed event is forwarded to the audit sink after the lock is released.
async fn run_write<F>(
    app_state: &AppState,
    actor_id: &str,
    cause: Cause,
    write: F,
) -> Result<Json<WriteResponse>, HttpError>
where
    F: FnOnce(
        &mut InMemoryRepository,
        &AuthenticatedActor,
        Cause,
        Date,
    ) -> Result<ApiResult<WriteResponse>, ApiError>,
{
    let as_of: Date = today();
    let mut repository = app_state.repository.lock().await;
    let actor: AuthenticatedActor = authenticate(repository.state(), actor_id, as_of)?;
    let result: ApiResult<WriteResponse> = write(&mut *repository, &actor, cause, as_of)?;
    drop(repository);

    app_state.audit_sink.record(&result.audit_event);

    info!(
        event_id = result.response.event_id,
        user_id = %actor.user_id,
        action = %result.audit_event.action.name,
        "Committed change"
    );

    Ok(Json(result.response))
}

/// Authenticates the caller and runs a read against the repository.
async fn run_read<T, F>(app_state: &AppState, actor_id: &str, read: F) -> Result<Json<T>, HttpError>
where
    F: FnOnce(&InMemoryRepository, &AuthenticatedActor) -> Result<T, ApiError>,
{
    let repository = app_state.repository.lock().await;
    let actor: AuthenticatedActor = authenticate(repository.state(), actor_id, today())?;
    let response: T = read(&*repository, &actor)?;
    drop(repository);

    Ok(Json(response))
}

/// Handler for POST `/authorize-assignment` endpoint.
///
/// Decides whether a role may be assigned at a scope. Changes nothing.
async fn handle_authorize_assignment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ReadApiRequest<AuthorizeAssignmentRequest>>,
) -> Result<Json<AuthorizeAssignmentResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        target_role = %req.request.target_role,
        target_scope = %req.request.target_scope,
        "Handling authorize_assignment request"
    );

    run_read(&app_state, &req.actor_id, |repository, actor| {
        Ok(authorize_assignment(repository.state(), &req.request, actor))
    })
    .await
}

/// Handler for GET `/visible-records` endpoint.
async fn handle_visible_records(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<RecordsQuery>,
) -> Result<Json<VisibleRecordsResponse>, HttpError> {
    info!(actor_id = %query.actor_id, kind = ?query.kind, "Handling visible_records request");

    run_read(&app_state, &query.actor_id, |repository, actor| {
        visible_records(repository.state(), actor, query.kind)
    })
    .await
}

/// Handler for GET `/units` endpoint.
async fn handle_list_units(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<ListUnitsResponse>, HttpError> {
    info!(actor_id = %query.actor_id, "Handling list_units request");

    run_read(&app_state, &query.actor_id, |repository, actor| {
        list_units(repository.state(), actor)
    })
    .await
}

/// Handler for POST `/units` endpoint.
async fn handle_create_unit(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<UnitRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        unit_id = %req.request.id,
        unit_type = %req.request.unit_type,
        "Handling create_unit request"
    );

    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let request: UnitRequest = req.request;
    run_write(&app_state, &req.actor_id, cause, |repository, actor, cause, as_of| {
        create_unit(repository, &request, actor, cause, as_of)
    })
    .await
}

/// Handler for POST `/units/update` endpoint.
async fn handle_update_unit(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<UnitRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        unit_id = %req.request.id,
        "Handling update_unit request"
    );

    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let request: UnitRequest = req.request;
    run_write(&app_state, &req.actor_id, cause, |repository, actor, cause, as_of| {
        update_unit(repository, &request, actor, cause, as_of)
    })
    .await
}

/// Handler for GET `/units/{unit_id}/path` endpoint.
async fn handle_unit_path(
    AxumState(app_state): AxumState<AppState>,
    Path(unit_id): Path<String>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<UnitPathResponse>, HttpError> {
    info!(actor_id = %query.actor_id, unit_id = %unit_id, "Handling unit_path request");

    run_read(&app_state, &query.actor_id, |repository, _actor| {
        unit_path(repository.state(), &unit_id)
    })
    .await
}

/// Handler for GET `/units/without-owner` endpoint.
async fn handle_units_without_owner(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<UnitsWithoutOwnerResponse>, HttpError> {
    info!(actor_id = %query.actor_id, "Handling units_without_owner request");

    run_read(&app_state, &query.actor_id, |repository, actor| {
        Ok(units_without_owner(repository.state(), actor))
    })
    .await
}

/// Handler for GET `/tree` endpoint.
async fn handle_tree(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<TreeResponse>, HttpError> {
    info!(actor_id = %query.actor_id, "Handling tree request");

    run_read(&app_state, &query.actor_id, |repository, _actor| {
        jurisdiction_tree(repository.state())
    })
    .await
}

/// Handler for POST `/centers` endpoint.
async fn handle_create_center(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<CreateCenterRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        center_id = %req.request.id,
        admin_unit_id = %req.request.admin_unit_id,
        "Handling create_center request"
    );

    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let request: CreateCenterRequest = req.request;
    run_write(&app_state, &req.actor_id, cause, |repository, actor, cause, as_of| {
        create_center(repository, &request, actor, cause, as_of)
    })
    .await
}

/// Handler for GET `/assignments` endpoint.
async fn handle_list_assignments(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<ListAssignmentsResponse>, HttpError> {
    info!(actor_id = %query.actor_id, "Handling list_assignments request");

    run_read(&app_state, &query.actor_id, |repository, actor| {
        Ok(list_assignments(repository.state(), actor))
    })
    .await
}

/// Handler for POST `/assignments` endpoint.
async fn handle_assign_role(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<AssignRoleRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        user_id = %req.request.user_id,
        role = %req.request.role_id,
        scope = %req.request.scope,
        "Handling assign_role request"
    );

    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let request: AssignRoleRequest = req.request;
    run_write(&app_state, &req.actor_id, cause, |repository, actor, cause, as_of| {
        assign_role(repository, &request, actor, cause, as_of)
    })
    .await
}

/// Handler for POST `/assignments/approve` endpoint.
async fn handle_approve_assignment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<AssignmentActionRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        assignment_id = req.request.assignment_id,
        "Handling approve_assignment request"
    );

    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let request: AssignmentActionRequest = req.request;
    run_write(&app_state, &req.actor_id, cause, |repository, actor, cause, as_of| {
        approve_assignment(repository, request, actor, cause, as_of)
    })
    .await
}

/// Handler for POST `/assignments/reject` endpoint.
async fn handle_reject_assignment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<AssignmentActionRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        assignment_id = req.request.assignment_id,
        "Handling reject_assignment request"
    );

    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let request: AssignmentActionRequest = req.request;
    run_write(&app_state, &req.actor_id, cause, |repository, actor, cause, as_of| {
        reject_assignment(repository, request, actor, cause, as_of)
    })
    .await
}

/// Handler for POST `/assignments/revoke` endpoint.
async fn handle_revoke_assignment(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<AssignmentActionRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        assignment_id = req.request.assignment_id,
        "Handling revoke_assignment request"
    );

    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let request: AssignmentActionRequest = req.request;
    run_write(&app_state, &req.actor_id, cause, |repository, actor, cause, as_of| {
        revoke_assignment(repository, request, actor, cause, as_of)
    })
    .await
}

/// Handler for POST `/owners` endpoint.
async fn handle_assign_owner(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<WriteApiRequest<AssignOwnerRequest>>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        unit_id = %req.request.unit_id,
        institution = %req.request.institution,
        "Handling assign_owner request"
    );

    let cause: Cause = Cause::new(req.cause_id, req.cause_description);
    let request: AssignOwnerRequest = req.request;
    run_write(&app_state, &req.actor_id, cause, |repository, actor, cause, as_of| {
        assign_owner(repository, &request, actor, cause, as_of)
    })
    .await
}

/// Handler for GET `/capabilities` endpoint.
async fn handle_capabilities(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<ActorCapabilities>, HttpError> {
    info!(actor_id = %query.actor_id, "Handling capabilities request");

    run_read(&app_state, &query.actor_id, |repository, actor| {
        Ok(capabilities(repository.state(), actor))
    })
    .await
}

/// Handler for GET `/audit` endpoint.
async fn handle_audit_log(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<AuditLogResponse>, HttpError> {
    info!(actor_id = %query.actor_id, "Handling audit_log request");

    run_read(&app_state, &query.actor_id, |repository, actor| {
        audit_log(repository, repository.state(), actor)
    })
    .await
}

/// Handler for GET `/audit/{event_id}` endpoint.
async fn handle_audit_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<u64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<AuditEvent>, HttpError> {
    info!(actor_id = %query.actor_id, event_id, "Handling audit_event request");

    run_read(&app_state, &query.actor_id, |repository, actor| {
        audit_event(repository, repository.state(), actor, event_id)
    })
    .await
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/authorize-assignment", post(handle_authorize_assignment))
        .route("/visible-records", get(handle_visible_records))
        .route("/units", get(handle_list_units).post(handle_create_unit))
        .route("/units/update", post(handle_update_unit))
        .route("/units/without-owner", get(handle_units_without_owner))
        .route("/units/{unit_id}/path", get(handle_unit_path))
        .route("/tree", get(handle_tree))
        .route("/centers", post(handle_create_center))
        .route(
            "/assignments",
            get(handle_list_assignments).post(handle_assign_role),
        )
        .route("/assignments/approve", post(handle_approve_assignment))
        .route("/assignments/reject", post(handle_reject_assignment))
        .route("/assignments/revoke", post(handle_revoke_assignment))
        .route("/owners", post(handle_assign_owner))
        .route("/capabilities", get(handle_capabilities))
        .route("/audit", get(handle_audit_log))
        .route("/audit/{event_id}", get(handle_audit_event))
        .with_state(app_state)
}

/// Adds a national super admin assignment for `user_id`.
///
/// Does nothing if the user already holds an active assignment.
fn bootstrap_admin(snapshot: &mut GovernanceSnapshot, user_id: &str, as_of: Date) {
    let user: UserId = UserId::new(user_id);
    if snapshot
        .assignments
        .iter()
        .any(|a| a.user_id == user && a.status == AssignmentStatus::Active)
    {
        warn!(user_id, "Bootstrap admin already holds an active assignment");
        return;
    }

    let assignment_id: u64 = snapshot
        .assignments
        .iter()
        .map(|a| a.assignment_id)
        .max()
        .unwrap_or(0)
        + 1;
    snapshot.assignments.push(RoleAssignment {
        assignment_id,
        user_id: user.clone(),
        role_id: RoleId::SuperAdmin,
        scope: Scope::national(),
        status: AssignmentStatus::Active,
        effective_from: as_of,
        effective_to: None,
        approval_required: false,
        approval_status: ApprovalStatus::NotRequired,
        requested_by: user,
        approved_by: None,
    });

    info!(user_id, assignment_id, "Granted bootstrap super admin");
}

/// Loads the startup state from the snapshot file, if any.
fn load_state(args: &Args) -> Result<GovernanceState, Box<dyn std::error::Error>> {
    let mut snapshot: GovernanceSnapshot = if let Some(path) = &args.snapshot {
        info!("Loading snapshot from: {}", path.display());
        let contents: String = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)?
    } else {
        info!("Starting with an empty jurisdiction");
        GovernanceSnapshot::default()
    };

    if let Some(user_id) = &args.bootstrap_admin {
        bootstrap_admin(&mut snapshot, user_id, today());
    }

    let state: GovernanceState = GovernanceState::from_snapshot(snapshot)?;
    info!(
        units = state.tree().units().count(),
        centers = state.tree().centers().count(),
        assignments = state.assignments().len(),
        records = state.records().len(),
        "Loaded governance state"
    );
    Ok(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing governance server");

    let state: GovernanceState = load_state(&args)?;
    if args.check {
        info!("Snapshot is valid");
        return Ok(());
    }

    let app_state: AppState = AppState {
        repository: Arc::new(Mutex::new(InMemoryRepository::new(state))),
        audit_sink: Arc::new(TracingAuditSink),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
