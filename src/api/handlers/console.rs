//! Normalized console endpoints under `/api/console`.
//!
//! Each handler reads the session cookie, makes one backend call through
//! [`crate::service::ConsoleService`], and returns a UI-shaped view model.
//! Malformed queries and bodies are rejected as [`BffError::InvalidRequest`].

use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;

use crate::api::dto::{
    AuditLogQuery, DepositCreditsQuery, HealthcheckQuery, ManualDepositRequest,
    NotificationRequest, OkResponse, Paged, RejectWithdrawalRequest, ScanLogQuery,
    StatusListQuery, SweepLogQuery, UpdateRoleRequest, UpdateStatusRequest, UserListQuery,
};
use crate::app_state::AppState;
use crate::domain::dashboard::{
    AdminBlockchainSummary, AdminDashboardOverview, AdminManualDepositResult,
};
use crate::domain::deposit_credit::AdminDepositCreditsReport;
use crate::domain::pagination::PaginatedResult;
use crate::domain::promotion::{AdminPromotion, PromotionDraft};
use crate::domain::telemetry::{AdminAuditLog, AdminDepositScanLog, AdminHealthcheck, AdminSweepLog};
use crate::domain::transaction::AdminTransaction;
use crate::domain::user::{AdminUser, UserRoleUpdate, UserStatusUpdate};
use crate::domain::withdrawal::AdminWithdrawRequest;
use crate::error::{BffError, ErrorResponse};
use crate::session::AccessToken;

// ── Dashboard ──────────────────────────────────────────────────────────

/// `GET /api/console/dashboard/overview` — Platform KPIs.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/dashboard/overview",
    tag = "Dashboard",
    summary = "Dashboard overview",
    description = "Revenue, payouts, user counts, and hot/gas wallet balances.",
    responses(
        (status = 200, description = "Overview", body = AdminDashboardOverview),
        (status = 401, description = "No valid session", body = ErrorResponse),
    )
)]
pub async fn dashboard_overview(
    State(state): State<AppState>,
    token: AccessToken,
) -> Result<Json<AdminDashboardOverview>, BffError> {
    let overview = state.console_service.dashboard_overview(token.as_deref()).await?;
    Ok(Json(overview))
}

/// `GET /api/console/blockchain/summary` — Chain-side totals.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/blockchain/summary",
    tag = "Dashboard",
    summary = "Blockchain summary",
    description = "Deposit totals, sweep state counts, and gas spent.",
    responses(
        (status = 200, description = "Summary", body = AdminBlockchainSummary),
        (status = 401, description = "No valid session", body = ErrorResponse),
    )
)]
pub async fn blockchain_summary(
    State(state): State<AppState>,
    token: AccessToken,
) -> Result<Json<AdminBlockchainSummary>, BffError> {
    let summary = state.console_service.blockchain_summary(token.as_deref()).await?;
    Ok(Json(summary))
}

// ── Users ──────────────────────────────────────────────────────────────

/// `GET /api/console/users` — Paginated user list.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/users",
    tag = "Users",
    summary = "List users",
    params(UserListQuery),
    responses(
        (status = 200, description = "A page of users", body = PaginatedResult<AdminUser>),
        (status = 401, description = "No valid session", body = ErrorResponse),
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    token: AccessToken,
    WithRejection(Query(query), _): WithRejection<Query<UserListQuery>, BffError>,
) -> Result<Json<PaginatedResult<AdminUser>>, BffError> {
    let page = state
        .console_service
        .list_users(token.as_deref(), query.window(), query.search.as_deref())
        .await?;
    Ok(Json(page))
}

/// `PATCH /api/console/users/{id}/role` — Change a user's role.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    patch,
    path = "/api/console/users/{id}/role",
    tag = "Users",
    summary = "Change role",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateRoleRequest,
    responses(
        (status = 200, description = "Role in effect", body = UserRoleUpdate),
        (status = 403, description = "Not allowed", body = ErrorResponse),
    )
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateRoleRequest>, BffError>,
) -> Result<Json<UserRoleUpdate>, BffError> {
    let update = state
        .console_service
        .update_user_role(token.as_deref(), &id, req.role)
        .await?;
    Ok(Json(update))
}

/// `PATCH /api/console/users/{id}/status` — Suspend or reactivate a user.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    patch,
    path = "/api/console/users/{id}/status",
    tag = "Users",
    summary = "Change status",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status in effect", body = UserStatusUpdate),
        (status = 403, description = "Not allowed", body = ErrorResponse),
    )
)]
pub async fn update_user_status(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateStatusRequest>, BffError>,
) -> Result<Json<UserStatusUpdate>, BffError> {
    let update = state
        .console_service
        .update_user_status(token.as_deref(), &id, req.status)
        .await?;
    Ok(Json(update))
}

/// `POST /api/console/users/{id}/notifications` — Notify one user.
///
/// # Errors
///
/// Returns a validation error for a blank title or message, the backend's
/// error, or 502 when it cannot be reached.
#[utoipa::path(
    post,
    path = "/api/console/users/{id}/notifications",
    tag = "Users",
    summary = "Send notification",
    params(("id" = String, Path, description = "User id")),
    request_body = NotificationRequest,
    responses(
        (status = 200, description = "Notification queued", body = OkResponse),
        (status = 400, description = "Blank title or message", body = ErrorResponse),
    )
)]
pub async fn send_notification(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<NotificationRequest>, BffError>,
) -> Result<Json<OkResponse>, BffError> {
    state
        .console_service
        .send_user_notification(token.as_deref(), &id, &req.title, &req.message, req.level)
        .await?;
    Ok(Json(OkResponse::OK))
}

/// `POST /api/console/users/{id}/manual-deposits` — Credit a wallet by hand.
///
/// # Errors
///
/// Returns a validation error unless the amount is a positive decimal, the
/// backend's error, or 502 when it cannot be reached.
#[utoipa::path(
    post,
    path = "/api/console/users/{id}/manual-deposits",
    tag = "Users",
    summary = "Manual deposit",
    params(("id" = String, Path, description = "User id")),
    request_body = ManualDepositRequest,
    responses(
        (status = 200, description = "Credit receipt", body = AdminManualDepositResult),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
    )
)]
pub async fn manual_deposit(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<ManualDepositRequest>, BffError>,
) -> Result<Json<AdminManualDepositResult>, BffError> {
    let receipt = state
        .console_service
        .manual_deposit(token.as_deref(), &id, &req.amount_text(), req.note.as_deref())
        .await?;
    Ok(Json(receipt))
}

// ── Ledger ─────────────────────────────────────────────────────────────

/// `GET /api/console/transactions` — Paginated ledger.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/transactions",
    tag = "Ledger",
    summary = "List transactions",
    params(StatusListQuery),
    responses(
        (status = 200, description = "A page of transactions", body = PaginatedResult<AdminTransaction>),
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    token: AccessToken,
    WithRejection(Query(query), _): WithRejection<Query<StatusListQuery>, BffError>,
) -> Result<Json<PaginatedResult<AdminTransaction>>, BffError> {
    let page = state
        .console_service
        .list_transactions(token.as_deref(), query.window(), query.status.as_deref())
        .await?;
    Ok(Json(page))
}

/// `GET /api/console/withdrawals` — Paginated withdrawal requests.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/withdrawals",
    tag = "Ledger",
    summary = "List withdrawals",
    params(StatusListQuery),
    responses(
        (status = 200, description = "A page of withdrawals", body = PaginatedResult<AdminWithdrawRequest>),
    )
)]
pub async fn list_withdrawals(
    State(state): State<AppState>,
    token: AccessToken,
    WithRejection(Query(query), _): WithRejection<Query<StatusListQuery>, BffError>,
) -> Result<Json<PaginatedResult<AdminWithdrawRequest>>, BffError> {
    let page = state
        .console_service
        .list_withdrawals(token.as_deref(), query.window(), query.status.as_deref())
        .await?;
    Ok(Json(page))
}

/// `POST /api/console/withdrawals/{id}/approve` — Approve a withdrawal.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    post,
    path = "/api/console/withdrawals/{id}/approve",
    tag = "Ledger",
    summary = "Approve withdrawal",
    params(("id" = String, Path, description = "Withdrawal id")),
    responses(
        (status = 200, description = "Updated request", body = AdminWithdrawRequest),
        (status = 409, description = "Already decided", body = ErrorResponse),
    )
)]
pub async fn approve_withdrawal(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
) -> Result<Json<AdminWithdrawRequest>, BffError> {
    let request = state
        .console_service
        .approve_withdrawal(token.as_deref(), &id)
        .await?;
    Ok(Json(request))
}

/// `POST /api/console/withdrawals/{id}/reject` — Reject a withdrawal.
///
/// # Errors
///
/// Returns a validation error for a blank reason, the backend's error, or
/// 502 when it cannot be reached.
#[utoipa::path(
    post,
    path = "/api/console/withdrawals/{id}/reject",
    tag = "Ledger",
    summary = "Reject withdrawal",
    params(("id" = String, Path, description = "Withdrawal id")),
    request_body = RejectWithdrawalRequest,
    responses(
        (status = 200, description = "Updated request", body = AdminWithdrawRequest),
        (status = 400, description = "Blank reason", body = ErrorResponse),
    )
)]
pub async fn reject_withdrawal(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
    WithRejection(Json(req), _): WithRejection<Json<RejectWithdrawalRequest>, BffError>,
) -> Result<Json<AdminWithdrawRequest>, BffError> {
    let request = state
        .console_service
        .reject_withdrawal(token.as_deref(), &id, &req.reason)
        .await?;
    Ok(Json(request))
}

// ── Promotions ─────────────────────────────────────────────────────────

/// `GET /api/console/promotions` — Paginated promotions.
///
/// # Errors
///
/// Returns 400 for an unknown status filter, the backend's error, or 502
/// when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/promotions",
    tag = "Promotions",
    summary = "List promotions",
    params(StatusListQuery),
    responses(
        (status = 200, description = "A page of promotions", body = PaginatedResult<AdminPromotion>),
        (status = 400, description = "Unknown status filter", body = ErrorResponse),
    )
)]
pub async fn list_promotions(
    State(state): State<AppState>,
    token: AccessToken,
    WithRejection(Query(query), _): WithRejection<Query<StatusListQuery>, BffError>,
) -> Result<Json<PaginatedResult<AdminPromotion>>, BffError> {
    let page = state
        .console_service
        .list_promotions(token.as_deref(), query.window(), query.status.as_deref())
        .await?;
    Ok(Json(page))
}

/// `POST /api/console/promotions` — Create a promotion from a draft.
///
/// # Errors
///
/// Returns a validation error with per-field messages, the backend's
/// error, or 502 when it cannot be reached.
#[utoipa::path(
    post,
    path = "/api/console/promotions",
    tag = "Promotions",
    summary = "Create promotion",
    request_body = PromotionDraft,
    responses(
        (status = 200, description = "Created promotion", body = AdminPromotion),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn create_promotion(
    State(state): State<AppState>,
    token: AccessToken,
    WithRejection(Json(draft), _): WithRejection<Json<PromotionDraft>, BffError>,
) -> Result<Json<AdminPromotion>, BffError> {
    let promotion = state
        .console_service
        .create_promotion(token.as_deref(), &draft)
        .await?;
    Ok(Json(promotion))
}

/// `GET /api/console/promotions/{id}` — One promotion.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/promotions/{id}",
    tag = "Promotions",
    summary = "Get promotion",
    params(("id" = String, Path, description = "Promotion id")),
    responses(
        (status = 200, description = "Promotion", body = AdminPromotion),
        (status = 404, description = "Not found", body = ErrorResponse),
    )
)]
pub async fn get_promotion(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
) -> Result<Json<AdminPromotion>, BffError> {
    let promotion = state.console_service.get_promotion(token.as_deref(), &id).await?;
    Ok(Json(promotion))
}

/// `PATCH /api/console/promotions/{id}` — Update a promotion from a draft.
///
/// # Errors
///
/// Returns a validation error with per-field messages, the backend's
/// error, or 502 when it cannot be reached.
#[utoipa::path(
    patch,
    path = "/api/console/promotions/{id}",
    tag = "Promotions",
    summary = "Update promotion",
    params(("id" = String, Path, description = "Promotion id")),
    request_body = PromotionDraft,
    responses(
        (status = 200, description = "Updated promotion", body = AdminPromotion),
        (status = 400, description = "Invalid draft", body = ErrorResponse),
    )
)]
pub async fn update_promotion(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
    WithRejection(Json(draft), _): WithRejection<Json<PromotionDraft>, BffError>,
) -> Result<Json<AdminPromotion>, BffError> {
    let promotion = state
        .console_service
        .update_promotion(token.as_deref(), &id, &draft)
        .await?;
    Ok(Json(promotion))
}

/// `GET /api/console/promotions/{id}/draft` — One promotion as an edit form.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/promotions/{id}/draft",
    tag = "Promotions",
    summary = "Get promotion draft",
    description = "Datetimes are rendered as `YYYY-MM-DDTHH:MM` in the console offset.",
    params(("id" = String, Path, description = "Promotion id")),
    responses(
        (status = 200, description = "Edit form", body = PromotionDraft),
    )
)]
pub async fn get_promotion_draft(
    State(state): State<AppState>,
    token: AccessToken,
    Path(id): Path<String>,
) -> Result<Json<PromotionDraft>, BffError> {
    let draft = state
        .console_service
        .get_promotion_draft(token.as_deref(), &id)
        .await?;
    Ok(Json(draft))
}

// ── Telemetry ──────────────────────────────────────────────────────────

/// `GET /api/console/healthchecks` — Backend self-checks.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/healthchecks",
    tag = "Telemetry",
    summary = "List healthchecks",
    params(HealthcheckQuery),
    responses(
        (status = 200, description = "A page of healthchecks", body = PaginatedResult<AdminHealthcheck>),
    )
)]
pub async fn list_healthchecks(
    State(state): State<AppState>,
    token: AccessToken,
    WithRejection(Query(query), _): WithRejection<Query<HealthcheckQuery>, BffError>,
) -> Result<Json<PaginatedResult<AdminHealthcheck>>, BffError> {
    let page = state
        .console_service
        .list_healthchecks(
            token.as_deref(),
            query.window(),
            query.status.as_deref(),
            query.source.as_deref(),
        )
        .await?;
    Ok(Json(page))
}

/// `GET /api/console/deposits/scan-logs` — Deposit scanner runs.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/deposits/scan-logs",
    tag = "Telemetry",
    summary = "List deposit scan logs",
    params(ScanLogQuery),
    responses(
        (status = 200, description = "A page of scan logs", body = PaginatedResult<AdminDepositScanLog>),
    )
)]
pub async fn list_deposit_scan_logs(
    State(state): State<AppState>,
    token: AccessToken,
    WithRejection(Query(query), _): WithRejection<Query<ScanLogQuery>, BffError>,
) -> Result<Json<PaginatedResult<AdminDepositScanLog>>, BffError> {
    let page = state
        .console_service
        .list_deposit_scan_logs(
            token.as_deref(),
            query.window(),
            query.reason.as_deref(),
            query.network.as_deref(),
        )
        .await?;
    Ok(Json(page))
}

/// `GET /api/console/deposits/sweep-logs` — Deposit sweeps.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/deposits/sweep-logs",
    tag = "Telemetry",
    summary = "List sweep logs",
    params(SweepLogQuery),
    responses(
        (status = 200, description = "A page of sweep logs", body = PaginatedResult<AdminSweepLog>),
    )
)]
pub async fn list_sweep_logs(
    State(state): State<AppState>,
    token: AccessToken,
    WithRejection(Query(query), _): WithRejection<Query<SweepLogQuery>, BffError>,
) -> Result<Json<PaginatedResult<AdminSweepLog>>, BffError> {
    let page = state
        .console_service
        .list_sweep_logs(
            token.as_deref(),
            query.window(),
            query.status.as_deref(),
            query.network.as_deref(),
            query.user_id.as_deref(),
        )
        .await?;
    Ok(Json(page))
}

/// `GET /api/console/deposits/credits` — Credited deposits report.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/deposits/credits",
    tag = "Telemetry",
    summary = "Deposit credits report",
    params(DepositCreditsQuery),
    responses(
        (status = 200, description = "A page of credits with range totals", body = AdminDepositCreditsReport),
    )
)]
pub async fn deposit_credits(
    State(state): State<AppState>,
    token: AccessToken,
    WithRejection(Query(query), _): WithRejection<Query<DepositCreditsQuery>, BffError>,
) -> Result<Json<AdminDepositCreditsReport>, BffError> {
    let report = state
        .console_service
        .deposit_credits(
            token.as_deref(),
            query.window(),
            query.from.as_deref(),
            query.to.as_deref(),
            query.user_id.as_deref(),
        )
        .await?;
    Ok(Json(report))
}

/// `GET /api/console/audit-logs` — Admin activity.
///
/// # Errors
///
/// Returns the backend's error or 502 when it cannot be reached.
#[utoipa::path(
    get,
    path = "/api/console/audit-logs",
    tag = "Telemetry",
    summary = "List audit logs",
    params(AuditLogQuery),
    responses(
        (status = 200, description = "A page of audit logs", body = PaginatedResult<AdminAuditLog>),
    )
)]
pub async fn list_audit_logs(
    State(state): State<AppState>,
    token: AccessToken,
    WithRejection(Query(query), _): WithRejection<Query<AuditLogQuery>, BffError>,
) -> Result<Json<PaginatedResult<AdminAuditLog>>, BffError> {
    let page = state
        .console_service
        .list_audit_logs(token.as_deref(), query.window(), query.action.as_deref())
        .await?;
    Ok(Json(page))
}

/// Console routes under `/api/console`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/overview", get(dashboard_overview))
        .route("/blockchain/summary", get(blockchain_summary))
        .route("/users", get(list_users))
        .route("/users/{id}/role", patch(update_user_role))
        .route("/users/{id}/status", patch(update_user_status))
        .route("/users/{id}/notifications", post(send_notification))
        .route("/users/{id}/manual-deposits", post(manual_deposit))
        .route("/transactions", get(list_transactions))
        .route("/withdrawals", get(list_withdrawals))
        .route("/withdrawals/{id}/approve", post(approve_withdrawal))
        .route("/withdrawals/{id}/reject", post(reject_withdrawal))
        .route("/promotions", get(list_promotions).post(create_promotion))
        .route("/promotions/{id}", get(get_promotion).patch(update_promotion))
        .route("/promotions/{id}/draft", get(get_promotion_draft))
        .route("/healthchecks", get(list_healthchecks))
        .route("/deposits/scan-logs", get(list_deposit_scan_logs))
        .route("/deposits/sweep-logs", get(list_sweep_logs))
        .route("/deposits/credits", get(deposit_credits))
        .route("/audit-logs", get(list_audit_logs))
}
