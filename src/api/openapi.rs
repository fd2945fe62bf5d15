//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use super::handlers::{auth, console, forward, system};
use crate::error::ErrorResponse;

/// Root OpenAPI description of the BFF.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "admin-console-bff",
        description = "Session relay, admin API forwarding, and normalized console endpoints."
    ),
    paths(
        system::health_handler,
        auth::login,
        auth::logout,
        auth::me,
        forward::forward,
        console::dashboard_overview,
        console::blockchain_summary,
        console::list_users,
        console::update_user_role,
        console::update_user_status,
        console::send_notification,
        console::manual_deposit,
        console::list_transactions,
        console::list_withdrawals,
        console::approve_withdrawal,
        console::reject_withdrawal,
        console::list_promotions,
        console::create_promotion,
        console::get_promotion,
        console::update_promotion,
        console::get_promotion_draft,
        console::list_healthchecks,
        console::list_deposit_scan_logs,
        console::list_sweep_logs,
        console::deposit_credits,
        console::list_audit_logs,
    ),
    components(schemas(ErrorResponse)),
    tags(
        (name = "System", description = "Liveness"),
        (name = "Auth", description = "Session cookie management"),
        (name = "Forward", description = "Verbatim relay to the backend admin API"),
        (name = "Dashboard", description = "Platform KPIs"),
        (name = "Users", description = "Platform users"),
        (name = "Ledger", description = "Transactions and withdrawals"),
        (name = "Promotions", description = "Referral promotions"),
        (name = "Telemetry", description = "Backend jobs and audit trail"),
    )
)]
pub struct ApiDoc;

/// Builds the OpenAPI document.
#[must_use]
pub fn api_doc() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
