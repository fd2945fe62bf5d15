//! Console service: one backend call per console operation, mapped into
//! view models.

use chrono::{FixedOffset, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::form_urlencoded;

use crate::backend::BackendClient;
use crate::backend::dto::{
    BackendBlockchainSummaryResponse, BackendDashboardOverviewResponse,
    BackendDepositCreditsResponse, BackendListResponse, BackendLoginResponse,
    BackendManualDepositResult, BackendPromotionItem, BackendUserPatchResult,
    BackendWithdrawalItem, decode,
};
use crate::domain::dashboard::{
    AdminBlockchainSummary, AdminDashboardOverview, AdminManualDepositResult,
    map_blockchain_summary, map_dashboard_overview, map_manual_deposit_result,
};
use crate::domain::deposit_credit::{AdminDepositCreditsReport, map_deposit_credits_report};
use crate::domain::normalize::normalize_string;
use crate::domain::pagination::{PageWindow, PaginatedResult, to_paginated_result};
use crate::domain::promotion::{
    AdminPromotion, PromotionDraft, map_promotion, to_backend_promotion_status, to_create_payload,
    to_draft, to_update_payload,
};
use crate::domain::telemetry::{
    AdminAuditLog, AdminDepositScanLog, AdminHealthcheck, AdminSweepLog, map_audit_log,
    map_deposit_scan_log, map_healthcheck, map_sweep_log,
};
use crate::domain::transaction::{AdminTransaction, map_transaction, to_backend_transaction_status};
use crate::domain::user::{
    AdminUser, NotificationLevel, UserRole, UserRoleUpdate, UserStatusChange, UserStatusUpdate,
    map_notification_type, map_user, map_user_role, map_user_status,
};
use crate::domain::withdrawal::{AdminWithdrawRequest, map_withdrawal, to_backend_withdraw_status};
use crate::error::BffError;

/// Backend prefix for everything the console manages.
pub const ADMIN_PREFIX: &str = "/v1/admin";

/// Orchestration layer for the console endpoints.
///
/// Holds no state besides the backend client: every method builds the
/// backend path, forwards the caller's session token, and maps the answer.
/// Backend errors propagate unchanged so their status reaches the browser.
#[derive(Debug, Clone)]
pub struct ConsoleService {
    backend: BackendClient,
    offset: FixedOffset,
}

impl ConsoleService {
    /// Creates a service over `backend`. `offset` is the zone console
    /// datetime inputs are written in.
    #[must_use]
    pub fn new(backend: BackendClient, offset: FixedOffset) -> Self {
        Self { backend, offset }
    }

    // ── Session ────────────────────────────────────────────────────────

    /// Exchanges admin credentials for a backend access token.
    ///
    /// Identifiers containing `@` log in by email, anything else by
    /// username.
    ///
    /// # Errors
    ///
    /// - [`BffError::InvalidRequest`] when either credential is blank.
    /// - [`BffError::MissingAccessToken`] when the backend accepts the
    ///   login but returns no token.
    /// - Any backend or transport error.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<String, BffError> {
        let identifier = identifier.trim();
        if identifier.is_empty() || password.is_empty() {
            return Err(BffError::InvalidRequest(
                "Username/email and password are required".to_string(),
            ));
        }

        let (path, body) = if identifier.contains('@') {
            (
                "/v1/admin/auth/login",
                json!({"email": identifier, "password": password}),
            )
        } else {
            (
                "/v1/admin/auth/login-username",
                json!({"username": identifier, "password": password}),
            )
        };

        let payload = self.backend.send(Method::POST, path, None, Some(&body)).await?;
        let token = decode::<BackendLoginResponse>(payload)
            .ok()
            .and_then(BackendLoginResponse::into_token)
            .ok_or(BffError::MissingAccessToken)?;

        tracing::info!(by_email = identifier.contains('@'), "admin logged in");
        Ok(token)
    }

    /// Returns the signed-in admin's profile as the backend sends it.
    ///
    /// # Errors
    ///
    /// Any backend or transport error.
    pub async fn me(&self, token: Option<&str>) -> Result<Value, BffError> {
        self.backend.get("/v1/auth/admin/me", token).await
    }

    /// Relays a console call verbatim onto `/v1/admin/<path>`.
    ///
    /// `path` is the still-encoded request path. Each segment is decoded
    /// and percent-encoded again; empty segments are dropped. `query` is
    /// appended as received.
    ///
    /// # Errors
    ///
    /// - [`BffError::InvalidRequest`] when `path` has no segments.
    /// - Any backend or transport error.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, BffError> {
        let target = admin_path(path, query)
            .ok_or_else(|| BffError::InvalidRequest("Admin path is required".to_string()))?;
        self.backend.send(method, &target, token, body).await
    }

    // ── Dashboard ──────────────────────────────────────────────────────

    /// Platform KPIs and wallet balances.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn dashboard_overview(&self, token: Option<&str>) -> Result<AdminDashboardOverview, BffError> {
        let data: BackendDashboardOverviewResponse =
            self.get_decoded("/v1/admin/dashboard/overview", token).await?;
        Ok(map_dashboard_overview(data))
    }

    /// Deposit, sweep, and gas totals.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn blockchain_summary(&self, token: Option<&str>) -> Result<AdminBlockchainSummary, BffError> {
        let data: BackendBlockchainSummaryResponse =
            self.get_decoded("/v1/admin/blockchain/summary", token).await?;
        Ok(map_blockchain_summary(data))
    }

    // ── Users ──────────────────────────────────────────────────────────

    /// Lists platform users, optionally filtered by a free-text search.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn list_users(
        &self,
        token: Option<&str>,
        window: PageWindow,
        search: Option<&str>,
    ) -> Result<PaginatedResult<AdminUser>, BffError> {
        let path = list_path("/v1/admin/users", window, &[("search", search)]);
        let data: BackendListResponse = self.get_decoded(&path, token).await?;
        Ok(to_paginated_result(data, map_user, window.page, window.limit))
    }

    /// Changes a user's role.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn update_user_role(
        &self,
        token: Option<&str>,
        user_id: &str,
        role: UserRole,
    ) -> Result<UserRoleUpdate, BffError> {
        let path = format!("{ADMIN_PREFIX}/users/{}/role", segment(user_id));
        let body = json!({"role": role.backend_role()});
        let data: BackendUserPatchResult = self.send_decoded(Method::PATCH, &path, token, Some(&body)).await?;

        tracing::info!(user_id, role = role.backend_role(), "user role changed");
        Ok(UserRoleUpdate {
            id: normalize_string(data.id.as_ref(), user_id),
            role: map_user_role(&normalize_string(data.role.as_ref(), role.backend_role())),
        })
    }

    /// Suspends or reactivates a user.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn update_user_status(
        &self,
        token: Option<&str>,
        user_id: &str,
        status: UserStatusChange,
    ) -> Result<UserStatusUpdate, BffError> {
        let path = format!("{ADMIN_PREFIX}/users/{}/status", segment(user_id));
        let body = json!({"status": status.backend_status()});
        let data: BackendUserPatchResult = self.send_decoded(Method::PATCH, &path, token, Some(&body)).await?;

        tracing::info!(user_id, status = status.backend_status(), "user status changed");
        Ok(UserStatusUpdate {
            id: normalize_string(data.id.as_ref(), user_id),
            status: map_user_status(&normalize_string(data.status.as_ref(), status.backend_status())),
        })
    }

    /// Sends an in-app notification to one user.
    ///
    /// # Errors
    ///
    /// - [`BffError::Validation`] when the title or message is blank.
    /// - Any backend or transport error.
    pub async fn send_user_notification(
        &self,
        token: Option<&str>,
        user_id: &str,
        title: &str,
        message: &str,
        level: NotificationLevel,
    ) -> Result<(), BffError> {
        let mut fields = std::collections::BTreeMap::new();
        if title.trim().is_empty() {
            fields.insert("title".to_string(), "Title is required.".to_string());
        }
        if message.trim().is_empty() {
            fields.insert("message".to_string(), "Message is required.".to_string());
        }
        if !fields.is_empty() {
            return Err(BffError::Validation {
                message: "Notification is invalid".to_string(),
                fields,
            });
        }

        let body = json!({
            "userId": user_id,
            "type": map_notification_type(level),
            "title": title.trim(),
            "body": message.trim(),
        });
        self.backend
            .send(Method::POST, "/v1/admin/notifications", token, Some(&body))
            .await?;
        tracing::info!(user_id, kind = map_notification_type(level), "notification sent");
        Ok(())
    }

    /// Credits a user's wallet by hand.
    ///
    /// # Errors
    ///
    /// - [`BffError::Validation`] unless `amount` is a positive decimal.
    /// - Any backend or transport error.
    pub async fn manual_deposit(
        &self,
        token: Option<&str>,
        user_id: &str,
        amount: &str,
        note: Option<&str>,
    ) -> Result<AdminManualDepositResult, BffError> {
        let amount = amount.trim();
        if !is_positive_decimal(amount) {
            return Err(BffError::Validation {
                message: "Manual deposit is invalid".to_string(),
                fields: [("amount".to_string(), "Amount must be a positive number.".to_string())]
                    .into_iter()
                    .collect(),
            });
        }

        let body = match note.map(str::trim).filter(|n| !n.is_empty()) {
            Some(note) => json!({"amount": amount, "note": note}),
            None => json!({"amount": amount}),
        };
        let path = format!("{ADMIN_PREFIX}/users/{}/manual-deposit", segment(user_id));
        let data: BackendManualDepositResult =
            self.send_decoded(Method::POST, &path, token, Some(&body)).await?;

        tracing::info!(user_id, amount, "manual deposit credited");
        Ok(map_manual_deposit_result(data, user_id))
    }

    // ── Ledger ─────────────────────────────────────────────────────────

    /// Lists ledger transactions.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn list_transactions(
        &self,
        token: Option<&str>,
        window: PageWindow,
        status: Option<&str>,
    ) -> Result<PaginatedResult<AdminTransaction>, BffError> {
        let status = to_backend_transaction_status(status);
        let path = list_path("/v1/admin/transactions", window, &[("status", status)]);
        let data: BackendListResponse = self.get_decoded(&path, token).await?;
        Ok(to_paginated_result(data, map_transaction, window.page, window.limit))
    }

    /// Lists withdrawal requests.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn list_withdrawals(
        &self,
        token: Option<&str>,
        window: PageWindow,
        status: Option<&str>,
    ) -> Result<PaginatedResult<AdminWithdrawRequest>, BffError> {
        let status = to_backend_withdraw_status(status);
        let path = list_path("/v1/admin/withdrawals", window, &[("status", status)]);
        let data: BackendListResponse = self.get_decoded(&path, token).await?;
        Ok(to_paginated_result(data, map_withdrawal, window.page, window.limit))
    }

    /// Approves a pending withdrawal.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn approve_withdrawal(
        &self,
        token: Option<&str>,
        withdraw_id: &str,
    ) -> Result<AdminWithdrawRequest, BffError> {
        let path = format!("{ADMIN_PREFIX}/withdrawals/{}/approve", segment(withdraw_id));
        let data: BackendWithdrawalItem = self.send_decoded(Method::POST, &path, token, None).await?;
        tracing::info!(withdraw_id, "withdrawal approved");
        Ok(map_withdrawal(data))
    }

    /// Rejects a pending withdrawal with a reason shown to the user.
    ///
    /// # Errors
    ///
    /// - [`BffError::Validation`] when `reason` is blank.
    /// - Any backend, transport, or payload-shape error.
    pub async fn reject_withdrawal(
        &self,
        token: Option<&str>,
        withdraw_id: &str,
        reason: &str,
    ) -> Result<AdminWithdrawRequest, BffError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(BffError::Validation {
                message: "Rejection is invalid".to_string(),
                fields: [("reason".to_string(), "Reason is required.".to_string())]
                    .into_iter()
                    .collect(),
            });
        }
        let path = format!("{ADMIN_PREFIX}/withdrawals/{}/reject", segment(withdraw_id));
        let body = json!({"reason": reason});
        let data: BackendWithdrawalItem = self.send_decoded(Method::POST, &path, token, Some(&body)).await?;
        tracing::info!(withdraw_id, "withdrawal rejected");
        Ok(map_withdrawal(data))
    }

    // ── Promotions ─────────────────────────────────────────────────────

    /// Lists promotions.
    ///
    /// # Errors
    ///
    /// - [`BffError::InvalidRequest`] for an unknown status filter.
    /// - Any backend, transport, or payload-shape error.
    pub async fn list_promotions(
        &self,
        token: Option<&str>,
        window: PageWindow,
        status: Option<&str>,
    ) -> Result<PaginatedResult<AdminPromotion>, BffError> {
        let status = to_backend_promotion_status(status)?;
        let path = list_path("/v1/admin/promos", window, &[("status", status)]);
        let data: BackendListResponse = self.get_decoded(&path, token).await?;
        let now = Utc::now();
        Ok(to_paginated_result(
            data,
            |item: BackendPromotionItem| map_promotion(item, now),
            window.page,
            window.limit,
        ))
    }

    /// Creates a promotion from a console draft.
    ///
    /// # Errors
    ///
    /// - [`BffError::Validation`] with per-field messages for a bad draft.
    /// - Any backend, transport, or payload-shape error.
    pub async fn create_promotion(
        &self,
        token: Option<&str>,
        draft: &PromotionDraft,
    ) -> Result<AdminPromotion, BffError> {
        let payload = write_body(&to_create_payload(draft, self.offset)?)?;
        let data: BackendPromotionItem = self
            .send_decoded(Method::POST, "/v1/admin/promos", token, Some(&payload))
            .await?;
        let promotion = map_promotion(data, Utc::now());
        tracing::info!(promotion_id = %promotion.id, "promotion created");
        Ok(promotion)
    }

    /// Fetches one promotion.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn get_promotion(&self, token: Option<&str>, promo_id: &str) -> Result<AdminPromotion, BffError> {
        let path = format!("{ADMIN_PREFIX}/promos/{}", segment(promo_id));
        let data: BackendPromotionItem = self.get_decoded(&path, token).await?;
        Ok(map_promotion(data, Utc::now()))
    }

    /// Fetches one promotion as an edit form.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn get_promotion_draft(
        &self,
        token: Option<&str>,
        promo_id: &str,
    ) -> Result<PromotionDraft, BffError> {
        let promotion = self.get_promotion(token, promo_id).await?;
        Ok(to_draft(&promotion, self.offset))
    }

    /// Replaces a promotion's editable fields, status included.
    ///
    /// # Errors
    ///
    /// - [`BffError::Validation`] with per-field messages for a bad draft.
    /// - Any backend, transport, or payload-shape error.
    pub async fn update_promotion(
        &self,
        token: Option<&str>,
        promo_id: &str,
        draft: &PromotionDraft,
    ) -> Result<AdminPromotion, BffError> {
        let payload = write_body(&to_update_payload(draft, self.offset)?)?;
        let path = format!("{ADMIN_PREFIX}/promos/{}", segment(promo_id));
        let data: BackendPromotionItem = self
            .send_decoded(Method::PATCH, &path, token, Some(&payload))
            .await?;
        tracing::info!(promo_id, "promotion updated");
        Ok(map_promotion(data, Utc::now()))
    }

    // ── Telemetry ──────────────────────────────────────────────────────

    /// Lists backend self-checks.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn list_healthchecks(
        &self,
        token: Option<&str>,
        window: PageWindow,
        status: Option<&str>,
        source: Option<&str>,
    ) -> Result<PaginatedResult<AdminHealthcheck>, BffError> {
        let path = list_path(
            "/v1/admin/healthchecks",
            window,
            &[("status", status), ("source", source)],
        );
        let data: BackendListResponse = self.get_decoded(&path, token).await?;
        Ok(to_paginated_result(data, map_healthcheck, window.page, window.limit))
    }

    /// Lists deposit scanner runs.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn list_deposit_scan_logs(
        &self,
        token: Option<&str>,
        window: PageWindow,
        reason: Option<&str>,
        network: Option<&str>,
    ) -> Result<PaginatedResult<AdminDepositScanLog>, BffError> {
        let path = list_path(
            "/v1/admin/deposits/scan-logs",
            window,
            &[("reason", reason), ("network", network)],
        );
        let data: BackendListResponse = self.get_decoded(&path, token).await?;
        Ok(to_paginated_result(data, map_deposit_scan_log, window.page, window.limit))
    }

    /// Lists deposit sweeps.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn list_sweep_logs(
        &self,
        token: Option<&str>,
        window: PageWindow,
        status: Option<&str>,
        network: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<PaginatedResult<AdminSweepLog>, BffError> {
        let path = list_path(
            "/v1/admin/deposits/sweep-logs",
            window,
            &[("status", status), ("network", network), ("userId", user_id)],
        );
        let data: BackendListResponse = self.get_decoded(&path, token).await?;
        Ok(to_paginated_result(data, map_sweep_log, window.page, window.limit))
    }

    /// Credited deposits over a date range, with range totals.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn deposit_credits(
        &self,
        token: Option<&str>,
        window: PageWindow,
        from: Option<&str>,
        to: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<AdminDepositCreditsReport, BffError> {
        let path = list_path(
            "/v1/admin/deposits/credits",
            window,
            &[("from", from), ("to", to), ("userId", user_id)],
        );
        let data: BackendDepositCreditsResponse = self.get_decoded(&path, token).await?;
        Ok(map_deposit_credits_report(data, window.page, window.limit))
    }

    /// Lists admin actions.
    ///
    /// # Errors
    ///
    /// Backend, transport, or payload-shape errors.
    pub async fn list_audit_logs(
        &self,
        token: Option<&str>,
        window: PageWindow,
        action: Option<&str>,
    ) -> Result<PaginatedResult<AdminAuditLog>, BffError> {
        let path = list_path("/v1/admin/audit-logs", window, &[("action", action)]);
        let data: BackendListResponse = self.get_decoded(&path, token).await?;
        Ok(to_paginated_result(data, map_audit_log, window.page, window.limit))
    }

    // ── Internal helpers ───────────────────────────────────────────────

    async fn get_decoded<T>(&self, path: &str, token: Option<&str>) -> Result<T, BffError>
    where
        T: DeserializeOwned + Default,
    {
        self.send_decoded(Method::GET, path, token, None).await
    }

    async fn send_decoded<T>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> Result<T, BffError>
    where
        T: DeserializeOwned + Default,
    {
        let payload = self.backend.send(method, path, token, body).await?;
        decode(payload).map_err(|e| BffError::UnexpectedPayload(e.to_string()))
    }
}

/// Percent-encodes one path segment.
fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Decodes a raw path segment and encodes it again, so `a%2Fb` stays one
/// segment and unencoded input is normalized.
fn reencode_segment(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(decoded) => segment(&decoded),
        Err(_) => segment(raw),
    }
}

/// Builds `/v1/admin/<segments>[?query]` from a still-encoded path; `None`
/// when there are no segments.
fn admin_path(path: &str, query: Option<&str>) -> Option<String> {
    let encoded: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(reencode_segment)
        .collect();
    if encoded.is_empty() {
        return None;
    }
    let mut target = format!("{ADMIN_PREFIX}/{}", encoded.join("/"));
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    Some(target)
}

/// `base?page=..&limit=..` plus every filter that is non-blank after
/// trimming.
fn list_path(base: &str, window: PageWindow, filters: &[(&str, Option<&str>)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair("page", &window.page.to_string())
        .append_pair("limit", &window.limit.to_string());
    for (key, value) in filters {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            query.append_pair(key, value);
        }
    }
    format!("{base}?{}", query.finish())
}

fn write_body<T: serde::Serialize>(payload: &T) -> Result<Value, BffError> {
    serde_json::to_value(payload).map_err(|e| BffError::Internal(format!("failed to encode payload: {e}")))
}

fn is_positive_decimal(raw: &str) -> bool {
    let digits_and_dot = !raw.is_empty()
        && raw.chars().all(|c| c.is_ascii_digit() || c == '.')
        && raw.matches('.').count() <= 1
        && raw.chars().any(|c| c.is_ascii_digit());
    digits_and_dot && raw.parse::<f64>().is_ok_and(|n| n > 0.0)
}
