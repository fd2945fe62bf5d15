//! Query strings and request bodies for `/api/console/*`.
//!
//! `page` and `limit` are kept as raw strings so a malformed value falls
//! back to the default instead of rejecting the request.

use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::normalize::normalize_string;
use crate::domain::pagination::PageWindow;
use crate::domain::user::{NotificationLevel, UserRole, UserStatusChange};

/// `?page&limit&search` for the user list.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    /// 1-based page, default 1.
    pub page: Option<String>,
    /// Page size, default 20.
    pub limit: Option<String>,
    /// Free-text search over username and email.
    pub search: Option<String>,
}

/// `?page&limit&status` for transactions, withdrawals, and promotions.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusListQuery {
    /// 1-based page, default 1.
    pub page: Option<String>,
    /// Page size, default 20.
    pub limit: Option<String>,
    /// Console status filter; `all` or empty for none.
    pub status: Option<String>,
}

/// `?page&limit&status&source` for healthchecks.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HealthcheckQuery {
    /// 1-based page, default 1.
    pub page: Option<String>,
    /// Page size, default 20.
    pub limit: Option<String>,
    /// Backend status filter, passed through.
    pub status: Option<String>,
    /// Check source filter, passed through.
    pub source: Option<String>,
}

/// `?page&limit&reason&network` for deposit scan logs.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScanLogQuery {
    /// 1-based page, default 1.
    pub page: Option<String>,
    /// Page size, default 20.
    pub limit: Option<String>,
    /// Scan trigger filter.
    pub reason: Option<String>,
    /// Chain filter.
    pub network: Option<String>,
}

/// `?page&limit&status&network&userId` for sweep logs.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SweepLogQuery {
    /// 1-based page, default 1.
    pub page: Option<String>,
    /// Page size, default 20.
    pub limit: Option<String>,
    /// Sweep state filter.
    pub status: Option<String>,
    /// Chain filter.
    pub network: Option<String>,
    /// Owner filter.
    pub user_id: Option<String>,
}

/// `?page&limit&from&to&userId` for the deposit credits report.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DepositCreditsQuery {
    /// 1-based page, default 1.
    pub page: Option<String>,
    /// Page size, default 20.
    pub limit: Option<String>,
    /// Range start, passed through.
    pub from: Option<String>,
    /// Range end, passed through.
    pub to: Option<String>,
    /// Credited user filter.
    pub user_id: Option<String>,
}

/// `?page&limit&action` for the audit log.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditLogQuery {
    /// 1-based page, default 1.
    pub page: Option<String>,
    /// Page size, default 20.
    pub limit: Option<String>,
    /// Action name filter.
    pub action: Option<String>,
}

/// Anything with a raw `page`/`limit` pair.
pub trait Paged {
    /// Raw `page` value.
    fn raw_page(&self) -> Option<&str>;
    /// Raw `limit` value.
    fn raw_limit(&self) -> Option<&str>;

    /// Normalized page window.
    fn window(&self) -> PageWindow {
        PageWindow::from_raw(self.raw_page(), self.raw_limit())
    }
}

impl Paged for UserListQuery {
    fn raw_page(&self) -> Option<&str> {
        self.page.as_deref()
    }
    fn raw_limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }
}

impl Paged for StatusListQuery {
    fn raw_page(&self) -> Option<&str> {
        self.page.as_deref()
    }
    fn raw_limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }
}

impl Paged for HealthcheckQuery {
    fn raw_page(&self) -> Option<&str> {
        self.page.as_deref()
    }
    fn raw_limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }
}

impl Paged for ScanLogQuery {
    fn raw_page(&self) -> Option<&str> {
        self.page.as_deref()
    }
    fn raw_limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }
}

impl Paged for SweepLogQuery {
    fn raw_page(&self) -> Option<&str> {
        self.page.as_deref()
    }
    fn raw_limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }
}

impl Paged for DepositCreditsQuery {
    fn raw_page(&self) -> Option<&str> {
        self.page.as_deref()
    }
    fn raw_limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }
}

impl Paged for AuditLogQuery {
    fn raw_page(&self) -> Option<&str> {
        self.page.as_deref()
    }
    fn raw_limit(&self) -> Option<&str> {
        self.limit.as_deref()
    }
}

/// Request body for `PATCH /api/console/users/{id}/role`.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct UpdateRoleRequest {
    /// New console role.
    pub role: UserRole,
}

/// Request body for `PATCH /api/console/users/{id}/status`.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// `active` or `suspended`.
    pub status: UserStatusChange,
}

/// Request body for `POST /api/console/users/{id}/notifications`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct NotificationRequest {
    /// Notification title.
    pub title: String,
    /// Notification text.
    pub message: String,
    /// Severity, `info` when omitted.
    pub level: NotificationLevel,
}

/// Request body for `POST /api/console/users/{id}/manual-deposits`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ManualDepositRequest {
    /// Positive decimal amount, as a string or a number.
    #[schema(value_type = String)]
    pub amount: Option<Value>,
    /// Free-text note stored with the credit.
    pub note: Option<String>,
}

impl ManualDepositRequest {
    /// Amount rendered as text, empty when missing.
    #[must_use]
    pub fn amount_text(&self) -> String {
        normalize_string(self.amount.as_ref(), "")
    }
}

/// Request body for `POST /api/console/withdrawals/{id}/reject`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RejectWithdrawalRequest {
    /// Reason shown to the user.
    pub reason: String,
}
