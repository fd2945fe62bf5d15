//! Platform user view model and its enum tables.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::normalize::{non_empty_string, normalize_count, normalize_date, normalize_string};
use crate::backend::dto::{BackendUserItem, BackendUserRef};

/// Console role of a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    /// Full administrator.
    Admin,
    /// Finance administrator.
    FinanceAdmin,
    /// Regular customer.
    User,
}

impl UserRole {
    /// Backend spelling used when changing a role.
    #[must_use]
    pub const fn backend_role(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::FinanceAdmin => "FINANCE_ADMIN",
            Self::User => "USER",
        }
    }
}

/// Account status of a platform user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Can sign in and transact.
    Active,
    /// Temporarily disabled by an admin.
    Suspended,
    /// Deleted or never confirmed.
    Blocked,
}

/// Status an admin may set directly; `blocked` is backend-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatusChange {
    /// Reactivate the account.
    Active,
    /// Suspend the account.
    Suspended,
}

impl UserStatusChange {
    /// Backend spelling used when changing a status.
    #[must_use]
    pub const fn backend_status(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
        }
    }
}

/// KYC verification state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    /// No documents submitted.
    Unverified,
    /// Documents under review.
    Pending,
    /// Identity confirmed.
    Verified,
    /// Documents rejected.
    Rejected,
}

/// Severity picked in the notification composer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Plain information.
    #[default]
    Info,
    /// Something the user should look at.
    Warning,
    /// Something went wrong.
    Danger,
}

/// A platform user as listed in the console.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    /// User id.
    pub id: String,
    /// Username, possibly empty.
    pub username: String,
    /// Email, possibly empty.
    pub email: String,
    /// User's own referral code.
    pub referral_code: String,
    /// Code the user signed up with.
    pub registered_with_referral_code: Option<String>,
    /// Console role.
    pub role: UserRole,
    /// Account status.
    pub status: UserStatus,
    /// KYC state.
    pub kyc_status: KycStatus,
    /// Number of users this user referred.
    pub direct_referrals: u64,
    /// Wallet balance in USD, as a decimal string.
    pub balance_usd: String,
    /// Registration timestamp.
    pub created_at: String,
}

/// Result of a role change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserRoleUpdate {
    /// User id.
    pub id: String,
    /// Role now in effect.
    pub role: UserRole,
}

/// Result of a status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserStatusUpdate {
    /// User id.
    pub id: String,
    /// Status now in effect.
    pub status: UserStatus,
}

/// Both admin flavours collapse into `admin`; everything else is `user`.
#[must_use]
pub fn map_user_role(raw: &str) -> UserRole {
    match raw.to_ascii_uppercase().as_str() {
        "ADMIN" | "FINANCE_ADMIN" => UserRole::Admin,
        _ => UserRole::User,
    }
}

/// `DELETED` and unconfirmed accounts show as `blocked`.
#[must_use]
pub fn map_user_status(raw: &str) -> UserStatus {
    match raw.to_ascii_uppercase().as_str() {
        "SUSPENDED" => UserStatus::Suspended,
        "DELETED" | "PENDING_CONFIRM_EMAIL" => UserStatus::Blocked,
        _ => UserStatus::Active,
    }
}

/// Missing or unknown KYC states show as `unverified`.
#[must_use]
pub fn map_kyc_status(raw: &str) -> KycStatus {
    match raw.to_ascii_uppercase().as_str() {
        "PENDING" | "IN_REVIEW" => KycStatus::Pending,
        "VERIFIED" | "APPROVED" => KycStatus::Verified,
        "REJECTED" => KycStatus::Rejected,
        _ => KycStatus::Unverified,
    }
}

/// Backend notification type for a composer level.
#[must_use]
pub const fn map_notification_type(level: NotificationLevel) -> &'static str {
    match level {
        NotificationLevel::Danger => "PACKAGE_PAUSED",
        NotificationLevel::Warning => "PROFIT_EARNED",
        NotificationLevel::Info => "WELCOME",
    }
}

/// Display label for an embedded user: username, then email, then id.
#[must_use]
pub fn user_label(user: Option<&BackendUserRef>, user_id: &str) -> String {
    let username = normalize_string(user.and_then(|u| u.username.as_ref()), "");
    if !username.is_empty() {
        return username;
    }
    let email = normalize_string(user.and_then(|u| u.email.as_ref()), "");
    if !email.is_empty() {
        return email;
    }
    if !user_id.is_empty() {
        return user_id.to_string();
    }
    "unknown".to_string()
}

/// Maps a backend user row.
#[must_use]
pub fn map_user(item: BackendUserItem) -> AdminUser {
    AdminUser {
        id: normalize_string(item.id.as_ref(), ""),
        username: normalize_string(item.username.as_ref(), ""),
        email: normalize_string(item.email.as_ref(), ""),
        referral_code: normalize_string(item.referral_code.as_ref(), ""),
        registered_with_referral_code: non_empty_string(item.registered_with_referral_code.as_ref()),
        role: map_user_role(&normalize_string(item.role.as_ref(), "USER")),
        status: map_user_status(&normalize_string(item.status.as_ref(), "ACTIVE")),
        kyc_status: map_kyc_status(&normalize_string(item.kyc_status.as_ref(), "")),
        direct_referrals: normalize_count(item.direct_referrals.as_ref()),
        balance_usd: normalize_string(item.balance_usd.as_ref(), "0"),
        created_at: normalize_date(item.created_at.as_ref()),
    }
}
