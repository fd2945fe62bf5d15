//! Withdrawal request rows.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::network::{MISSING_ADDRESS, Network, infer_asset, infer_network};
use super::normalize::{non_empty_string, normalize_date, normalize_string};
use super::user::user_label;
use crate::backend::dto::BackendWithdrawalItem;

/// Review state of a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawStatus {
    /// Awaiting review.
    Pending,
    /// Approved or already paid.
    Approved,
    /// Rejected by an admin.
    Rejected,
}

/// A withdrawal request under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminWithdrawRequest {
    /// Request id.
    pub id: String,
    /// Requesting user.
    pub user_id: String,
    /// Requesting user's display label.
    pub user_label: String,
    /// Asset guessed from the network.
    pub asset: String,
    /// Network guessed from the address prefix.
    pub network: Network,
    /// Requested amount.
    pub amount: String,
    /// Requested amount in USD.
    pub amount_usd: String,
    /// Destination address, `—` when missing.
    pub address: String,
    /// Review state.
    pub status: WithdrawStatus,
    /// Creation timestamp.
    pub requested_at: String,
    /// When the request was paid, approved or rejected.
    pub decided_at: Option<String>,
    /// Admin note, only on rejected requests.
    pub reject_reason: Option<String>,
}

/// Backend withdrawal status to console status.
#[must_use]
pub fn map_withdraw_status(raw: &str) -> WithdrawStatus {
    match raw.to_ascii_uppercase().as_str() {
        "REJECTED" => WithdrawStatus::Rejected,
        "APPROVED" | "PAID" => WithdrawStatus::Approved,
        _ => WithdrawStatus::Pending,
    }
}

/// List filter for the backend; `approved` asks for paid requests.
#[must_use]
pub fn to_backend_withdraw_status(filter: Option<&str>) -> Option<&'static str> {
    let filter = filter.map(str::trim).filter(|f| !f.is_empty())?;
    match filter.to_ascii_lowercase().as_str() {
        "all" => None,
        "rejected" => Some("REJECTED"),
        "approved" => Some("PAID"),
        _ => Some("PENDING"),
    }
}

/// Maps a backend withdrawal row.
#[must_use]
pub fn map_withdrawal(item: BackendWithdrawalItem) -> AdminWithdrawRequest {
    let amount = normalize_string(item.amount.as_ref(), "0");
    let user_id = normalize_string(item.user_id.as_ref(), "");
    let user_label = user_label(item.user.as_ref(), &user_id);
    let status = map_withdraw_status(&normalize_string(item.status.as_ref(), "PENDING"));
    let address = normalize_string(item.destination_address.as_ref(), MISSING_ADDRESS);
    let network = infer_network(&address);

    let decided_at = non_empty_string(item.paid_at.as_ref())
        .or_else(|| non_empty_string(item.approved_at.as_ref()))
        .or_else(|| non_empty_string(item.rejected_at.as_ref()));
    let reject_reason = if status == WithdrawStatus::Rejected {
        non_empty_string(item.note.as_ref())
    } else {
        None
    };

    AdminWithdrawRequest {
        id: normalize_string(item.id.as_ref(), ""),
        user_id,
        user_label,
        asset: infer_asset(network).to_string(),
        network,
        amount_usd: amount.clone(),
        amount,
        address,
        status,
        requested_at: normalize_date(item.created_at.as_ref()),
        decided_at,
        reject_reason,
    }
}
