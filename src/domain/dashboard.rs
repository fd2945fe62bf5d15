//! Dashboard KPIs and the manual deposit receipt.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::normalize::{normalize_count, normalize_date, normalize_nullable_string, normalize_string};
use crate::backend::dto::{
    BackendBlockchainSummaryResponse, BackendDashboardOverviewResponse, BackendManualDepositResult,
    BackendWalletBalance,
};

/// Balance of one of the platform wallets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardWalletBalance {
    /// Wallet address, when configured.
    pub address: Option<String>,
    /// Asset ticker.
    pub asset: String,
    /// Human-readable balance.
    pub balance: Option<String>,
    /// Balance in base units.
    pub raw_balance: Option<String>,
    /// Decimals of the asset.
    pub decimals: u64,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardOverview {
    /// Revenue to date.
    pub total_revenue: String,
    /// Paid into user wallets to date.
    pub total_paid_to_user_wallet: String,
    /// Paid out through withdrawals to date.
    pub total_paid_to_withdraw: String,
    /// Open withdrawal requests.
    pub withdrawal_requests_count: u64,
    /// USDT hot wallet.
    pub hot_wallet: AdminDashboardWalletBalance,
    /// BNB gas wallet.
    pub gas_wallet: AdminDashboardWalletBalance,
    /// Registered users.
    pub users_count: u64,
    /// Packages currently running.
    pub active_packages_count: u64,
}

/// Deposit totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepositTotals {
    /// Credited to users.
    pub credited_total: String,
    /// Seen on chain.
    pub detected_total: String,
}

/// Sweep pipeline counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepTotals {
    /// Count per sweep status.
    pub status_counts: BTreeMap<String, u64>,
    /// Sweeps in flight.
    pub in_progress: u64,
    /// Failed sweeps.
    pub failed: u64,
    /// Deposit wallets still holding funds.
    pub unswept_wallets: u64,
}

/// Gas spent by sweeps and top-ups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GasTotals {
    /// Gas used by the sweep.
    pub sweep_gas_used: Option<String>,
    /// Sweep fee in wei.
    pub sweep_gas_fee_wei: Option<String>,
    /// Sweep fee in BNB.
    pub sweep_gas_fee_bnb: Option<String>,
    /// Gas used by the top-up.
    pub topup_gas_used: Option<String>,
    /// Top-up fee in wei.
    pub topup_gas_fee_wei: Option<String>,
    /// Top-up fee in BNB.
    pub topup_gas_fee_bnb: Option<String>,
}

/// Chain-side KPIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AdminBlockchainSummary {
    /// Deposit totals.
    pub deposits: DepositTotals,
    /// Sweep counters.
    pub sweeps: SweepTotals,
    /// Gas totals.
    pub gas: GasTotals,
}

/// Receipt of a manual wallet credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminManualDepositResult {
    /// Credited user.
    pub user_id: String,
    /// Balance after the credit.
    pub wallet_balance: String,
    /// Ledger entry created.
    pub transaction_id: String,
    /// Credited amount.
    pub amount: String,
    /// Balance before the credit.
    pub balance_before: String,
    /// Balance after the credit.
    pub balance_after: String,
    /// Credit timestamp.
    pub created_at: String,
}

/// Maps a wallet balance, filling in the asset and decimals when missing.
#[must_use]
pub fn map_wallet_balance(
    item: Option<BackendWalletBalance>,
    fallback_asset: &str,
    fallback_decimals: u64,
) -> AdminDashboardWalletBalance {
    let item = item.unwrap_or_default();
    let asset = normalize_string(item.asset.as_ref(), fallback_asset);
    let decimals = normalize_count(item.decimals.as_ref());

    AdminDashboardWalletBalance {
        address: optional_string(item.address.as_ref()).filter(|a| !a.is_empty()),
        asset: if asset.is_empty() {
            fallback_asset.to_string()
        } else {
            asset
        },
        balance: optional_string(item.balance.as_ref()),
        raw_balance: optional_string(item.raw_balance.as_ref()),
        decimals: if decimals == 0 { fallback_decimals } else { decimals },
    }
}

/// Maps the dashboard overview.
#[must_use]
pub fn map_dashboard_overview(data: BackendDashboardOverviewResponse) -> AdminDashboardOverview {
    AdminDashboardOverview {
        total_revenue: normalize_string(data.total_revenue.as_ref(), "0"),
        total_paid_to_user_wallet: normalize_string(data.total_paid_to_user_wallet.as_ref(), "0"),
        total_paid_to_withdraw: normalize_string(data.total_paid_to_withdraw.as_ref(), "0"),
        withdrawal_requests_count: normalize_count(data.withdrawal_requests_count.as_ref()),
        hot_wallet: map_wallet_balance(data.hot_wallet, "USDT", 6),
        gas_wallet: map_wallet_balance(data.gas_wallet, "BNB", 18),
        users_count: normalize_count(data.users_count.as_ref()),
        active_packages_count: normalize_count(data.active_packages_count.as_ref()),
    }
}

/// Maps the blockchain summary.
#[must_use]
pub fn map_blockchain_summary(data: BackendBlockchainSummaryResponse) -> AdminBlockchainSummary {
    let deposits = data.deposits.unwrap_or_default();
    let sweeps = data.sweeps.unwrap_or_default();
    let gas = data.gas.unwrap_or_default();

    let status_counts = sweeps
        .status_counts
        .unwrap_or_default()
        .into_iter()
        .map(|(status, count)| (status, normalize_count(Some(&count))))
        .collect();

    AdminBlockchainSummary {
        deposits: DepositTotals {
            credited_total: normalize_string(deposits.credited_total.as_ref(), "0"),
            detected_total: normalize_string(deposits.detected_total.as_ref(), "0"),
        },
        sweeps: SweepTotals {
            status_counts,
            in_progress: normalize_count(sweeps.in_progress.as_ref()),
            failed: normalize_count(sweeps.failed.as_ref()),
            unswept_wallets: normalize_count(sweeps.unswept_wallets.as_ref()),
        },
        gas: GasTotals {
            sweep_gas_used: normalize_nullable_string(gas.sweep_gas_used.as_ref()),
            sweep_gas_fee_wei: normalize_nullable_string(gas.sweep_gas_fee_wei.as_ref()),
            sweep_gas_fee_bnb: normalize_nullable_string(gas.sweep_gas_fee_bnb.as_ref()),
            topup_gas_used: normalize_nullable_string(gas.topup_gas_used.as_ref()),
            topup_gas_fee_wei: normalize_nullable_string(gas.topup_gas_fee_wei.as_ref()),
            topup_gas_fee_bnb: normalize_nullable_string(gas.topup_gas_fee_bnb.as_ref()),
        },
    }
}

/// Maps a manual deposit receipt; `user_id` fills in a missing id.
#[must_use]
pub fn map_manual_deposit_result(item: BackendManualDepositResult, user_id: &str) -> AdminManualDepositResult {
    AdminManualDepositResult {
        user_id: normalize_string(item.user_id.as_ref(), user_id),
        wallet_balance: normalize_string(item.wallet_balance.as_ref(), "0"),
        transaction_id: normalize_string(item.transaction_id.as_ref(), ""),
        amount: normalize_string(item.amount.as_ref(), "0"),
        balance_before: normalize_string(item.balance_before.as_ref(), "0"),
        balance_after: normalize_string(item.balance_after.as_ref(), "0"),
        created_at: normalize_date(item.created_at.as_ref()),
    }
}

/// `null` and missing stay absent; other scalars render as text.
fn optional_string(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        other => Some(normalize_string(other, "")),
    }
}
