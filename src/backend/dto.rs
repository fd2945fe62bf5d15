//! Wire shapes returned by the backend admin API.
//!
//! Every scalar is kept as an optional [`serde_json::Value`]: the backend
//! mixes strings and numbers for amounts and omits fields freely. The
//! mappers in [`crate::domain`] coerce them into view models.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Keeps an explicit `null` as `Some(Value::Null)`; only an absent field is
/// `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Paginated list envelope: `{ items, total, page }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackendListResponse {
    /// Total matching rows.
    #[serde(deserialize_with = "present")]
    pub total: Option<Value>,
    /// Page actually served.
    #[serde(deserialize_with = "present")]
    pub page: Option<Value>,
    /// Row array; anything else is treated as empty.
    pub items: Option<Value>,
}

/// Embedded `{ username, email }` reference to a platform user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackendUserRef {
    /// Username.
    pub username: Option<Value>,
    /// Email.
    pub email: Option<Value>,
}

/// Platform user row of `GET /v1/admin/users`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendUserItem {
    /// Row id.
    pub id: Option<Value>,
    /// Email address.
    pub email: Option<Value>,
    /// Username.
    pub username: Option<Value>,
    /// Account status, e.g. `ACTIVE`.
    pub status: Option<Value>,
    /// Backend role, e.g. `FINANCE_ADMIN`.
    pub role: Option<Value>,
    /// KYC review state.
    pub kyc_status: Option<Value>,
    /// Own referral code.
    pub referral_code: Option<Value>,
    /// Code used at sign-up.
    pub registered_with_referral_code: Option<Value>,
    /// Number of direct referrals.
    pub direct_referrals: Option<Value>,
    /// Wallet balance in USD.
    pub balance_usd: Option<Value>,
    /// Creation timestamp.
    pub created_at: Option<Value>,
}

/// Wallet reference embedded in a transaction row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendWalletRef {
    /// Owner of the wallet.
    pub user_id: Option<Value>,
    /// Owner details.
    pub user: Option<BackendUserRef>,
}

/// Ledger row of `GET /v1/admin/transactions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendTransactionItem {
    /// Row id.
    pub id: Option<Value>,
    /// Wallet the entry belongs to.
    pub wallet_id: Option<Value>,
    /// Entry type, e.g. `DEPOSIT`.
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    /// Entry status.
    pub status: Option<Value>,
    /// Amount.
    pub amount: Option<Value>,
    /// Creation timestamp.
    pub created_at: Option<Value>,
    /// Owning wallet.
    pub wallet: Option<BackendWalletRef>,
}

/// Withdrawal request row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendWithdrawalItem {
    /// Row id.
    pub id: Option<Value>,
    /// Owning user id.
    pub user_id: Option<Value>,
    /// Amount.
    pub amount: Option<Value>,
    /// Request status, e.g. `PENDING`.
    pub status: Option<Value>,
    /// Payout address.
    pub destination_address: Option<Value>,
    /// Rejection reason or admin note.
    pub note: Option<Value>,
    /// Approval timestamp.
    pub approved_at: Option<Value>,
    /// Payout timestamp.
    pub paid_at: Option<Value>,
    /// Rejection timestamp.
    pub rejected_at: Option<Value>,
    /// Creation timestamp.
    pub created_at: Option<Value>,
    /// User details.
    pub user: Option<BackendUserRef>,
}

/// Referral promotion as stored by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendPromotionItem {
    /// Row id.
    pub id: Option<Value>,
    /// Title.
    pub title: Option<Value>,
    /// Description.
    pub description: Option<Value>,
    /// Start timestamp.
    pub start_at: Option<Value>,
    /// End timestamp, open-ended when missing.
    pub end_at: Option<Value>,
    /// Promotion status, e.g. `DRAFT`.
    pub status: Option<Value>,
    /// Direct referrals needed to qualify.
    pub min_direct_referrals: Option<Value>,
    /// Referral deposits needed to qualify, in USD.
    pub min_referral_deposit_usd: Option<Value>,
    /// Reward per grant, in USD.
    pub reward_amount_usd: Option<Value>,
    /// Grant cap per user.
    pub max_grants_per_user: Option<Value>,
    /// Creation timestamp.
    pub created_at: Option<Value>,
}

/// One healthcheck run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendHealthcheckItem {
    /// Row id.
    pub id: Option<Value>,
    /// Overall result.
    pub status: Option<Value>,
    /// What triggered the check.
    pub source: Option<Value>,
    /// Database reachable.
    pub db_up: Option<Value>,
    /// Mail transport ready.
    pub email_ready: Option<Value>,
    /// Per-check results.
    pub checks: Option<Value>,
    /// Failure message.
    pub error_message: Option<Value>,
    /// Creation timestamp.
    pub created_at: Option<Value>,
}

/// One deposit scanner pass over a block range.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendDepositScanLogItem {
    /// Row id.
    pub id: Option<Value>,
    /// Chain name.
    pub network: Option<Value>,
    /// Why the scan ran.
    pub reason: Option<Value>,
    /// First block scanned.
    pub from_block: Option<Value>,
    /// Last block scanned.
    pub to_block: Option<Value>,
    /// Blocks the pass meant to scan.
    pub planned_scan_blocks: Option<Value>,
    /// Blocks actually scanned.
    pub scanned_blocks: Option<Value>,
    /// Deposits detected.
    pub detected: Option<Value>,
    /// Deposits credited.
    pub credited: Option<Value>,
    /// Chain head at scan time.
    pub latest_block: Option<Value>,
    /// Highest block past the confirmation depth.
    pub safe_tip: Option<Value>,
    /// A reorg was seen during the pass.
    pub reorg_detected: Option<Value>,
    /// Creation timestamp.
    pub created_at: Option<Value>,
}

/// One sweep of a deposit wallet into the hot wallet.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendSweepLogItem {
    /// Row id.
    pub id: Option<Value>,
    /// Chain name.
    pub network: Option<Value>,
    /// Sweep state.
    pub status: Option<Value>,
    /// Why the sweep ran.
    pub purpose: Option<Value>,
    /// Action that queued the sweep.
    pub source_action: Option<Value>,
    /// Sending address.
    pub from_address: Option<Value>,
    /// Receiving address.
    pub to_address: Option<Value>,
    /// Token contract address.
    pub token_contract: Option<Value>,
    /// Owning user id.
    pub user_id: Option<Value>,
    /// Amount.
    pub amount: Option<Value>,
    /// Transaction hash.
    pub tx_hash: Option<Value>,
    /// Gas top-up transaction hash.
    pub gas_topup_tx_hash: Option<Value>,
    /// Gas used by the sweep.
    pub sweep_gas_used: Option<Value>,
    /// Sweep fee in wei.
    pub sweep_gas_fee_wei: Option<Value>,
    /// Sweep fee in BNB.
    pub sweep_gas_fee_bnb: Option<Value>,
    /// Gas used by the top-up.
    pub topup_gas_used: Option<Value>,
    /// Top-up fee in wei.
    pub topup_gas_fee_wei: Option<Value>,
    /// Top-up fee in BNB.
    pub topup_gas_fee_bnb: Option<Value>,
    /// Sweep plus top-up fee in BNB.
    pub total_gas_fee_bnb: Option<Value>,
    /// Failure message.
    pub error_message: Option<Value>,
    /// Start timestamp.
    pub started_at: Option<Value>,
    /// Completion timestamp.
    pub completed_at: Option<Value>,
    /// Creation timestamp.
    pub created_at: Option<Value>,
    /// User details.
    pub user: Option<BackendUserRef>,
}

/// Admin action recorded in the audit log.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendAuditLogItem {
    /// Row id.
    pub id: Option<Value>,
    /// Admin who acted.
    pub actor_user_id: Option<Value>,
    /// User acted upon.
    pub target_user_id: Option<Value>,
    /// Action name.
    pub action: Option<Value>,
    /// Kind of entity touched.
    pub entity_type: Option<Value>,
    /// Id of the entity touched.
    pub entity_id: Option<Value>,
    /// Free-form action details.
    pub metadata: Option<Value>,
    /// Creation timestamp.
    pub created_at: Option<Value>,
    /// Acting admin details.
    pub actor: Option<BackendUserRef>,
    /// Target user details.
    pub target: Option<BackendUserRef>,
}

/// Detected on-chain deposit and its credit state.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendDepositCreditItem {
    /// Row id.
    pub id: Option<Value>,
    /// Owning user id.
    pub user_id: Option<Value>,
    /// Chain name.
    pub network: Option<Value>,
    /// Amount.
    pub amount: Option<Value>,
    /// Transaction hash.
    pub tx_hash: Option<Value>,
    /// Sending address.
    pub from_address: Option<Value>,
    /// Receiving address.
    pub to_address: Option<Value>,
    /// Credit state.
    pub status: Option<Value>,
    /// Detection timestamp.
    pub detected_at: Option<Value>,
    /// Credit timestamp.
    pub credited_at: Option<Value>,
    /// User details.
    pub user: Option<BackendUserRef>,
}

/// Totals block of the deposit credits report.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendDepositCreditsSummary {
    /// Sum of credited amounts.
    pub total_amount: Option<Value>,
    /// Number of credits.
    pub total_count: Option<Value>,
    /// Range start.
    pub from: Option<Value>,
    /// Range end.
    pub to: Option<Value>,
}

/// Deposit credits report: a list envelope plus a summary block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackendDepositCreditsResponse {
    /// Total matching rows.
    #[serde(deserialize_with = "present")]
    pub total: Option<Value>,
    /// Page actually served.
    #[serde(deserialize_with = "present")]
    pub page: Option<Value>,
    /// Row array.
    pub items: Option<Value>,
    /// Totals block.
    pub summary: Option<BackendDepositCreditsSummary>,
}

/// Platform wallet balance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendWalletBalance {
    /// Wallet address.
    pub address: Option<Value>,
    /// Asset symbol.
    pub asset: Option<Value>,
    /// Human-readable balance.
    pub balance: Option<Value>,
    /// Balance in base units.
    pub raw_balance: Option<Value>,
    /// Token decimals.
    pub decimals: Option<Value>,
}

/// Dashboard KPIs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendDashboardOverviewResponse {
    /// Revenue to date.
    pub total_revenue: Option<Value>,
    /// Total credited to user wallets.
    pub total_paid_to_user_wallet: Option<Value>,
    /// Total paid out.
    pub total_paid_to_withdraw: Option<Value>,
    /// Open withdrawal requests.
    pub withdrawal_requests_count: Option<Value>,
    /// Hot wallet balance.
    pub hot_wallet: Option<BackendWalletBalance>,
    /// Gas wallet balance.
    pub gas_wallet: Option<BackendWalletBalance>,
    /// Registered users.
    pub users_count: Option<Value>,
    /// Active packages.
    pub active_packages_count: Option<Value>,
}

/// Deposit totals of the blockchain summary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendDepositTotals {
    /// Credited deposits.
    pub credited_total: Option<Value>,
    /// Detected deposits.
    pub detected_total: Option<Value>,
}

/// Sweep counters of the blockchain summary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendSweepTotals {
    /// Sweep count per status.
    pub status_counts: Option<Map<String, Value>>,
    /// Sweeps in flight.
    pub in_progress: Option<Value>,
    /// Failed sweeps.
    pub failed: Option<Value>,
    /// Deposit wallets with funds left.
    pub unswept_wallets: Option<Value>,
}

/// Gas spend of the blockchain summary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendGasTotals {
    /// Gas used by the sweep.
    pub sweep_gas_used: Option<Value>,
    /// Sweep fee in wei.
    pub sweep_gas_fee_wei: Option<Value>,
    /// Sweep fee in BNB.
    pub sweep_gas_fee_bnb: Option<Value>,
    /// Gas used by the top-up.
    pub topup_gas_used: Option<Value>,
    /// Top-up fee in wei.
    pub topup_gas_fee_wei: Option<Value>,
    /// Top-up fee in BNB.
    pub topup_gas_fee_bnb: Option<Value>,
}

/// Chain-side KPIs for the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackendBlockchainSummaryResponse {
    /// Deposit totals.
    pub deposits: Option<BackendDepositTotals>,
    /// Sweep counters.
    pub sweeps: Option<BackendSweepTotals>,
    /// Gas spend.
    pub gas: Option<BackendGasTotals>,
}

/// Receipt of a manual wallet credit.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendManualDepositResult {
    /// Owning user id.
    pub user_id: Option<Value>,
    /// Balance after the credit.
    pub wallet_balance: Option<Value>,
    /// Ledger entry created.
    pub transaction_id: Option<Value>,
    /// Amount.
    pub amount: Option<Value>,
    /// Balance before the credit.
    pub balance_before: Option<Value>,
    /// Balance after the credit.
    pub balance_after: Option<Value>,
    /// Creation timestamp.
    pub created_at: Option<Value>,
}

/// Login answer; older backends call the token `token`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendLoginResponse {
    /// Current field name.
    pub access_token: Option<String>,
    /// Legacy field name.
    pub token: Option<String>,
}

impl BackendLoginResponse {
    /// Returns the first non-empty token field.
    #[must_use]
    pub fn into_token(self) -> Option<String> {
        self.access_token
            .filter(|t| !t.is_empty())
            .or_else(|| self.token.filter(|t| !t.is_empty()))
    }
}

/// Answer to a role or status change: `{ id, role }` / `{ id, status }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackendUserPatchResult {
    /// User id.
    pub id: Option<Value>,
    /// New role, on role changes.
    pub role: Option<Value>,
    /// New status, on status changes.
    pub status: Option<Value>,
}

/// Decodes a backend payload, treating `null` as an empty object.
///
/// # Errors
///
/// Returns the serde error when the payload has the wrong shape.
pub fn decode<T>(payload: Value) -> Result<T, serde_json::Error>
where
    T: serde::de::DeserializeOwned + Default,
{
    if payload.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(payload)
}
