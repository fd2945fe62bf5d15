//! Read-only operational rows: healthchecks, deposit scanner windows,
//! sweep transfers and the admin audit trail.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::normalize::{
    normalize_bool, normalize_count, normalize_date, normalize_nullable_string, normalize_object,
    normalize_string,
};
use super::user::user_label;
use crate::backend::dto::{
    BackendAuditLogItem, BackendDepositScanLogItem, BackendHealthcheckItem, BackendSweepLogItem,
};

const DEFAULT_CHAIN: &str = "BSC";

/// One healthcheck probe result.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminHealthcheck {
    /// Row id.
    pub id: String,
    /// Overall status, `NOT_READY` when missing.
    pub status: String,
    /// Which probe produced the row.
    pub source: Option<String>,
    /// Database reachable.
    pub db_up: bool,
    /// Mail transport ready.
    pub email_ready: bool,
    /// Per-check details.
    #[schema(value_type = Option<Object>)]
    /// Per-check results.
    pub checks: Option<Value>,
    /// Failure text.
    pub error_message: Option<String>,
    /// Probe timestamp.
    pub created_at: String,
}

/// One deposit scanner window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDepositScanLog {
    /// Row id.
    pub id: String,
    /// Chain scanned.
    pub network: String,
    /// Why the scan ran.
    pub reason: String,
    /// First block of the window.
    pub from_block: u64,
    /// Last block of the window.
    pub to_block: u64,
    /// Blocks the scanner meant to read.
    pub planned_scan_blocks: u64,
    /// Blocks actually read.
    pub scanned_blocks: u64,
    /// Deposits seen.
    pub detected: u64,
    /// Deposits credited.
    pub credited: u64,
    /// Chain head at scan time.
    pub latest_block: u64,
    /// Last block considered final.
    pub safe_tip: u64,
    /// A reorg was seen in the window.
    pub reorg_detected: bool,
    /// Scan timestamp.
    pub created_at: String,
}

/// One sweep transfer from a deposit wallet to the hot wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminSweepLog {
    /// Row id.
    pub id: String,
    /// Chain name.
    pub network: String,
    /// Sweep state.
    pub status: String,
    /// Why the sweep ran.
    pub purpose: Option<String>,
    /// Action that queued the sweep.
    pub source_action: Option<String>,
    /// Sending address.
    pub from_address: String,
    /// Receiving address.
    pub to_address: String,
    /// Token contract address.
    pub token_contract: String,
    /// Owning user id.
    pub user_id: Option<String>,
    /// Owner shown as username, email, or id.
    pub user_label: String,
    /// Amount.
    pub amount: String,
    /// Transaction hash.
    pub tx_hash: Option<String>,
    /// Gas top-up transaction hash.
    pub gas_topup_tx_hash: Option<String>,
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
    /// Sweep plus top-up fee in BNB.
    pub total_gas_fee_bnb: Option<String>,
    /// Failure message.
    pub error_message: Option<String>,
    /// Start timestamp.
    pub started_at: Option<String>,
    /// Completion timestamp.
    pub completed_at: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// One admin action from the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminAuditLog {
    /// Row id.
    pub id: String,
    /// Admin who acted.
    pub actor_user_id: Option<String>,
    /// User acted upon.
    pub target_user_id: Option<String>,
    /// Admin display label.
    pub actor_label: String,
    /// Target display label, when there is a target.
    pub target_label: Option<String>,
    /// Action code.
    pub action: String,
    /// Kind of entity touched.
    pub entity_type: Option<String>,
    /// Id of the entity touched.
    pub entity_id: Option<String>,
    /// Free-form context.
    #[schema(value_type = Option<Object>)]
    /// Free-form action details.
    pub metadata: Option<Value>,
    /// Action timestamp.
    pub created_at: String,
}

/// Maps a backend healthcheck row.
#[must_use]
pub fn map_healthcheck(item: BackendHealthcheckItem) -> AdminHealthcheck {
    AdminHealthcheck {
        id: normalize_string(item.id.as_ref(), ""),
        status: normalize_string(item.status.as_ref(), "NOT_READY"),
        source: normalize_nullable_string(item.source.as_ref()),
        db_up: normalize_bool(item.db_up.as_ref()),
        email_ready: normalize_bool(item.email_ready.as_ref()),
        checks: normalize_object(item.checks.as_ref()),
        error_message: normalize_nullable_string(item.error_message.as_ref()),
        created_at: normalize_date(item.created_at.as_ref()),
    }
}

/// Maps a backend scanner window.
#[must_use]
pub fn map_deposit_scan_log(item: BackendDepositScanLogItem) -> AdminDepositScanLog {
    AdminDepositScanLog {
        id: normalize_string(item.id.as_ref(), ""),
        network: normalize_string(item.network.as_ref(), DEFAULT_CHAIN),
        reason: normalize_string(item.reason.as_ref(), "UNKNOWN"),
        from_block: normalize_count(item.from_block.as_ref()),
        to_block: normalize_count(item.to_block.as_ref()),
        planned_scan_blocks: normalize_count(item.planned_scan_blocks.as_ref()),
        scanned_blocks: normalize_count(item.scanned_blocks.as_ref()),
        detected: normalize_count(item.detected.as_ref()),
        credited: normalize_count(item.credited.as_ref()),
        latest_block: normalize_count(item.latest_block.as_ref()),
        safe_tip: normalize_count(item.safe_tip.as_ref()),
        reorg_detected: normalize_bool(item.reorg_detected.as_ref()),
        created_at: normalize_date(item.created_at.as_ref()),
    }
}

/// Maps a backend sweep row.
#[must_use]
pub fn map_sweep_log(item: BackendSweepLogItem) -> AdminSweepLog {
    let user_id = normalize_nullable_string(item.user_id.as_ref());
    let user_label = user_label(item.user.as_ref(), user_id.as_deref().unwrap_or_default());

    AdminSweepLog {
        id: normalize_string(item.id.as_ref(), ""),
        network: normalize_string(item.network.as_ref(), DEFAULT_CHAIN),
        status: normalize_string(item.status.as_ref(), "TRANSFERRING"),
        purpose: normalize_nullable_string(item.purpose.as_ref()),
        source_action: normalize_nullable_string(item.source_action.as_ref()),
        from_address: normalize_string(item.from_address.as_ref(), ""),
        to_address: normalize_string(item.to_address.as_ref(), ""),
        token_contract: normalize_string(item.token_contract.as_ref(), ""),
        user_id,
        user_label,
        amount: normalize_string(item.amount.as_ref(), "0"),
        tx_hash: normalize_nullable_string(item.tx_hash.as_ref()),
        gas_topup_tx_hash: normalize_nullable_string(item.gas_topup_tx_hash.as_ref()),
        sweep_gas_used: normalize_nullable_string(item.sweep_gas_used.as_ref()),
        sweep_gas_fee_wei: normalize_nullable_string(item.sweep_gas_fee_wei.as_ref()),
        sweep_gas_fee_bnb: normalize_nullable_string(item.sweep_gas_fee_bnb.as_ref()),
        topup_gas_used: normalize_nullable_string(item.topup_gas_used.as_ref()),
        topup_gas_fee_wei: normalize_nullable_string(item.topup_gas_fee_wei.as_ref()),
        topup_gas_fee_bnb: normalize_nullable_string(item.topup_gas_fee_bnb.as_ref()),
        total_gas_fee_bnb: normalize_nullable_string(item.total_gas_fee_bnb.as_ref()),
        error_message: normalize_nullable_string(item.error_message.as_ref()),
        started_at: normalize_nullable_string(item.started_at.as_ref()),
        completed_at: normalize_nullable_string(item.completed_at.as_ref()),
        created_at: normalize_date(item.created_at.as_ref()),
    }
}

/// Maps a backend audit row. Rows without a target carry no target label.
#[must_use]
pub fn map_audit_log(item: BackendAuditLogItem) -> AdminAuditLog {
    let actor_user_id = normalize_nullable_string(item.actor_user_id.as_ref());
    let target_user_id = normalize_nullable_string(item.target_user_id.as_ref());
    let actor_label = user_label(item.actor.as_ref(), actor_user_id.as_deref().unwrap_or_default());
    let target_label = (item.target.is_some() || target_user_id.is_some())
        .then(|| user_label(item.target.as_ref(), target_user_id.as_deref().unwrap_or_default()));

    AdminAuditLog {
        id: normalize_string(item.id.as_ref(), ""),
        actor_user_id,
        target_user_id,
        actor_label,
        target_label,
        action: normalize_string(item.action.as_ref(), "UNKNOWN"),
        entity_type: normalize_nullable_string(item.entity_type.as_ref()),
        entity_id: normalize_nullable_string(item.entity_id.as_ref()),
        metadata: normalize_object(item.metadata.as_ref()),
        created_at: normalize_date(item.created_at.as_ref()),
    }
}
