//! Wallet ledger rows.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::normalize::{normalize_date, normalize_string};
use super::user::user_label;
use crate::backend::dto::BackendTransactionItem;

/// Ledger entry kind as shown in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Incoming funds.
    Deposit,
    /// Outgoing funds.
    Withdraw,
    /// Package purchase.
    Trade,
    /// Manual adjustment.
    Fee,
    /// Anything else.
    Bonus,
}

/// Settlement state of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Not settled yet.
    Pending,
    /// Settled.
    Completed,
    /// Failed or expired.
    Failed,
}

/// A wallet ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminTransaction {
    /// Entry id.
    pub id: String,
    /// Owner of the wallet.
    pub user_id: String,
    /// Owner display label.
    pub user_label: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Asset ticker; wallets are USDT-only.
    pub asset: String,
    /// Amount as sent by the backend.
    pub amount: String,
    /// Amount in USD; equal to `amount` for USDT.
    pub amount_usd: String,
    /// Settlement state.
    pub status: TransactionStatus,
    /// Not reported by the ledger.
    pub network: Option<String>,
    /// Not reported by the ledger.
    pub tx_hash: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Backend transaction type to console type.
#[must_use]
pub fn map_transaction_type(raw: &str) -> TransactionType {
    match raw.to_ascii_uppercase().as_str() {
        "DEPOSIT" => TransactionType::Deposit,
        "WITHDRAW" => TransactionType::Withdraw,
        "PACKAGE_BUY" => TransactionType::Trade,
        "ADJUSTMENT" => TransactionType::Fee,
        _ => TransactionType::Bonus,
    }
}

/// Backend transaction status to console status.
#[must_use]
pub fn map_transaction_status(raw: &str) -> TransactionStatus {
    match raw.to_ascii_uppercase().as_str() {
        "COMPLETED" => TransactionStatus::Completed,
        "FAILED" | "EXPIRED" => TransactionStatus::Failed,
        _ => TransactionStatus::Pending,
    }
}

/// List filter for the backend; `all` or empty means no filter.
#[must_use]
pub fn to_backend_transaction_status(filter: Option<&str>) -> Option<&'static str> {
    let filter = filter.map(str::trim).filter(|f| !f.is_empty())?;
    match filter.to_ascii_lowercase().as_str() {
        "all" => None,
        "completed" => Some("COMPLETED"),
        "failed" => Some("FAILED"),
        _ => Some("PENDING"),
    }
}

/// Maps a backend ledger row.
#[must_use]
pub fn map_transaction(item: BackendTransactionItem) -> AdminTransaction {
    let amount = normalize_string(item.amount.as_ref(), "0");
    let wallet = item.wallet.as_ref();
    let user_id = normalize_string(
        wallet.and_then(|w| w.user_id.as_ref()),
        &normalize_string(item.wallet_id.as_ref(), ""),
    );
    let user_label = user_label(wallet.and_then(|w| w.user.as_ref()), &user_id);

    AdminTransaction {
        id: normalize_string(item.id.as_ref(), ""),
        user_id,
        user_label,
        kind: map_transaction_type(&normalize_string(item.kind.as_ref(), "DEPOSIT")),
        asset: "USDT".to_string(),
        amount_usd: amount.clone(),
        amount,
        status: map_transaction_status(&normalize_string(item.status.as_ref(), "PENDING")),
        network: None,
        tx_hash: None,
        created_at: normalize_date(item.created_at.as_ref()),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_table() {
        assert_eq!(map_transaction_type("deposit"), TransactionType::Deposit);
        assert_eq!(map_transaction_type("WITHDRAW"), TransactionType::Withdraw);
        assert_eq!(map_transaction_type("PACKAGE_BUY"), TransactionType::Trade);
        assert_eq!(map_transaction_type("ADJUSTMENT"), TransactionType::Fee);
        assert_eq!(map_transaction_type("REFERRAL_REWARD"), TransactionType::Bonus);
    }

    #[test]
    fn status_table() {
        assert_eq!(map_transaction_status("COMPLETED"), TransactionStatus::Completed);
        assert_eq!(map_transaction_status("expired"), TransactionStatus::Failed);
        assert_eq!(map_transaction_status("FAILED"), TransactionStatus::Failed);
        assert_eq!(map_transaction_status("PROCESSING"), TransactionStatus::Pending);
    }

    #[test]
    fn filter_table() {
        assert_eq!(to_backend_transaction_status(None), None);
        assert_eq!(to_backend_transaction_status(Some("all")), None);
        assert_eq!(to_backend_transaction_status(Some(" ")), None);
        assert_eq!(to_backend_transaction_status(Some("completed")), Some("COMPLETED"));
        assert_eq!(to_backend_transaction_status(Some("failed")), Some("FAILED"));
        assert_eq!(to_backend_transaction_status(Some("pending")), Some("PENDING"));
    }

    #[test]
    fn user_id_falls_back_to_wallet_id() {
        let Ok(item) = serde_json::from_value::<BackendTransactionItem>(json!({
            "id": "t-1",
            "walletId": "w-9",
            "type": "PACKAGE_BUY",
            "amount": 12.5
        })) else {
            panic!("decode failed");
        };
        let tx = map_transaction(item);
        assert_eq!(tx.user_id, "w-9");
        assert_eq!(tx.user_label, "w-9");
        assert_eq!(tx.kind, TransactionType::Trade);
        assert_eq!(tx.amount, "12.5");
        assert_eq!(tx.amount_usd, "12.5");
        assert_eq!(tx.asset, "USDT");
        assert_eq!(tx.status, TransactionStatus::Pending);
    }

    #[test]
    fn label_uses_wallet_owner() {
        let Ok(item) = serde_json::from_value::<BackendTransactionItem>(json!({
            "walletId": "w-9",
            "wallet": {"userId": "u-3", "user": {"username": null, "email": "bo@example.com"}}
        })) else {
            panic!("decode failed");
        };
        let tx = map_transaction(item);
        assert_eq!(tx.user_id, "u-3");
        assert_eq!(tx.user_label, "bo@example.com");
        assert_eq!(tx.kind, TransactionType::Deposit);
        assert_eq!(tx.amount, "0");

        let Ok(value) = serde_json::to_value(&tx) else {
            panic!("serialize failed");
        };
        assert_eq!(value["type"], "deposit");
        assert!(value["txHash"].is_null());
    }
}
