//! Deposit credits report: credited on-chain deposits plus a totals block.

use serde::Serialize;
use utoipa::ToSchema;

use super::normalize::{normalize_count, normalize_date, normalize_nullable_string, normalize_string};
use super::pagination::{PaginatedResult, to_paginated_result};
use super::user::user_label;
use crate::backend::dto::{BackendDepositCreditItem, BackendDepositCreditsResponse, BackendListResponse};

/// One credited deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDepositCreditItem {
    /// Row id.
    pub id: String,
    /// Credited user.
    pub user_id: String,
    /// Credited user's display label.
    pub user_label: String,
    /// Chain the deposit arrived on.
    pub network: String,
    /// Credited amount.
    pub amount: String,
    /// Deposit transaction hash.
    pub tx_hash: String,
    /// Sender, when known.
    pub from_address: Option<String>,
    /// Deposit wallet.
    pub to_address: String,
    /// Credit state.
    pub status: String,
    /// When the scanner saw the deposit.
    pub detected_at: String,
    /// When the wallet was credited.
    pub credited_at: Option<String>,
}

/// Totals across the whole filtered range, not just the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDepositCreditsSummary {
    /// Sum of credited amounts.
    pub total_amount: String,
    /// Number of credits.
    pub total_count: u64,
    /// Range start echoed by the backend.
    pub from: Option<String>,
    /// Range end echoed by the backend.
    pub to: Option<String>,
}

/// A page of credits with the range summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AdminDepositCreditsReport {
    /// Rows on this page.
    pub items: Vec<AdminDepositCreditItem>,
    /// Total rows across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u32,
    /// Page size that was requested.
    pub limit: u32,
    /// Range totals.
    pub summary: AdminDepositCreditsSummary,
}

/// Maps a backend credit row.
#[must_use]
pub fn map_deposit_credit(item: BackendDepositCreditItem) -> AdminDepositCreditItem {
    let user_id = normalize_string(item.user_id.as_ref(), "");
    let user_label = user_label(item.user.as_ref(), &user_id);

    AdminDepositCreditItem {
        id: normalize_string(item.id.as_ref(), ""),
        user_id,
        user_label,
        network: normalize_string(item.network.as_ref(), "BSC"),
        amount: normalize_string(item.amount.as_ref(), "0"),
        tx_hash: normalize_string(item.tx_hash.as_ref(), ""),
        from_address: normalize_nullable_string(item.from_address.as_ref()),
        to_address: normalize_string(item.to_address.as_ref(), ""),
        status: normalize_string(item.status.as_ref(), "CREDITED"),
        detected_at: normalize_date(item.detected_at.as_ref()),
        credited_at: normalize_nullable_string(item.credited_at.as_ref()),
    }
}

/// Maps the credits report. A missing summary totals the rows received.
#[must_use]
pub fn map_deposit_credits_report(
    payload: BackendDepositCreditsResponse,
    requested_page: u32,
    requested_limit: u32,
) -> AdminDepositCreditsReport {
    let BackendDepositCreditsResponse {
        total,
        page,
        items,
        summary,
    } = payload;
    let envelope = BackendListResponse { total, page, items };
    let PaginatedResult {
        items,
        total,
        page,
        limit,
    } = to_paginated_result(envelope, map_deposit_credit, requested_page, requested_limit);

    let summary = summary.unwrap_or_default();
    let summary = AdminDepositCreditsSummary {
        total_amount: normalize_string(summary.total_amount.as_ref(), "0"),
        total_count: if summary.total_count.is_some() {
            normalize_count(summary.total_count.as_ref())
        } else {
            total
        },
        from: normalize_nullable_string(summary.from.as_ref()),
        to: normalize_nullable_string(summary.to.as_ref()),
    };

    AdminDepositCreditsReport {
        items,
        total,
        page,
        limit,
        summary,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_keeps_summary() {
        let Ok(payload) = serde_json::from_value::<BackendDepositCreditsResponse>(json!({
            "total": 31,
            "page": 2,
            "items": [{
                "id": "c-1",
                "userId": "u-1",
                "amount": 15,
                "txHash": "0xabc",
                "toAddress": "0xdef",
                "detectedAt": "2025-03-01T00:00:00.000Z",
                "user": {"username": "kim"}
            }],
            "summary": {"totalAmount": "465.5", "totalCount": 31, "from": "2025-03-01", "to": null}
        })) else {
            panic!("decode failed");
        };
        let report = map_deposit_credits_report(payload, 2, 10);
        assert_eq!(report.total, 31);
        assert_eq!(report.page, 2);
        assert_eq!(report.limit, 10);
        let [item] = report.items.as_slice() else {
            panic!("expected one row");
        };
        assert_eq!(item.user_label, "kim");
        assert_eq!(item.amount, "15");
        assert_eq!(item.from_address, None);
        assert_eq!(report.summary.total_amount, "465.5");
        assert_eq!(report.summary.total_count, 31);
        assert_eq!(report.summary.from.as_deref(), Some("2025-03-01"));
        assert_eq!(report.summary.to, None);
    }

    #[test]
    fn missing_summary_counts_rows() {
        let Ok(payload) = serde_json::from_value::<BackendDepositCreditsResponse>(json!({
            "items": [{"id": "a"}, {"id": "b"}]
        })) else {
            panic!("decode failed");
        };
        let report = map_deposit_credits_report(payload, 1, 20);
        assert_eq!(report.total, 2);
        assert_eq!(report.summary.total_count, 2);
        assert_eq!(report.summary.total_amount, "0");
        assert!(report.items.iter().all(|item| item.status == "CREDITED"));
    }
}
