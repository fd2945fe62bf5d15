//! Referral promotions: view model, editable draft and write payloads.
//!
//! The console edits a promotion as a [`PromotionDraft`], a flat bag of
//! strings mirroring the form inputs. Drafts are validated here, then turned
//! into the backend write body with datetimes converted to UTC.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::datetime::{
    parse_in_offset, parse_timestamp, to_iso_string_from_local_input,
    to_local_input_from_iso_string,
};
use super::normalize::{non_empty_string, normalize_count, normalize_date, normalize_string};
use crate::backend::dto::BackendPromotionItem;
use crate::error::BffError;

/// Reward type every console-created promotion uses.
pub const REWARD_TYPE_WALLET_CREDIT: &str = "WALLET_CREDIT";

/// Lifecycle state of a promotion as shown in the console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PromotionStatus {
    /// Not published.
    #[default]
    Draft,
    /// Published with a future start.
    Scheduled,
    /// Running.
    Active,
    /// Paused by an admin.
    Deactive,
    /// Past its end or stopped.
    Ended,
}

impl PromotionStatus {
    /// Backend spelling sent on update.
    #[must_use]
    pub const fn backend_status(self) -> &'static str {
        match self {
            Self::Draft | Self::Scheduled => "DRAFT",
            Self::Active => "ACTIVE",
            Self::Deactive => "PAUSED",
            Self::Ended => "ENDED",
        }
    }
}

/// A promotion as listed in the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminPromotion {
    /// Promotion id.
    pub id: String,
    /// Title.
    pub title: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Start timestamp.
    pub start_at: String,
    /// Optional end timestamp.
    pub end_at: Option<String>,
    /// Direct referrals needed to qualify.
    pub min_direct_referrals: u64,
    /// Minimum deposit per referral, in USD.
    pub min_referral_deposit_usd: String,
    /// Reward paid per grant, in USD.
    pub reward_amount_usd: String,
    /// Cap on grants per user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_grants_per_user: Option<u64>,
    /// Creation timestamp.
    pub created_at: String,
    /// Lifecycle state.
    pub status: PromotionStatus,
}

/// Editable form shape of a promotion. Datetimes are `datetime-local`
/// values in the console offset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct PromotionDraft {
    /// Title.
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,
    /// Description, empty for none.
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    /// Lifecycle state; ignored on create.
    pub status: PromotionStatus,
    /// Start as `YYYY-MM-DDTHH:MM`.
    #[serde(deserialize_with = "lenient_string")]
    pub start_at_local: String,
    /// End as `YYYY-MM-DDTHH:MM`, empty for open-ended.
    #[serde(deserialize_with = "lenient_string")]
    pub end_at_local: String,
    /// Whole number.
    #[serde(deserialize_with = "lenient_string")]
    pub min_direct_referrals: String,
    /// Decimal USD amount.
    #[serde(deserialize_with = "lenient_string")]
    pub min_referral_deposit_usd: String,
    /// Decimal USD amount.
    #[serde(deserialize_with = "lenient_string")]
    pub reward_amount_usd: String,
    /// Whole number, empty for no cap.
    #[serde(deserialize_with = "lenient_string")]
    pub max_grants_per_user: String,
}

/// Backend body for creating or updating a promotion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionWrite {
    /// Trimmed title.
    pub title: String,
    /// Trimmed description or `null`.
    pub description: Option<String>,
    /// Backend status, update only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    /// UTC start.
    pub start_at: String,
    /// UTC end or `null`.
    pub end_at: Option<String>,
    /// Direct referrals needed.
    pub min_direct_referrals: u64,
    /// Trimmed decimal.
    pub min_referral_deposit_usd: String,
    /// Trimmed decimal.
    pub reward_amount_usd: String,
    /// Only sent when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_grants_per_user: Option<u64>,
    /// Create only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_type: Option<&'static str>,
}

/// Derives the console status from the backend status and time window.
///
/// Explicit backend states win: `ACTIVE` is active, `PAUSED` and `ENDED` are
/// ended, `DRAFT` is scheduled. Otherwise the window decides; timestamps
/// that do not parse are ignored.
#[must_use]
pub fn map_promotion_status(
    raw: &str,
    start_at: &str,
    end_at: Option<&str>,
    now: DateTime<Utc>,
) -> PromotionStatus {
    match raw.to_ascii_uppercase().as_str() {
        "ACTIVE" => return PromotionStatus::Active,
        "PAUSED" | "ENDED" => return PromotionStatus::Ended,
        "DRAFT" => return PromotionStatus::Scheduled,
        _ => {}
    }
    if parse_timestamp(start_at).is_some_and(|start| now < start) {
        return PromotionStatus::Scheduled;
    }
    if end_at
        .and_then(parse_timestamp)
        .is_some_and(|end| now > end)
    {
        return PromotionStatus::Ended;
    }
    PromotionStatus::Active
}

/// Maps a backend promotion row.
#[must_use]
pub fn map_promotion(item: BackendPromotionItem, now: DateTime<Utc>) -> AdminPromotion {
    let start_at = normalize_date(item.start_at.as_ref());
    let end_at = non_empty_string(item.end_at.as_ref());
    let status = map_promotion_status(
        &normalize_string(item.status.as_ref(), "DRAFT"),
        &start_at,
        end_at.as_deref(),
        now,
    );

    AdminPromotion {
        id: normalize_string(item.id.as_ref(), ""),
        title: normalize_string(item.title.as_ref(), ""),
        description: non_empty_string(item.description.as_ref()),
        start_at,
        end_at,
        min_direct_referrals: normalize_count(item.min_direct_referrals.as_ref()),
        min_referral_deposit_usd: normalize_string(item.min_referral_deposit_usd.as_ref(), "0"),
        reward_amount_usd: normalize_string(item.reward_amount_usd.as_ref(), "0"),
        max_grants_per_user: item.max_grants_per_user.as_ref().and_then(Value::as_u64),
        created_at: normalize_date(item.created_at.as_ref()),
        status,
    }
}

/// Builds the edit form for a promotion.
#[must_use]
pub fn to_draft(promo: &AdminPromotion, offset: FixedOffset) -> PromotionDraft {
    PromotionDraft {
        title: promo.title.clone(),
        description: promo.description.clone().unwrap_or_default(),
        status: promo.status,
        start_at_local: to_local_input_from_iso_string(Some(&promo.start_at), offset),
        end_at_local: to_local_input_from_iso_string(promo.end_at.as_deref(), offset),
        min_direct_referrals: promo.min_direct_referrals.to_string(),
        min_referral_deposit_usd: promo.min_referral_deposit_usd.clone(),
        reward_amount_usd: promo.reward_amount_usd.clone(),
        max_grants_per_user: promo
            .max_grants_per_user
            .map(|n| n.to_string())
            .unwrap_or_default(),
    }
}

/// Field errors for a draft, keyed by draft field name. Empty when valid.
#[must_use]
pub fn validate_draft(draft: &PromotionDraft, offset: FixedOffset) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    let mut fail = |field: &str, message: &str| {
        errors.insert(field.to_string(), message.to_string());
    };

    if draft.title.trim().is_empty() {
        fail("title", "Title is required.");
    }

    let start_raw = draft.start_at_local.trim();
    let end_raw = draft.end_at_local.trim();
    let start = parse_in_offset(start_raw, offset);
    let end = parse_in_offset(end_raw, offset);

    if start.is_none() {
        fail("startAtLocal", "Start date is required.");
    }
    if !end_raw.is_empty() && end.is_none() {
        fail("endAtLocal", "End date must be a valid date.");
    }
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            fail("endAtLocal", "End date must be after start date.");
        }
    }

    if !is_non_negative_int(&draft.min_direct_referrals) {
        fail("minDirectReferrals", "Must be an integer ≥ 0.");
    }
    if !is_non_negative_number(&draft.min_referral_deposit_usd) {
        fail("minReferralDepositUsd", "Must be a number ≥ 0.");
    }
    if !is_non_negative_number(&draft.reward_amount_usd) {
        fail("rewardAmountUsd", "Must be a number ≥ 0.");
    }
    let max_grants = draft.max_grants_per_user.trim();
    if !max_grants.is_empty() && parse_number(max_grants).is_none_or(|n| n.fract() != 0.0 || n < 1.0) {
        fail("maxGrantsPerUser", "If provided, must be an integer ≥ 1.");
    }

    errors
}

/// Validates a draft and builds the create body.
///
/// # Errors
///
/// Returns [`BffError::Validation`] with the field errors when the draft is
/// invalid.
pub fn to_create_payload(draft: &PromotionDraft, offset: FixedOffset) -> Result<PromotionWrite, BffError> {
    let mut payload = to_write(draft, offset)?;
    payload.reward_type = Some(REWARD_TYPE_WALLET_CREDIT);
    Ok(payload)
}

/// Validates a draft and builds the update body, status included.
///
/// # Errors
///
/// Returns [`BffError::Validation`] with the field errors when the draft is
/// invalid.
pub fn to_update_payload(draft: &PromotionDraft, offset: FixedOffset) -> Result<PromotionWrite, BffError> {
    let mut payload = to_write(draft, offset)?;
    payload.status = Some(draft.status.backend_status());
    Ok(payload)
}

/// List filter for the backend; `all` or empty means no filter.
///
/// `draft` is an alias of `scheduled`. Unknown values are rejected instead
/// of falling through to `ENDED`.
///
/// # Errors
///
/// Returns [`BffError::InvalidRequest`] for a status the console does not know.
pub fn to_backend_promotion_status(filter: Option<&str>) -> Result<Option<&'static str>, BffError> {
    let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
        return Ok(None);
    };
    match filter.to_ascii_lowercase().as_str() {
        "all" => Ok(None),
        "active" => Ok(Some("ACTIVE")),
        "scheduled" | "draft" => Ok(Some("DRAFT")),
        "ended" | "deactive" => Ok(Some("ENDED")),
        other => Err(BffError::InvalidRequest(format!(
            "Unknown promotion status: {other}"
        ))),
    }
}

fn to_write(draft: &PromotionDraft, offset: FixedOffset) -> Result<PromotionWrite, BffError> {
    let fields = validate_draft(draft, offset);
    if !fields.is_empty() {
        return Err(BffError::Validation {
            message: "Promotion is invalid".to_string(),
            fields,
        });
    }

    let description = draft.description.trim();
    let end_raw = draft.end_at_local.trim();
    let max_grants = draft.max_grants_per_user.trim();

    Ok(PromotionWrite {
        title: draft.title.trim().to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        status: None,
        start_at: to_iso_string_from_local_input(draft.start_at_local.trim(), offset),
        end_at: (!end_raw.is_empty()).then(|| to_iso_string_from_local_input(end_raw, offset)),
        min_direct_referrals: parse_whole(&draft.min_direct_referrals).unwrap_or(0),
        min_referral_deposit_usd: draft.min_referral_deposit_usd.trim().to_string(),
        reward_amount_usd: draft.reward_amount_usd.trim().to_string(),
        max_grants_per_user: if max_grants.is_empty() {
            None
        } else {
            parse_whole(max_grants)
        },
        reward_type: None,
    })
}

fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_non_negative_number(value: &str) -> bool {
    parse_number(value).is_some_and(|n| n >= 0.0)
}

fn is_non_negative_int(value: &str) -> bool {
    parse_number(value).is_some_and(|n| n >= 0.0 && n.fract() == 0.0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_whole(value: &str) -> Option<u64> {
    parse_number(value).filter(|n| *n >= 0.0).map(|n| n as u64)
}

/// Accepts strings or numbers for a text field; anything else is empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(normalize_string(value.as_ref(), ""))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use chrono::{Duration, Offset, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        let Some(now) = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).single() else {
            panic!("bad fixture date");
        };
        now
    }

    fn iso(dt: DateTime<Utc>) -> String {
        crate::domain::datetime::to_iso_string(dt)
    }

    fn valid_draft() -> PromotionDraft {
        PromotionDraft {
            title: " Summer boost ".to_string(),
            description: "  ".to_string(),
            status: PromotionStatus::Deactive,
            start_at_local: "2025-07-01T09:00".to_string(),
            end_at_local: "2025-07-31T18:00".to_string(),
            min_direct_referrals: "3".to_string(),
            min_referral_deposit_usd: " 100.50 ".to_string(),
            reward_amount_usd: "25".to_string(),
            max_grants_per_user: String::new(),
        }
    }

    #[test]
    fn draft_status_is_scheduled_even_when_window_is_open() {
        let start = iso(now() + Duration::days(3));
        assert_eq!(
            map_promotion_status("DRAFT", &start, None, now()),
            PromotionStatus::Scheduled
        );
    }

    #[test]
    fn explicit_backend_states_win() {
        let start = iso(now() - Duration::days(3));
        assert_eq!(map_promotion_status("ACTIVE", &start, None, now()), PromotionStatus::Active);
        assert_eq!(map_promotion_status("paused", &start, None, now()), PromotionStatus::Ended);
        assert_eq!(map_promotion_status("ENDED", &start, None, now()), PromotionStatus::Ended);
    }

    #[test]
    fn window_decides_unknown_status() {
        let past = iso(now() - Duration::days(3));
        let future = iso(now() + Duration::days(3));
        assert_eq!(
            map_promotion_status("", &past, Some(&future), now()),
            PromotionStatus::Active
        );
        assert_eq!(
            map_promotion_status("", &future, None, now()),
            PromotionStatus::Scheduled
        );
        assert_eq!(
            map_promotion_status("ARCHIVED", &past, Some(&past), now()),
            PromotionStatus::Ended
        );
        assert_eq!(
            map_promotion_status("", "not a date", Some("never"), now()),
            PromotionStatus::Active
        );
    }

    #[test]
    fn maps_sparse_promotion() {
        let Ok(item) = serde_json::from_value::<BackendPromotionItem>(json!({
            "id": "p-1",
            "title": "Launch",
            "startAt": "2025-01-01T00:00:00.000Z",
            "endAt": null,
            "minReferralDepositUsd": 50,
            "maxGrantsPerUser": 2
        })) else {
            panic!("decode failed");
        };
        let promo = map_promotion(item, now());
        assert_eq!(promo.status, PromotionStatus::Scheduled);
        assert_eq!(promo.end_at, None);
        assert_eq!(promo.description, None);
        assert_eq!(promo.min_direct_referrals, 0);
        assert_eq!(promo.min_referral_deposit_usd, "50");
        assert_eq!(promo.reward_amount_usd, "0");
        assert_eq!(promo.max_grants_per_user, Some(2));
    }

    #[test]
    fn draft_round_trips_through_console_offset() {
        let Some(offset) = FixedOffset::east_opt(2 * 3600) else {
            panic!("bad offset");
        };
        let promo = AdminPromotion {
            id: "p-1".to_string(),
            title: "Launch".to_string(),
            description: None,
            start_at: "2025-07-01T07:00:00.000Z".to_string(),
            end_at: None,
            min_direct_referrals: 4,
            min_referral_deposit_usd: "10".to_string(),
            reward_amount_usd: "5".to_string(),
            max_grants_per_user: None,
            created_at: "2025-06-01T00:00:00.000Z".to_string(),
            status: PromotionStatus::Scheduled,
        };
        let draft = to_draft(&promo, offset);
        assert_eq!(draft.start_at_local, "2025-07-01T09:00");
        assert_eq!(draft.end_at_local, "");
        assert_eq!(draft.min_direct_referrals, "4");
        assert_eq!(draft.max_grants_per_user, "");

        let Ok(payload) = to_update_payload(&draft, offset) else {
            panic!("draft should be valid");
        };
        assert_eq!(payload.start_at, promo.start_at);
        assert_eq!(payload.status, Some("DRAFT"));
    }

    #[test]
    fn validation_messages() {
        let offset = Utc.fix();
        let draft = PromotionDraft {
            title: "  ".to_string(),
            start_at_local: String::new(),
            end_at_local: "whenever".to_string(),
            min_direct_referrals: "1.5".to_string(),
            min_referral_deposit_usd: "-1".to_string(),
            reward_amount_usd: String::new(),
            max_grants_per_user: "0".to_string(),
            ..PromotionDraft::default()
        };
        let errors = validate_draft(&draft, offset);
        assert_eq!(errors.get("title").map(String::as_str), Some("Title is required."));
        assert_eq!(
            errors.get("startAtLocal").map(String::as_str),
            Some("Start date is required.")
        );
        assert_eq!(
            errors.get("endAtLocal").map(String::as_str),
            Some("End date must be a valid date.")
        );
        assert_eq!(
            errors.get("minDirectReferrals").map(String::as_str),
            Some("Must be an integer ≥ 0.")
        );
        assert_eq!(
            errors.get("minReferralDepositUsd").map(String::as_str),
            Some("Must be a number ≥ 0.")
        );
        assert_eq!(
            errors.get("rewardAmountUsd").map(String::as_str),
            Some("Must be a number ≥ 0.")
        );
        assert_eq!(
            errors.get("maxGrantsPerUser").map(String::as_str),
            Some("If provided, must be an integer ≥ 1.")
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        let draft = PromotionDraft {
            end_at_local: "2025-06-01T09:00".to_string(),
            ..valid_draft()
        };
        let errors = validate_draft(&draft, Utc.fix());
        assert_eq!(
            errors.get("endAtLocal").map(String::as_str),
            Some("End date must be after start date.")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn create_payload_is_trimmed_and_tagged() {
        let Ok(payload) = to_create_payload(&valid_draft(), Utc.fix()) else {
            panic!("draft should be valid");
        };
        let Ok(body) = serde_json::to_value(&payload) else {
            panic!("serialize failed");
        };
        assert_eq!(
            body,
            json!({
                "title": "Summer boost",
                "description": null,
                "startAt": "2025-07-01T09:00:00.000Z",
                "endAt": "2025-07-31T18:00:00.000Z",
                "minDirectReferrals": 3,
                "minReferralDepositUsd": "100.50",
                "rewardAmountUsd": "25",
                "rewardType": "WALLET_CREDIT"
            })
        );
    }

    #[test]
    fn update_payload_maps_status() {
        let Ok(payload) = to_update_payload(&valid_draft(), Utc.fix()) else {
            panic!("draft should be valid");
        };
        assert_eq!(payload.status, Some("PAUSED"));
        assert_eq!(payload.reward_type, None);
        assert_eq!(PromotionStatus::Scheduled.backend_status(), "DRAFT");
        assert_eq!(PromotionStatus::Ended.backend_status(), "ENDED");
    }

    #[test]
    fn invalid_draft_is_a_validation_error() {
        let draft = PromotionDraft::default();
        let Err(BffError::Validation { fields, .. }) = to_create_payload(&draft, Utc.fix()) else {
            panic!("expected validation error");
        };
        assert!(fields.contains_key("title"));
    }

    #[test]
    fn list_filter_table() {
        assert!(matches!(to_backend_promotion_status(None), Ok(None)));
        assert!(matches!(to_backend_promotion_status(Some("all")), Ok(None)));
        assert!(matches!(to_backend_promotion_status(Some("active")), Ok(Some("ACTIVE"))));
        assert!(matches!(to_backend_promotion_status(Some("scheduled")), Ok(Some("DRAFT"))));
        assert!(matches!(to_backend_promotion_status(Some("draft")), Ok(Some("DRAFT"))));
        assert!(matches!(to_backend_promotion_status(Some("deactive")), Ok(Some("ENDED"))));
        assert!(matches!(
            to_backend_promotion_status(Some("bogus")),
            Err(BffError::InvalidRequest(_))
        ));
    }

    #[test]
    fn draft_body_accepts_numbers() {
        let Ok(draft) = serde_json::from_value::<PromotionDraft>(json!({
            "title": "T",
            "startAtLocal": "2025-07-01T09:00",
            "minDirectReferrals": 2,
            "minReferralDepositUsd": 10.5,
            "rewardAmountUsd": "1",
            "maxGrantsPerUser": null,
            "status": "active"
        })) else {
            panic!("decode failed");
        };
        assert_eq!(draft.min_direct_referrals, "2");
        assert_eq!(draft.min_referral_deposit_usd, "10.5");
        assert_eq!(draft.max_grants_per_user, "");
        assert_eq!(draft.status, PromotionStatus::Active);
        assert!(validate_draft(&draft, Utc.fix()).is_empty());
    }
}
