//! Credits and the paginated credit listing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::card::Card;
use crate::wire::{Currency, CustomerId, ObjectType};

/// Funds sent to a card, e.g. a payout or a refund not tied to a charge.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credit {
    /// Credit identifier.
    pub id: String,
    /// Creation time in seconds since the Unix epoch.
    #[serde(rename = "created")]
    pub created_at: i64,
    /// Always `credit` for this object.
    pub object_type: ObjectType,
    /// Amount in minor currency units. Sent as a numeric string.
    #[serde(rename = "amount")]
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub amount_minor_units: u64,
    /// Currency of the amount.
    pub currency: Currency,
    /// Free-form description.
    pub description: String,
    /// Card that received the funds.
    pub card: Option<Card>,
    /// Customer that received the funds, if any.
    #[serde(skip_serializing_if = "CustomerId::is_empty")]
    pub customer_id: CustomerId,
    /// Merchant-defined key/value pairs.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// One page of credits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Credits {
    /// Credits on this page, newest first.
    #[serde(rename = "list")]
    pub credits: Vec<Credit>,
    /// Whether more credits exist past this page.
    pub has_more: bool,
    /// Total number of matching credits, when requested with
    /// [`CreditRequest::include_total_count`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

/// Filters and cursors for listing credits.
///
/// All fields are optional; unset fields are left out of the query string.
/// Time bounds are Unix timestamps in seconds.
///
/// # Example
///
/// ```
/// use securionpay::CreditRequest;
///
/// let request = CreditRequest {
///     limit: Some(10),
///     include_total_count: true,
///     created_on_or_after: Some(1_500_000_000),
///     ..CreditRequest::default()
/// };
/// assert_eq!(
///     request.to_query_pairs(),
///     vec![
///         ("gte", "1500000000".to_owned()),
///         ("includeTotalCount", "true".to_owned()),
///         ("limit", "10".to_owned()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreditRequest {
    /// Page size. Missing or zero falls back to [`CreditRequest::DEFAULT_LIMIT`].
    pub limit: Option<u32>,
    /// Only credits of this customer.
    pub customer_id: Option<CustomerId>,
    /// Created strictly after this time (`gt`).
    pub created_after: Option<i64>,
    /// Created at or after this time (`gte`).
    pub created_on_or_after: Option<i64>,
    /// Created strictly before this time (`lt`).
    pub created_before: Option<i64>,
    /// Created at or before this time (`lte`).
    pub created_on_or_before: Option<i64>,
    /// Cursor: return credits after this credit id.
    pub starting_after_id: Option<String>,
    /// Cursor: return credits before this credit id.
    pub ending_before_id: Option<String>,
    /// Ask the API to include [`Credits::total_count`].
    pub include_total_count: bool,
}

impl CreditRequest {
    /// Page size used when none is given.
    pub const DEFAULT_LIMIT: u32 = 3;

    /// Returns the page size that will be sent.
    #[must_use]
    pub fn effective_limit(&self) -> u32 {
        match self.limit {
            Some(limit) if limit >= 1 => limit,
            _ => Self::DEFAULT_LIMIT,
        }
    }

    /// Encodes the request as URL query pairs, sorted by key.
    ///
    /// Unset and blank values are omitted; the limit is always present.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(9);

        if let Some(customer_id) = self.customer_id.as_ref().filter(|id| !id.is_empty()) {
            pairs.push(("customerId", customer_id.to_string()));
        }
        if let Some(id) = non_blank(self.ending_before_id.as_deref()) {
            pairs.push(("endingBeforeId", id.to_owned()));
        }
        if let Some(ts) = self.created_after {
            pairs.push(("gt", ts.to_string()));
        }
        if let Some(ts) = self.created_on_or_after {
            pairs.push(("gte", ts.to_string()));
        }
        if self.include_total_count {
            pairs.push(("includeTotalCount", "true".to_owned()));
        }
        pairs.push(("limit", self.effective_limit().to_string()));
        if let Some(ts) = self.created_before {
            pairs.push(("lt", ts.to_string()));
        }
        if let Some(ts) = self.created_on_or_before {
            pairs.push(("lte", ts.to_string()));
        }
        if let Some(id) = non_blank(self.starting_after_id.as_deref()) {
            pairs.push(("startingAfterId", id.to_owned()));
        }

        pairs
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
