//! Single-use card tokens.
//!
//! A token stands in for raw card details so that the PAN never has to pass
//! through the merchant's servers more than once. Tokens are created from a
//! [`TokenRequest`] and can be used once as the [`card`](crate::Charge::card)
//! of a charge.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::card::{Brand, Card, CardType, FraudCheckData};
use crate::wire::{Currency, ObjectType};

/// Outcome of the 3-D Secure liability shift.
///
/// Unrecognised values decode as [`LiabilityShift::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiabilityShift {
    /// Liability moved to the issuer.
    Successful,
    /// Authentication failed; liability stays with the merchant.
    Failed,
    /// The card is not enrolled or 3-D Secure was unavailable.
    NotPossible,
    /// An outcome this library does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

/// 3-D Secure verification details attached to a token.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThreeDSecureInfo {
    /// Verified amount in minor currency units. Sent as a numeric string.
    #[serde(rename = "amount")]
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub amount_minor_units: u64,
    /// Currency of the amount.
    pub currency: Currency,
    /// Whether the card is enrolled in 3-D Secure.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enrolled: bool,
    /// Liability shift outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liability_shift: Option<LiabilityShift>,
}

/// Token record returned by the API.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Token {
    /// Token identifier, e.g. `tok_...`.
    pub id: String,
    /// Creation time in seconds since the Unix epoch.
    #[serde(rename = "created")]
    pub created_at: i64,
    /// Always `token` for this object.
    pub object_type: ObjectType,
    /// First six digits of the card number.
    #[serde(rename = "first6")]
    pub first6_digits: String,
    /// Last four digits of the card number.
    #[serde(rename = "last4")]
    pub last4_digits: String,
    /// Stable hash of the card number.
    pub fingerprint: String,
    /// Expiry month. Sent as a numeric string.
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub exp_month: u32,
    /// Expiry year. Sent as a numeric string.
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub exp_year: u32,
    /// Card network.
    pub brand: Brand,
    /// Funding type.
    #[serde(rename = "type")]
    pub card_type: CardType,
    /// Name printed on the card.
    pub cardholder_name: String,
    /// Billing address, first line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    /// Billing address, second line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    /// Billing address city.
    #[serde(rename = "addressCity", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Billing address state or region.
    #[serde(rename = "addressState", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Billing address postal code.
    #[serde(rename = "addressZip", skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// Billing address country.
    #[serde(rename = "addressCountry", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Whether the token has already been consumed.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub used: bool,
    /// Card the token was created for.
    pub card: Option<Card>,
    /// Fraud-check context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_check_data: Option<FraudCheckData>,
    /// 3-D Secure details.
    #[serde(rename = "threeDSecureInfo", skip_serializing_if = "Option::is_none")]
    pub three_d_secure_info: Option<ThreeDSecureInfo>,
}

/// Raw card details submitted to create a [`Token`].
///
/// # Example
///
/// ```
/// use securionpay::TokenRequest;
///
/// let request = TokenRequest::new("4242424242424242", 10, 2030, "123")
///     .with_cardholder_name("Ashley Jones");
/// let json = serde_json::to_value(&request).unwrap();
/// assert_eq!(json["expMonth"], "10");
/// assert_eq!(json["cvc"], "123");
/// ```
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenRequest {
    /// Full card number.
    #[serde(rename = "number")]
    pub card_number: String,
    /// Expiry month. Sent as a numeric string.
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub exp_month: u32,
    /// Expiry year. Sent as a numeric string.
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub exp_year: u32,
    /// Card security code. Must not be blank.
    #[serde(rename = "cvc")]
    pub security_code: String,
    /// Name printed on the card.
    pub cardholder_name: String,
    /// Billing address city.
    #[serde(rename = "addressCity", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Billing address state or region.
    #[serde(rename = "addressState", skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Billing address postal code.
    #[serde(rename = "addressZip", skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// Billing address, first line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    /// Billing address, second line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    /// Billing address country.
    #[serde(rename = "addressCountry", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Fraud-check context. Serialized as `null` when absent.
    pub fraud_check_data: Option<FraudCheckData>,
}

impl TokenRequest {
    /// Creates a token request from the mandatory card details.
    pub fn new(
        card_number: impl Into<String>,
        exp_month: u32,
        exp_year: u32,
        security_code: impl Into<String>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            exp_month,
            exp_year,
            security_code: security_code.into(),
            ..Self::default()
        }
    }

    /// Sets the cardholder name.
    #[must_use]
    pub fn with_cardholder_name(mut self, name: impl Into<String>) -> Self {
        self.cardholder_name = name.into();
        self
    }

    /// Sets the fraud-check context.
    #[must_use]
    pub fn with_fraud_check_data(mut self, data: FraudCheckData) -> Self {
        self.fraud_check_data = Some(data);
        self
    }
}
