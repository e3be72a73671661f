//! Stored cards and the request used to attach one to a customer.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::wire::{CustomerId, ObjectType};

/// Card network of a stored card.
///
/// Unrecognised values decode as [`Brand::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Brand {
    /// Visa.
    Visa,
    /// American Express.
    #[serde(rename = "American Express")]
    AmericanExpress,
    /// Mastercard.
    MasterCard,
    /// Discover.
    Discover,
    /// JCB. Older payloads spell it `JBC`.
    #[serde(rename = "JCB", alias = "JBC")]
    Jcb,
    /// Diners Club.
    #[serde(rename = "Diners Club")]
    DinersClub,
    /// Any brand this library does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Funding type of a card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    /// Credit card.
    #[serde(rename = "Credit Card")]
    Credit,
    /// Debit card.
    #[serde(rename = "Debit Card")]
    Debit,
    /// Funding type not reported or not recognised.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Customer context forwarded to the processor's fraud engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FraudCheckData {
    /// Customer IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// Two-letter country code the IP address resolves to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_country: Option<String>,
    /// Customer e-mail address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Browser user agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Browser `Accept-Language` header.
    pub accept_language: String,
}

/// A card stored on a customer.
///
/// Only masked card data is ever returned: the first six and last four
/// digits of the PAN plus a [fingerprint](Card::fingerprint).
///
/// # JSON Format
///
/// ```json
/// {
///   "id": "card_8P7OWXA5xiTS1ISnyZcum1KV",
///   "objectType": "card",
///   "created": 1415810511,
///   "first6": "424242",
///   "last4": "4242",
///   "fingerprint": "e3d8suyIDgFg3pE7",
///   "expMonth": "11",
///   "expYear": "2022",
///   "cardholderName": "John Doe",
///   "customerId": "cust_AoR0wvgntQWRUYMdZNLYMz5R",
///   "brand": "Visa",
///   "type": "Credit Card",
///   "fraudCheckData": null
/// }
/// ```
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Card {
    /// Card identifier, e.g. `card_...`.
    pub id: String,
    /// Always `card` for this object.
    pub object_type: ObjectType,
    /// Creation time in seconds since the Unix epoch.
    #[serde(rename = "created")]
    pub created_at: i64,
    /// First six digits of the card number.
    #[serde(rename = "first6")]
    pub first6_digits: String,
    /// Last four digits of the card number.
    #[serde(rename = "last4")]
    pub last4_digits: String,
    /// Stable hash of the card number, shared across tokenizations.
    pub fingerprint: String,
    /// Expiry month, `1..=12`. Sent as a numeric string.
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub exp_month: u32,
    /// Four-digit expiry year. Sent as a numeric string.
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub exp_year: u32,
    /// Name printed on the card.
    pub cardholder_name: String,
    /// Customer owning the card. A JSON `null` decodes as empty.
    pub customer_id: CustomerId,
    /// Card network.
    pub brand: Brand,
    /// Funding type.
    #[serde(rename = "type")]
    pub card_type: CardType,
    /// Billing address country.
    #[serde(rename = "addressCountry", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
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
    /// Fraud-check context. Serialized as `null` when absent.
    pub fraud_check_data: Option<FraudCheckData>,
}

impl Card {
    /// Creates a card reference carrying only its identifier.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Request to register a [`Card`] on a customer.
///
/// The customer id is part of the URL (`/customers/{customerId}/cards`);
/// only the card itself is sent as the request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddCardRequest {
    /// Customer receiving the card.
    pub customer_id: String,
    /// The card to register. Its `id` must be set.
    pub card: Card,
}

impl AddCardRequest {
    /// Creates a registration request.
    pub fn new(customer_id: impl Into<String>, card: Card) -> Self {
        Self {
            customer_id: customer_id.into(),
            card,
        }
    }
}
