//! Charges: the request that moves money, and the records the API returns.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::card::Card;
use crate::wire::{Currency, CustomerId, ObjectType};

/// Payment source of a charge.
///
/// The `card` field of a charge is polymorphic on the wire: it is either a
/// string (a single-use token or the id of a stored card) or a full card
/// object.
///
/// # Deserialization
///
/// Objects decode as [`CardSource::Card`]. Strings starting with `tok_`
/// decode as [`CardSource::Token`]; any other string decodes as
/// [`CardSource::Id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardSource {
    /// Single-use token created with the tokens endpoint.
    Token(String),
    /// Identifier of a card already stored on the customer.
    Id(String),
    /// Inline card object.
    Card(Box<Card>),
}

impl CardSource {
    /// Prefix the API puts on token identifiers.
    pub const TOKEN_PREFIX: &'static str = "tok_";

    /// Returns `true` if this source carries no usable reference.
    ///
    /// Inline cards are never blank; strings are blank when empty or
    /// whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Token(s) | Self::Id(s) => s.trim().is_empty(),
            Self::Card(_) => false,
        }
    }
}

impl From<Card> for CardSource {
    fn from(card: Card) -> Self {
        Self::Card(Box::new(card))
    }
}

impl Serialize for CardSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Token(s) | Self::Id(s) => serializer.serialize_str(s),
            Self::Card(card) => card.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for CardSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Reference(String),
            Card(Box<Card>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Reference(s) if s.starts_with(Self::TOKEN_PREFIX) => Self::Token(s),
            Raw::Reference(s) => Self::Id(s),
            Raw::Card(card) => Self::Card(card),
        })
    }
}

/// Postal address used by [`Shipping`] and [`Billing`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Postal code.
    pub zip: String,
    /// First address line.
    pub line1: String,
    /// Second address line.
    pub line2: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Country.
    pub country: String,
}

/// Shipping details of a charge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shipping {
    /// Recipient name.
    pub name: String,
    /// Delivery address.
    pub address: Option<Address>,
}

/// Billing details of a charge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Billing {
    /// Billing address.
    pub address: Option<Address>,
    /// Tax identification number.
    pub vat: String,
}

/// Request to create a charge.
///
/// Either [`card`](Charge::card) or [`customer_id`](Charge::customer_id)
/// must be set; when only the customer is given, the API charges the
/// customer's default card.
///
/// # Example
///
/// ```
/// use securionpay::{CardSource, Charge, Currency};
///
/// let charge = Charge::new(1500, Currency::usd())
///     .with_description("Lunch reimbursement")
///     .with_card(CardSource::Token("tok_NGsyDoJQXop5Pqqi6HizbJTe".into()));
///
/// let json = serde_json::to_value(&charge).unwrap();
/// assert_eq!(json["amount"], "1500");
/// assert_eq!(json["card"], "tok_NGsyDoJQXop5Pqqi6HizbJTe");
/// ```
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Charge {
    /// Amount in minor currency units: 10€ is `1000`, 10¥ is `10`.
    /// Sent as a numeric string.
    #[serde(rename = "amount")]
    #[serde_as(as = "PickFirst<(DisplayFromStr, _)>")]
    pub amount_minor_units: u64,
    /// Currency of the amount.
    pub currency: Currency,
    /// Free-form description.
    pub description: String,
    /// Payment source. Omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardSource>,
    /// Customer to charge. Omitted when empty.
    #[serde(skip_serializing_if = "CustomerId::is_empty")]
    pub customer_id: CustomerId,
    /// Shipping details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<Shipping>,
    /// Billing details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing: Option<Billing>,
    /// Whether to capture immediately. Omitted when `false`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub captured: bool,
}

impl Charge {
    /// Creates a charge for `amount_minor_units` of `currency`.
    #[must_use]
    pub fn new(amount_minor_units: u64, currency: Currency) -> Self {
        Self {
            amount_minor_units,
            currency,
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the payment source.
    #[must_use]
    pub fn with_card(mut self, card: impl Into<CardSource>) -> Self {
        self.card = Some(card.into());
        self
    }

    /// Sets the customer to charge.
    #[must_use]
    pub fn with_customer(mut self, customer_id: impl Into<CustomerId>) -> Self {
        self.customer_id = customer_id.into();
        self
    }

    /// Sets the shipping details.
    #[must_use]
    pub fn with_shipping(mut self, shipping: Shipping) -> Self {
        self.shipping = Some(shipping);
        self
    }

    /// Sets the billing details.
    #[must_use]
    pub fn with_billing(mut self, billing: Billing) -> Self {
        self.billing = Some(billing);
        self
    }

    /// Sets whether the charge is captured immediately.
    #[must_use]
    pub const fn with_captured(mut self, captured: bool) -> Self {
        self.captured = captured;
        self
    }
}

/// Charge record returned by the API.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChargeResponse {
    /// Charge identifier, e.g. `char_...`.
    pub id: String,
    /// Amount in minor currency units.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub amount: u64,
    /// Currency of the amount.
    pub currency: Currency,
    /// Creation time in seconds since the Unix epoch.
    #[serde(rename = "created")]
    pub created_at: i64,
    /// Always `charge` for this object.
    pub object_type: ObjectType,
    /// Free-form description.
    pub description: String,
    /// Card that was charged.
    pub card: Option<Card>,
    /// Customer that was charged, if any.
    pub customer_id: CustomerId,
    /// Whether the charge has been captured.
    pub captured: bool,
    /// Whether the charge has been fully refunded.
    pub refunded: bool,
    /// Whether the charge is disputed.
    pub disputed: bool,
    /// Refunds issued against the charge.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub refunds: Vec<Refund>,
    /// Open or closed dispute, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispute: Option<Dispute>,
    /// Merchant-defined key/value pairs.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Refund issued against a charge.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Refund {
    /// Refund identifier.
    pub id: String,
    /// Refunded amount in minor currency units.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub amount: u64,
    /// Currency of the amount.
    pub currency: Currency,
    /// Creation time in seconds since the Unix epoch.
    #[serde(rename = "created")]
    pub created_at: i64,
    /// Always `refund` for this object.
    pub object_type: ObjectType,
    /// Reason given for the refund.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Lifecycle state of a [`Dispute`].
///
/// Unrecognised values decode as [`DisputeStatus::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeStatus {
    /// Retrieval request received; a response is needed.
    RetrievalRequestNew,
    /// Response to a retrieval request is under review.
    RetrievalRequestResponseUnderReview,
    /// Chargeback received; a response is needed.
    ChargebackNew,
    /// Retrieval request has been represented.
    RetrievalRequestRepresented,
    /// Retrieval response is under review.
    RetrievalResponseResponseUnderReview,
    /// Chargeback dispute won.
    ChargebackRepresentedSuccessfully,
    /// Chargeback dispute lost.
    ChargebackRepresentedUnsuccessfully,
    /// Missing, or a status this library does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Reason the cardholder disputed a charge.
///
/// Unrecognised values decode as [`DisputeReason::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeReason {
    /// Cardholder claims the charge was not authorized.
    Fraudulent,
    /// Cardholder does not recognize the charge.
    Unrecognized,
    /// Charge was processed more than once.
    Duplicate,
    /// Subscription was cancelled before the charge.
    #[serde(rename = "SUBSCRIPTION_CANCELED")]
    SubscriptionCanceled,
    /// Product was never received.
    ProductNotReceived,
    /// Product was defective or not as described.
    ProductUnacceptable,
    /// Promised credit was not processed.
    CreditNotProcessed,
    /// Any other reason.
    General,
    /// Missing, or a reason this library does not know about.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Chargeback or retrieval request raised against a charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    /// Always `dispute` for this object.
    #[serde(default)]
    pub object_type: String,
    /// Creation time in seconds since the Unix epoch.
    #[serde(rename = "created", default)]
    pub created_at: i64,
    /// Last update time in seconds since the Unix epoch.
    #[serde(rename = "updated", default)]
    pub updated_at: i64,
    /// Disputed amount in minor currency units.
    #[serde(default)]
    pub amount: u64,
    /// Currency of the amount.
    #[serde(default)]
    pub currency: Currency,
    /// Current state.
    #[serde(default)]
    pub status: DisputeStatus,
    /// Cardholder's reason.
    #[serde(default)]
    pub reason: DisputeReason,
    /// Whether the merchant accepted the dispute as lost.
    #[serde(default)]
    pub accepted_as_lost: bool,
}
