//! Field-level wire helpers shared by the SecurionPay records.
//!
//! A few fields carry mapping rules that plain `String`s cannot express:
//!
//! - [`ObjectType`] falls back to `"card"` when blank.
//! - [`CustomerId`] decodes a JSON `null` as the empty string.
//! - [`Currency`] is an open set of ISO-4217 codes.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The `objectType` discriminator attached to API objects.
///
/// # Serialization
///
/// Serializes as the trimmed inner string. A blank value serializes as the
/// literal `"card"`, the default object kind of the API:
///
/// ```
/// use securionpay::ObjectType;
///
/// let blank = ObjectType::default();
/// assert_eq!(serde_json::to_string(&blank).unwrap(), "\"card\"");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ObjectType(String);

impl ObjectType {
    /// Object kind used when none is set.
    pub const DEFAULT: &'static str = "card";

    /// Creates an object type from any string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the value that goes on the wire.
    #[must_use]
    pub fn effective(&self) -> &str {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            Self::DEFAULT
        } else {
            trimmed
        }
    }

    /// Returns the raw inner string, as decoded.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectType {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.effective())
    }
}

impl Serialize for ObjectType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.effective())
    }
}

impl<'de> Deserialize<'de> for ObjectType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

/// Identifier of a SecurionPay customer.
///
/// Customers are only ever referenced by id, never embedded.
///
/// # Deserialization
///
/// A literal JSON `null` decodes to the empty string instead of failing.
/// The API has been seen sending `"customerId": null` on objects that are not
/// attached to a customer, and callers rely on getting an empty id back.
/// This rule is specific to this field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CustomerId(String);

impl CustomerId {
    /// Creates a customer id.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the id is empty or only whitespace.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for CustomerId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for CustomerId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for CustomerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for CustomerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CustomerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Self(value.unwrap_or_default()))
    }
}

/// Three-letter ISO-4217 currency code, e.g. `EUR`.
///
/// Any code decodes as-is. Common codes are available as constants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    /// United States dollar.
    pub const USD: &'static str = "USD";
    /// Euro.
    pub const EUR: &'static str = "EUR";
    /// Canadian dollar.
    pub const CAD: &'static str = "CAD";

    /// Creates a currency from its code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// US dollars.
    #[must_use]
    pub fn usd() -> Self {
        Self::new(Self::USD)
    }

    /// Euros.
    #[must_use]
    pub fn eur() -> Self {
        Self::new(Self::EUR)
    }

    /// Canadian dollars.
    #[must_use]
    pub fn cad() -> Self {
        Self::new(Self::CAD)
    }

    /// Returns the currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Currency {
    fn from(code: &str) -> Self {
        Self(code.to_owned())
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
