//! Pre-flight validation of outgoing requests.
//!
//! Every operation checks its input before building a URL or touching the
//! network. The checks are pure functions of the request.

use crate::card::{AddCardRequest, Card};
use crate::charge::Charge;
use crate::error::ValidationError;
use crate::token::TokenRequest;

/// A request that can be checked locally before being sent.
pub trait Validate {
    /// Checks the request.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] describing the first rule violated.
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for Card {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::InvalidCard);
        }
        Ok(())
    }
}

impl Validate for AddCardRequest {
    /// The card is checked first, then the owning customer.
    fn validate(&self) -> Result<(), ValidationError> {
        self.card.validate()?;
        if self.customer_id.trim().is_empty() {
            return Err(ValidationError::InvalidCustomer);
        }
        Ok(())
    }
}

impl Validate for Charge {
    fn validate(&self) -> Result<(), ValidationError> {
        let blank_card = self.card.as_ref().is_none_or(|card| card.is_blank());
        if blank_card && self.customer_id.is_empty() {
            return Err(ValidationError::MissingPaymentSource);
        }
        Ok(())
    }
}

impl Validate for TokenRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.security_code.trim().is_empty() {
            return Err(ValidationError::MissingSecurityCode);
        }
        Ok(())
    }
}

/// Trims an identifier used as a path parameter.
///
/// # Errors
///
/// Returns [`ValidationError::MissingIdentifier`] if nothing is left after
/// trimming.
pub fn identifier(id: &str) -> Result<&str, ValidationError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingIdentifier);
    }
    Ok(trimmed)
}
