//! Validation errors raised before a request leaves the process.

/// A request failed its pre-flight checks.
///
/// These errors are produced locally by [`Validate`](crate::Validate) and
/// never involve the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The card to register has no identifier.
    #[error("expecting the card ID to have been set")]
    InvalidCard,

    /// The owning customer identifier is blank.
    #[error("invalid customerID")]
    InvalidCustomer,

    /// A charge names neither a card nor a customer.
    #[error("either `customerId` or `card` must be set")]
    MissingPaymentSource,

    /// A token request has a blank security code.
    #[error("expecting a non-empty security code aka \"cvc\"")]
    MissingSecurityCode,

    /// A lookup was attempted with a blank identifier.
    #[error("expecting a non-blank token ID")]
    MissingIdentifier,
}
