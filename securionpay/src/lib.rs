#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Wire types for the [SecurionPay](https://securionpay.com) payments API.
//!
//! This crate holds the request and response records exchanged with the
//! remote API, the JSON mapping rules they follow, and the pre-flight checks
//! run on a request before it is sent. It performs no I/O; the HTTP client
//! lives in `securionpay-http`.
//!
//! # Modules
//!
//! - [`card`] - Stored cards, card brands, fraud-check data
//! - [`charge`] - Charge requests and responses, refunds, disputes
//! - [`token`] - Single-use card tokens and 3-D Secure details
//! - [`credit`] - Credits and the paginated credit listing request
//! - [`wire`] - Field-level wire helpers (`objectType`, `customerId`, currency)
//! - [`validate`] - Pre-flight request validation
//! - [`error`] - Validation error type
//!
//! # Wire Format
//!
//! All records use camelCase JSON field names. Amounts are integers in minor
//! currency units and travel as numeric strings (`"amount":"1500"`), as do
//! card expiry months and years.

pub mod card;
pub mod charge;
pub mod credit;
pub mod error;
pub mod token;
pub mod validate;
pub mod wire;

pub use card::{AddCardRequest, Brand, Card, CardType, FraudCheckData};
pub use charge::{
    Address, Billing, CardSource, Charge, ChargeResponse, Dispute, DisputeReason, DisputeStatus,
    Refund, Shipping,
};
pub use credit::{Credit, CreditRequest, Credits};
pub use error::ValidationError;
pub use token::{LiabilityShift, ThreeDSecureInfo, Token, TokenRequest};
pub use validate::Validate;
pub use wire::{Currency, CustomerId, ObjectType};
