//! Constants of the SecurionPay HTTP API.

/// Production API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.securionpay.com/";

/// Environment variable holding the secret API key.
///
/// Also looked up in a `.env` file in the working directory.
pub const API_KEY_ENV: &str = "SECURIONPAY_API_KEY";

/// Content type of every request body.
pub const JSON_CONTENT_TYPE: &str = "application/json";
