/// Vendor error code for an expired or revoked access token.
pub const TOKEN_INVALID_CODE: i64 = 1010;

/// Errors from the Tuya OpenAPI layer.
#[derive(Debug, thiserror::Error)]
pub enum TuyaError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status code.
    #[error("Tuya HTTP error ({status}): {body}")]
    Http { status: u16, body: String },

    /// The envelope reported `success: false`.
    #[error("Tuya API error {code}: {msg}")]
    Api { code: i64, msg: String },

    /// `success: true` but no `result` field.
    #[error("Tuya API response is missing its result")]
    MissingResult,
}

impl TuyaError {
    pub fn is_token_invalid(&self) -> bool {
        matches!(self, TuyaError::Api { code, .. } if *code == TOKEN_INVALID_CODE)
    }
}
