//! Access token bookkeeping.

use serde::Deserialize;

/// Path of the token grant endpoint; refresh is `{TOKEN_PATH}/{refresh_token}`.
pub const TOKEN_PATH: &str = "/v1.0/token";

/// Tokens are treated as expired this long before the vendor's deadline.
pub const EXPIRY_MARGIN_MS: i64 = 60_000;

/// `result` payload of the grant and refresh endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResult {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds.
    pub expire_time: i64,
    #[serde(default)]
    pub uid: String,
}

/// A cached access token with its absolute expiry.
#[derive(Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub refresh_token: String,
    pub uid: String,
    pub expires_at_ms: i64,
}

impl TokenInfo {
    /// Anchor the relative `expire_time` at `issued_at_ms`, the envelope's
    /// server timestamp.
    pub fn from_result(result: TokenResult, issued_at_ms: i64) -> Self {
        Self {
            access_token: result.access_token,
            refresh_token: result.refresh_token,
            uid: result.uid,
            expires_at_ms: issued_at_ms + result.expire_time * 1000,
        }
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at_ms - EXPIRY_MARGIN_MS <= now_ms
    }

    pub fn refresh_path(&self) -> String {
        format!("{TOKEN_PATH}/{}", self.refresh_token)
    }
}

impl std::fmt::Debug for TokenInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenInfo")
            .field("uid", &self.uid)
            .field("expires_at_ms", &self.expires_at_ms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expire_time: i64) -> TokenInfo {
        TokenInfo::from_result(
            TokenResult {
                access_token: "access".into(),
                refresh_token: "refresh".into(),
                expire_time,
                uid: "uid".into(),
            },
            1_000_000,
        )
    }

    #[test]
    fn expiry_is_anchored_at_issue_time() {
        assert_eq!(token(7200).expires_at_ms, 1_000_000 + 7_200_000);
    }

    #[test]
    fn fresh_token_is_not_expired() {
        let t = token(7200);
        assert!(!t.is_expired(1_000_000));
        assert!(!t.is_expired(t.expires_at_ms - EXPIRY_MARGIN_MS - 1));
    }

    #[test]
    fn token_expires_one_minute_early() {
        let t = token(7200);
        assert!(t.is_expired(t.expires_at_ms - EXPIRY_MARGIN_MS));
        assert!(t.is_expired(t.expires_at_ms));
    }

    #[test]
    fn short_lived_token_is_immediately_expired() {
        assert!(token(30).is_expired(1_000_000));
    }

    #[test]
    fn refresh_path_appends_refresh_token() {
        assert_eq!(token(7200).refresh_path(), "/v1.0/token/refresh");
    }

    #[test]
    fn debug_hides_tokens() {
        let rendered = format!("{:?}", token(7200));
        assert!(!rendered.contains("access"));
        assert!(!rendered.contains("refresh"));
    }
}
