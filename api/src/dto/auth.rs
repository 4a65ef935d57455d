use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use ca_core::domain::VerificationResult;

/// Body of `/auth/verify` and `/auth/revoke`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    /// Raw token, optionally prefixed with `Bearer `
    #[serde(default)]
    pub token: String,
}

impl TokenRequest {
    /// The token with any `Bearer ` prefix and surrounding whitespace removed
    pub fn bearer_token(&self) -> &str {
        let token = self.token.trim();
        match token.strip_prefix("Bearer") {
            Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
            _ => token,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkVerifyRequest {
    #[serde(default)]
    pub tokens: Vec<String>,
}

/// Results keyed by token fragment (first and last ten characters)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkVerifyResponse {
    pub results: HashMap<String, VerificationResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(token: &str) -> TokenRequest {
        TokenRequest {
            token: token.to_string(),
        }
    }

    #[test]
    fn test_bearer_prefix_is_stripped() {
        assert_eq!(request("Bearer abc.def.ghi").bearer_token(), "abc.def.ghi");
        assert_eq!(request("  Bearer   abc  ").bearer_token(), "abc");
        assert_eq!(request("abc").bearer_token(), "abc");
    }

    #[test]
    fn test_blank_tokens_are_empty() {
        assert_eq!(request("").bearer_token(), "");
        assert_eq!(request("   ").bearer_token(), "");
        assert_eq!(request("Bearer ").bearer_token(), "");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let verify: TokenRequest = serde_json::from_str("{}").unwrap();
        assert!(verify.token.is_empty());

        let bulk: BulkVerifyRequest = serde_json::from_str("{}").unwrap();
        assert!(bulk.tokens.is_empty());
    }
}
