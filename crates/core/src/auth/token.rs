//! Refresh-token shape value object.
//!
//! Refresh tokens are opaque JWT-shaped strings: three dot-separated
//! segments. The shape is the only thing validated here; the stored
//! server-side record decides whether the token is actually live.

use thiserror::Error;

use cinebook_shared::AppError;

/// Errors for token parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The string is not shaped like a JWT.
    #[error("invalid token format")]
    Malformed,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// A JWT-shaped token string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    /// Parses a raw string, requiring exactly three dot-separated segments.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Malformed` otherwise.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        if raw.split('.').count() == 3 {
            Ok(Self(raw.to_string()))
        } else {
            Err(TokenError::Malformed)
        }
    }

    /// Returns the token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value object and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_jwt_shaped_string() {
        let token = Token::parse("header.payload.signature").unwrap();
        assert_eq!(token.as_str(), "header.payload.signature");
    }

    #[rstest]
    #[case("")]
    #[case("plain")]
    #[case("only.two")]
    #[case("a.b.c.d")]
    fn test_parse_rejects_malformed(#[case] raw: &str) {
        assert_eq!(Token::parse(raw), Err(TokenError::Malformed));
    }
}
