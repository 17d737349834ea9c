use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret text (IAM bearer tokens, imported key material) wiped from memory
/// on drop and never printed. Serializes as the plain string.
#[derive(Clone, Default, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(secret: String) -> Self {
        Self(secret)
    }

    /// Borrow the secret for a request header. Do not log the result.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecureString {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl From<&str> for SecureString {
    fn from(secret: &str) -> Self {
        Self::new(secret.to_string())
    }
}

impl Serialize for SecureString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SecureString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self)
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureString([REDACTED; {} bytes])", self.0.len())
    }
}

impl fmt::Display for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expose_returns_secret() {
        let token = SecureString::from("eyJraWQiOiIyMDIz");
        assert_eq!(token.expose(), "eyJraWQiOiIyMDIz");
        assert!(!token.is_empty());
        assert!(SecureString::default().is_empty());
    }

    #[test]
    fn test_formatting_never_shows_secret() {
        let token = SecureString::from("secret-token");
        assert_eq!(format!("{token}"), "[REDACTED]");

        let debug = format!("{token:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let token = SecureString::from("c2VjcmV0");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"c2VjcmV0\"");

        let back: SecureString = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }

    #[test]
    fn test_zeroize_clears_secret() {
        let mut token = SecureString::from("token");
        token.zeroize();
        assert!(token.is_empty());
    }
}
