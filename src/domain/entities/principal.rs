use super::document::Fields;

/// Verified bearer of a session token: whatever user object was signed at
/// `/jwt`, minus the registered time claims.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub claims: Fields,
}

impl Principal {
    pub fn new(claims: Fields) -> Self {
        Self { claims }
    }

    pub fn email(&self) -> Option<&str> {
        self.claims.get("email").and_then(|v| v.as_str())
    }
}
