use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Client-minted idempotency key attached to every order submission. The
/// remote node deduplicates on it, so a replay after a lost acknowledgment
/// resolves to the original order instead of a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientRef(String);

impl ClientRef {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn new(value: String) -> Result<Self, String> {
        Uuid::parse_str(value.trim())
            .map_err(|_| format!("Client ref must be a UUID, got '{value}'"))?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ClientRef> for String {
    fn from(client_ref: ClientRef) -> Self {
        client_ref.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_refs_are_valid_and_unique() {
        let a = ClientRef::generate();
        let b = ClientRef::generate();
        assert_ne!(a, b);
        assert!(ClientRef::new(a.as_str().to_string()).is_ok());
    }

    #[test]
    fn rejects_non_uuid() {
        assert!(ClientRef::new("not-a-uuid".to_string()).is_err());
    }
}
