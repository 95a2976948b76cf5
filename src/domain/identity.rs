//! Identity Entity
//!
//! The authenticated account cached on this device. The local store
//! never holds more than one Identity row at a time.

use serde::{Deserialize, Serialize};
use super::entity::Entity;

/// The signed-in account, including its session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Server-issued account ID
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Bearer token for authenticated API calls
    pub token: String,
}

impl Identity {
    pub fn new(id: String, name: String, email: String, phone: String, token: String) -> Self {
        Self {
            id,
            name,
            email,
            phone,
            token,
        }
    }

    /// A session is usable only when it carries a non-empty token
    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

impl Entity for Identity {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_token_presence() {
        let identity = Identity::new(
            "u1".to_string(),
            "Ada".to_string(),
            "ada@example.com".to_string(),
            "+4470000000".to_string(),
            "tok-123".to_string(),
        );
        assert!(identity.has_token());
        assert_eq!(identity.id(), "u1");
    }

    #[test]
    fn test_identity_without_token() {
        let identity = Identity::new(
            "u2".to_string(),
            "Ben".to_string(),
            "ben@example.com".to_string(),
            String::new(),
            String::new(),
        );
        assert!(!identity.has_token());
    }
}
