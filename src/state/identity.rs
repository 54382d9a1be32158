//! Signed-in user identity and its persisted encoding.

use serde::{Deserialize, Serialize};

/// The signed-in user as tracked by the application store.
///
/// Persisted as JSON with camelCase keys so existing saved sessions load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

/// Profile data supplied at sign-in, before the authenticated flag is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl Profile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    /// Promote to an authenticated identity.
    pub fn authenticate(self) -> Identity {
        Identity {
            id: self.id,
            name: self.name,
            email: self.email,
            avatar: self.avatar,
            is_authenticated: true,
        }
    }
}

impl Identity {
    /// Encode for persistence.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a persisted identity.
    ///
    /// Malformed JSON, or an identity missing its id, decodes as absent
    /// rather than failing.
    pub fn decode(raw: &str) -> Option<Identity> {
        match serde_json::from_str::<Identity>(raw) {
            Ok(identity) if !identity.id.trim().is_empty() => Some(identity),
            Ok(_) => {
                tracing::warn!("Discarding persisted identity with empty id");
                None
            }
            Err(e) => {
                tracing::warn!("Discarding malformed persisted identity: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Identity {
        Profile::new("user-1", "Ada Lovelace", "ada@example.com")
            .with_avatar("https://example.com/ada.png")
            .authenticate()
    }

    #[test]
    fn test_authenticate_sets_flag() {
        let identity = Profile::new("u", "n", "e").authenticate();
        assert!(identity.is_authenticated);
        assert!(identity.avatar.is_none());
    }

    #[test]
    fn test_encode_uses_camel_case() {
        let encoded = sample().encode().unwrap();
        assert!(encoded.contains("\"isAuthenticated\":true"));
        assert!(encoded.contains("\"avatar\""));
    }

    #[test]
    fn test_decode_encoded() {
        let identity = sample();
        let decoded = Identity::decode(&identity.encode().unwrap());
        assert_eq!(decoded, Some(identity));
    }

    #[test]
    fn test_decode_without_optional_fields() {
        let decoded =
            Identity::decode(r#"{"id":"u1","name":"Bo","email":"bo@example.com"}"#).unwrap();
        assert!(!decoded.is_authenticated);
        assert!(decoded.avatar.is_none());
    }

    #[test]
    fn test_decode_malformed_is_none() {
        assert_eq!(Identity::decode("not json"), None);
        assert_eq!(Identity::decode("{\"id\": 5}"), None);
        assert_eq!(Identity::decode(""), None);
    }

    #[test]
    fn test_decode_empty_id_is_none() {
        assert_eq!(
            Identity::decode(r#"{"id":"  ","name":"Bo","email":"bo@example.com"}"#),
            None
        );
    }
}
