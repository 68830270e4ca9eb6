//! ProfileIdentity - Who the player is
//!
//! Identity is server-arbitrated: the Profile Store owns the mapping from
//! display name to profile, and it alone decides whether a name is free.

use serde::{Deserialize, Serialize};

/// Opaque handle for a profile row in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the player's avatar is put together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AvatarConfig {
    pub base: String,
    pub hair: String,
    pub outfit: String,
    pub accessory: String,
    pub companion: String,
    pub companion_label: String,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            base: "peach".to_string(),
            hair: "night".to_string(),
            outfit: "petal".to_string(),
            accessory: "glow".to_string(),
            companion: "fox".to_string(),
            companion_label: "Star Fox".to_string(),
        }
    }
}

/// A resolved profile: the identity half of a store row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileIdentity {
    pub id: ProfileId,
    /// Unique across the store; uniqueness is enforced server-side
    pub display_name: String,
    pub avatar: AvatarConfig,
}

/// A row in the profile listing, most recent first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: ProfileId,
    pub display_name: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_avatar() {
        let avatar = AvatarConfig::default();
        assert_eq!(avatar.base, "peach");
        assert_eq!(avatar.companion_label, "Star Fox");
    }

    #[test]
    fn test_avatar_blob_is_camel_case() {
        let avatar = AvatarConfig::default();
        let json = serde_json::to_value(&avatar).unwrap();
        assert_eq!(json["companionLabel"], "Star Fox");
    }

    #[test]
    fn test_profile_id_is_opaque_string() {
        let id = ProfileId::new("17");
        assert_eq!(id.as_str(), "17");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"17\"");
    }
}
