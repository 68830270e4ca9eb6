//! ProfileStore - Abstract persistence for profiles and progression
//!
//! This trait is the whole client↔server contract: six request/response
//! operations, transport-agnostic. The domain defines what it needs;
//! adapters decide how rows are actually kept.

use async_trait::async_trait;
use moonlit_domain::model::profile::{AvatarConfig, ProfileId, ProfileIdentity, ProfileSummary};
use moonlit_domain::model::state::PlayerState;
use thiserror::Error;

/// Errors that can occur at the store boundary.
///
/// `NameConflict` is distinct from a generic failure on purpose: the UI
/// asks for a different name instead of discarding local progress.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Profile '{0}' not found")]
    NotFound(String),

    #[error("Display name '{0}' is already in use")]
    NameConflict(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    /// Network or storage failure. Never fatal to the session: local
    /// state stays authoritative and persistence is retried later.
    #[error("Profile store unavailable: {0}")]
    Unavailable(String),

    #[error("State blob error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Durable key-value pairing of profile identity and state blob
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Find a profile by its unique display name
    async fn lookup(&self, display_name: &str) -> Result<Option<ProfileIdentity>, StoreError>;

    /// Create a profile; the store is the arbiter of name uniqueness.
    /// A fresh default state blob is written alongside the profile row.
    async fn create(
        &self,
        display_name: &str,
        avatar: &AvatarConfig,
    ) -> Result<ProfileIdentity, StoreError>;

    /// Fetch a profile's identity by id (session restore path)
    async fn get_profile(&self, id: &ProfileId) -> Result<Option<ProfileIdentity>, StoreError>;

    /// Fetch the state blob for a profile, if any
    async fn get_state(&self, id: &ProfileId) -> Result<Option<PlayerState>, StoreError>;

    /// Write the full state blob for a profile (last write wins)
    async fn upsert_state(&self, id: &ProfileId, state: &PlayerState) -> Result<(), StoreError>;

    /// Rename and/or re-dress a profile; fails with `NameConflict` if the
    /// new name belongs to someone else
    async fn update_profile(
        &self,
        id: &ProfileId,
        display_name: &str,
        avatar: &AvatarConfig,
    ) -> Result<(), StoreError>;

    /// All profiles, most recently created first
    async fn list_profiles(&self) -> Result<Vec<ProfileSummary>, StoreError>;
}

/// Reject blank display names before they hit a store
pub(crate) fn validate_name(display_name: &str) -> Result<(), StoreError> {
    if display_name.trim().is_empty() {
        return Err(StoreError::Validation("Name required".to_string()));
    }
    Ok(())
}
