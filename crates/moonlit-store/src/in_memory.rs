//! In-memory ProfileStore
//!
//! Thread-safe map-backed store for tests and development. Also carries
//! an offline switch so sync-failure paths can be exercised without a
//! network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use moonlit_domain::model::profile::{AvatarConfig, ProfileId, ProfileIdentity, ProfileSummary};
use moonlit_domain::model::state::PlayerState;

use crate::profile_store::{validate_name, ProfileStore, StoreError};

#[derive(Debug, Clone)]
struct Row {
    identity: ProfileIdentity,
    state: PlayerState,
    created_at: String,
    seq: u64,
}

/// Map-backed ProfileStore
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    rows: Arc<RwLock<HashMap<String, Row>>>,
    next_seq: AtomicU64,
    offline: AtomicBool,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store dropping off the network. While offline every
    /// operation fails with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }

    fn read_rows(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Row>>, StoreError> {
        self.rows
            .read()
            .map_err(|_| StoreError::Unavailable("Failed to acquire read lock".to_string()))
    }

    fn write_rows(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Row>>, StoreError> {
        self.rows
            .write()
            .map_err(|_| StoreError::Unavailable("Failed to acquire write lock".to_string()))
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn lookup(&self, display_name: &str) -> Result<Option<ProfileIdentity>, StoreError> {
        self.check_online()?;
        let rows = self.read_rows()?;
        Ok(rows
            .values()
            .find(|row| row.identity.display_name == display_name)
            .map(|row| row.identity.clone()))
    }

    async fn create(
        &self,
        display_name: &str,
        avatar: &AvatarConfig,
    ) -> Result<ProfileIdentity, StoreError> {
        self.check_online()?;
        validate_name(display_name)?;

        let mut rows = self.write_rows()?;
        if rows
            .values()
            .any(|row| row.identity.display_name == display_name)
        {
            return Err(StoreError::NameConflict(display_name.to_string()));
        }

        let identity = ProfileIdentity {
            id: ProfileId::new(uuid::Uuid::new_v4().to_string()),
            display_name: display_name.to_string(),
            avatar: avatar.clone(),
        };
        rows.insert(
            identity.id.as_str().to_string(),
            Row {
                identity: identity.clone(),
                state: PlayerState::default(),
                created_at: chrono::Utc::now().to_rfc3339(),
                seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
            },
        );
        Ok(identity)
    }

    async fn get_profile(&self, id: &ProfileId) -> Result<Option<ProfileIdentity>, StoreError> {
        self.check_online()?;
        let rows = self.read_rows()?;
        Ok(rows.get(id.as_str()).map(|row| row.identity.clone()))
    }

    async fn get_state(&self, id: &ProfileId) -> Result<Option<PlayerState>, StoreError> {
        self.check_online()?;
        let rows = self.read_rows()?;
        Ok(rows.get(id.as_str()).map(|row| row.state.clone()))
    }

    async fn upsert_state(&self, id: &ProfileId, state: &PlayerState) -> Result<(), StoreError> {
        self.check_online()?;
        let mut rows = self.write_rows()?;
        match rows.get_mut(id.as_str()) {
            Some(row) => {
                row.state = state.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(id.as_str().to_string())),
        }
    }

    async fn update_profile(
        &self,
        id: &ProfileId,
        display_name: &str,
        avatar: &AvatarConfig,
    ) -> Result<(), StoreError> {
        self.check_online()?;
        validate_name(display_name)?;

        let mut rows = self.write_rows()?;
        let taken = rows
            .values()
            .any(|row| row.identity.display_name == display_name && row.identity.id != *id);
        if taken {
            return Err(StoreError::NameConflict(display_name.to_string()));
        }

        match rows.get_mut(id.as_str()) {
            Some(row) => {
                row.identity.display_name = display_name.to_string();
                row.identity.avatar = avatar.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(id.as_str().to_string())),
        }
    }

    async fn list_profiles(&self) -> Result<Vec<ProfileSummary>, StoreError> {
        self.check_online()?;
        let rows = self.read_rows()?;
        let mut all: Vec<&Row> = rows.values().collect();
        all.sort_by(|a, b| b.seq.cmp(&a.seq));
        Ok(all
            .into_iter()
            .map(|row| ProfileSummary {
                id: row.identity.id.clone(),
                display_name: row.identity.display_name.clone(),
                created_at: row.created_at.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avatar() -> AvatarConfig {
        AvatarConfig::default()
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = InMemoryProfileStore::new();

        let created = store.create("Nova", &avatar()).await.unwrap();
        let found = store.lookup("Nova").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);

        assert!(store.lookup("Luna").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_seeds_default_state() {
        let store = InMemoryProfileStore::new();
        let profile = store.create("Nova", &avatar()).await.unwrap();

        let state = store.get_state(&profile.id).await.unwrap().unwrap();
        assert_eq!(state, PlayerState::default());
    }

    #[tokio::test]
    async fn test_name_conflict_on_create() {
        let store = InMemoryProfileStore::new();
        store.create("Nova", &avatar()).await.unwrap();

        let err = store.create("Nova", &avatar()).await.unwrap_err();
        assert!(matches!(err, StoreError::NameConflict(name) if name == "Nova"));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let store = InMemoryProfileStore::new();
        let err = store.create("   ", &avatar()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_upsert_and_get_state() {
        let store = InMemoryProfileStore::new();
        let profile = store.create("Nova", &avatar()).await.unwrap();

        let mut state = PlayerState::default();
        state.stars = 42;
        store.upsert_state(&profile.id, &state).await.unwrap();

        let loaded = store.get_state(&profile.id).await.unwrap().unwrap();
        assert_eq!(loaded.stars, 42);
    }

    #[tokio::test]
    async fn test_upsert_unknown_profile() {
        let store = InMemoryProfileStore::new();
        let err = store
            .upsert_state(&ProfileId::new("ghost"), &PlayerState::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rename_conflict_is_distinct() {
        let store = InMemoryProfileStore::new();
        let nova = store.create("Nova", &avatar()).await.unwrap();
        store.create("Luna", &avatar()).await.unwrap();

        let err = store
            .update_profile(&nova.id, "Luna", &avatar())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NameConflict(_)));

        // Renaming to your own current name is fine
        store
            .update_profile(&nova.id, "Nova", &avatar())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_most_recent_first() {
        let store = InMemoryProfileStore::new();
        store.create("First", &avatar()).await.unwrap();
        store.create("Second", &avatar()).await.unwrap();
        store.create("Third", &avatar()).await.unwrap();

        let list = store.list_profiles().await.unwrap();
        let names: Vec<_> = list.iter().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, vec!["Third", "Second", "First"]);
    }

    #[tokio::test]
    async fn test_offline_switch() {
        let store = InMemoryProfileStore::new();
        let profile = store.create("Nova", &avatar()).await.unwrap();

        store.set_offline(true);
        let err = store
            .upsert_state(&profile.id, &PlayerState::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        store.set_offline(false);
        store
            .upsert_state(&profile.id, &PlayerState::default())
            .await
            .unwrap();
    }
}
