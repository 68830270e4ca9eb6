//! Shared command context: the store, the sync client, and the cached
//! session.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use moonlit_domain::model::profile::{ProfileId, ProfileIdentity};
use moonlit_store::{ProfileStore, SqliteProfileStore};
use moonlit_sync::{SessionPhase, SyncClient};
use shared::config::{ClientPaths, SessionCache, SyncConfig};

pub struct Context {
    pub client: SyncClient,
    pub store: Arc<dyn ProfileStore>,
    pub paths: ClientPaths,
}

impl Context {
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let paths = ClientPaths::new(data_dir);
        let store: Arc<dyn ProfileStore> = Arc::new(
            SqliteProfileStore::open(&paths.db_path())
                .with_context(|| format!("Opening {}", paths.db_path().display()))?,
        );
        let client = SyncClient::new(
            Arc::clone(&store),
            content::builtin(),
            SyncConfig::default(),
        );
        Ok(Self {
            client,
            store,
            paths,
        })
    }

    /// Hydrate from the cached session id; a cache that no longer
    /// resolves is dropped so the next command starts clean
    pub async fn restore_session(&self) {
        let Some(cache) = SessionCache::load(&self.paths.session_path()) else {
            return;
        };
        let id = ProfileId::new(cache.profile_id);
        if self.client.hydrate(Some(&id)).await == SessionPhase::Anonymous {
            SessionCache::clear(&self.paths.session_path());
        }
    }

    pub async fn require_identity(&self) -> anyhow::Result<ProfileIdentity> {
        self.client
            .identity()
            .await
            .ok_or_else(|| anyhow::anyhow!("No active profile. Run `moonlit login` first."))
    }
}
