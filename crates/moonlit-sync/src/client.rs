//! SyncClient - Hydration, login, and the debounced push loop
//!
//! One client per running session. Every mutation goes through the
//! domain services against the locally held `PlayerState`, then arms a
//! debounce timer; when the timer fires the whole blob is upserted to
//! the store. Mutations arriving inside the window reset the timer, so
//! a burst of mini-game rewards costs one write, not five.

use std::sync::Arc;
use std::time::Duration;

use content::ContentPack;
use moonlit_domain::model::profile::{AvatarConfig, ProfileId, ProfileIdentity};
use moonlit_domain::model::state::{ItemCategory, PlayerState};
use moonlit_domain::service::quest;
use moonlit_domain::{Aggregator, EconomyGate, NotableEvent, PurchaseError, RewardEvent};
use moonlit_store::{ProfileStore, StoreError};
use shared::config::SyncConfig;
use shared::date::DateKey;
use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// How the session came up after `hydrate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No usable cached profile; playing on a fresh local state
    Anonymous,
    /// Cached profile resolved and its state loaded from the store
    Hydrated,
}

/// What the save indicator should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Idle,
    /// Unsaved mutations are buffered behind the debounce window
    Pending,
    Saved,
    /// Last push failed; local state is kept and retried on the next
    /// mutation or flush
    Offline,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("No active profile")]
    NoProfile,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Purchase(#[from] PurchaseError),

    #[error("Unknown quest '{0}'")]
    UnknownQuest(String),

    #[error("Quest '{0}' is not ready to claim")]
    QuestNotReady(String),

    #[error("Unknown shop item '{0}'")]
    UnknownItem(String),
}

struct Session {
    identity: Option<ProfileIdentity>,
    state: PlayerState,
    dirty: bool,
    /// Armed debounce task. Only holds a task still inside its quiet
    /// period; the task clears this slot itself before it starts writing.
    timer: Option<JoinHandle<()>>,
}

/// Session-scoped facade over the domain services and the store
pub struct SyncClient {
    store: Arc<dyn ProfileStore>,
    aggregator: Aggregator,
    economy: EconomyGate,
    content: ContentPack,
    config: SyncConfig,
    session: Arc<Mutex<Session>>,
    status: Arc<watch::Sender<SyncStatus>>,
}

impl SyncClient {
    pub fn new(store: Arc<dyn ProfileStore>, content: ContentPack, config: SyncConfig) -> Self {
        let (status, _) = watch::channel(SyncStatus::Idle);
        Self {
            store,
            aggregator: Aggregator::new(content.badges.clone()),
            economy: EconomyGate::new(),
            content,
            config,
            session: Arc::new(Mutex::new(Session {
                identity: None,
                state: PlayerState::default(),
                dirty: false,
                timer: None,
            })),
            status: Arc::new(status),
        }
    }

    /// Watch the save indicator
    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.status.subscribe()
    }

    pub fn content(&self) -> &ContentPack {
        &self.content
    }

    /// Restore a session from a cached profile id.
    ///
    /// Any failure along the way (unknown id, missing blob, store down)
    /// degrades to an anonymous session with a fresh local state; the
    /// caller can drop the stale cache when that happens.
    pub async fn hydrate(&self, cached: Option<&ProfileId>) -> SessionPhase {
        let Some(id) = cached else {
            return SessionPhase::Anonymous;
        };

        let resolved = match self.resolve(id).await {
            Ok(Some(pair)) => pair,
            Ok(None) => {
                debug!(profile_id = %id, "Cached profile no longer exists");
                return SessionPhase::Anonymous;
            }
            Err(err) => {
                warn!(error = %err, "Session restore failed; starting anonymous");
                self.status.send_replace(SyncStatus::Offline);
                return SessionPhase::Anonymous;
            }
        };

        let mut session = self.session.lock().await;
        session.identity = Some(resolved.0);
        session.state = resolved.1;
        session.dirty = false;
        SessionPhase::Hydrated
    }

    async fn resolve(
        &self,
        id: &ProfileId,
    ) -> Result<Option<(ProfileIdentity, PlayerState)>, StoreError> {
        let Some(identity) = self.store.get_profile(id).await? else {
            return Ok(None);
        };
        let Some(state) = self.store.get_state(id).await? else {
            return Ok(None);
        };
        Ok(Some((identity, state)))
    }

    /// Get-or-create login by display name.
    ///
    /// An existing name resumes that profile with its stored state; a
    /// new name creates the profile with a default state. The store
    /// stays the arbiter of uniqueness, so a create that races another
    /// client surfaces `NameConflict`.
    pub async fn login(
        &self,
        display_name: &str,
        avatar: &AvatarConfig,
    ) -> Result<ProfileIdentity, SyncError> {
        let (identity, state) = match self.store.lookup(display_name).await? {
            Some(identity) => {
                let state = self
                    .store
                    .get_state(&identity.id)
                    .await?
                    .unwrap_or_default();
                (identity, state)
            }
            None => {
                let identity = self.store.create(display_name, avatar).await?;
                (identity, PlayerState::default())
            }
        };

        let mut session = self.session.lock().await;
        session.identity = Some(identity.clone());
        session.state = state;
        session.dirty = false;
        self.status.send_replace(SyncStatus::Idle);
        Ok(identity)
    }

    /// Rename and/or re-dress the active profile
    pub async fn update_profile(
        &self,
        display_name: &str,
        avatar: &AvatarConfig,
    ) -> Result<(), SyncError> {
        let mut session = self.session.lock().await;
        let Some(identity) = &mut session.identity else {
            return Err(SyncError::NoProfile);
        };
        self.store
            .update_profile(&identity.id, display_name, avatar)
            .await?;
        identity.display_name = display_name.to_string();
        identity.avatar = avatar.clone();
        Ok(())
    }

    pub async fn identity(&self) -> Option<ProfileIdentity> {
        self.session.lock().await.identity.clone()
    }

    /// Snapshot of the current state
    pub async fn snapshot(&self) -> PlayerState {
        self.session.lock().await.state.clone()
    }

    pub async fn can_start_activity(&self) -> bool {
        let session = self.session.lock().await;
        self.economy.can_start_activity(&session.state)
    }

    /// Merge a reward event into the session state and arm the push timer
    pub async fn record(&self, event: RewardEvent) -> Vec<NotableEvent> {
        self.record_at(event, &DateKey::today()).await
    }

    /// `record` with an explicit day, for deterministic day-roll handling
    pub async fn record_at(&self, event: RewardEvent, today: &DateKey) -> Vec<NotableEvent> {
        let mut session = self.session.lock().await;
        let notable = self.aggregator.merge(&mut session.state, &event, today);
        self.mark_dirty(&mut session);
        notable
    }

    /// Buy a shop item by id; returns the remaining gem balance
    pub async fn purchase(&self, category: ItemCategory, item_id: &str) -> Result<u32, SyncError> {
        let item = self
            .content
            .shop
            .find(category, item_id)
            .cloned()
            .ok_or_else(|| SyncError::UnknownItem(item_id.to_string()))?;

        let mut session = self.session.lock().await;
        self.economy.purchase(&mut session.state, category, &item)?;
        self.mark_dirty(&mut session);
        Ok(session.state.gems)
    }

    /// Spend gems to refill energy; returns the energy restored
    pub async fn rest(&self) -> Result<u32, SyncError> {
        let mut session = self.session.lock().await;
        let restored = self.economy.rest(&mut session.state)?;
        self.mark_dirty(&mut session);
        Ok(restored)
    }

    /// Claim a completed quest's reward
    pub async fn claim_quest(&self, quest_id: &str) -> Result<Vec<NotableEvent>, SyncError> {
        let quest = self
            .content
            .quest(quest_id)
            .cloned()
            .ok_or_else(|| SyncError::UnknownQuest(quest_id.to_string()))?;

        let mut session = self.session.lock().await;
        if !quest::can_claim(&quest, &session.state) {
            return Err(SyncError::QuestNotReady(quest_id.to_string()));
        }
        let event = quest::claim_event(&quest);
        let notable = self
            .aggregator
            .merge(&mut session.state, &event, &DateKey::today());
        self.mark_dirty(&mut session);
        Ok(notable)
    }

    /// Mark the session dirty and (re)arm the debounce timer. Anonymous
    /// sessions stay local, so no timer is armed for them. A push that
    /// already left its quiet period is never cancelled; this mutation
    /// just leaves the session dirty for the next scheduled push.
    fn mark_dirty(&self, session: &mut Session) {
        session.dirty = true;
        if session.identity.is_none() {
            return;
        }
        self.status.send_replace(SyncStatus::Pending);

        if let Some(timer) = session.timer.take() {
            timer.abort();
        }
        let store = Arc::clone(&self.store);
        let shared = Arc::clone(&self.session);
        let status = Arc::clone(&self.status);
        let delay = self.config.debounce;
        session.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            push_now(store, shared, status).await;
        }));
    }

    /// Push unsaved state right now, skipping the debounce window.
    /// Returns whether anything was written.
    pub async fn flush(&self) -> Result<bool, SyncError> {
        let (id, state) = {
            let mut session = self.session.lock().await;
            if let Some(timer) = session.timer.take() {
                timer.abort();
            }
            if !session.dirty {
                return Ok(false);
            }
            let Some(identity) = &session.identity else {
                return Ok(false);
            };
            (identity.id.clone(), session.state.clone())
        };

        match self.store.upsert_state(&id, &state).await {
            Ok(()) => {
                let mut session = self.session.lock().await;
                session.dirty = false;
                self.status.send_replace(SyncStatus::Saved);
                Ok(true)
            }
            Err(err) => {
                self.status.send_replace(SyncStatus::Offline);
                Err(err.into())
            }
        }
    }

    /// End the session, pushing unsaved state if configured to
    pub async fn shutdown(&self) {
        if self.config.flush_on_shutdown {
            if let Err(err) = self.flush().await {
                warn!(error = %err, "Final progress push failed; local changes lost");
            }
        } else {
            let mut session = self.session.lock().await;
            if let Some(timer) = session.timer.take() {
                timer.abort();
            }
        }
    }

    pub fn debounce(&self) -> Duration {
        self.config.debounce
    }
}

/// The debounce timer's landing point. Clears the dirty flag before the
/// write so a mutation racing the push re-dirties the session and gets
/// its own timer; a failed write re-dirties it for the next attempt.
async fn push_now(
    store: Arc<dyn ProfileStore>,
    shared: Arc<Mutex<Session>>,
    status: Arc<watch::Sender<SyncStatus>>,
) {
    let (id, state) = {
        let mut session = shared.lock().await;
        // The quiet period is over: release the timer slot so a newer
        // mutation arms a fresh timer instead of aborting this write
        session.timer = None;
        if !session.dirty {
            return;
        }
        let Some(id) = session.identity.as_ref().map(|identity| identity.id.clone()) else {
            return;
        };
        session.dirty = false;
        (id, session.state.clone())
    };

    match store.upsert_state(&id, &state).await {
        Ok(()) => {
            debug!(profile_id = %id, "Progress pushed");
            let session = shared.lock().await;
            if !session.dirty {
                status.send_replace(SyncStatus::Saved);
            }
        }
        Err(err) => {
            warn!(error = %err, "Progress push failed; keeping local state");
            let mut session = shared.lock().await;
            session.dirty = true;
            status.send_replace(SyncStatus::Offline);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moonlit_domain::model::event::ActivityKind;
    use moonlit_store::InMemoryProfileStore;

    fn fast_config() -> SyncConfig {
        SyncConfig {
            debounce: Duration::from_millis(20),
            flush_on_shutdown: true,
        }
    }

    fn client_with(store: Arc<InMemoryProfileStore>) -> SyncClient {
        SyncClient::new(store, content::builtin(), fast_config())
    }

    fn client_with_store(store: Arc<dyn ProfileStore>) -> SyncClient {
        SyncClient::new(store, content::builtin(), fast_config())
    }

    /// Store wrapper whose writes take a while, for exercising pushes
    /// that are still in flight when the next mutation lands
    struct SlowStore {
        inner: Arc<InMemoryProfileStore>,
        delay: Duration,
        written_stars: std::sync::Mutex<Vec<u32>>,
    }

    #[async_trait::async_trait]
    impl ProfileStore for SlowStore {
        async fn lookup(
            &self,
            display_name: &str,
        ) -> Result<Option<ProfileIdentity>, StoreError> {
            self.inner.lookup(display_name).await
        }

        async fn create(
            &self,
            display_name: &str,
            avatar: &AvatarConfig,
        ) -> Result<ProfileIdentity, StoreError> {
            self.inner.create(display_name, avatar).await
        }

        async fn get_profile(
            &self,
            id: &ProfileId,
        ) -> Result<Option<ProfileIdentity>, StoreError> {
            self.inner.get_profile(id).await
        }

        async fn get_state(&self, id: &ProfileId) -> Result<Option<PlayerState>, StoreError> {
            self.inner.get_state(id).await
        }

        async fn upsert_state(
            &self,
            id: &ProfileId,
            state: &PlayerState,
        ) -> Result<(), StoreError> {
            tokio::time::sleep(self.delay).await;
            self.inner.upsert_state(id, state).await?;
            self.written_stars.lock().unwrap().push(state.stars);
            Ok(())
        }

        async fn update_profile(
            &self,
            id: &ProfileId,
            display_name: &str,
            avatar: &AvatarConfig,
        ) -> Result<(), StoreError> {
            self.inner.update_profile(id, display_name, avatar).await
        }

        async fn list_profiles(
            &self,
        ) -> Result<Vec<moonlit_domain::model::profile::ProfileSummary>, StoreError> {
            self.inner.list_profiles().await
        }
    }

    fn story_win() -> RewardEvent {
        RewardEvent::new(ActivityKind::Story)
            .with_stars(5)
            .with_xp(20)
            .with_completions(1)
            .with_energy_cost(1)
    }

    #[tokio::test]
    async fn test_login_creates_and_resumes() {
        let store = Arc::new(InMemoryProfileStore::new());
        let client = client_with(Arc::clone(&store));

        let created = client.login("Nova", &AvatarConfig::default()).await.unwrap();
        client.record(story_win()).await;
        client.flush().await.unwrap();

        // A second client logging in with the same name resumes the
        // stored progress instead of creating a twin profile
        let client2 = client_with(Arc::clone(&store));
        let resumed = client2.login("Nova", &AvatarConfig::default()).await.unwrap();
        assert_eq!(resumed.id, created.id);
        assert_eq!(client2.snapshot().await.stars, 5);
    }

    #[tokio::test]
    async fn test_hydrate_from_cached_id() {
        let store = Arc::new(InMemoryProfileStore::new());
        let client = client_with(Arc::clone(&store));
        let identity = client.login("Nova", &AvatarConfig::default()).await.unwrap();
        client.record(story_win()).await;
        client.flush().await.unwrap();

        let client2 = client_with(Arc::clone(&store));
        let phase = client2.hydrate(Some(&identity.id)).await;
        assert_eq!(phase, SessionPhase::Hydrated);
        assert_eq!(client2.snapshot().await.story_wins, 1);

        let client3 = client_with(Arc::clone(&store));
        let phase = client3.hydrate(Some(&ProfileId::new("ghost"))).await;
        assert_eq!(phase, SessionPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_debounce_defers_then_writes() {
        let store = Arc::new(InMemoryProfileStore::new());
        let client = client_with(Arc::clone(&store));
        let identity = client.login("Nova", &AvatarConfig::default()).await.unwrap();

        client.record(story_win()).await;
        client.record(story_win()).await;
        client.record(story_win()).await;

        // Inside the window the store still has the untouched blob
        let stored = store.get_state(&identity.id).await.unwrap().unwrap();
        assert_eq!(stored.story_wins, 0);

        tokio::time::sleep(Duration::from_millis(80)).await;
        let stored = store.get_state(&identity.id).await.unwrap().unwrap();
        assert_eq!(stored.story_wins, 3);
        assert_eq!(stored.stars, 15);
    }

    #[tokio::test]
    async fn test_status_transitions() {
        let store = Arc::new(InMemoryProfileStore::new());
        let client = client_with(Arc::clone(&store));
        client.login("Nova", &AvatarConfig::default()).await.unwrap();

        let status = client.subscribe_status();
        client.record(story_win()).await;
        assert_eq!(*status.borrow(), SyncStatus::Pending);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(*status.borrow(), SyncStatus::Saved);
    }

    #[tokio::test]
    async fn test_offline_keeps_local_state() {
        let store = Arc::new(InMemoryProfileStore::new());
        let client = client_with(Arc::clone(&store));
        let identity = client.login("Nova", &AvatarConfig::default()).await.unwrap();

        store.set_offline(true);
        client.record(story_win()).await;
        assert!(client.flush().await.is_err());
        assert_eq!(*client.subscribe_status().borrow(), SyncStatus::Offline);

        // Progress is never rolled back on a failed push
        assert_eq!(client.snapshot().await.stars, 5);

        store.set_offline(false);
        assert!(client.flush().await.unwrap());
        let stored = store.get_state(&identity.id).await.unwrap().unwrap();
        assert_eq!(stored.stars, 5);
    }

    #[tokio::test]
    async fn test_status_reaches_late_subscribers() {
        // Nothing watches the channel yet; the stored value must still
        // track every transition so a UI attaching later reads it
        let store = Arc::new(InMemoryProfileStore::new());
        let client = client_with(Arc::clone(&store));
        client.login("Nova", &AvatarConfig::default()).await.unwrap();

        store.set_offline(true);
        client.record(story_win()).await;
        assert!(client.flush().await.is_err());
        assert_eq!(*client.subscribe_status().borrow(), SyncStatus::Offline);

        store.set_offline(false);
        client.flush().await.unwrap();
        assert_eq!(*client.subscribe_status().borrow(), SyncStatus::Saved);
    }

    #[tokio::test]
    async fn test_mutation_mid_push_does_not_cancel_write() {
        // A mutation arriving while a push is writing must let the write
        // finish and ride the next scheduled push
        let inner = Arc::new(InMemoryProfileStore::new());
        let store = Arc::new(SlowStore {
            inner: Arc::clone(&inner),
            delay: Duration::from_millis(100),
            written_stars: std::sync::Mutex::new(Vec::new()),
        });
        let client = client_with_store(Arc::clone(&store) as Arc<dyn ProfileStore>);
        client.login("Nova", &AvatarConfig::default()).await.unwrap();

        client.record(story_win()).await;
        // Let the debounce fire and the slow write get underway
        tokio::time::sleep(Duration::from_millis(50)).await;
        client.record(story_win()).await;

        tokio::time::sleep(Duration::from_millis(300)).await;
        let written = store.written_stars.lock().unwrap().clone();
        assert_eq!(written, vec![5, 10]);
    }

    #[tokio::test]
    async fn test_anonymous_session_stays_local() {
        let store = Arc::new(InMemoryProfileStore::new());
        let client = client_with(Arc::clone(&store));

        let phase = client.hydrate(None).await;
        assert_eq!(phase, SessionPhase::Anonymous);

        client.record(story_win()).await;
        assert_eq!(client.snapshot().await.stars, 5);

        // Nothing to push without a profile
        assert!(!client.flush().await.unwrap());
        assert!(store.list_profiles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_claim_quest_gating() {
        let store = Arc::new(InMemoryProfileStore::new());
        let client = client_with(store);
        client.login("Nova", &AvatarConfig::default()).await.unwrap();

        let err = client.claim_quest("no-such-quest").await.unwrap_err();
        assert!(matches!(err, SyncError::UnknownQuest(_)));

        let quest = client.content().quests[0].clone();
        let err = client.claim_quest(&quest.id).await.unwrap_err();
        assert!(matches!(err, SyncError::QuestNotReady(_)));

        for _ in 0..quest.target {
            client
                .record(RewardEvent::new(ActivityKind::Story).with_completions(1))
                .await;
        }
        client.claim_quest(&quest.id).await.unwrap();
        let state = client.snapshot().await;
        assert!(state.claimed_quests.contains(&quest.id));
        assert_eq!(state.stars, quest.reward.stars);

        // Claiming twice is refused
        let err = client.claim_quest(&quest.id).await.unwrap_err();
        assert!(matches!(err, SyncError::QuestNotReady(_)));
    }

    #[tokio::test]
    async fn test_purchase_and_rest() {
        let store = Arc::new(InMemoryProfileStore::new());
        let client = client_with(store);
        client.login("Nova", &AvatarConfig::default()).await.unwrap();

        let err = client
            .purchase(ItemCategory::Outfits, "no-such-item")
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::UnknownItem(_)));

        let item = client.content().shop.category(ItemCategory::Outfits)[0].clone();
        client
            .record(RewardEvent::new(ActivityKind::Story).with_gems(item.cost + 2))
            .await;

        let remaining = client
            .purchase(ItemCategory::Outfits, &item.id)
            .await
            .unwrap();
        assert_eq!(remaining, 2);

        // Drain some energy, then spend the remaining gems on a refill
        client
            .record(RewardEvent::new(ActivityKind::Story).with_energy_cost(6))
            .await;
        assert_eq!(client.rest().await.unwrap(), 5);
        assert_eq!(client.snapshot().await.gems, 0);
    }

    #[tokio::test]
    async fn test_rename_surfaces_conflict() {
        let store = Arc::new(InMemoryProfileStore::new());
        let client = client_with(Arc::clone(&store));
        store
            .create("Luna", &AvatarConfig::default())
            .await
            .unwrap();
        client.login("Nova", &AvatarConfig::default()).await.unwrap();

        let err = client
            .update_profile("Luna", &AvatarConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Store(StoreError::NameConflict(_))));

        client
            .update_profile("Stella", &AvatarConfig::default())
            .await
            .unwrap();
        assert_eq!(client.identity().await.unwrap().display_name, "Stella");
    }

    #[tokio::test]
    async fn test_shutdown_flushes() {
        let store = Arc::new(InMemoryProfileStore::new());
        let client = client_with(Arc::clone(&store));
        let identity = client.login("Nova", &AvatarConfig::default()).await.unwrap();

        client.record(story_win()).await;
        client.shutdown().await;

        let stored = store.get_state(&identity.id).await.unwrap().unwrap();
        assert_eq!(stored.story_wins, 1);
    }
}
