//! SQLite ProfileStore
//!
//! One row per profile in `profiles`, one state blob per profile in
//! `progress`, upserted whole. WAL journaling so the debounced writer
//! never blocks a concurrent reader.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use moonlit_domain::model::profile::{AvatarConfig, ProfileId, ProfileIdentity, ProfileSummary};
use moonlit_domain::model::state::PlayerState;
use rusqlite::{Connection, OptionalExtension};

use crate::profile_store::{validate_name, ProfileStore, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS profiles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL,
    avatar_json TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS progress (
    profile_id INTEGER PRIMARY KEY,
    progress_json TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY(profile_id) REFERENCES profiles(id) ON DELETE CASCADE
);
";

/// SQLite-backed ProfileStore
pub struct SqliteProfileStore {
    conn: Mutex<Connection>,
}

impl SqliteProfileStore {
    /// Open (or create) the database at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Private database for tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("Failed to acquire connection".to_string()))
    }

    fn row_id(id: &ProfileId) -> Result<i64, StoreError> {
        id.as_str()
            .parse::<i64>()
            .map_err(|_| StoreError::Validation(format!("Invalid profile id: {}", id)))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn lookup(&self, display_name: &str) -> Result<Option<ProfileIdentity>, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT id, name, avatar_json FROM profiles WHERE name = ?1",
                [display_name],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, name, avatar_json)) => {
                let avatar: AvatarConfig = serde_json::from_str(&avatar_json)?;
                Ok(Some(ProfileIdentity {
                    id: ProfileId::new(id.to_string()),
                    display_name: name,
                    avatar,
                }))
            }
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        display_name: &str,
        avatar: &AvatarConfig,
    ) -> Result<ProfileIdentity, StoreError> {
        validate_name(display_name)?;
        let avatar_json = serde_json::to_string(avatar)?;
        let state_json = serde_json::to_string(&PlayerState::default())?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let inserted = tx.execute(
            "INSERT INTO profiles (name, avatar_json, created_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![display_name, avatar_json, now()],
        );
        if let Err(err) = inserted {
            if is_unique_violation(&err) {
                return Err(StoreError::NameConflict(display_name.to_string()));
            }
            return Err(err.into());
        }

        let profile_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO progress (profile_id, progress_json, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![profile_id, state_json, now()],
        )?;
        tx.commit()?;

        Ok(ProfileIdentity {
            id: ProfileId::new(profile_id.to_string()),
            display_name: display_name.to_string(),
            avatar: avatar.clone(),
        })
    }

    async fn get_profile(&self, id: &ProfileId) -> Result<Option<ProfileIdentity>, StoreError> {
        let profile_id = Self::row_id(id)?;
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT name, avatar_json FROM profiles WHERE id = ?1",
                [profile_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((name, avatar_json)) => {
                let avatar: AvatarConfig = serde_json::from_str(&avatar_json)?;
                Ok(Some(ProfileIdentity {
                    id: id.clone(),
                    display_name: name,
                    avatar,
                }))
            }
            None => Ok(None),
        }
    }

    async fn get_state(&self, id: &ProfileId) -> Result<Option<PlayerState>, StoreError> {
        let profile_id = Self::row_id(id)?;
        let conn = self.lock()?;
        let blob = conn
            .query_row(
                "SELECT progress_json FROM progress WHERE profile_id = ?1",
                [profile_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        match blob {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn upsert_state(&self, id: &ProfileId, state: &PlayerState) -> Result<(), StoreError> {
        let profile_id = Self::row_id(id)?;
        let state_json = serde_json::to_string(state)?;

        let conn = self.lock()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM profiles WHERE id = ?1)",
            [profile_id],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StoreError::NotFound(id.as_str().to_string()));
        }

        conn.execute(
            "INSERT INTO progress (profile_id, progress_json, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(profile_id) DO UPDATE SET
                 progress_json = excluded.progress_json,
                 updated_at = excluded.updated_at",
            rusqlite::params![profile_id, state_json, now()],
        )?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: &ProfileId,
        display_name: &str,
        avatar: &AvatarConfig,
    ) -> Result<(), StoreError> {
        validate_name(display_name)?;
        let profile_id = Self::row_id(id)?;
        let avatar_json = serde_json::to_string(avatar)?;

        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE profiles SET name = ?1, avatar_json = ?2 WHERE id = ?3",
            rusqlite::params![display_name, avatar_json, profile_id],
        );
        match changed {
            Ok(0) => Err(StoreError::NotFound(id.as_str().to_string())),
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::NameConflict(display_name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list_profiles(&self) -> Result<Vec<ProfileSummary>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at FROM profiles ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ProfileSummary {
                id: ProfileId::new(row.get::<_, i64>(0)?.to_string()),
                display_name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;

        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }
}
