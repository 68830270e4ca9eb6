//! # Moonlit Store
//!
//! Durable persistence for profiles and progression state, behind the
//! `ProfileStore` trait. The store owns identity: display names are
//! unique here and nowhere else.
//!
//! Two adapters: `InMemoryProfileStore` for tests and development, and
//! `SqliteProfileStore` for real durability. Both treat writes as
//! serializable per profile row with last-write-wins on the state blob;
//! there is at most one writer per profile under normal operation.

pub mod in_memory;
pub mod profile_store;
pub mod sqlite;

pub use in_memory::InMemoryProfileStore;
pub use profile_store::{ProfileStore, StoreError};
pub use sqlite::SqliteProfileStore;
