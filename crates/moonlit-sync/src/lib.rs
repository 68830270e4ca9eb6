//! # Moonlit Sync
//!
//! The session layer between the UI and the profile store. It owns the
//! in-memory `PlayerState` for the active session, applies mutations
//! through the domain services, and pushes the whole blob to the store
//! after a debounce window so bursts of activity become one write.
//!
//! Local state is authoritative: a failed push never rolls anything
//! back, it just leaves the state dirty for the next attempt.

pub mod client;

pub use client::{SessionPhase, SyncClient, SyncError, SyncStatus};
