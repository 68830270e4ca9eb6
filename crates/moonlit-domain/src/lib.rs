//! # Moonlit Domain Layer
//!
//! Player progression as pure logic: merging reward events into a
//! consistent `PlayerState`, validating purchases, and projecting quest
//! completion. No I/O, no async, no clock; the caller supplies `today`.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Domain Layer (This Crate)                │
//! │  model/   - PlayerState, RewardEvent, profile, catalogs  │
//! │  service/ - Aggregator, EconomyGate, quest projection    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Mini-games never touch `PlayerState` fields directly: they produce one
//! `RewardEvent` per completed activity and hand it to the `Aggregator`.

pub mod model;
pub mod service;

// Re-export commonly used types
pub use model::{
    catalog::{BadgeRule, Quest, QuestReward, Relic, ShopItem},
    event::{ActivityKind, ItemGrant, RewardEvent, StreakUpdate},
    profile::{AvatarConfig, ProfileId, ProfileIdentity, ProfileSummary},
    state::{Inventory, ItemCategory, Metric, PlayerState, ENERGY_MAX},
};

pub use service::{
    aggregator::{level_threshold, Aggregator, NotableEvent},
    economy::{EconomyGate, PurchaseError},
    quest::{can_claim, claim_event, quest_status, QuestStatus},
};
