//! Quest status projection and the claim gate
//!
//! Quest completion is read-only: it is computed from the counters, never
//! stored. The aggregator stays quest-catalog-agnostic; the claim gate
//! lives here with the caller, which only produces a claim event when the
//! quest is done and unclaimed.

use crate::model::catalog::Quest;
use crate::model::event::{ActivityKind, RewardEvent};
use crate::model::state::{ItemCategory, PlayerState};

/// Progress toward one quest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestStatus {
    pub current: u32,
    pub total: u32,
    pub done: bool,
}

/// Project a quest's completion from the current counters
pub fn quest_status(quest: &Quest, state: &PlayerState) -> QuestStatus {
    let current = state.metric(quest.metric);
    QuestStatus {
        current,
        total: quest.target,
        done: current >= quest.target,
    }
}

/// Whether claiming is permitted right now
pub fn can_claim(quest: &Quest, state: &PlayerState) -> bool {
    quest_status(quest, state).done && !state.claimed_quests.contains(&quest.id)
}

/// Build the reward event for a permitted claim.
///
/// Callers must gate on `can_claim` first; the aggregator will happily
/// union a claim id either way, it just won't pay twice at this layer.
pub fn claim_event(quest: &Quest) -> RewardEvent {
    let mut event = RewardEvent::new(ActivityKind::Quest)
        .with_stars(quest.reward.stars)
        .with_gems(quest.reward.gems)
        .with_xp(quest.reward.xp)
        .with_quest_claim(quest.id.clone())
        .with_log(format!("Quest reward: {}", quest.title));
    if let Some(item) = &quest.reward.item {
        event = event.with_item(ItemCategory::Items, item.clone());
    }
    event
}
