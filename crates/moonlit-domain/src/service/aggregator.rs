//! Aggregator - The reward-merge engine
//!
//! One deterministic operation: `merge(state, event, today)`. Everything a
//! mini-game can do to the player's progression flows through it, in a
//! fixed order:
//!
//! 1. Energy day-roll (time-boundary effect, before any cost)
//! 2. Additive currency and counter deltas
//! 3. Energy cost, clamped at zero
//! 4. Streak update, then best-streak high-water
//! 5. Reward log append
//! 6. Daily-bonus gate (one gem per calendar day)
//! 7. Inventory / quest-claim unions
//! 8. Leveling loop (+2 gems per level)
//! 9. Badge derivation from the rule table
//!
//! `merge` never fails. A merge failure would strand the player's session,
//! so out-of-range input is clamped and an unparseable `today` just reads
//! as "a different day", which forces a safe energy reset.
//!
//! Level-ups and badge unlocks are reported as `NotableEvent`s for the UI
//! to toast. The aggregator itself doesn't "do" anything with them.

use crate::model::catalog::BadgeRule;
use crate::model::event::{RewardEvent, StreakUpdate};
use crate::model::state::{PlayerState, ENERGY_MAX};
use shared::DateKey;

/// XP needed to clear a level. Strictly increasing, so the leveling loop
/// always terminates.
pub fn level_threshold(level: u32) -> u32 {
    80 + level.saturating_mul(40)
}

/// Gems granted per level gained
const GEMS_PER_LEVEL: u32 = 2;

/// Something worth telling the player about.
///
/// These are outputs of `merge`, not state: the caller drives a transient
/// notification from them and then drops them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotableEvent {
    /// The leveling loop ran at least once
    LevelUp { level: u32, gems_awarded: u32 },
    /// First newly earned badge, in rule-table order
    BadgeUnlocked { badge_id: String, name: String },
}

/// The merge engine. Stateless apart from the badge rule table it was
/// constructed with; all player state lives in `PlayerState`.
#[derive(Debug, Clone)]
pub struct Aggregator {
    badge_rules: Vec<BadgeRule>,
}

impl Aggregator {
    /// Create an aggregator over a badge rule table.
    ///
    /// The table order is load-bearing: when several badges unlock in one
    /// merge, the lowest-index rule drives the notification.
    pub fn new(badge_rules: Vec<BadgeRule>) -> Self {
        Self { badge_rules }
    }

    pub fn badge_rules(&self) -> &[BadgeRule] {
        &self.badge_rules
    }

    /// Merge one reward event into the player state.
    ///
    /// Infallible and deterministic: same state, event, and day always
    /// produce the same result.
    pub fn merge(
        &self,
        state: &mut PlayerState,
        event: &RewardEvent,
        today: &DateKey,
    ) -> Vec<NotableEvent> {
        let mut notables = Vec::new();

        // 1. Day-roll before the event's cost: a session that starts a
        // new calendar day sees full energy immediately, even if the
        // event itself costs nothing.
        if state.energy_date != *today {
            state.energy_date = today.clone();
            state.energy = ENERGY_MAX;
        }

        // 2. Additive deltas; non-negative by type
        state.stars = state.stars.saturating_add(event.stars);
        state.gems = state.gems.saturating_add(event.gems);
        state.xp = state.xp.saturating_add(event.xp);
        state.bump_counter(event.kind, event.completions);
        if let Some(dungeon) = &event.dungeon_clear {
            state.dungeon_clears.insert(dungeon.clone());
        }

        // 3. Energy cost
        state.energy = state.energy.saturating_sub(event.energy_cost);

        // 4. Streak, then high-water
        match event.streak {
            StreakUpdate::Reset => state.streak = 0,
            StreakUpdate::Adjust(delta) => {
                let shifted = i64::from(state.streak) + i64::from(delta);
                state.streak = shifted.clamp(0, i64::from(u32::MAX)) as u32;
            }
            StreakUpdate::Keep => {}
        }
        state.best_streak = state.best_streak.max(state.streak);

        // 5. Reward log
        if let Some(log) = &event.log {
            state.push_reward_log(log.clone());
        }

        // 6. Daily bonus: at most one gem per calendar day, no matter how
        // many events carry the flag
        if event.daily_bonus && state.daily_bonus_date != *today {
            state.gems = state.gems.saturating_add(1);
            state.daily_bonus_date = today.clone();
            state.push_reward_log("+1 gem Daily Focus");
        }

        // 7. Grants; set semantics make re-grants a no-op
        for grant in &event.items {
            state.inventory.grant(grant.category, grant.item.clone());
        }
        if let Some(quest_id) = &event.claim_quest {
            state.claimed_quests.insert(quest_id.clone());
        }

        // 8. Leveling loop
        let mut level_ups = 0u32;
        while state.xp >= level_threshold(state.level) {
            state.xp -= level_threshold(state.level);
            state.level += 1;
            level_ups += 1;
        }
        if level_ups > 0 {
            let gems_awarded = level_ups * GEMS_PER_LEVEL;
            state.gems = state.gems.saturating_add(gems_awarded);
            state.push_reward_log(format!(
                "Level up x{} (+{} gems)",
                level_ups, gems_awarded
            ));
            notables.push(NotableEvent::LevelUp {
                level: state.level,
                gems_awarded,
            });
        }

        // 9. Badge derivation, unioned with held badges: once earned,
        // never revoked
        let held = state.badges.clone();
        for rule in &self.badge_rules {
            if state.metric(rule.metric) >= rule.threshold {
                state.badges.insert(rule.id.clone());
            }
        }
        let newly_unlocked = self
            .badge_rules
            .iter()
            .find(|rule| !held.contains(&rule.id) && state.badges.contains(&rule.id));
        if let Some(rule) = newly_unlocked {
            notables.push(NotableEvent::BadgeUnlocked {
                badge_id: rule.id.clone(),
                name: rule.name.clone(),
            });
        }

        notables
    }
}
