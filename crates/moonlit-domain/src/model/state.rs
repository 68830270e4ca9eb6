//! PlayerState - The durable progression snapshot for one profile
//!
//! PlayerState is an Entity owned exclusively by the progression services:
//! it is mutated only through `Aggregator::merge` and the `EconomyGate`,
//! never patched field-by-field from the outside.
//!
//! The serde layout (camelCase, every field defaulted) is the persisted
//! state blob. The blob is versionless; the per-field defaults let older
//! blobs hydrate safely, but any future schema change needs explicit
//! versioning before shipping.

use serde::{Deserialize, Serialize};
use shared::DateKey;
use std::collections::BTreeSet;

use super::event::ActivityKind;

/// Energy ceiling; a full refill happens on the first merge of a new day
pub const ENERGY_MAX: u32 = 10;

/// How many reward log lines the hub shows
pub const RECENT_REWARDS_CAP: usize = 4;

/// A measurable aspect of progression that badge rules and quests key off.
///
/// The camelCase serde names double as the persisted counter field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    StoryWins,
    GrammarCorrect,
    MathCorrect,
    WritingDone,
    BattleWins,
    WordForgeWins,
    PatternWins,
    AdventureWins,
    Stars,
    BestStreak,
    Level,
}

/// Inventory category for purchases and grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemCategory {
    /// Quest relics and other earned trinkets
    Items,
    Outfits,
    Accessories,
    Companions,
}

impl std::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ItemCategory::Items => "items",
            ItemCategory::Outfits => "outfits",
            ItemCategory::Accessories => "accessories",
            ItemCategory::Companions => "companions",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for ItemCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "items" | "relics" => Ok(ItemCategory::Items),
            "outfits" => Ok(ItemCategory::Outfits),
            "accessories" => Ok(ItemCategory::Accessories),
            "companions" => Ok(ItemCategory::Companions),
            other => Err(format!("Unknown item category: {}", other)),
        }
    }
}

/// Owned items per category; each set only ever grows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Inventory {
    pub items: BTreeSet<String>,
    pub outfits: BTreeSet<String>,
    pub accessories: BTreeSet<String>,
    pub companions: BTreeSet<String>,
}

impl Inventory {
    pub fn category(&self, category: ItemCategory) -> &BTreeSet<String> {
        match category {
            ItemCategory::Items => &self.items,
            ItemCategory::Outfits => &self.outfits,
            ItemCategory::Accessories => &self.accessories,
            ItemCategory::Companions => &self.companions,
        }
    }

    fn category_mut(&mut self, category: ItemCategory) -> &mut BTreeSet<String> {
        match category {
            ItemCategory::Items => &mut self.items,
            ItemCategory::Outfits => &mut self.outfits,
            ItemCategory::Accessories => &mut self.accessories,
            ItemCategory::Companions => &mut self.companions,
        }
    }

    pub fn owns(&self, category: ItemCategory, item: &str) -> bool {
        self.category(category).contains(item)
    }

    /// Add an item to a category set. Re-granting is a no-op.
    /// Returns true if the item was newly added.
    pub fn grant(&mut self, category: ItemCategory, item: impl Into<String>) -> bool {
        self.category_mut(category).insert(item.into())
    }

    pub fn total_owned(&self) -> usize {
        self.items.len() + self.outfits.len() + self.accessories.len() + self.companions.len()
    }
}

/// The progression snapshot for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerState {
    /// Soft score, never spent
    pub stars: u32,
    /// Spendable currency
    pub gems: u32,
    /// Progress toward the next level; normalized to `< level_threshold(level)`
    pub xp: u32,
    pub level: u32,
    /// Per-day activity budget, in `[0, ENERGY_MAX]`
    pub energy: u32,
    /// Day of the last energy refill
    pub energy_date: DateKey,
    pub streak: u32,
    /// All-time streak high-water mark
    pub best_streak: u32,

    // Per-activity counters, monotone non-decreasing
    pub story_wins: u32,
    pub grammar_correct: u32,
    pub math_correct: u32,
    pub writing_done: u32,
    pub battle_wins: u32,
    pub word_forge_wins: u32,
    pub pattern_wins: u32,
    pub adventure_wins: u32,

    /// Ids of dungeons cleared at least once
    pub dungeon_clears: BTreeSet<String>,
    /// Day of the last daily-bonus gem, empty if never granted
    pub daily_bonus_date: DateKey,
    pub claimed_quests: BTreeSet<String>,
    /// Derived from the badge rule table; never shrinks
    pub badges: BTreeSet<String>,
    pub inventory: Inventory,
    /// Most-recent-first, capped at RECENT_REWARDS_CAP. Display only.
    pub recent_rewards: Vec<String>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            stars: 0,
            gems: 0,
            xp: 0,
            level: 1,
            energy: ENERGY_MAX,
            energy_date: DateKey::none(),
            streak: 0,
            best_streak: 0,
            story_wins: 0,
            grammar_correct: 0,
            math_correct: 0,
            writing_done: 0,
            battle_wins: 0,
            word_forge_wins: 0,
            pattern_wins: 0,
            adventure_wins: 0,
            dungeon_clears: BTreeSet::new(),
            daily_bonus_date: DateKey::none(),
            claimed_quests: BTreeSet::new(),
            badges: BTreeSet::new(),
            inventory: Inventory::default(),
            recent_rewards: Vec::new(),
        }
    }
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the current value of a metric
    pub fn metric(&self, metric: Metric) -> u32 {
        match metric {
            Metric::StoryWins => self.story_wins,
            Metric::GrammarCorrect => self.grammar_correct,
            Metric::MathCorrect => self.math_correct,
            Metric::WritingDone => self.writing_done,
            Metric::BattleWins => self.battle_wins,
            Metric::WordForgeWins => self.word_forge_wins,
            Metric::PatternWins => self.pattern_wins,
            Metric::AdventureWins => self.adventure_wins,
            Metric::Stars => self.stars,
            Metric::BestStreak => self.best_streak,
            Metric::Level => self.level,
        }
    }

    /// Increment the counter backing an activity kind, if it has one
    pub(crate) fn bump_counter(&mut self, kind: ActivityKind, n: u32) {
        let counter = match kind.counter() {
            Some(metric) => metric,
            None => return,
        };
        let slot = match counter {
            Metric::StoryWins => &mut self.story_wins,
            Metric::GrammarCorrect => &mut self.grammar_correct,
            Metric::MathCorrect => &mut self.math_correct,
            Metric::WritingDone => &mut self.writing_done,
            Metric::BattleWins => &mut self.battle_wins,
            Metric::WordForgeWins => &mut self.word_forge_wins,
            Metric::PatternWins => &mut self.pattern_wins,
            Metric::AdventureWins => &mut self.adventure_wins,
            // Derived metrics are never incremented directly
            Metric::Stars | Metric::BestStreak | Metric::Level => return,
        };
        *slot = slot.saturating_add(n);
    }

    /// Prepend a line to the reward log, dropping the oldest past the cap
    pub(crate) fn push_reward_log(&mut self, line: impl Into<String>) {
        self.recent_rewards.insert(0, line.into());
        self.recent_rewards.truncate(RECENT_REWARDS_CAP);
    }
}
