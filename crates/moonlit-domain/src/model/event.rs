//! RewardEvent - One activity's outcome, the sole input to state merging
//!
//! A RewardEvent is a Value Object: produced by a mini-game on completion,
//! consumed exactly once by `Aggregator::merge`, never persisted verbatim.
//! Only its effect on `PlayerState` survives.

use super::state::{ItemCategory, Metric};

/// Which activity produced the event.
///
/// The tag decides which per-activity counter `completions` increments;
/// kinds without a counter (quest claims, system grants) increment nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Story,
    Grammar,
    Math,
    Writing,
    Battle,
    WordForge,
    Pattern,
    Adventure,
    Dungeon,
    /// Reward collected from a completed quest
    Quest,
    /// Daily bonus and other non-activity grants
    System,
}

impl ActivityKind {
    /// The counter this kind of activity advances, if any
    pub fn counter(self) -> Option<Metric> {
        match self {
            ActivityKind::Story => Some(Metric::StoryWins),
            ActivityKind::Grammar => Some(Metric::GrammarCorrect),
            ActivityKind::Math => Some(Metric::MathCorrect),
            ActivityKind::Writing => Some(Metric::WritingDone),
            ActivityKind::Battle => Some(Metric::BattleWins),
            ActivityKind::WordForge => Some(Metric::WordForgeWins),
            ActivityKind::Pattern => Some(Metric::PatternWins),
            ActivityKind::Adventure => Some(Metric::AdventureWins),
            ActivityKind::Dungeon | ActivityKind::Quest | ActivityKind::System => None,
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActivityKind::Story => "story",
            ActivityKind::Grammar => "grammar",
            ActivityKind::Math => "math",
            ActivityKind::Writing => "writing",
            ActivityKind::Battle => "battle",
            ActivityKind::WordForge => "word-forge",
            ActivityKind::Pattern => "pattern",
            ActivityKind::Adventure => "adventure",
            ActivityKind::Dungeon => "dungeon",
            ActivityKind::Quest => "quest",
            ActivityKind::System => "system",
        };
        write!(f, "{}", name)
    }
}

/// How an event touches the consecutive-success streak
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreakUpdate {
    /// Leave the streak alone
    #[default]
    Keep,
    /// Shift the streak by a delta, clamped at zero
    Adjust(i32),
    /// A miss: back to zero
    Reset,
}

impl StreakUpdate {
    /// Combine loose producer flags into one update.
    ///
    /// A reset and a delta should never coexist on one event, but a
    /// misbehaving producer must not crash the merge: reset wins.
    pub fn from_flags(reset: bool, delta: Option<i32>) -> Self {
        if reset {
            StreakUpdate::Reset
        } else {
            match delta {
                Some(d) => StreakUpdate::Adjust(d),
                None => StreakUpdate::Keep,
            }
        }
    }
}

/// An item granted directly by an event (quest relics, drops)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemGrant {
    pub category: ItemCategory,
    pub item: String,
}

/// The outcome of one completed activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardEvent {
    pub kind: ActivityKind,
    /// All deltas are non-negative by type; the aggregator never subtracts
    pub stars: u32,
    pub gems: u32,
    pub xp: u32,
    /// How many times the kind's counter advances
    pub completions: u32,
    pub energy_cost: u32,
    pub streak: StreakUpdate,
    /// Human-readable line for the hub's reward log
    pub log: Option<String>,
    /// Claim the one-per-day bonus gem if it hasn't been granted today
    pub daily_bonus: bool,
    pub items: Vec<ItemGrant>,
    /// Mark a quest as claimed (the caller gates on completion first)
    pub claim_quest: Option<String>,
    /// Record a dungeon as cleared
    pub dungeon_clear: Option<String>,
}

impl RewardEvent {
    pub fn new(kind: ActivityKind) -> Self {
        Self {
            kind,
            stars: 0,
            gems: 0,
            xp: 0,
            completions: 0,
            energy_cost: 0,
            streak: StreakUpdate::Keep,
            log: None,
            daily_bonus: false,
            items: Vec::new(),
            claim_quest: None,
            dungeon_clear: None,
        }
    }

    pub fn with_stars(mut self, stars: u32) -> Self {
        self.stars = stars;
        self
    }

    pub fn with_gems(mut self, gems: u32) -> Self {
        self.gems = gems;
        self
    }

    pub fn with_xp(mut self, xp: u32) -> Self {
        self.xp = xp;
        self
    }

    pub fn with_completions(mut self, completions: u32) -> Self {
        self.completions = completions;
        self
    }

    pub fn with_energy_cost(mut self, energy_cost: u32) -> Self {
        self.energy_cost = energy_cost;
        self
    }

    pub fn with_streak(mut self, streak: StreakUpdate) -> Self {
        self.streak = streak;
        self
    }

    pub fn with_log(mut self, log: impl Into<String>) -> Self {
        self.log = Some(log.into());
        self
    }

    pub fn with_daily_bonus(mut self, daily_bonus: bool) -> Self {
        self.daily_bonus = daily_bonus;
        self
    }

    pub fn with_item(mut self, category: ItemCategory, item: impl Into<String>) -> Self {
        self.items.push(ItemGrant {
            category,
            item: item.into(),
        });
        self
    }

    pub fn with_quest_claim(mut self, quest_id: impl Into<String>) -> Self {
        self.claim_quest = Some(quest_id.into());
        self
    }

    pub fn with_dungeon_clear(mut self, dungeon_id: impl Into<String>) -> Self {
        self.dungeon_clear = Some(dungeon_id.into());
        self
    }
}
