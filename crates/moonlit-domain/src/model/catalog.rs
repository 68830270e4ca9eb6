//! Catalog types - Static content the progression services consume
//!
//! Badge rules, quests, and shop items are data, loaded once at startup
//! and passed by reference into the services. Nothing here is embedded in
//! merge or purchase logic, which keeps both independently testable.

use serde::{Deserialize, Serialize};

use super::state::Metric;

/// One row of the badge derivation table: metric reaches threshold,
/// badge is earned. Table order is the notification order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeRule {
    pub id: String,
    pub name: String,
    pub metric: Metric,
    pub threshold: u32,
    /// Player-facing requirement text
    pub requirement: String,
}

/// What a completed quest pays out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuestReward {
    pub stars: u32,
    pub gems: u32,
    pub xp: u32,
    /// Relic granted into the items category
    pub item: Option<String>,
}

impl Default for QuestReward {
    fn default() -> Self {
        Self {
            stars: 0,
            gems: 0,
            xp: 0,
            item: None,
        }
    }
}

/// A quest: reach `target` on `metric`, claim once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub metric: Metric,
    pub target: u32,
    pub reward: QuestReward,
}

/// A purchasable shop item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub cost: u32,
}

/// A quest relic: granted, never bought
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relic {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quest_yaml_shape() {
        // Catalog files use the same camelCase names as the original data
        let json = r#"{
            "id": "lantern-patrol",
            "title": "Lantern Patrol",
            "description": "Complete 2 reading stories in Moon Meadow.",
            "metric": "storyWins",
            "target": 2,
            "reward": { "stars": 6, "gems": 1, "xp": 35, "item": "lantern-badge" }
        }"#;

        let quest: Quest = serde_json::from_str(json).unwrap();
        assert_eq!(quest.metric, Metric::StoryWins);
        assert_eq!(quest.target, 2);
        assert_eq!(quest.reward.item.as_deref(), Some("lantern-badge"));
    }

    #[test]
    fn test_reward_defaults() {
        let json = r#"{ "gems": 2 }"#;
        let reward: QuestReward = serde_json::from_str(json).unwrap();
        assert_eq!(reward.gems, 2);
        assert_eq!(reward.stars, 0);
        assert!(reward.item.is_none());
    }
}
