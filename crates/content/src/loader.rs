//! ContentPack - Catalog loading and validation
//!
//! A deployment can override the builtin catalogs with a single YAML file
//! (same camelCase field names as the persisted blobs). Content is loaded
//! once at process start; a bad file is a startup error, never a mid-game
//! surprise.

use moonlit_domain::model::catalog::{BadgeRule, Quest, Relic, ShopItem};
use moonlit_domain::model::state::ItemCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading or validating a content file
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Failed to read content file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse content file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid content: {0}")]
    Invalid(String),
}

/// Purchasable items grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShopCatalog {
    pub outfits: Vec<ShopItem>,
    pub accessories: Vec<ShopItem>,
    pub companions: Vec<ShopItem>,
}

impl ShopCatalog {
    /// Items on sale in a category. Relics are earned, not sold.
    pub fn category(&self, category: ItemCategory) -> &[ShopItem] {
        match category {
            ItemCategory::Outfits => &self.outfits,
            ItemCategory::Accessories => &self.accessories,
            ItemCategory::Companions => &self.companions,
            ItemCategory::Items => &[],
        }
    }

    pub fn find(&self, category: ItemCategory, item_id: &str) -> Option<&ShopItem> {
        self.category(category).iter().find(|i| i.id == item_id)
    }
}

/// Everything static the game needs: badges, quests, shop, relics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentPack {
    pub badges: Vec<BadgeRule>,
    pub quests: Vec<Quest>,
    pub shop: ShopCatalog,
    pub relics: Vec<Relic>,
}

impl ContentPack {
    /// Load a content pack from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, ContentError> {
        let text = std::fs::read_to_string(path)?;
        let pack: Self = serde_yaml::from_str(&text)?;
        pack.validate()?;
        Ok(pack)
    }

    /// Cross-check the catalogs before use
    pub fn validate(&self) -> Result<(), ContentError> {
        let mut badge_ids = HashSet::new();
        for badge in &self.badges {
            if !badge_ids.insert(badge.id.as_str()) {
                return Err(ContentError::Invalid(format!(
                    "Duplicate badge id: {}",
                    badge.id
                )));
            }
        }

        let mut quest_ids = HashSet::new();
        let relic_ids: HashSet<&str> = self.relics.iter().map(|r| r.id.as_str()).collect();
        for quest in &self.quests {
            if !quest_ids.insert(quest.id.as_str()) {
                return Err(ContentError::Invalid(format!(
                    "Duplicate quest id: {}",
                    quest.id
                )));
            }
            if quest.target == 0 {
                return Err(ContentError::Invalid(format!(
                    "Quest '{}' has a zero target",
                    quest.id
                )));
            }
            if let Some(item) = &quest.reward.item {
                if !relic_ids.contains(item.as_str()) {
                    return Err(ContentError::Invalid(format!(
                        "Quest '{}' rewards unknown relic '{}'",
                        quest.id, item
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn quest(&self, quest_id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == quest_id)
    }

    pub fn badge(&self, badge_id: &str) -> Option<&BadgeRule> {
        self.badges.iter().find(|b| b.id == badge_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin;
    use std::io::Write;

    #[test]
    fn test_builtin_validates() {
        builtin().validate().unwrap();
    }

    #[test]
    fn test_yaml_roundtrip_through_file() {
        let pack = builtin();
        let yaml = serde_yaml::to_string(&pack).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let loaded = ContentPack::from_yaml_file(file.path()).unwrap();
        assert_eq!(loaded, pack);
    }

    #[test]
    fn test_duplicate_quest_id_rejected() {
        let mut pack = builtin();
        let dup = pack.quests[0].clone();
        pack.quests.push(dup);
        assert!(matches!(pack.validate(), Err(ContentError::Invalid(_))));
    }

    #[test]
    fn test_unknown_relic_rejected() {
        let mut pack = builtin();
        pack.quests[0].reward.item = Some("no-such-relic".to_string());
        assert!(matches!(pack.validate(), Err(ContentError::Invalid(_))));
    }

    #[test]
    fn test_shop_lookup() {
        let pack = builtin();
        let item = pack.shop.find(ItemCategory::Outfits, "petal-cape").unwrap();
        assert_eq!(item.cost, 3);
        assert!(pack.shop.find(ItemCategory::Companions, "petal-cape").is_none());
        // Nothing is ever on sale in the relics category
        assert!(pack.shop.category(ItemCategory::Items).is_empty());
    }
}
