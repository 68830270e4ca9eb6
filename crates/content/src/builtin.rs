//! The builtin content pack
//!
//! Rule order in `badges` doubles as notification priority: the first
//! rule a merge newly satisfies is the one the player is told about.

use moonlit_domain::model::catalog::{BadgeRule, Quest, QuestReward, Relic, ShopItem};
use moonlit_domain::model::state::Metric;

use crate::loader::{ContentPack, ShopCatalog};

fn badge(id: &str, name: &str, metric: Metric, threshold: u32, requirement: &str) -> BadgeRule {
    BadgeRule {
        id: id.to_string(),
        name: name.to_string(),
        metric,
        threshold,
        requirement: requirement.to_string(),
    }
}

fn quest(
    id: &str,
    title: &str,
    description: &str,
    metric: Metric,
    target: u32,
    reward: QuestReward,
) -> Quest {
    Quest {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        metric,
        target,
        reward,
    }
}

fn reward(stars: u32, gems: u32, xp: u32, item: &str) -> QuestReward {
    QuestReward {
        stars,
        gems,
        xp,
        item: Some(item.to_string()),
    }
}

fn item(id: &str, name: &str, cost: u32) -> ShopItem {
    ShopItem {
        id: id.to_string(),
        name: name.to_string(),
        cost,
    }
}

fn relic(id: &str, name: &str, description: &str) -> Relic {
    Relic {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
    }
}

/// The shipped catalogs
pub fn builtin() -> ContentPack {
    ContentPack {
        badges: vec![
            badge("story-spark", "Story Spark", Metric::StoryWins, 3, "Finish 3 reading stories."),
            badge("grammar-glow", "Grammar Glow", Metric::GrammarCorrect, 8, "Get 8 grammar answers correct."),
            badge("math-meteor", "Math Meteor", Metric::MathCorrect, 10, "Solve 10 math problems."),
            badge("writer-wings", "Writer Wings", Metric::WritingDone, 3, "Complete 3 writing prompts."),
            badge("streak-star", "Streak Star", Metric::BestStreak, 5, "Earn a 5-question streak."),
            badge("moon-master", "Moon Master", Metric::Stars, 50, "Earn 50 stars total."),
            badge("battle-bright", "Battle Bright", Metric::BattleWins, 2, "Win 2 spell battles."),
            badge("word-wizard", "Word Wizard", Metric::WordForgeWins, 3, "Complete 3 Word Forge puzzles."),
            badge("pattern-pro", "Pattern Pro", Metric::PatternWins, 3, "Complete 3 Pattern Path rounds."),
            badge("level-leader", "Level Leader", Metric::Level, 5, "Reach level 5."),
        ],
        quests: vec![
            quest(
                "lantern-patrol",
                "Lantern Patrol",
                "Complete 2 reading stories in Moon Meadow.",
                Metric::StoryWins,
                2,
                reward(6, 1, 35, "lantern-badge"),
            ),
            quest(
                "grammar-parade",
                "Grammar Parade",
                "Answer 6 grammar questions correctly.",
                Metric::GrammarCorrect,
                6,
                reward(5, 1, 30, "parade-ticket"),
            ),
            quest(
                "math-bridges",
                "Moon Bridges",
                "Solve 6 math problems correctly.",
                Metric::MathCorrect,
                6,
                reward(5, 1, 30, "bridge-charm"),
            ),
            quest(
                "word-forge",
                "Word Forge Sparks",
                "Complete 2 Word Forge puzzles.",
                Metric::WordForgeWins,
                2,
                reward(6, 2, 35, "spark-scroll"),
            ),
            quest(
                "pattern-path",
                "Pattern Path",
                "Complete 2 Pattern Path rounds.",
                Metric::PatternWins,
                2,
                reward(6, 2, 35, "pattern-stone"),
            ),
            quest(
                "spell-battle",
                "Spell Battle Win",
                "Win 1 Spell Battle.",
                Metric::BattleWins,
                1,
                reward(8, 2, 45, "duel-medal"),
            ),
            quest(
                "adventure-journal",
                "Adventure Journal",
                "Complete 1 Story Adventure.",
                Metric::AdventureWins,
                1,
                reward(6, 2, 35, "journal-pin"),
            ),
        ],
        shop: ShopCatalog {
            outfits: vec![
                item("petal-cape", "Petal Cape", 3),
                item("starlight-hoodie", "Starlight Hoodie", 4),
                item("rainbow-skirt", "Rainbow Skirt", 5),
                item("moon-gown", "Moon Gown", 6),
            ],
            accessories: vec![
                item("glow-tiara", "Glow Tiara", 2),
                item("leaf-crown", "Leaf Crown", 2),
                item("sparkle-wand", "Sparkle Wand", 4),
                item("star-bag", "Star Bag", 3),
            ],
            companions: vec![
                item("fox", "Star Fox", 4),
                item("owl", "Moon Owl", 4),
                item("bunny", "Garden Bunny", 3),
                item("cat", "Luna Cat", 5),
            ],
        },
        relics: vec![
            relic("lantern-badge", "Lantern Badge", "A glowing badge from Moon Meadow."),
            relic("parade-ticket", "Parade Ticket", "Entry pass to the Crystal Harbor parade."),
            relic("bridge-charm", "Bridge Charm", "A charm that sparkles when you solve math."),
            relic("spark-scroll", "Spark Scroll", "A scroll that reminds you of perfect sentences."),
            relic("pattern-stone", "Pattern Stone", "A stone carved with secret sequences."),
            relic("duel-medal", "Duel Medal", "Awarded after a brave spell battle."),
            relic("journal-pin", "Journal Pin", "A pin earned by completing a story adventure."),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_table_shape() {
        let pack = builtin();
        assert_eq!(pack.badges.len(), 10);
        // Table order drives notifications; story-spark comes first
        assert_eq!(pack.badges[0].id, "story-spark");
        assert_eq!(pack.badges[0].threshold, 3);
        assert_eq!(pack.badges[5].metric, Metric::Stars);
    }

    #[test]
    fn test_every_quest_relic_exists() {
        let pack = builtin();
        for quest in &pack.quests {
            let relic_id = quest.reward.item.as_deref().unwrap();
            assert!(
                pack.relics.iter().any(|r| r.id == relic_id),
                "quest {} rewards unknown relic {}",
                quest.id,
                relic_id
            );
        }
    }

    #[test]
    fn test_shop_sizes() {
        let pack = builtin();
        assert_eq!(pack.shop.outfits.len(), 4);
        assert_eq!(pack.shop.accessories.len(), 4);
        assert_eq!(pack.shop.companions.len(), 4);
    }
}
