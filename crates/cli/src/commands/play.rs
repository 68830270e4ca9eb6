//! moonlit play
//!
//! Each round is scored client-side and folded into the profile as one
//! reward event. `daily` resolves today's rotation slot and adds the
//! bonus gem on top of the normal payout.

use clap::{Args, ValueEnum};
use content::daily_challenge;
use moonlit_domain::model::event::{ActivityKind, RewardEvent, StreakUpdate};
use moonlit_domain::NotableEvent;
use shared::DateKey;

use crate::context::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Activity {
    Story,
    Grammar,
    Math,
    Writing,
    Battle,
    WordForge,
    Pattern,
    Adventure,
    Dungeon,
    /// Today's rotation pick, with the bonus gem
    Daily,
}

#[derive(Debug, Args)]
pub struct PlayCommand {
    #[arg(value_enum)]
    pub activity: Activity,
}

impl PlayCommand {
    pub async fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        ctx.require_identity().await?;

        if !ctx.client.can_start_activity().await {
            anyhow::bail!("Out of energy. Rest with `moonlit rest`, or come back tomorrow.");
        }

        let today = DateKey::today();
        let (kind, bonus) = match self.activity {
            Activity::Story => (ActivityKind::Story, false),
            Activity::Grammar => (ActivityKind::Grammar, false),
            Activity::Math => (ActivityKind::Math, false),
            Activity::Writing => (ActivityKind::Writing, false),
            Activity::Battle => (ActivityKind::Battle, false),
            Activity::WordForge => (ActivityKind::WordForge, false),
            Activity::Pattern => (ActivityKind::Pattern, false),
            Activity::Adventure => (ActivityKind::Adventure, false),
            Activity::Dungeon => (ActivityKind::Dungeon, false),
            Activity::Daily => (daily_challenge(&today), true),
        };

        let event = if bonus {
            println!("Today's challenge: {}", console::style(kind).magenta());
            daily_round_event(kind)
        } else {
            round_event(kind)
        };

        let stars = event.stars;
        let xp = event.xp;
        let notable = ctx.client.record_at(event, &today).await;

        println!(
            "{} +{} stars, +{} xp",
            console::style("Round complete!").green().bold(),
            stars,
            xp
        );
        for item in &notable {
            match item {
                NotableEvent::LevelUp {
                    level,
                    gems_awarded,
                } => {
                    println!(
                        "  {} Level {} (+{} gems)",
                        console::style("⬆").yellow(),
                        level,
                        gems_awarded
                    );
                }
                NotableEvent::BadgeUnlocked { name, .. } => {
                    println!("  {} Badge earned: {}", console::style("★").yellow(), name);
                }
            }
        }

        let state = ctx.client.snapshot().await;
        println!("  Energy left: {}", state.energy);
        Ok(())
    }
}

/// Fixed per-activity payout for a completed round
fn round_event(kind: ActivityKind) -> RewardEvent {
    let base = RewardEvent::new(kind).with_completions(1).with_energy_cost(1);
    match kind {
        ActivityKind::Story => base
            .with_stars(5)
            .with_xp(20)
            .with_log("Finished a story in Moon Meadow"),
        ActivityKind::Grammar => base
            .with_stars(3)
            .with_xp(12)
            .with_completions(4)
            .with_streak(StreakUpdate::Adjust(4)),
        ActivityKind::Math => base
            .with_stars(3)
            .with_xp(12)
            .with_completions(4)
            .with_streak(StreakUpdate::Adjust(4)),
        ActivityKind::Writing => base.with_stars(4).with_gems(1).with_xp(18),
        ActivityKind::Battle => base
            .with_stars(6)
            .with_gems(1)
            .with_xp(24)
            .with_log("Won a spell battle"),
        ActivityKind::WordForge => base.with_stars(4).with_xp(16),
        ActivityKind::Pattern => base.with_stars(4).with_xp(16),
        ActivityKind::Adventure => base
            .with_stars(5)
            .with_gems(1)
            .with_xp(22)
            .with_log("Cleared an adventure"),
        ActivityKind::Dungeon => base
            .with_stars(8)
            .with_gems(2)
            .with_xp(40)
            .with_energy_cost(2)
            .with_dungeon_clear("moonlit-caverns")
            .with_log("Cleared the Moonlit Caverns"),
        // Not reachable from the activity picker
        ActivityKind::Quest | ActivityKind::System => base,
    }
}

/// The daily-challenge variant of a round: one bonus gem on top of the
/// normal payout, flagged so the aggregator gates it per day
fn daily_round_event(kind: ActivityKind) -> RewardEvent {
    let event = round_event(kind);
    let gems = event.gems + 1;
    event.with_gems(gems).with_daily_bonus(true)
}
