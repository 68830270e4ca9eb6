//! moonlit quest

use clap::{Args, Subcommand};
use moonlit_domain::{quest_status, NotableEvent};

use crate::context::Context;

#[derive(Debug, Args)]
pub struct QuestCommand {
    #[command(subcommand)]
    pub command: Option<QuestSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum QuestSubcommand {
    /// Claim a finished quest's reward
    Claim {
        /// Quest id, as shown by `moonlit quest`
        quest_id: String,
    },
}

impl QuestCommand {
    pub async fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        match &self.command {
            Some(QuestSubcommand::Claim { quest_id }) => self.claim(ctx, quest_id).await,
            None => self.list(ctx).await,
        }
    }

    async fn list(&self, ctx: &Context) -> anyhow::Result<()> {
        ctx.require_identity().await?;
        let state = ctx.client.snapshot().await;

        for quest in &ctx.client.content().quests {
            let status = quest_status(quest, &state);
            let marker = if state.claimed_quests.contains(&quest.id) {
                console::style("✓ claimed".to_string()).dim()
            } else if status.done {
                console::style("! ready".to_string()).green().bold()
            } else {
                console::style(format!("{}/{}", status.current, status.total)).yellow()
            };
            println!(
                "  {:<18} {:<24} {}",
                quest.id,
                quest.title,
                marker
            );
            println!("      {}", console::style(&quest.description).dim());
        }
        Ok(())
    }

    async fn claim(&self, ctx: &Context, quest_id: &str) -> anyhow::Result<()> {
        ctx.require_identity().await?;
        let notable = ctx.client.claim_quest(quest_id).await?;

        let quest = ctx
            .client
            .content()
            .quest(quest_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown quest '{}'", quest_id))?;
        println!(
            "{} +{} stars, +{} gems, +{} xp",
            console::style(format!("Claimed: {}", quest.title)).green().bold(),
            quest.reward.stars,
            quest.reward.gems,
            quest.reward.xp
        );
        if let Some(item) = &quest.reward.item {
            println!("  Relic earned: {}", item);
        }
        for item in &notable {
            if let NotableEvent::LevelUp { level, .. } = item {
                println!("  Level up! Now level {}", level);
            }
        }
        Ok(())
    }
}
