//! moonlit status

use clap::Args;
use moonlit_domain::{level_threshold, ENERGY_MAX};

use crate::context::Context;

#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let identity = ctx.require_identity().await?;
        let state = ctx.client.snapshot().await;
        let content = ctx.client.content();

        println!(
            "{} {}",
            console::style(&identity.display_name).cyan().bold(),
            console::style(format!("(with {})", identity.avatar.companion_label)).dim()
        );
        println!(
            "  Level {}  {} / {} xp",
            state.level,
            state.xp,
            level_threshold(state.level)
        );

        let full = state.energy.min(ENERGY_MAX) as usize;
        let energy = format!(
            "{}{}",
            "●".repeat(full),
            "○".repeat(ENERGY_MAX as usize - full)
        );
        println!(
            "  Energy {}  Stars {}  Gems {}",
            console::style(energy).yellow(),
            state.stars,
            state.gems
        );
        println!("  Streak {} (best {})", state.streak, state.best_streak);

        if !state.badges.is_empty() {
            // Table order, not alphabetical
            let names: Vec<&str> = content
                .badges
                .iter()
                .filter(|rule| state.badges.contains(&rule.id))
                .map(|rule| rule.name.as_str())
                .collect();
            println!("  Badges: {}", names.join(", "));
        }

        if !state.recent_rewards.is_empty() {
            println!("  Recent:");
            for line in &state.recent_rewards {
                println!("    {}", line);
            }
        }
        Ok(())
    }
}
