//! moonlit rest

use clap::Args;

use crate::context::Context;

#[derive(Debug, Args)]
pub struct RestCommand {}

impl RestCommand {
    pub async fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        ctx.require_identity().await?;
        let restored = ctx.client.rest().await?;
        let state = ctx.client.snapshot().await;
        println!(
            "Rested by the campfire: +{} energy ({} total), {} gems left",
            restored, state.energy, state.gems
        );
        Ok(())
    }
}
