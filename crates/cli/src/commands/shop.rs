//! moonlit shop

use clap::{Args, Subcommand};
use moonlit_domain::ItemCategory;

use crate::context::Context;

#[derive(Debug, Args)]
pub struct ShopCommand {
    #[command(subcommand)]
    pub command: Option<ShopSubcommand>,
}

#[derive(Debug, Subcommand)]
pub enum ShopSubcommand {
    /// Buy an item into a category
    Buy {
        /// outfits, accessories, or companions
        category: ItemCategory,
        /// Item id, as shown by `moonlit shop`
        item_id: String,
    },
}

impl ShopCommand {
    pub async fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        match &self.command {
            Some(ShopSubcommand::Buy { category, item_id }) => {
                self.buy(ctx, *category, item_id).await
            }
            None => self.list(ctx).await,
        }
    }

    async fn list(&self, ctx: &Context) -> anyhow::Result<()> {
        ctx.require_identity().await?;
        let state = ctx.client.snapshot().await;
        let shop = &ctx.client.content().shop;

        println!("Gems: {}", console::style(state.gems).cyan());
        for category in [
            ItemCategory::Outfits,
            ItemCategory::Accessories,
            ItemCategory::Companions,
        ] {
            println!("{}", console::style(category).bold());
            for item in shop.category(category) {
                let owned = state.inventory.owns(category, &item.id);
                let price = if owned {
                    console::style("owned".to_string()).dim()
                } else {
                    console::style(format!("{} gems", item.cost)).cyan()
                };
                println!("  {:<16} {:<18} {}", item.id, item.name, price);
            }
        }
        Ok(())
    }

    async fn buy(
        &self,
        ctx: &Context,
        category: ItemCategory,
        item_id: &str,
    ) -> anyhow::Result<()> {
        ctx.require_identity().await?;
        let remaining = ctx.client.purchase(category, item_id).await?;
        println!(
            "{} {} gems left",
            console::style(format!("Bought {}!", item_id)).green().bold(),
            remaining
        );
        Ok(())
    }
}
