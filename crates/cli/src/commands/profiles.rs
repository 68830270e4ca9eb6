//! moonlit profiles

use clap::Args;

use crate::context::Context;

#[derive(Debug, Args)]
pub struct ProfilesCommand {}

impl ProfilesCommand {
    pub async fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let active = ctx.client.identity().await.map(|identity| identity.id);
        let profiles = ctx.store.list_profiles().await?;

        if profiles.is_empty() {
            println!("No profiles yet. Run `moonlit login` to create one.");
            return Ok(());
        }

        for profile in profiles {
            let marker = if Some(&profile.id) == active.as_ref() {
                console::style("● ").green().to_string()
            } else {
                "  ".to_string()
            };
            println!(
                "{}{:<16} created {}",
                marker,
                profile.display_name,
                console::style(&profile.created_at).dim()
            );
        }
        Ok(())
    }
}
