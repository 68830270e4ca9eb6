//! moonlit login / logout

use clap::Args;
use dialoguer::Input;
use moonlit_domain::model::profile::AvatarConfig;
use shared::config::SessionCache;

use crate::context::Context;

#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Display name; prompts when omitted
    #[arg(short, long)]
    pub name: Option<String>,
}

impl LoginCommand {
    pub async fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let name = match &self.name {
            Some(name) => name.clone(),
            None => Input::new()
                .with_prompt("Adventurer name")
                .interact_text()?,
        };

        let identity = ctx
            .client
            .login(name.trim(), &AvatarConfig::default())
            .await?;
        SessionCache {
            profile_id: identity.id.as_str().to_string(),
        }
        .save(&ctx.paths.session_path())?;

        let state = ctx.client.snapshot().await;
        println!(
            "Signed in as {} (Level {}, {} stars, {} gems)",
            console::style(&identity.display_name).cyan().bold(),
            state.level,
            state.stars,
            state.gems
        );
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        SessionCache::clear(&ctx.paths.session_path());
        println!("Session cleared");
        Ok(())
    }
}
