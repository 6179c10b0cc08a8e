use chainbot_discord::commands::definitions;
use chainbot_discord::RestClient;
use clap::Args;
use log::info;

use crate::core::{registry, Error};

#[derive(Args, Clone)]
pub struct RegisterParameters {
    /// Bot token
    #[clap(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Application id
    #[clap(long, env = "DISCORD_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Print the command schema instead of uploading it
    #[clap(long)]
    pub dry_run: bool,
}

pub async fn command_register(params: RegisterParameters) -> Result<(), Error> {
    let commands = definitions(&registry()?);

    if params.dry_run {
        let schema = serde_json::to_string_pretty(&commands).map_err(|e| Error::Execution(e.to_string()))?;
        println!("{}", schema);
        return Ok(());
    }

    let token = params.token.filter(|x| !x.is_empty()).ok_or(Error::Validation("missing DISCORD_TOKEN".to_string()))?;
    let client_id = params
        .client_id
        .filter(|x| !x.is_empty())
        .ok_or(Error::Validation("missing DISCORD_CLIENT_ID".to_string()))?;

    info!("📤 Deploying {} slash command(s)...", commands.len());

    let rest = RestClient::new(&token, &client_id)?;
    let registered = rest.register_commands(&commands).await?;

    info!("✅ Successfully registered {} command(s):", registered.len());
    for command in registered {
        info!("   • /{}", command.name);
    }

    Ok(())
}
