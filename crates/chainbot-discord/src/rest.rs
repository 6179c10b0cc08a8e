use std::time::Duration;

use async_trait::async_trait;
use chainbot_commands::interaction::{self, Members, Message};
use chainbot_common::{measure_duration, metric};
use reqwest::header::AUTHORIZATION;
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::commands::CommandDefinition;
use crate::Error;

/// Command as acknowledged by the registration endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisteredCommand {
    pub id: String,
    pub name: String,
}

/// Client of the REST API, authenticated as the bot
#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,

    base_url: String,
    token: String,
    application_id: String,
}

impl RestClient {
    pub const API_URL: &'static str = "https://discord.com/api/v10";
    pub const TIMEOUT: Duration = Duration::from_secs(10);

    pub const EDIT_ATTEMPTS: u32 = 3;
    pub const EDIT_RETRY_DELAY: Duration = Duration::from_millis(250);

    pub fn new(token: &str, application_id: &str) -> Result<Self, Error> {
        Self::with_base_url(Self::API_URL, token, application_id)
    }

    pub fn with_base_url(base_url: &str, token: &str, application_id: &str) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(Self::TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            application_id: application_id.to_string(),
        })
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    /// Replaces the placeholder left by a deferred interaction response. The placeholder may not
    /// be known yet right after the initial response went out, so an unknown message is retried
    /// a few times.
    #[instrument(name = "edit_original", skip_all)]
    pub async fn edit_original(&self, application_id: &str, interaction_token: &str, message: &Message) -> Result<(), Error> {
        let url = format!("{}/webhooks/{}/{}/messages/@original", self.base_url, application_id, interaction_token);

        let mut attempt = 1;
        loop {
            match self.send("edit_original", self.client.patch(&url).json(message)).await {
                Err(Error::Api { status: 404, .. }) if attempt < Self::EDIT_ATTEMPTS => {
                    warn!(attempt, "original message not found yet");
                    tokio::time::sleep(Self::EDIT_RETRY_DELAY).await;
                    attempt += 1;
                },
                result => return result.map(|_| ()),
            }
        }
    }

    #[instrument(name = "assign_role", skip(self))]
    pub async fn assign_role(&self, guild_id: &str, user_id: &str, role_id: &str) -> Result<(), Error> {
        let url = format!("{}/guilds/{}/members/{}/roles/{}", self.base_url, guild_id, user_id, role_id);

        self.send("assign_role", self.client.put(url)).await?;
        Ok(())
    }

    /// Overwrites every global command of the application
    #[instrument(name = "register_commands", skip_all)]
    pub async fn register_commands(&self, commands: &[CommandDefinition]) -> Result<Vec<RegisteredCommand>, Error> {
        let url = format!("{}/applications/{}/commands", self.base_url, self.application_id);

        let response = self.send("register_commands", self.client.put(url).json(commands)).await?;

        Ok(response.json().await?)
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> Result<Response, Error> {
        metric!(counter[discord_api] = 1, operation = operation);

        let (response, duration) = measure_duration!(request.header(AUTHORIZATION, format!("Bot {}", self.token)).send().await);
        metric!(histogram[discord_api_duration_milliseconds] = duration.as_millis(), operation = operation);

        let result = match response {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => Err(Error::Api {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
            Err(e) => Err(Error::from(e)),
        };

        metric!(on error result => counter[discord_api_error] = 1, operation = operation);
        result
    }
}

#[async_trait]
impl Members for RestClient {
    async fn add_role(&self, guild_id: &str, user_id: &str, role_id: &str) -> Result<(), interaction::Error> {
        Ok(self.assign_role(guild_id, user_id, role_id).await?)
    }
}
