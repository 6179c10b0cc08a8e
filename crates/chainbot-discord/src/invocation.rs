use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chainbot_commands::interaction::{self, Invocation, Message, ResponseState, ResponseTracker, User};
use tokio::sync::{oneshot, Mutex};

use crate::payload::{CommandOption, Interaction, InteractionResponse, OptionKind};
use crate::{Error, RestClient};

/// First response of an interaction, to be written as the HTTP response of the interaction
/// request. `written` must fire once the body went out; dropping it marks the response as lost.
#[derive(Debug)]
pub struct InitialResponse {
    pub response: InteractionResponse,
    pub written: oneshot::Sender<()>,
}

/// Application command received on the interactions endpoint.
///
/// The first reply or deferral travels back as the HTTP response of the interaction request,
/// through the channel handed out by [`DiscordInvocation::new`]. Edits go through the REST API,
/// and only once that response was written: the platform knows no placeholder before.
pub struct DiscordInvocation {
    command: String,
    subcommand: Option<String>,
    options: Vec<CommandOption>,

    user: User,
    guild_id: Option<String>,
    roles: Option<Vec<String>>,

    application_id: String,
    token: String,

    tracker: ResponseTracker,
    initial: Mutex<Option<oneshot::Sender<InitialResponse>>>,
    written: Mutex<Option<oneshot::Receiver<()>>>,
    rest: Arc<RestClient>,
}

impl DiscordInvocation {
    /// Longest wait for the initial response to be written before an edit
    pub const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(interaction: Interaction, rest: Arc<RestClient>) -> Result<(Self, oneshot::Receiver<InitialResponse>), Error> {
        let data = interaction
            .data
            .ok_or_else(|| Error::Payload("missing command data".to_string()))?;

        let discord_user = interaction
            .member
            .as_ref()
            .map(|x| &x.user)
            .or(interaction.user.as_ref())
            .ok_or_else(|| Error::Payload("missing user".to_string()))?;

        let user = User {
            id: discord_user.id.clone(),
            tag: discord_user.tag(),
        };

        let (subcommand, options) = match data.options.iter().find(|x| x.kind == OptionKind::SUB_COMMAND) {
            Some(subcommand) => (Some(subcommand.name.clone()), subcommand.options.clone()),
            None => (None, data.options.clone()),
        };

        let (sender, receiver) = oneshot::channel();

        let invocation = Self {
            command: data.name,
            subcommand,
            options,
            user,
            guild_id: interaction.guild_id,
            roles: interaction.member.map(|x| x.roles),
            application_id: interaction.application_id,
            token: interaction.token,
            tracker: ResponseTracker::new(),
            initial: Mutex::new(Some(sender)),
            written: Mutex::new(None),
            rest,
        };

        Ok((invocation, receiver))
    }

    async fn respond(&self, response: InteractionResponse) -> Result<(), interaction::Error> {
        let sender = self
            .initial
            .lock()
            .await
            .take()
            .ok_or(interaction::Error::AlreadyResponded)?;

        let (written, receiver) = oneshot::channel();
        *self.written.lock().await = Some(receiver);

        if sender.send(InitialResponse { response, written }).is_err() {
            self.tracker.fail();
            return Err(interaction::Error::Transport("interaction request is gone".to_string()));
        }

        Ok(())
    }

    /// Waits until the initial response went out, so the placeholder exists on the platform
    async fn initial_written(&self) -> Result<(), interaction::Error> {
        let mut written = self.written.lock().await;
        let Some(receiver) = written.take() else {
            return Ok(());
        };

        match tokio::time::timeout(Self::WRITE_TIMEOUT, receiver).await {
            Ok(Ok(())) => Ok(()),
            _ => {
                self.tracker.fail();
                Err(interaction::Error::Transport("initial response was not delivered".to_string()))
            },
        }
    }
}

#[async_trait]
impl Invocation for DiscordInvocation {
    fn command_name(&self) -> &str {
        &self.command
    }

    fn subcommand_name(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    fn get_string(&self, name: &str) -> Option<String> {
        self.options
            .iter()
            .find(|x| x.name == name && x.kind == OptionKind::STRING)
            .and_then(|x| x.value.as_ref())
            .and_then(|x| x.as_str())
            .map(str::to_string)
    }

    fn user(&self) -> &User {
        &self.user
    }

    fn guild_id(&self) -> Option<&str> {
        self.guild_id.as_deref()
    }

    fn member_roles(&self) -> Option<&[String]> {
        self.roles.as_deref()
    }

    fn state(&self) -> ResponseState {
        self.tracker.state()
    }

    async fn reply(&self, message: Message) -> Result<(), interaction::Error> {
        self.tracker.begin_reply()?;
        self.respond(InteractionResponse::message(message)).await
    }

    async fn defer_reply(&self, ephemeral: bool) -> Result<(), interaction::Error> {
        self.tracker.begin_defer()?;
        self.respond(InteractionResponse::deferred(ephemeral)).await
    }

    async fn edit_reply(&self, message: Message) -> Result<(), interaction::Error> {
        self.tracker.check_edit()?;
        self.initial_written().await?;
        Ok(self.rest.edit_original(&self.application_id, &self.token, &message).await?)
    }
}
