//! Wire shapes of the interactions endpoint. Only the fields the bot reads are modelled, every
//! other field of the payload is ignored.

use chainbot_commands::interaction::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub struct InteractionKind;

impl InteractionKind {
    pub const PING: u8 = 1;
    pub const APPLICATION_COMMAND: u8 = 2;
}

pub struct OptionKind;

impl OptionKind {
    pub const SUB_COMMAND: u8 = 1;
    pub const STRING: u8 = 3;
}

pub struct CallbackKind;

impl CallbackKind {
    pub const PONG: u8 = 1;
    pub const CHANNEL_MESSAGE: u8 = 4;
    pub const DEFERRED_CHANNEL_MESSAGE: u8 = 5;
}

/// Message flag restricting visibility to the invoking user
pub const EPHEMERAL: u64 = 1 << 6;

#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: u8,

    pub application_id: String,
    pub token: String,

    #[serde(default)]
    pub data: Option<CommandData>,

    #[serde(default)]
    pub guild_id: Option<String>,

    /// Present for invocations issued from a guild
    #[serde(default)]
    pub member: Option<GuildMember>,

    /// Present for invocations issued from a direct message
    #[serde(default)]
    pub user: Option<DiscordUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    pub name: String,

    #[serde(default)]
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,

    #[serde(rename = "type")]
    pub kind: u8,

    #[serde(default)]
    pub value: Option<Value>,

    #[serde(default)]
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuildMember {
    pub user: DiscordUser,

    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,

    #[serde(default)]
    pub discriminator: Option<String>,
}

impl DiscordUser {
    /// `name#1234` for legacy accounts, the bare username otherwise
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(discriminator) if discriminator != "0" => format!("{}#{}", self.username, discriminator),
            _ => self.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseData {
    #[serde(flatten)]
    pub message: Message,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: CallbackKind::PONG,
            data: None,
        }
    }

    pub fn message(message: Message) -> Self {
        let flags = message.ephemeral.then_some(EPHEMERAL);

        Self {
            kind: CallbackKind::CHANNEL_MESSAGE,
            data: Some(ResponseData { message, flags }),
        }
    }

    pub fn deferred(ephemeral: bool) -> Self {
        Self {
            kind: CallbackKind::DEFERRED_CHANNEL_MESSAGE,
            data: ephemeral.then(|| ResponseData {
                message: Message::default(),
                flags: Some(EPHEMERAL),
            }),
        }
    }
}
