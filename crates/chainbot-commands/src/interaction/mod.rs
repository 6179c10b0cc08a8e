use std::sync::atomic::{AtomicU8, Ordering};

use async_trait::async_trait;
use thiserror::Error;

mod message;
pub use message::{Embed, EmbedField, EmbedFooter, Message};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("interaction already responded")]
    AlreadyResponded,

    #[error("interaction was not deferred")]
    NotDeferred,

    #[error("transport error {0}")]
    Transport(String),
}

/// Identity of the user behind an invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,

    /// Display handle, used in logs only
    pub tag: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    Pending,
    Replied,
    Deferred,

    /// The initial response could not be delivered. Nothing more can reach the user.
    Failed,
}

/// Enforces the response protocol of an invocation: either one immediate reply, or a deferral
/// followed by any number of edits.
#[derive(Debug)]
pub struct ResponseTracker {
    state: AtomicU8,
}

impl Default for ResponseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseTracker {
    const PENDING: u8 = 0;
    const REPLIED: u8 = 1;
    const DEFERRED: u8 = 2;
    const FAILED: u8 = 3;

    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(Self::PENDING),
        }
    }

    pub fn state(&self) -> ResponseState {
        match self.state.load(Ordering::SeqCst) {
            Self::REPLIED => ResponseState::Replied,
            Self::DEFERRED => ResponseState::Deferred,
            Self::FAILED => ResponseState::Failed,
            _ => ResponseState::Pending,
        }
    }

    /// Claims the single response slot for an immediate reply
    pub fn begin_reply(&self) -> Result<(), Error> {
        self.transition(Self::REPLIED)
    }

    /// Claims the single response slot for a deferral
    pub fn begin_defer(&self) -> Result<(), Error> {
        self.transition(Self::DEFERRED)
    }

    /// Marks the invocation as unreachable, whatever its current state
    pub fn fail(&self) {
        self.state.store(Self::FAILED, Ordering::SeqCst);
    }

    /// Checks that the placeholder of a deferral can be edited
    pub fn check_edit(&self) -> Result<(), Error> {
        match self.state() {
            ResponseState::Deferred => Ok(()),
            _ => Err(Error::NotDeferred),
        }
    }

    fn transition(&self, target: u8) -> Result<(), Error> {
        self.state
            .compare_exchange(Self::PENDING, target, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| ())
            .map_err(|_| Error::AlreadyResponded)
    }
}

/// One inbound command request. Implementations must follow the [`ResponseTracker`] protocol.
#[async_trait]
pub trait Invocation: Send + Sync {
    fn command_name(&self) -> &str;

    fn subcommand_name(&self) -> Option<&str>;

    /// Value of the string option `name`, if supplied
    fn get_string(&self, name: &str) -> Option<String>;

    fn user(&self) -> &User;

    /// Guild the invocation was issued from, absent in direct messages
    fn guild_id(&self) -> Option<&str>;

    /// Roles the acting user holds in the guild, absent in direct messages
    fn member_roles(&self) -> Option<&[String]>;

    fn state(&self) -> ResponseState;

    async fn reply(&self, message: Message) -> Result<(), Error>;

    async fn defer_reply(&self, ephemeral: bool) -> Result<(), Error>;

    async fn edit_reply(&self, message: Message) -> Result<(), Error>;
}

/// Guild membership operations of the chat platform
#[async_trait]
pub trait Members: 'static + Send + Sync {
    async fn add_role(&self, guild_id: &str, user_id: &str, role_id: &str) -> Result<(), Error>;
}
