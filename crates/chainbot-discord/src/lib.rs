use thiserror::Error;

pub mod commands;
pub mod payload;

mod invocation;
pub use invocation::DiscordInvocation;

mod rest;
pub use rest::{RegisteredCommand, RestClient};

mod signature;
pub use signature::SignatureVerifier;

mod server;
pub use server::{InteractionsServer, ServerHandle};

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid public key {0}")]
    InvalidPublicKey(String),

    #[error("invalid request signature")]
    InvalidSignature,

    #[error("malformed interaction {0}")]
    Payload(String),

    #[error("discord API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("transport error {0}")]
    Transport(String),

    #[error("server error {0}")]
    Server(String),
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<Error> for chainbot_commands::interaction::Error {
    fn from(value: Error) -> Self {
        Self::Transport(value.to_string())
    }
}

impl From<Error> for chainbot_common::service::Error {
    fn from(value: Error) -> Self {
        Self::from(value)
    }
}
