use async_trait::async_trait;
use chainbot_commands::Router;
use chainbot_common::service::{Error, Service};
use chainbot_discord::{InteractionsServer, SignatureVerifier};

use crate::core::context::Context;

/// Serves the interactions endpoint of the bot
pub struct InteractionsService {
    context: Context,
}

#[async_trait]
impl Service for InteractionsService {
    type Context = Context;

    const NAME: &'static str = "Interactions";

    async fn new(context: Context) -> Self {
        Self { context }
    }

    async fn run(self) -> Result<(), Error> {
        let verifier = SignatureVerifier::new(&self.context.configuration.discord.public_key)?;
        let router = Router::new(self.context.commands.clone());

        let server = InteractionsServer::new(router, self.context.rest.clone(), verifier);
        let handle = server.start(self.context.configuration.discord.port).await?;

        handle.stopped().await?;

        Err(Error::new("interactions server stopped unexpectedly"))
    }
}
