use std::time::Duration;

use async_trait::async_trait;
use chainbot_common::measure_duration;
use chainbot_evm::math::group_thousands;
use chainbot_evm::NetworkDescriptor;

use crate::handler::{failure, reject, HandlerUnit};
use crate::interaction::{Embed, Invocation, Message};
use crate::{Context, Error};

/// `/testnet faucet`: where to get test currency for a testnet
pub struct TestnetFaucet;

#[async_trait]
impl HandlerUnit for TestnetFaucet {
    async fn execute(&self, context: &Context, invocation: &dyn Invocation) -> Result<(), Error> {
        let key = invocation.get_string("network").unwrap_or_default();

        let Some(network) = context.registry().lookup(&key).filter(|x| x.testnet) else {
            return reject(invocation, "❌ That's not a valid testnet. Pick one from the list.").await;
        };

        let Some(faucet) = network.faucet_url.as_deref() else {
            return reject(invocation, format!("⚠️ No faucet URL configured for **{}**. Ask a server admin to add one.", network.name)).await;
        };

        let embed = Embed::new(format!("🚰 Faucet — {}", network.name))
            .color(0xff9800)
            .description(format!("Click the link below to request free **{}** on {}.", network.native_ticker(), network.name))
            .field("Faucet Link", faucet, false)
            .field("Chain ID", format!("`{}`", network.chain_id), true)
            .field("Explorer", network.explorer_url.as_deref().unwrap_or("N/A"), true)
            .footer("Faucets may have rate limits or require account verification.");

        invocation.reply(Message::embed(embed).ephemeral()).await?;
        Ok(())
    }
}

/// `/testnet status`: liveness and latency of a testnet endpoint
pub struct TestnetStatus;

impl TestnetStatus {
    /// Latency above which an endpoint is reported as degraded
    pub const HEALTHY_LATENCY: Duration = Duration::from_millis(3000);

    async fn render(context: &Context, network: &NetworkDescriptor) -> Result<Message, chainbot_evm::Error> {
        let reader = context.chain.acquire(&network.key)?;

        let (block_number, latency) = measure_duration!(reader.block_number().await);
        let block_number = block_number?;

        let healthy = latency < Self::HEALTHY_LATENCY;

        let embed = Embed::new(format!("{} {} — Status", if healthy { "🟢" } else { "🟡" }, network.name))
            .color(if healthy { 0x00c853 } else { 0xff9800 })
            .field("Status", if healthy { "Healthy ✅" } else { "Slow / Degraded ⚠️" }, true)
            .field("Latency", format!("{} ms", latency.as_millis()), true)
            .field("Latest Block", format!("#{}", group_thousands(&block_number.to_string())), true)
            .field("Chain ID", format!("`{}`", network.chain_id), true)
            .field("Explorer", network.explorer_url.as_deref().unwrap_or("N/A"), true);

        Ok(Message::embed(embed))
    }
}

#[async_trait]
impl HandlerUnit for TestnetStatus {
    async fn execute(&self, context: &Context, invocation: &dyn Invocation) -> Result<(), Error> {
        let key = invocation.get_string("network").unwrap_or_default();

        let Some(network) = context.registry().lookup(&key).filter(|x| x.testnet) else {
            return reject(invocation, "❌ Not a valid testnet key.").await;
        };

        invocation.defer_reply(true).await?;

        let message = Self::render(context, network)
            .await
            .unwrap_or_else(|e| failure(context, &network.key, &format!("🔴 **{} is unreachable.**", network.name), &e));

        invocation.edit_reply(message).await?;
        Ok(())
    }
}
