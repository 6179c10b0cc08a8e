use async_trait::async_trait;
use chainbot_common::measure_duration;
use chainbot_evm::math::group_thousands;
use chainbot_evm::NetworkDescriptor;
use tracing::instrument;

use crate::handler::{failure, reject, HandlerUnit, UNKNOWN_NETWORK};
use crate::interaction::{Embed, Invocation, Message};
use crate::{Context, Error};

/// `/rpc status`: endpoint health report for operators
pub struct RpcStatus;

impl RpcStatus {
    #[instrument(name = "rpc_status", skip_all, fields(network = %network.key))]
    async fn render(context: &Context, network: &NetworkDescriptor) -> Result<Message, chainbot_evm::Error> {
        let reader = context.chain.acquire(&network.key)?;

        let (result, latency) = measure_duration!(tokio::try_join!(reader.block_number(), reader.chain_id()));
        let (block_number, chain_id) = result?;

        let embed = Embed::new(format!("🛠️ RPC Health — {}", network.name))
            .color(0x7c4dff)
            .field("Status", "🟢 Reachable", true)
            .field("Latency", format!("{} ms", latency.as_millis()), true)
            .field("Latest Block", format!("#{}", group_thousands(&block_number.to_string())), true)
            .field("Chain ID (reported)", format!("`{}`", chain_id), true)
            .field("Chain ID (expected)", format!("`{}`", network.chain_id), true)
            .field("Chain ID Match", if chain_id == network.chain_id { "✅ Yes" } else { "❌ Mismatch!" }, true)
            .field("RPC URL", format!("`{}`", network.rpc_endpoint.as_deref().unwrap_or_default()), false);

        Ok(Message::embed(embed))
    }
}

#[async_trait]
impl HandlerUnit for RpcStatus {
    async fn execute(&self, context: &Context, invocation: &dyn Invocation) -> Result<(), Error> {
        let key = invocation.get_string("network").unwrap_or_default();

        let Some(network) = context.registry().lookup(&key) else {
            return reject(invocation, UNKNOWN_NETWORK).await;
        };

        invocation.defer_reply(true).await?;

        let message = Self::render(context, network)
            .await
            .unwrap_or_else(|e| failure(context, &network.key, &format!("🔴 **RPC Unreachable — {}**", network.name), &e));

        invocation.edit_reply(message).await?;
        Ok(())
    }
}
