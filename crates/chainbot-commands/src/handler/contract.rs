use async_trait::async_trait;
use chainbot_evm::alloy_primitives::Address;
use chainbot_evm::math::group_thousands;
use chainbot_evm::parse_address;

use crate::handler::{failure, network_or_default, reject, HandlerUnit, UNKNOWN_NETWORK};
use crate::interaction::{Embed, Invocation, Message};
use crate::{Context, Error};

/// `/contract verify`: whether bytecode is deployed at an address
pub struct ContractVerify;

impl ContractVerify {
    async fn render(context: &Context, contract: Address, candidate: &str, network: &str) -> Result<Message, chainbot_evm::Error> {
        let reader = context.chain.acquire(network)?;
        let code = reader.code(contract).await?;

        let deployed = !code.is_empty();
        let descriptor = context.registry().lookup(network);

        let mut embed = Embed::new(if deployed { "📦 Contract Deployed ✅" } else { "❌ No Contract Found" })
            .color(if deployed { 0x00c853 } else { 0xf44336 })
            .field("Address", format!("`{}`", candidate), false)
            .field("Network", descriptor.map(|x| x.name.as_str()).unwrap_or(network), true)
            .field("Deployed", if deployed { "Yes" } else { "No" }, true);

        embed = if deployed {
            embed
                .field("Bytecode Size", format!("{} bytes", group_thousands(&code.len().to_string())), true)
                .field("ABI Availability", "Check the block explorer link to see if ABI is verified & available.", false)
        } else {
            embed.field(
                "💡 What this means",
                "This address is either an EOA (regular wallet), has not been deployed yet, or the contract was self-destructed.",
                false,
            )
        };

        if let Some(url) = descriptor.and_then(|x| x.address_url(candidate)) {
            embed = embed.url(Some(url)).footer("Click title to view on explorer");
        }

        Ok(Message::embed(embed))
    }
}

#[async_trait]
impl HandlerUnit for ContractVerify {
    async fn execute(&self, context: &Context, invocation: &dyn Invocation) -> Result<(), Error> {
        let candidate = invocation.get_string("address").unwrap_or_default();
        let network = network_or_default(invocation);

        let Some(contract) = parse_address(&candidate) else {
            return reject(invocation, "❌ Invalid address format. Needs to start with `0x` and be 42 characters.").await;
        };

        if context.registry().lookup(&network).is_none() {
            return reject(invocation, UNKNOWN_NETWORK).await;
        }

        invocation.defer_reply(true).await?;

        let message = Self::render(context, contract, &candidate, &network)
            .await
            .unwrap_or_else(|e| failure(context, &network, "❌ **Verification failed.**", &e));

        invocation.edit_reply(message).await?;
        Ok(())
    }
}
