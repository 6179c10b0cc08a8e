use async_trait::async_trait;
use chainbot_evm::alloy_primitives::U256;
use chainbot_evm::math::{format_ether, format_gwei, gwei};
use chainbot_evm::NetworkDescriptor;
use tracing::instrument;

use crate::handler::{failure, reject, HandlerUnit, UNKNOWN_NETWORK};
use crate::interaction::{Embed, Invocation, Message};
use crate::{Context, Error};

/// Gas used by a plain transfer
const TRANSFER_GAS: u64 = 21_000;

/// `/gas price`: current fee levels of a network
pub struct GasPrice;

impl GasPrice {
    /// Green below 20 gwei, orange below 50 gwei, red otherwise
    fn color(gas_price: U256) -> u32 {
        if gas_price < gwei(20) {
            0x00c853
        } else if gas_price < gwei(50) {
            0xff9800
        } else {
            0xf44336
        }
    }

    #[instrument(name = "gas_price", skip_all, fields(network = %network.key))]
    async fn render(context: &Context, network: &NetworkDescriptor) -> Result<Message, chainbot_evm::Error> {
        let reader = context.chain.acquire(&network.key)?;
        let fees = reader.fee_data().await?;

        let transfer_cost = fees.gas_price * U256::from(TRANSFER_GAS);

        let mut embed = Embed::new(format!("⛽ Gas Price — {}", network.name))
            .color(Self::color(fees.gas_price))
            .field("Gas Price", format!("**{} Gwei**", format_gwei(fees.gas_price, 2)), true)
            .field("Est. Transfer Cost", format!("{} ETH", format_ether(transfer_cost, 8)), true)
            .field("Network", network.name.as_str(), true);

        if let (Some(max_fee), Some(max_priority_fee)) = (fees.max_fee_per_gas, fees.max_priority_fee_per_gas) {
            embed = embed
                .field("Max Fee (EIP-1559)", format!("{} Gwei", format_gwei(max_fee, 2)), true)
                .field("Max Priority Fee", format!("{} Gwei", format_gwei(max_priority_fee, 2)), true);
        }

        Ok(Message::embed(embed))
    }
}

#[async_trait]
impl HandlerUnit for GasPrice {
    async fn execute(&self, context: &Context, invocation: &dyn Invocation) -> Result<(), Error> {
        let key = invocation.get_string("network").unwrap_or_default();

        let Some(network) = context.registry().lookup(&key) else {
            return reject(invocation, UNKNOWN_NETWORK).await;
        };

        invocation.defer_reply(true).await?;

        let message = Self::render(context, network)
            .await
            .unwrap_or_else(|e| failure(context, &network.key, "❌ **Failed to fetch gas price.**", &e));

        invocation.edit_reply(message).await?;
        Ok(())
    }
}
