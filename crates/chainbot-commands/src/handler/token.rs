use async_trait::async_trait;
use chainbot_evm::alloy_primitives::Address;
use chainbot_evm::contract::fetch_token_metadata;
use chainbot_evm::math::format_quantity;
use chainbot_evm::parse_address;

use crate::handler::{failure, network_or_default, reject, HandlerUnit, UNKNOWN_NETWORK};
use crate::interaction::{Embed, Invocation, Message};
use crate::{Context, Error};

/// `/token info`: ERC-20 metadata of a contract
pub struct TokenInfo;

impl TokenInfo {
    async fn render(context: &Context, token: Address, candidate: &str, network: &str) -> Result<Message, chainbot_evm::Error> {
        let reader = context.chain.acquire(network)?;
        let metadata = fetch_token_metadata(reader.as_ref(), token).await?;

        let descriptor = context.registry().lookup(network);

        let mut embed = Embed::new(format!("🪙 Token Info — {}", metadata.symbol))
            .color(0x7c4dff)
            .field("Name", metadata.name.as_str(), true)
            .field("Symbol", metadata.symbol.as_str(), true)
            .field("Decimals", metadata.decimals.to_string(), true)
            .field(
                "Total Supply",
                format!("{} {}", format_quantity(metadata.total_supply, metadata.decimals), metadata.symbol),
                false,
            )
            .field("Contract Address", format!("`{}`", candidate), false)
            .field("Network", descriptor.map(|x| x.name.as_str()).unwrap_or(network), true);

        if let Some(url) = descriptor.and_then(|x| x.token_url(candidate)) {
            embed = embed.url(Some(url)).footer("Click title to view on explorer");
        }

        Ok(Message::embed(embed))
    }
}

#[async_trait]
impl HandlerUnit for TokenInfo {
    async fn execute(&self, context: &Context, invocation: &dyn Invocation) -> Result<(), Error> {
        let candidate = invocation.get_string("address").unwrap_or_default();
        let network = network_or_default(invocation);

        let Some(token) = parse_address(&candidate) else {
            return reject(invocation, "❌ Invalid contract address. It should start with `0x` and be 42 characters.").await;
        };

        if context.registry().lookup(&network).is_none() {
            return reject(invocation, UNKNOWN_NETWORK).await;
        }

        invocation.defer_reply(true).await?;

        let message = Self::render(context, token, &candidate, &network).await.unwrap_or_else(|e| {
            failure(
                context,
                &network,
                "❌ **Failed to fetch token info.**\nThis might not be an ERC-20 contract, or it may not be deployed on this network.",
                &e,
            )
        });

        invocation.edit_reply(message).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chainbot_evm::alloy_primitives::{Bytes, U256};
    use chainbot_evm::alloy_sol_types::{SolCall, SolValue};
    use chainbot_evm::contract::IERC20;
    use chainbot_evm::testing::MockChainReader;

    use super::*;
    use crate::testing::{FakeInvocation, Response, TestEnvironment};

    const TOKEN: &str = "0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238";

    #[derive(Debug)]
    struct Usdc;

    #[async_trait]
    impl MockChainReader for Usdc {
        async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, chainbot_evm::Error> {
            let output = match &data[..4] {
                x if x == IERC20::nameCall::SELECTOR => "USD Coin".to_string().abi_encode(),
                x if x == IERC20::symbolCall::SELECTOR => "USDC".to_string().abi_encode(),
                x if x == IERC20::decimalsCall::SELECTOR => <chainbot_evm::alloy_sol_types::sol_data::Uint<8> as chainbot_evm::alloy_sol_types::SolType>::abi_encode(&6u8),
                x if x == IERC20::totalSupplyCall::SELECTOR => U256::from(1_234_567_891_234_567u64).abi_encode(),
                _ => unreachable!(),
            };

            Ok(output.into())
        }
    }

    #[derive(Debug)]
    struct NotAToken;

    #[async_trait]
    impl MockChainReader for NotAToken {
        async fn call(&self, _to: Address, _data: Bytes) -> Result<Bytes, chainbot_evm::Error> {
            Err(chainbot_evm::Error::Rpc("execution reverted".to_string()))
        }
    }

    #[tokio::test]
    async fn should_reject_malformed_address() {
        // Given
        let test = TestEnvironment::new();
        let invocation = FakeInvocation::new("token", "info").option("address", "usdc");

        // When
        TokenInfo.execute(&test.context(), &invocation).await.unwrap();

        // Then
        assert_eq!(
            invocation.responses(),
            vec![Response::Reply(Message::content("❌ Invalid contract address. It should start with `0x` and be 42 characters.").ephemeral())]
        );
    }

    #[tokio::test]
    async fn should_render_token_metadata() {
        // Given
        let test = TestEnvironment::with_reader(Usdc);
        let invocation = FakeInvocation::new("token", "info").option("address", TOKEN).option("network", "sepolia");

        // When
        TokenInfo.execute(&test.context(), &invocation).await.unwrap();

        // Then
        let embed = invocation.last_embed();
        assert_eq!(embed.title.as_deref(), Some("🪙 Token Info — USDC"));
        assert_eq!(embed.field_value("Name"), Some("USD Coin"));
        assert_eq!(embed.field_value("Decimals"), Some("6"));
        assert_eq!(embed.field_value("Total Supply"), Some("1,234,567,891.235 USDC"));
        assert_eq!(embed.field_value("Network"), Some("Sepolia Testnet"));
        assert_eq!(embed.url.as_deref(), Some("https://sepolia.etherscan.io/token/0x1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"));
    }

    #[tokio::test]
    async fn should_explain_failure_and_diagnose() {
        // Given
        let test = TestEnvironment::with_reader(NotAToken);
        let invocation = FakeInvocation::new("token", "info").option("address", TOKEN);

        // When
        TokenInfo.execute(&test.context(), &invocation).await.unwrap();

        // Then
        let content = invocation.last_content();
        assert!(content.starts_with("❌ **Failed to fetch token info.**\nThis might not be an ERC-20 contract"));
        assert!(content.contains("📦 Contract Not Deployed"));
    }
}
