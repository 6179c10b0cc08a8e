use async_trait::async_trait;
use chainbot_evm::alloy_primitives::{Address, U256};
use chainbot_evm::math::format_ether;
use chainbot_evm::parse_address;
use tracing::{instrument, warn};

use crate::handler::{failure, network_or_default, reject, HandlerUnit, UNKNOWN_NETWORK};
use crate::interaction::{Embed, Invocation, Message};
use crate::store::WalletLink;
use crate::{Context, Error};

const NO_ACTIVITY: &str = "⚠️ That address has no activity on this network. It might be a fresh wallet — you can still verify it, but note it shows zero history.";

/// `/wallet verify`: links an address with on-chain activity to the invoking user
pub struct WalletVerify;

impl WalletVerify {
    #[instrument(name = "wallet_verify", skip(context))]
    async fn activity(context: &Context, address: Address, network: &str) -> Result<(u64, U256), chainbot_evm::Error> {
        let reader = context.chain.acquire(network)?;

        tokio::try_join!(reader.transaction_count(address), reader.balance(address))
    }

    async fn assign_verified_role(context: &Context, invocation: &dyn Invocation) {
        let (Some(guild_id), Some(role)) = (invocation.guild_id(), context.roles.verified.as_deref()) else {
            return;
        };

        if let Err(e) = context.members.add_role(guild_id, &invocation.user().id, role).await {
            warn!(user = %invocation.user().id, error = %e, "could not assign verified role");
        }
    }
}

#[async_trait]
impl HandlerUnit for WalletVerify {
    async fn execute(&self, context: &Context, invocation: &dyn Invocation) -> Result<(), Error> {
        let candidate = invocation.get_string("address").unwrap_or_default();
        let network = network_or_default(invocation);

        let Some(address) = parse_address(&candidate) else {
            return reject(invocation, "❌ That's not a valid Ethereum address. Make sure it starts with `0x` and is 42 characters long.").await;
        };

        if context.registry().lookup(&network).is_none() {
            return reject(invocation, UNKNOWN_NETWORK).await;
        }

        invocation.defer_reply(true).await?;

        let message = match Self::activity(context, address, &network).await {
            Ok((0, balance)) if balance.is_zero() => Message::content(NO_ACTIVITY),
            Ok((nonce, _)) => {
                context.wallets.save(&invocation.user().id, address, &network).await;
                Self::assign_verified_role(context, invocation).await;

                Message::embed(
                    Embed::new("✅ Wallet Verified")
                        .color(0x00c853)
                        .field("Discord User", format!("<@{}>", invocation.user().id), true)
                        .field("Wallet Address", format!("`{}`", candidate), false)
                        .field("Network", network.as_str(), true)
                        .field("On-Chain Nonce", nonce.to_string(), true),
                )
            },
            Err(e) => failure(context, &network, "❌ **Verification failed.**", &e),
        };

        invocation.edit_reply(message).await?;
        Ok(())
    }
}

/// `/wallet balance`: native balance of the linked wallet
pub struct WalletBalance;

impl WalletBalance {
    #[instrument(name = "wallet_balance", skip(context, link), fields(network = %link.network))]
    async fn render(context: &Context, link: &WalletLink) -> Result<Message, chainbot_evm::Error> {
        let reader = context.chain.acquire(&link.network)?;
        let balance = reader.balance(link.address).await?;

        let address = link.address.to_string();
        let network = context.registry().lookup(&link.network);
        let ticker = network.map(|x| x.native_ticker()).unwrap_or("ETH");

        let mut embed = Embed::new("💰 Wallet Balance")
            .color(0x1e88e5)
            .field("Address", format!("`{}`", address), false)
            .field("Network", network.map(|x| x.name.as_str()).unwrap_or(&link.network), true)
            .field("Balance", format!("**{} {}**", format_ether(balance, 6), ticker), true);

        if let Some(url) = network.and_then(|x| x.address_url(&address)) {
            embed = embed.url(Some(url)).footer("Click title to view on explorer");
        }

        Ok(Message::embed(embed))
    }
}

#[async_trait]
impl HandlerUnit for WalletBalance {
    async fn execute(&self, context: &Context, invocation: &dyn Invocation) -> Result<(), Error> {
        let Some(link) = context.wallets.get(&invocation.user().id).await else {
            return reject(invocation, "❌ No wallet linked. Use `/wallet verify` first to connect your wallet.").await;
        };

        invocation.defer_reply(true).await?;

        let message = Self::render(context, &link)
            .await
            .unwrap_or_else(|e| failure(context, &link.network, "❌ **Failed to fetch balance.**", &e));

        invocation.edit_reply(message).await?;
        Ok(())
    }
}

/// `/wallet network`: configuration of the network the linked wallet lives on
pub struct WalletNetwork;

#[async_trait]
impl HandlerUnit for WalletNetwork {
    async fn execute(&self, context: &Context, invocation: &dyn Invocation) -> Result<(), Error> {
        let Some(link) = context.wallets.get(&invocation.user().id).await else {
            return reject(invocation, "❌ No wallet linked. Use `/wallet verify` first.").await;
        };

        let Some(network) = context.registry().lookup(&link.network) else {
            return reject(invocation, "⚠️ Your wallet is linked to an unknown network. Re-verify with `/wallet verify`.").await;
        };

        let mut embed = Embed::new("🔗 Connected Network")
            .color(if network.testnet { 0xff9800 } else { 0x4caf50 })
            .field("Network Name", network.name.as_str(), true)
            .field("Chain ID", format!("`{}`", network.chain_id), true)
            .field("Type", if network.testnet { "🧪 Testnet" } else { "✅ Mainnet" }, true)
            .field("RPC Endpoint", format!("`{}`", network.rpc_endpoint.as_deref().unwrap_or("Not configured")), false)
            .field("Explorer", network.explorer_url.as_deref().unwrap_or("N/A"), true);

        if let (true, Some(faucet)) = (network.testnet, network.faucet_url.as_deref()) {
            embed = embed.field("🚰 Faucet", faucet, true);
        }

        invocation.reply(Message::embed(embed).ephemeral()).await?;
        Ok(())
    }
}
