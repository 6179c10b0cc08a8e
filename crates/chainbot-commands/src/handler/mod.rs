use async_trait::async_trait;
use chainbot_common::enum_dispatch;

use crate::diagnostics::{render, DiagnosticContext};
use crate::interaction::{Invocation, Message};
use crate::store::DEFAULT_NETWORK;
use crate::{Context, Error, RoleGuard};

mod contract;
pub use contract::ContractVerify;

mod gas;
pub use gas::GasPrice;

mod rpc;
pub use rpc::RpcStatus;

mod testnet;
pub use testnet::{TestnetFaucet, TestnetStatus};

mod token;
pub use token::TokenInfo;

mod wallet;
pub use wallet::{WalletBalance, WalletNetwork, WalletVerify};

pub(crate) const UNKNOWN_NETWORK: &str = "❌ Unknown network.";

/// Logic of one subcommand. Each unit owns the response of the invocation it executes:
/// validation failures are replied immediately, chain work is deferred then edited.
#[async_trait]
pub trait HandlerUnit: Send + Sync {
    async fn execute(&self, context: &Context, invocation: &dyn Invocation) -> Result<(), Error>;
}

pub enum Handler {
    WalletVerify(WalletVerify),
    WalletBalance(WalletBalance),
    WalletNetwork(WalletNetwork),
    TokenInfo(TokenInfo),
    ContractVerify(ContractVerify),
    TestnetFaucet(TestnetFaucet),
    TestnetStatus(TestnetStatus),
    RpcStatus(RpcStatus),
    GasPrice(GasPrice),
    Guarded(RoleGuard),
}

impl Handler {
    /// Wraps the handler so that it only runs for members holding `required_role`
    pub fn guarded(self, required_role: Option<String>) -> Self {
        Self::Guarded(RoleGuard::new(required_role, self))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::WalletVerify(_) => "wallet-verify",
            Self::WalletBalance(_) => "wallet-balance",
            Self::WalletNetwork(_) => "wallet-network",
            Self::TokenInfo(_) => "token-info",
            Self::ContractVerify(_) => "contract-verify",
            Self::TestnetFaucet(_) => "testnet-faucet",
            Self::TestnetStatus(_) => "testnet-status",
            Self::RpcStatus(_) => "rpc-status",
            Self::GasPrice(_) => "gas-price",
            Self::Guarded(guard) => guard.inner().name(),
        }
    }
}

#[async_trait]
impl HandlerUnit for Handler {
    async fn execute(&self, context: &Context, invocation: &dyn Invocation) -> Result<(), Error> {
        enum_dispatch!(self {
            Self::WalletVerify(x) |
            Self::WalletBalance(x) |
            Self::WalletNetwork(x) |
            Self::TokenInfo(x) |
            Self::ContractVerify(x) |
            Self::TestnetFaucet(x) |
            Self::TestnetStatus(x) |
            Self::RpcStatus(x) |
            Self::GasPrice(x) |
            Self::Guarded(x) => x.execute(context, invocation).await
        })
    }
}

/// Network option of an invocation, `mainnet` when omitted
pub(crate) fn network_or_default(invocation: &dyn Invocation) -> String {
    invocation.get_string("network").filter(|x| !x.is_empty()).unwrap_or_else(|| DEFAULT_NETWORK.to_string())
}

/// Sends an immediate rejection only visible to the invoking user
pub(crate) async fn reject(invocation: &dyn Invocation, content: impl Into<String>) -> Result<(), Error> {
    invocation.reply(Message::content(content).ephemeral()).await?;
    Ok(())
}

/// Renders a failed chain operation. Configuration problems are reported as such, every other
/// failure goes through the diagnoser and lists every entry after `headline`.
pub(crate) fn failure(context: &Context, network_key: &str, headline: &str, error: &chainbot_evm::Error) -> Message {
    if error.is_configuration() {
        return Message::content(format!("⚠️ **Configuration problem:** {}.\nAsk a server admin to check the bot configuration.", error));
    }

    let diagnostic = DiagnosticContext::new(error.to_string()).with_network(network_key);

    Message::content(format!("{}\n\n{}", headline, render(&context.diagnoser.diagnose(&diagnostic))))
}
