use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chainbot_common::{log_if_error, measure_duration, metric};
use futures::FutureExt;
use indexmap::IndexMap;
use tracing::{error, info};

use crate::handler::{ContractVerify, GasPrice, Handler, HandlerUnit, RpcStatus, TestnetFaucet, TestnetStatus, TokenInfo, WalletBalance, WalletNetwork, WalletVerify};
use crate::interaction::{Invocation, Message, ResponseState};
use crate::{Context, Error, Roles};

pub(crate) const UNKNOWN_COMMAND: &str = "❌ Unknown command.";
pub(crate) const UNKNOWN_SUBCOMMAND: &str = "❌ Unknown subcommand.";
pub(crate) const SOMETHING_WENT_WRONG: &str = "🔴 Something went wrong. Check the console for details.";

/// Outcome of a route lookup
pub enum Resolution<'a> {
    Handler(&'a Handler),
    UnknownCommand,
    UnknownSubcommand,
}

/// Command name to subcommand name to handler. Built once, never modified afterwards.
pub struct RouteTable {
    routes: IndexMap<&'static str, IndexMap<&'static str, Handler>>,
}

impl RouteTable {
    /// Every command of the bot. `rpc status` requires the Dev Mode role.
    pub fn new(roles: &Roles) -> Self {
        let mut routes = IndexMap::new();

        routes.insert(
            "wallet",
            IndexMap::from([
                ("verify", Handler::WalletVerify(WalletVerify)),
                ("balance", Handler::WalletBalance(WalletBalance)),
                ("network", Handler::WalletNetwork(WalletNetwork)),
            ]),
        );
        routes.insert("token", IndexMap::from([("info", Handler::TokenInfo(TokenInfo))]));
        routes.insert("contract", IndexMap::from([("verify", Handler::ContractVerify(ContractVerify))]));
        routes.insert(
            "testnet",
            IndexMap::from([("faucet", Handler::TestnetFaucet(TestnetFaucet)), ("status", Handler::TestnetStatus(TestnetStatus))]),
        );
        routes.insert("rpc", IndexMap::from([("status", Handler::RpcStatus(RpcStatus).guarded(roles.dev_mode.clone()))]));
        routes.insert("gas", IndexMap::from([("price", Handler::GasPrice(GasPrice))]));

        Self { routes }
    }

    pub fn resolve(&self, command: &str, subcommand: &str) -> Resolution<'_> {
        let Some(group) = self.routes.get(command) else {
            return Resolution::UnknownCommand;
        };

        match group.get(subcommand) {
            Some(handler) => Resolution::Handler(handler),
            None => Resolution::UnknownSubcommand,
        }
    }

    /// Every `(command, subcommand)` pair, in registration order
    pub fn routes(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.routes.iter().flat_map(|(command, group)| group.keys().map(move |subcommand| (*command, *subcommand)))
    }
}

/// Entry point of every invocation. Guarantees exactly one response per invocation, whatever
/// the handler does.
#[derive(Clone)]
pub struct Router {
    context: Context,
    routes: Arc<RouteTable>,
}

impl Router {
    pub fn new(context: Context) -> Self {
        let routes = RouteTable::new(&context.roles);

        Self {
            context,
            routes: Arc::new(routes),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub async fn route(&self, invocation: &dyn Invocation) {
        let command = invocation.command_name();
        let subcommand = invocation.subcommand_name().unwrap_or_default();

        info!("/{} {} by {}", command, subcommand, invocation.user().tag);

        let handler = match self.routes.resolve(command, subcommand) {
            Resolution::Handler(handler) => handler,
            Resolution::UnknownCommand => return Self::respond(invocation, UNKNOWN_COMMAND).await,
            Resolution::UnknownSubcommand => return Self::respond(invocation, UNKNOWN_SUBCOMMAND).await,
        };

        metric!(counter[command_request] = 1, command = command, subcommand = subcommand);

        let (result, duration) = measure_duration!(AssertUnwindSafe(handler.execute(&self.context, invocation)).catch_unwind().await);
        let result = result.unwrap_or_else(|panic| Err(Error::Panic(panic_message(panic))));

        metric!(histogram[command_request_duration_milliseconds] = duration.as_millis(), command = command, subcommand = subcommand);
        metric!(on error result => counter[command_request_error] = 1, command = command, subcommand = subcommand);

        if let Err(e) = result {
            error!(command, subcommand, handler = handler.name(), error = %e, "command failed");
            self.contain(invocation).await;
        }
    }

    /// Turns whatever state the invocation was left in into a generic failure
    async fn contain(&self, invocation: &dyn Invocation) {
        match invocation.state() {
            ResponseState::Pending => Self::respond(invocation, SOMETHING_WENT_WRONG).await,
            ResponseState::Deferred => {
                let _ = log_if_error!(invocation.edit_reply(Message::content(SOMETHING_WENT_WRONG)).await);
            },
            ResponseState::Replied | ResponseState::Failed => {},
        }
    }

    async fn respond(invocation: &dyn Invocation, content: &str) {
        let _ = log_if_error!(invocation.reply(Message::content(content).ephemeral()).await);
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
