use std::sync::Arc;

use chainbot_evm::{Chain, NetworkRegistry};
use serde::Deserialize;

use crate::diagnostics::Diagnoser;
use crate::interaction::Members;
use crate::store::WalletStore;

/// Guild roles the bot works with. Absent roles are not configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Roles {
    /// Role granted once a wallet is verified
    #[serde(default)]
    pub verified: Option<String>,

    /// Role required by the developer commands
    #[serde(default)]
    pub dev_mode: Option<String>,
}

/// State shared by every handler
#[derive(Clone)]
pub struct Context {
    pub roles: Roles,

    pub chain: Chain,
    pub diagnoser: Diagnoser,

    pub wallets: Arc<dyn WalletStore>,
    pub members: Arc<dyn Members>,
}

impl Context {
    pub fn new(roles: Roles, chain: Chain, wallets: Arc<dyn WalletStore>, members: Arc<dyn Members>) -> Self {
        Self {
            roles,
            diagnoser: Diagnoser::new(chain.shared_registry()),
            chain,
            wallets,
            members,
        }
    }

    pub fn registry(&self) -> &NetworkRegistry {
        self.chain.registry()
    }
}
