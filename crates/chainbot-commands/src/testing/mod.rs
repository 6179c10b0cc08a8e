use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chainbot_evm::testing::{MockChainReader, MockConnector, Unreachable};
use chainbot_evm::{Chain, Connector, Endpoints, NetworkRegistry};

use crate::interaction::{Embed, Error, Invocation, Members, Message, ResponseState, ResponseTracker, User};
use crate::store::MemoryWalletStore;
use crate::{Context, Roles};

/// Everything a single invocation sent back, in order
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Reply(Message),
    Defer { ephemeral: bool },
    Edit(Message),
}

impl Response {
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Reply(message) | Self::Edit(message) => Some(message),
            Self::Defer { .. } => None,
        }
    }
}

/// Invocation recording every response primitive it receives
pub struct FakeInvocation {
    command: String,
    subcommand: Option<String>,
    options: HashMap<String, String>,

    user: User,
    guild_id: Option<String>,
    roles: Option<Vec<String>>,

    tracker: ResponseTracker,
    responses: Mutex<Vec<Response>>,
    undeliverable: bool,
}

impl FakeInvocation {
    pub const USER_ID: &'static str = "123456789";
    pub const GUILD_ID: &'static str = "987654321";

    pub fn new(command: &str, subcommand: &str) -> Self {
        Self {
            command: command.to_string(),
            subcommand: Some(subcommand.to_string()),
            options: HashMap::new(),
            user: User {
                id: Self::USER_ID.to_string(),
                tag: "alice#0001".to_string(),
            },
            guild_id: Some(Self::GUILD_ID.to_string()),
            roles: Some(vec![]),
            tracker: ResponseTracker::new(),
            responses: Mutex::new(vec![]),
            undeliverable: false,
        }
    }

    pub fn option(mut self, name: &str, value: &str) -> Self {
        self.options.insert(name.to_string(), value.to_string());
        self
    }

    pub fn roles(mut self, roles: &[&str]) -> Self {
        self.roles = Some(roles.iter().map(|x| x.to_string()).collect());
        self
    }

    /// Invocation whose origin is gone: the initial response can never be delivered
    pub fn undeliverable(mut self) -> Self {
        self.undeliverable = true;
        self
    }

    fn deliver(&self) -> Result<(), Error> {
        if self.undeliverable {
            self.tracker.fail();
            return Err(Error::Transport("origin is gone".to_string()));
        }
        Ok(())
    }

    /// Invocation issued outside of any guild
    pub fn direct_message(mut self) -> Self {
        self.guild_id = None;
        self.roles = None;
        self
    }

    pub fn responses(&self) -> Vec<Response> {
        self.responses.lock().unwrap().clone()
    }

    /// Message of the last reply or edit
    pub fn last_message(&self) -> Message {
        self.responses().iter().rev().find_map(|x| x.message().cloned()).expect("no message sent")
    }

    pub fn last_content(&self) -> String {
        self.last_message().content.expect("no content")
    }

    pub fn last_embed(&self) -> Embed {
        self.last_message().embeds.first().cloned().expect("no embed")
    }

    fn record(&self, response: Response) {
        self.responses.lock().unwrap().push(response);
    }
}

#[async_trait]
impl Invocation for FakeInvocation {
    fn command_name(&self) -> &str {
        &self.command
    }

    fn subcommand_name(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    fn get_string(&self, name: &str) -> Option<String> {
        self.options.get(name).cloned()
    }

    fn user(&self) -> &User {
        &self.user
    }

    fn guild_id(&self) -> Option<&str> {
        self.guild_id.as_deref()
    }

    fn member_roles(&self) -> Option<&[String]> {
        self.roles.as_deref()
    }

    fn state(&self) -> ResponseState {
        self.tracker.state()
    }

    async fn reply(&self, message: Message) -> Result<(), Error> {
        self.tracker.begin_reply()?;
        self.deliver()?;
        self.record(Response::Reply(message));
        Ok(())
    }

    async fn defer_reply(&self, ephemeral: bool) -> Result<(), Error> {
        self.tracker.begin_defer()?;
        self.deliver()?;
        self.record(Response::Defer { ephemeral });
        Ok(())
    }

    async fn edit_reply(&self, message: Message) -> Result<(), Error> {
        self.tracker.check_edit()?;
        self.record(Response::Edit(message));
        Ok(())
    }
}

/// Records role assignments, optionally refusing them
#[derive(Debug, Default)]
pub struct FakeMembers {
    pub refuse: bool,
    assignments: Mutex<Vec<(String, String, String)>>,
}

impl FakeMembers {
    pub fn assignments(&self) -> Vec<(String, String, String)> {
        self.assignments.lock().unwrap().clone()
    }
}

#[async_trait]
impl Members for FakeMembers {
    async fn add_role(&self, guild_id: &str, user_id: &str, role_id: &str) -> Result<(), Error> {
        if self.refuse {
            return Err(Error::Transport("Missing Permissions".to_string()));
        }

        self.assignments.lock().unwrap().push((guild_id.to_string(), user_id.to_string(), role_id.to_string()));
        Ok(())
    }
}

pub struct TestEnvironment {
    pub connector: MockConnector,
    pub wallets: Arc<MemoryWalletStore>,
    pub members: Arc<FakeMembers>,

    context: Context,
}

impl TestEnvironment {
    pub const ENDPOINT: &'static str = "http://localhost:8545";
    pub const SEPOLIA_FAUCET: &'static str = "https://sepoliafaucet.com";

    pub const VERIFIED_ROLE: &'static str = "1111";
    pub const DEV_MODE_ROLE: &'static str = "2222";

    /// Every network configured, the chain must not be reached
    pub fn new() -> Self {
        Self::with_reader(Unreachable)
    }

    /// Every network configured and served by `reader`
    pub fn with_reader<T: MockChainReader>(reader: T) -> Self {
        Self::build(reader, Self::endpoints(Some(Self::ENDPOINT)), FakeMembers::default())
    }

    /// No network has an RPC endpoint
    pub fn without_endpoints() -> Self {
        Self::build(Unreachable, Self::endpoints(None), FakeMembers::default())
    }

    /// Role assignments fail
    pub fn with_refusing_members<T: MockChainReader>(reader: T) -> Self {
        Self::build(reader, Self::endpoints(Some(Self::ENDPOINT)), FakeMembers { refuse: true, ..FakeMembers::default() })
    }

    fn endpoints(endpoint: Option<&str>) -> Endpoints {
        let endpoint = endpoint.map(|x| x.to_string());

        Endpoints {
            eth_mainnet_rpc: endpoint.clone(),
            eth_sepolia_rpc: endpoint.clone(),
            eth_goerli_rpc: endpoint.clone(),
            polygon_amoy_rpc: endpoint.clone(),
            base_sepolia_rpc: endpoint,
            sepolia_faucet_url: Some(Self::SEPOLIA_FAUCET.to_string()),
            polygon_amoy_faucet_url: None,
            base_sepolia_faucet_url: None,
        }
    }

    fn build<T: MockChainReader>(reader: T, endpoints: Endpoints, members: FakeMembers) -> Self {
        let connector = MockConnector::new(reader);
        let wallets = Arc::new(MemoryWalletStore::new());
        let members = Arc::new(members);

        let roles = Roles {
            verified: Some(Self::VERIFIED_ROLE.to_string()),
            dev_mode: Some(Self::DEV_MODE_ROLE.to_string()),
        };

        let chain = Chain::new(NetworkRegistry::ethereum(&endpoints), Connector::Mock(connector.clone()));
        let context = Context::new(roles, chain, wallets.clone(), members.clone());

        Self {
            connector,
            wallets,
            members,
            context,
        }
    }

    pub fn with_roles(mut self, roles: Roles) -> Self {
        self.context.roles = roles;
        self
    }

    pub fn context(&self) -> Context {
        self.context.clone()
    }

    /// Number of chain handles built so far
    pub fn connections(&self) -> usize {
        self.connector.connections()
    }
}
