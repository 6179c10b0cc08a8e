//! Slash command schema uploaded at registration time. Network choices follow the registry, so
//! the schema must be registered again whenever the network list changes.

use chainbot_evm::NetworkRegistry;
use serde::Serialize;

use crate::payload::OptionKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionDefinition {
    #[serde(rename = "type")]
    pub kind: u8,

    pub name: String,
    pub description: String,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

impl CommandDefinition {
    fn new(name: &str, description: &str, subcommands: Vec<OptionDefinition>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            options: subcommands,
        }
    }

    /// `(command, subcommand)` pairs declared by this command
    pub fn routes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.options
            .iter()
            .filter(|x| x.kind == OptionKind::SUB_COMMAND)
            .map(|x| (self.name.as_str(), x.name.as_str()))
    }
}

impl OptionDefinition {
    fn subcommand(name: &str, description: &str, options: Vec<OptionDefinition>) -> Self {
        Self {
            kind: OptionKind::SUB_COMMAND,
            name: name.to_string(),
            description: description.to_string(),
            required: false,
            choices: vec![],
            options,
        }
    }

    fn string(name: &str, description: &str, required: bool) -> Self {
        Self {
            kind: OptionKind::STRING,
            name: name.to_string(),
            description: description.to_string(),
            required,
            choices: vec![],
            options: vec![],
        }
    }

    fn choices(mut self, choices: &[Choice]) -> Self {
        self.choices = choices.to_vec();
        self
    }
}

/// Label shown for a network key: the key with its first letter upper-cased
fn choice_label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn choices<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<Choice> {
    keys.into_iter()
        .map(|key| Choice {
            name: choice_label(key),
            value: key.to_string(),
        })
        .collect()
}

/// Every command of the bot, with the network choices of `registry`
pub fn definitions(registry: &NetworkRegistry) -> Vec<CommandDefinition> {
    let networks = choices(registry.keys());
    let testnets = choices(registry.testnet_keys());

    let network = |required: bool| OptionDefinition::string("network", "Which network?", required).choices(&networks);
    let testnet = || OptionDefinition::string("network", "Which testnet?", true).choices(&testnets);

    vec![
        CommandDefinition::new(
            "wallet",
            "Wallet utility commands",
            vec![
                OptionDefinition::subcommand(
                    "verify",
                    "Link & verify your wallet address",
                    vec![OptionDefinition::string("address", "Your wallet address", true), network(false)],
                ),
                OptionDefinition::subcommand("balance", "Show your verified wallet balance", vec![]),
                OptionDefinition::subcommand("network", "Show your connected chain & RPC info", vec![]),
            ],
        ),
        CommandDefinition::new(
            "token",
            "Token & contract tools",
            vec![OptionDefinition::subcommand(
                "info",
                "Get token info from a contract address",
                vec![OptionDefinition::string("address", "Token contract address", true), network(false)],
            )],
        ),
        CommandDefinition::new(
            "contract",
            "Contract verification tools",
            vec![OptionDefinition::subcommand(
                "verify",
                "Check if a contract is deployed & get details",
                vec![OptionDefinition::string("address", "Contract address", true), network(false)],
            )],
        ),
        CommandDefinition::new(
            "testnet",
            "Testnet helper commands",
            vec![
                OptionDefinition::subcommand("faucet", "Get faucet links for a testnet", vec![testnet()]),
                OptionDefinition::subcommand("status", "Check if a testnet RPC is alive", vec![testnet()]),
            ],
        ),
        CommandDefinition::new(
            "rpc",
            "RPC health check (Dev Mode)",
            vec![OptionDefinition::subcommand("status", "Check latency & block number of an RPC", vec![network(true)])],
        ),
        CommandDefinition::new(
            "gas",
            "Gas price tools",
            vec![OptionDefinition::subcommand("price", "Get current gas price on a network", vec![network(true)])],
        ),
    ]
}
