use std::env;

use serde::Deserialize;

use crate::core::Error;

/// Variables read from the process environment, after the `.env` file is loaded
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Environment {
    pub chainbot_profile: Option<String>,

    pub discord_token: Option<String>,
    pub discord_client_id: Option<String>,
    pub discord_public_key: Option<String>,
    pub interactions_port: Option<String>,

    pub verified_role_id: Option<String>,
    pub dev_mode_role_id: Option<String>,

    pub eth_mainnet_rpc: Option<String>,
    pub eth_sepolia_rpc: Option<String>,
    pub eth_goerli_rpc: Option<String>,
    pub polygon_amoy_rpc: Option<String>,
    pub base_sepolia_rpc: Option<String>,

    pub sepolia_faucet_url: Option<String>,
    pub polygon_amoy_faucet_url: Option<String>,
    pub base_sepolia_faucet_url: Option<String>,

    pub rpc_timeout: Option<String>,
    pub verbosity: Option<String>,
}

impl Environment {
    pub fn load() -> Result<Self, Error> {
        envy::from_env().map_err(|e| Error::Configuration(e.to_string()))
    }

    pub fn from_variables(variables: impl IntoIterator<Item = (String, String)>) -> Result<Self, Error> {
        envy::from_iter(variables).map_err(|e| Error::Configuration(e.to_string()))
    }

    /// Empty values count as absent
    pub fn without_empty_values(self) -> Self {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|x| !x.trim().is_empty())
        }

        Self {
            chainbot_profile: present(self.chainbot_profile),
            discord_token: present(self.discord_token),
            discord_client_id: present(self.discord_client_id),
            discord_public_key: present(self.discord_public_key),
            interactions_port: present(self.interactions_port),
            verified_role_id: present(self.verified_role_id),
            dev_mode_role_id: present(self.dev_mode_role_id),
            eth_mainnet_rpc: present(self.eth_mainnet_rpc),
            eth_sepolia_rpc: present(self.eth_sepolia_rpc),
            eth_goerli_rpc: present(self.eth_goerli_rpc),
            polygon_amoy_rpc: present(self.polygon_amoy_rpc),
            base_sepolia_rpc: present(self.base_sepolia_rpc),
            sepolia_faucet_url: present(self.sepolia_faucet_url),
            polygon_amoy_faucet_url: present(self.polygon_amoy_faucet_url),
            base_sepolia_faucet_url: present(self.base_sepolia_faucet_url),
            rpc_timeout: present(self.rpc_timeout),
            verbosity: present(self.verbosity),
        }
    }
}

/// Value of the `--profile=<path>` argument, if given
pub fn profile_argument(arguments: impl IntoIterator<Item = String>) -> Option<String> {
    arguments
        .into_iter()
        .skip(1)
        .find_map(|x| x.strip_prefix("--profile=").map(str::to_string))
        .filter(|x| !x.is_empty())
}

/// Profile path given on the command line, or through `CHAINBOT_PROFILE`
pub fn profile_path(environment: &Environment) -> Option<String> {
    profile_argument(env::args()).or_else(|| environment.chainbot_profile.clone().filter(|x| !x.is_empty()))
}
