use chainbot_evm::{Endpoints, NetworkRegistry};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CLI execution error: {0}")]
    Execution(String),
    #[error("CLI validation error: {0}")]
    Validation(String),
}

impl From<chainbot_discord::Error> for Error {
    fn from(value: chainbot_discord::Error) -> Self {
        Self::Execution(value.to_string())
    }
}

/// Default networks wired to the endpoints of the environment, `.env` file included
pub fn registry() -> Result<NetworkRegistry, Error> {
    let _ = dotenvy::dotenv();

    let endpoints: Endpoints = envy::from_env().map_err(|e| Error::Validation(e.to_string()))?;

    Ok(NetworkRegistry::ethereum(&without_empty_values(endpoints)))
}

fn without_empty_values(endpoints: Endpoints) -> Endpoints {
    fn present(value: Option<String>) -> Option<String> {
        value.filter(|x| !x.trim().is_empty())
    }

    Endpoints {
        eth_mainnet_rpc: present(endpoints.eth_mainnet_rpc),
        eth_sepolia_rpc: present(endpoints.eth_sepolia_rpc),
        eth_goerli_rpc: present(endpoints.eth_goerli_rpc),
        polygon_amoy_rpc: present(endpoints.polygon_amoy_rpc),
        base_sepolia_rpc: present(endpoints.base_sepolia_rpc),
        sepolia_faucet_url: present(endpoints.sepolia_faucet_url),
        polygon_amoy_faucet_url: present(endpoints.polygon_amoy_faucet_url),
        base_sepolia_faucet_url: present(endpoints.base_sepolia_faucet_url),
    }
}
