use chainbot_evm::NetworkDescriptor;
use log::info;

use crate::core::{registry, Error};

fn describe(network: &NetworkDescriptor) -> String {
    format!(
        "{:<12} {:<22} chain {:<9} {:<8} rpc: {:<14} faucet: {}",
        network.key,
        network.name,
        network.chain_id,
        if network.testnet { "testnet" } else { "mainnet" },
        if network.rpc_endpoint.is_some() { "configured" } else { "not configured" },
        network.faucet_url.as_deref().unwrap_or("-"),
    )
}

pub fn command_networks() -> Result<(), Error> {
    let registry = registry()?;

    info!("🌐 {} network(s) known", registry.len());
    for network in registry.iter() {
        info!("{}", describe(network));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chainbot_evm::{Endpoints, NetworkRegistry};

    use super::*;

    #[test]
    fn describe_reports_endpoint_presence() {
        let registry = NetworkRegistry::ethereum(&Endpoints::default());

        let goerli = describe(registry.lookup("goerli").unwrap());

        assert!(goerli.starts_with("goerli "));
        assert!(goerli.contains("Goerli Testnet"));
        assert!(goerli.contains("chain 5 "));
        assert!(goerli.contains("rpc: not configured"));
        assert!(goerli.ends_with(NetworkRegistry::GOERLI_FAUCET_URL));
    }
}
