use std::fs;
use std::str::FromStr;
use std::time::Duration;

use chainbot_commands::Roles;
use chainbot_common::service::monitoring::Configuration as MonitoringConfiguration;
use chainbot_evm::{Connector, Endpoints, NetworkDescriptor, NetworkRegistry};
use serde::Deserialize;

use crate::core::context::environment::Environment;
use crate::core::Error;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerbosityConfiguration {
    Debug,
    Info,
}

impl FromStr for VerbosityConfiguration {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(VerbosityConfiguration::Debug),
            "info" => Ok(VerbosityConfiguration::Info),
            _ => Ok(VerbosityConfiguration::Debug),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DiscordConfiguration {
    pub token: String,
    pub client_id: String,
    pub public_key: String,

    /// Port of the interactions endpoint
    pub port: u16,
}

/// Complete configuration of the bot, resolved from the profile and the environment
#[derive(Clone, Debug)]
pub struct Configuration {
    pub verbosity: VerbosityConfiguration,
    pub prometheus: Option<MonitoringConfiguration>,

    pub discord: DiscordConfiguration,
    pub roles: Roles,

    pub registry: NetworkRegistry,
    pub rpc_timeout: Duration,
}

impl Configuration {
    pub const DEFAULT_PORT: u16 = 8080;

    pub fn connector(&self) -> Connector {
        Connector::JsonRpc(self.rpc_timeout)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiscordProfile {
    pub token: Option<String>,
    pub client_id: Option<String>,
    pub public_key: Option<String>,
    pub port: Option<u16>,
}

/// Partial configuration read from a JSON file. Every value can be supplied or overridden by
/// the environment.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub verbosity: Option<VerbosityConfiguration>,
    pub prometheus: Option<MonitoringConfiguration>,

    pub discord: DiscordProfile,
    pub roles: Roles,

    /// Replaces the default networks when present
    pub networks: Option<Vec<NetworkDescriptor>>,
    pub endpoints: Endpoints,

    /// Seconds
    pub rpc_timeout: Option<u64>,
}

impl Profile {
    pub fn from_file(path: &str) -> Result<Self, Error> {
        let data = fs::read(path).map_err(|e| Error::Configuration(format!("could not read profile {}: {}", path, e)))?;

        serde_json::from_slice(&data).map_err(|e| Error::Configuration(e.to_string()))
    }

    /// Values of the environment take precedence over the profile
    pub fn apply(&mut self, environment: Environment) -> Result<(), Error> {
        fn set(target: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *target = value;
            }
        }

        let environment = environment.without_empty_values();

        set(&mut self.discord.token, environment.discord_token);
        set(&mut self.discord.client_id, environment.discord_client_id);
        set(&mut self.discord.public_key, environment.discord_public_key);
        set(&mut self.roles.verified, environment.verified_role_id);
        set(&mut self.roles.dev_mode, environment.dev_mode_role_id);

        set(&mut self.endpoints.eth_mainnet_rpc, environment.eth_mainnet_rpc);
        set(&mut self.endpoints.eth_sepolia_rpc, environment.eth_sepolia_rpc);
        set(&mut self.endpoints.eth_goerli_rpc, environment.eth_goerli_rpc);
        set(&mut self.endpoints.polygon_amoy_rpc, environment.polygon_amoy_rpc);
        set(&mut self.endpoints.base_sepolia_rpc, environment.base_sepolia_rpc);
        set(&mut self.endpoints.sepolia_faucet_url, environment.sepolia_faucet_url);
        set(&mut self.endpoints.polygon_amoy_faucet_url, environment.polygon_amoy_faucet_url);
        set(&mut self.endpoints.base_sepolia_faucet_url, environment.base_sepolia_faucet_url);

        if let Some(port) = environment.interactions_port {
            let port = port
                .parse()
                .map_err(|_| Error::Configuration(format!("INTERACTIONS_PORT must be a port number, got {}", port)))?;
            self.discord.port = Some(port);
        }

        if let Some(timeout) = environment.rpc_timeout {
            let timeout = timeout
                .parse()
                .map_err(|_| Error::Configuration(format!("RPC_TIMEOUT must be a number of seconds, got {}", timeout)))?;
            self.rpc_timeout = Some(timeout);
        }

        if let Some(verbosity) = environment.verbosity {
            self.verbosity = VerbosityConfiguration::from_str(&verbosity).ok();
        }

        Ok(())
    }
}

impl TryFrom<Profile> for Configuration {
    type Error = Error;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        fn required(value: Option<String>, variable: &str) -> Result<String, Error> {
            value
                .filter(|x| !x.is_empty())
                .ok_or_else(|| Error::Configuration(format!("missing {}", variable)))
        }

        let registry = match profile.networks {
            Some(networks) => NetworkRegistry::new(networks),
            None => NetworkRegistry::ethereum(&profile.endpoints),
        };

        Ok(Self {
            verbosity: profile.verbosity.unwrap_or(VerbosityConfiguration::Info),
            prometheus: profile.prometheus,
            discord: DiscordConfiguration {
                token: required(profile.discord.token, "DISCORD_TOKEN")?,
                client_id: required(profile.discord.client_id, "DISCORD_CLIENT_ID")?,
                public_key: required(profile.discord.public_key, "DISCORD_PUBLIC_KEY")?,
                port: profile.discord.port.unwrap_or(Configuration::DEFAULT_PORT),
            },
            roles: profile.roles,
            registry,
            rpc_timeout: profile.rpc_timeout.map(Duration::from_secs).unwrap_or(Connector::DEFAULT_TIMEOUT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn environment(variables: &[(&str, &str)]) -> Environment {
        Environment::from_variables(variables.iter().map(|(k, v)| (k.to_string(), v.to_string()))).unwrap()
    }

    fn credentials() -> Vec<(&'static str, &'static str)> {
        vec![("DISCORD_TOKEN", "token"), ("DISCORD_CLIENT_ID", "42"), ("DISCORD_PUBLIC_KEY", "abcd")]
    }

    fn resolve(profile: Profile, variables: &[(&str, &str)]) -> Result<Configuration, Error> {
        let mut profile = profile;
        profile.apply(environment(variables))?;
        Configuration::try_from(profile)
    }

    #[test]
    fn test_verbosity_from_str() {
        assert!(matches!(VerbosityConfiguration::from_str("debug"), Ok(VerbosityConfiguration::Debug)));
        assert!(matches!(VerbosityConfiguration::from_str("info"), Ok(VerbosityConfiguration::Info)));
        assert!(matches!(VerbosityConfiguration::from_str("unknown"), Ok(VerbosityConfiguration::Debug)));
    }

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let configuration = resolve(Profile::default(), &credentials()).unwrap();

        assert_eq!(configuration.discord.token, "token");
        assert_eq!(configuration.discord.port, Configuration::DEFAULT_PORT);
        assert_eq!(configuration.verbosity, VerbosityConfiguration::Info);
        assert_eq!(configuration.rpc_timeout, Connector::DEFAULT_TIMEOUT);
        assert_eq!(configuration.roles, Roles::default());
        assert_eq!(configuration.registry.keys(), vec!["mainnet", "sepolia", "goerli", "polygonAmoy", "baseSepolia"]);
    }

    #[test]
    fn missing_credentials_are_named() {
        let result = resolve(Profile::default(), &[("DISCORD_TOKEN", "token"), ("DISCORD_PUBLIC_KEY", "abcd")]);

        assert!(matches!(result, Err(Error::Configuration(message)) if message == "missing DISCORD_CLIENT_ID"));
    }

    #[test]
    fn empty_variables_count_as_absent() {
        let mut variables = credentials();
        variables.extend([("ETH_SEPOLIA_RPC", ""), ("DEV_MODE_ROLE_ID", ""), ("INTERACTIONS_PORT", "")]);

        let configuration = resolve(Profile::default(), &variables).unwrap();

        assert_eq!(configuration.registry.lookup("sepolia").unwrap().rpc_endpoint, None);
        assert_eq!(configuration.roles.dev_mode, None);
        assert_eq!(configuration.discord.port, Configuration::DEFAULT_PORT);
    }

    #[test]
    fn environment_overrides_profile() {
        let profile: Profile = serde_json::from_str(
            r#"{
                "verbosity": "debug",
                "discord": { "token": "from-profile", "client_id": "1", "public_key": "abcd", "port": 9000 },
                "roles": { "verified": "1111" },
                "endpoints": { "eth_sepolia_rpc": "https://profile.example" },
                "rpc_timeout": 30
            }"#,
        )
        .unwrap();

        let configuration = resolve(
            profile,
            &[("DISCORD_TOKEN", "from-env"), ("ETH_SEPOLIA_RPC", "https://env.example"), ("DEV_MODE_ROLE_ID", "2222"), ("RPC_TIMEOUT", "5")],
        )
        .unwrap();

        assert_eq!(configuration.discord.token, "from-env");
        assert_eq!(configuration.discord.port, 9000);
        assert_eq!(configuration.verbosity, VerbosityConfiguration::Debug);
        assert_eq!(configuration.rpc_timeout, Duration::from_secs(5));
        assert_eq!(configuration.roles.verified.as_deref(), Some("1111"));
        assert_eq!(configuration.roles.dev_mode.as_deref(), Some("2222"));
        assert_eq!(configuration.registry.lookup("sepolia").unwrap().rpc_endpoint.as_deref(), Some("https://env.example"));
    }

    #[test]
    fn profile_networks_replace_defaults() {
        let profile: Profile = serde_json::from_str(
            r#"{
                "networks": [
                    { "key": "holesky", "name": "Holesky Testnet", "chain_id": 17000, "rpc_endpoint": "https://holesky.example", "testnet": true }
                ]
            }"#,
        )
        .unwrap();

        let configuration = resolve(profile, &credentials()).unwrap();

        assert_eq!(configuration.registry.keys(), vec!["holesky"]);
        assert_eq!(configuration.registry.testnet_keys(), vec!["holesky"]);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let mut variables = credentials();
        variables.push(("RPC_TIMEOUT", "soon"));

        let result = resolve(Profile::default(), &variables);

        assert!(matches!(result, Err(Error::Configuration(message)) if message.starts_with("RPC_TIMEOUT")));
    }
}
