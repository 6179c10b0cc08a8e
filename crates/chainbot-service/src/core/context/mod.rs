use std::sync::Arc;

use chainbot_commands::store::MemoryWalletStore;
use chainbot_discord::RestClient;
use chainbot_evm::Chain;

use crate::core::context::configuration::{Configuration, Profile};
use crate::core::context::environment::{profile_path, Environment};
use crate::core::Error;

pub mod configuration;
pub mod environment;

/// Shared by every service of the process. Survives service restarts, so linked wallets and
/// connection handles do too.
#[derive(Clone)]
pub struct Context {
    pub configuration: Configuration,

    pub commands: chainbot_commands::Context,
    pub rest: Arc<RestClient>,
}

impl Context {
    pub fn new(configuration: Configuration) -> Result<Self, Error> {
        let rest = Arc::new(
            RestClient::new(&configuration.discord.token, &configuration.discord.client_id).map_err(|e| Error::Configuration(e.to_string()))?,
        );

        let chain = Chain::new(configuration.registry.clone(), configuration.connector());
        let commands = chainbot_commands::Context::new(configuration.roles.clone(), chain, Arc::new(MemoryWalletStore::new()), rest.clone());

        Ok(Self {
            configuration,
            commands,
            rest,
        })
    }

    pub fn load() -> Result<Self, Error> {
        let _ = dotenvy::dotenv();

        let environment = Environment::load()?;

        let path = profile_path(&environment);
        if path.is_none() {
            println!(
                "No profile file specified.
Please provide a configuration profile using the `--profile` argument or the `CHAINBOT_PROFILE` environment variable, \
unless all variables are set via environment variables."
            );
        }

        let mut profile = path.as_deref().map(Profile::from_file).unwrap_or(Ok(Profile::default()))?;
        profile.apply(environment)?;

        Configuration::try_from(profile).and_then(Self::new)
    }
}
