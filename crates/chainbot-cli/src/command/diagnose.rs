use std::sync::Arc;

use chainbot_commands::diagnostics::{render, DiagnosticContext, Diagnoser};
use chainbot_evm::NetworkRegistry;
use clap::Args;

use crate::core::{registry, Error};

#[derive(Args, Clone)]
pub struct DiagnoseParameters {
    /// Raw error text, as printed by the failing call
    #[clap(long)]
    pub message: String,

    /// Network the call targeted
    #[clap(long)]
    pub network: Option<String>,
}

fn diagnose(registry: NetworkRegistry, params: &DiagnoseParameters) -> Result<String, Error> {
    let mut context = DiagnosticContext::new(params.message.as_str());

    if let Some(key) = &params.network {
        let network = registry.lookup(key).ok_or(Error::Validation(format!("unknown network {}", key)))?;
        context = context.with_network(network.key.as_str()).with_expected_network(network.name.as_str());
    }

    let entries = Diagnoser::new(Arc::new(registry)).diagnose(&context);

    Ok(render(&entries))
}

pub fn command_diagnose(params: DiagnoseParameters) -> Result<(), Error> {
    println!("{}", diagnose(registry()?, &params)?);
    Ok(())
}
