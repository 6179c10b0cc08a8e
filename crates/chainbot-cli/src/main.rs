use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;

mod command;
pub mod core;

use crate::command::diagnose::{command_diagnose, DiagnoseParameters};
use crate::command::networks::command_networks;
use crate::command::register::{command_register, RegisterParameters};
use crate::core::Error;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Register the slash commands of the bot. Run again whenever commands or networks change")]
    Register(RegisterParameters),

    #[command(about = "List the networks the bot knows about")]
    Networks,

    #[command(about = "Explain an RPC error message the way the bot would")]
    Diagnose(DiagnoseParameters),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let logger = SimpleLogger::new().with_level(LevelFilter::Info);
    log::set_boxed_logger(Box::new(logger)).map_err(|e| Error::Execution(e.to_string()))?;
    log::set_max_level(LevelFilter::Info);

    let cli = Cli::parse();

    match cli.command {
        Commands::Register(params) => command_register(params).await?,
        Commands::Networks => command_networks()?,
        Commands::Diagnose(params) => command_diagnose(params)?,
    }

    Ok(())
}
