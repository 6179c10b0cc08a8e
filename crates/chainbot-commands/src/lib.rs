use thiserror::Error;

mod context;
pub use context::{Context, Roles};

pub mod diagnostics;
pub mod handler;
pub mod interaction;
pub mod store;

mod guard;
pub use guard::RoleGuard;

mod router;
pub use router::{Resolution, RouteTable, Router};

#[cfg(test)]
mod testing;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Interaction(#[from] interaction::Error),

    #[error(transparent)]
    Chain(#[from] chainbot_evm::Error),

    #[error("handler panicked: {0}")]
    Panic(String),
}
