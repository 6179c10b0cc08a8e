use async_trait::async_trait;
use thiserror::Error;

mod runner;

pub use runner::TokioServiceManager;

pub mod monitoring;

pub use tracing;

#[derive(Error, Debug)]
#[error("{0}")]
pub struct Error(String);

impl Error {
    pub fn new(s: &str) -> Error {
        Error(s.to_string())
    }

    pub fn from<E: std::error::Error>(e: E) -> Self {
        Self(e.to_string())
    }
}

/// Represent a service. A service is a concurrent entity with its own lifecycle, running on a
/// [`Service::Context`] shared with the other services of the process.
/// The service is created using [`Self::new`] and executed by calling [`Self::run`].
///
/// Services are registered on a [`TokioServiceManager`] which restarts them whenever they stop.
#[async_trait]
pub trait Service {
    const NAME: &'static str;
    type Context: Clone + Send;

    /// Returns a new service instance
    async fn new(context: Self::Context) -> Self;

    /// Runs the given service. Run should never return in general, except if there is
    /// an unrecoverable error in which case the manager will create a new instance and
    /// execute it.
    async fn run(self) -> Result<(), Error>;
}
