use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::Layer;

use crate::core::context::configuration::VerbosityConfiguration;

pub struct Fmt;

impl Fmt {
    /// Compact console output. HTTP internals stay at warn whatever the verbosity.
    pub fn layer<S>(verbosity: &VerbosityConfiguration) -> impl Layer<S>
    where
        S: for<'span> tracing_subscriber::registry::LookupSpan<'span> + tracing::Subscriber,
    {
        let level = match verbosity {
            VerbosityConfiguration::Info => LevelFilter::INFO,
            VerbosityConfiguration::Debug => LevelFilter::DEBUG,
        };

        let filter = Targets::new()
            .with_default(level)
            .with_target("hyper", LevelFilter::WARN)
            .with_target("reqwest", LevelFilter::WARN);

        tracing_subscriber::fmt::layer().with_ansi(false).compact().with_filter(filter)
    }
}
