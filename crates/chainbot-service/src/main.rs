use chainbot_common::service::monitoring::{Metric, Tracer};
use chainbot_common::service::{Error, TokioServiceManager};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::core::context::Context;
use crate::core::Fmt;
use crate::interactions::InteractionsService;

mod core;
mod interactions;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let context = Context::load()?;

    let metric_layer = context.configuration.prometheus.as_ref().map(Metric::layer).transpose()?;
    let tracer_layer = context.configuration.prometheus.as_ref().map(Tracer::layer).transpose()?;
    let fmt_layer = Fmt::layer(&context.configuration.verbosity);

    let subscriber = Registry::default().with(fmt_layer).with(metric_layer).with(tracer_layer);

    tracing::subscriber::set_global_default(subscriber).map_err(Error::from)?;

    info!(networks = context.configuration.registry.len(), "configuration loaded");

    let mut services = TokioServiceManager::new(context);
    info!("starting services...");
    services.spawn::<InteractionsService>();

    info!("all services started");
    services.wait().await
}
