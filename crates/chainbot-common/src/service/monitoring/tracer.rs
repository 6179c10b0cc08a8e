use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, SpanExporter, WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing::level_filters::LevelFilter;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::service::monitoring::Configuration;
use crate::service::Error;

pub struct Tracer;

impl Tracer {
    /// Exports the spans opened by `#[instrument]` on the chain client and the command router.
    pub fn layer<S>(configuration: &Configuration) -> Result<impl Layer<S>, Error>
    where
        S: Subscriber,
        S: for<'span> LookupSpan<'span>,
    {
        let exporter = SpanExporter::builder()
            .with_http()
            .with_endpoint(format!("{}/v1/traces", configuration.endpoint))
            .with_protocol(Protocol::HttpBinary)
            .with_headers(configuration.headers())
            .build()
            .map_err(Error::from)?;

        let provider = SdkTracerProvider::builder()
            .with_batch_exporter(exporter)
            .with_resource(Resource::builder().with_service_name("chainbot").build())
            .build();

        let tracer = provider.tracer("chainbot");
        Ok(tracing_opentelemetry::layer().with_tracer(tracer).with_filter(LevelFilter::TRACE))
    }
}
