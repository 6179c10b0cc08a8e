use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::Poll;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Json};
use chainbot_commands::Router;
use chainbot_common::metric;
use futures::{stream, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::payload::{Interaction, InteractionKind, InteractionResponse};
use crate::signature::verify_signature;
use crate::invocation::InitialResponse;
use crate::{DiscordInvocation, Error, RestClient, SignatureVerifier};

#[derive(Clone)]
struct Shared {
    router: Router,
    rest: Arc<RestClient>,
}

/// HTTP endpoint receiving the interactions of the application
pub struct InteractionsServer {
    shared: Shared,
    verifier: Arc<SignatureVerifier>,
}

/// Running server
pub struct ServerHandle {
    address: SocketAddr,
    task: JoinHandle<Result<(), Error>>,
}

impl ServerHandle {
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Resolves once the server stopped accepting requests
    pub async fn stopped(self) -> Result<(), Error> {
        self.task.await.map_err(|e| Error::Server(e.to_string()))?
    }
}

impl InteractionsServer {
    /// Time the platform waits for the initial response of an interaction
    pub const INITIAL_RESPONSE_TIMEOUT: Duration = Duration::from_secs(3);

    pub fn new(router: Router, rest: Arc<RestClient>, verifier: SignatureVerifier) -> Self {
        Self {
            shared: Shared { router, rest },
            verifier: Arc::new(verifier),
        }
    }

    pub fn app(&self) -> axum::Router {
        let interactions = axum::Router::new()
            .route("/interactions", post(interactions))
            .route_layer(middleware::from_fn_with_state(self.verifier.clone(), verify_signature));

        axum::Router::new()
            .merge(interactions)
            .route("/health", get(health))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(self.shared.clone())
    }

    pub async fn start(self, port: u16) -> Result<ServerHandle, Error> {
        let url = format!("0.0.0.0:{}", port);

        let listener = TcpListener::bind(&url).await.map_err(|e| Error::Server(e.to_string()))?;
        let address = listener.local_addr().map_err(|e| Error::Server(e.to_string()))?;
        info!("Starting interactions server at {}", address);

        let app = self.app();
        let task = tokio::spawn(async move { axum::serve(listener, app).await.map_err(|e| Error::Server(e.to_string())) });

        Ok(ServerHandle { address, task })
    }
}

async fn health() -> &'static str {
    "OK"
}

async fn interactions(State(shared): State<Shared>, Json(interaction): Json<Interaction>) -> Response {
    match interaction.kind {
        InteractionKind::PING => Json(InteractionResponse::pong()).into_response(),
        InteractionKind::APPLICATION_COMMAND => dispatch(shared, interaction).await,
        kind => {
            warn!(kind, "unsupported interaction type");
            StatusCode::BAD_REQUEST.into_response()
        },
    }
}

/// Routes the command on its own task and answers with whatever the handler sends first
async fn dispatch(shared: Shared, interaction: Interaction) -> Response {
    let (invocation, initial) = match DiscordInvocation::new(interaction, shared.rest) {
        Ok(x) => x,
        Err(e) => {
            warn!(error = %e, "rejected interaction");
            return StatusCode::BAD_REQUEST.into_response();
        },
    };

    let router = shared.router;
    tokio::spawn(async move { router.route(&invocation).await });

    match tokio::time::timeout(InteractionsServer::INITIAL_RESPONSE_TIMEOUT, initial).await {
        Ok(Ok(initial)) => initial_response(initial),
        Ok(Err(_)) => {
            error!("invocation completed without initial response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        },
        Err(_) => {
            metric!(counter[interaction_timeout] = 1);
            error!("no initial response within {}ms", InteractionsServer::INITIAL_RESPONSE_TIMEOUT.as_millis());
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        },
    }
}

/// Serialises the initial response. `written` fires once the whole body was handed to the
/// connection, which is when follow-up edits may start.
fn initial_response(initial: InitialResponse) -> Response {
    let InitialResponse { response, written } = initial;

    let body = match serde_json::to_vec(&response) {
        Ok(x) => x,
        Err(e) => {
            error!(error = %e, "could not serialise initial response");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        },
    };

    ([(header::CONTENT_TYPE, "application/json")], Body::from_stream(written_stream(body, written))).into_response()
}

fn written_stream(body: Vec<u8>, written: oneshot::Sender<()>) -> impl futures::Stream<Item = Result<Bytes, Infallible>> + Send {
    let mut written = Some(written);
    let end = stream::poll_fn(move |_| {
        if let Some(written) = written.take() {
            let _ = written.send(());
        }
        Poll::Ready(None::<Result<Bytes, Infallible>>)
    });

    stream::iter([Ok(Bytes::from(body))]).chain(end)
}
