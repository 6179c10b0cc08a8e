use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use chainbot_common::metric;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use tracing::warn;

use crate::Error;

pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Largest interaction body accepted
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Checks that a request body was signed by the application key
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
}

impl SignatureVerifier {
    /// `public_key` is the hex encoded key of the application
    pub fn new(public_key: &str) -> Result<Self, Error> {
        let bytes = hex::decode(public_key.trim()).map_err(|e| Error::InvalidPublicKey(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| Error::InvalidPublicKey("expected 32 bytes".to_string()))?;

        let key = VerifyingKey::from_bytes(&bytes).map_err(|e| Error::InvalidPublicKey(e.to_string()))?;

        Ok(Self { key })
    }

    /// The signed message is the timestamp header followed by the raw body
    pub fn verify(&self, signature: &str, timestamp: &str, body: &[u8]) -> Result<(), Error> {
        let signature = hex::decode(signature).map_err(|_| Error::InvalidSignature)?;
        let signature = Signature::from_slice(&signature).map_err(|_| Error::InvalidSignature)?;

        let message = [timestamp.as_bytes(), body].concat();

        self.key.verify(&message, &signature).map_err(|_| Error::InvalidSignature)
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|x| x.to_str().ok())
}

/// Rejects with 401 every request whose signature does not match its body
pub async fn verify_signature(State(verifier): State<Arc<SignatureVerifier>>, request: Request, next: Next) -> Result<Response, StatusCode> {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_BODY_SIZE).await.map_err(|_| StatusCode::PAYLOAD_TOO_LARGE)?;

    let (Some(signature), Some(timestamp)) = (header(&parts.headers, SIGNATURE_HEADER), header(&parts.headers, TIMESTAMP_HEADER)) else {
        metric!(counter[interaction_rejected] = 1, reason = "unsigned");
        return Err(StatusCode::UNAUTHORIZED);
    };

    if let Err(e) = verifier.verify(signature, timestamp, &body) {
        metric!(counter[interaction_rejected] = 1, reason = "signature");
        warn!(error = %e, "rejected interaction");
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(Request::from_parts(parts, Body::from(body))).await)
}
