//! Per-request context: a unique request id and the resolved client address.
//!
//! Both are assigned in one pass before the trace span is created, so every
//! log line of a submission can be correlated with the `X-Request-Id` echoed
//! to the client and with the rate limit bucket of the sender.

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{
    extract::{ConnectInfo, Request},
    middleware::{from_fn, Next},
    response::IntoResponse,
    Router,
};
use base64::{display::Base64Display, engine::general_purpose::STANDARD_NO_PAD};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::RealIpConfig;

const REQUEST_ID_HEADER: &str = "X-Request-Id";

pub fn add<S: Clone + Send + Sync + 'static>(
    router: Router<S>,
    real_ip: Option<Arc<RealIpConfig>>,
) -> Router<S> {
    router.layer(from_fn(move |mut request: Request, next: Next| {
        let real_ip = real_ip.clone();
        async move {
            let request_id = RequestId::new();
            let client_ip = ClientIp::resolve(&request, real_ip.as_deref());
            request.extensions_mut().insert(request_id);
            request.extensions_mut().insert(client_ip);
            let response = next.run(request).await;
            ([(REQUEST_ID_HEADER, request_id.to_string())], response).into_response()
        }
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub Uuid);

impl RequestId {
    fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Base64Display::new(self.0.as_bytes(), &STANDARD_NO_PAD).fmt(f)
    }
}

/// The address contact submissions are rate limited by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientIp(pub IpAddr);

impl ClientIp {
    /// The connection peer address, unless the connection comes from the
    /// trusted reverse proxy, in which case the configured header wins.
    fn resolve(request: &Request, real_ip: Option<&RealIpConfig>) -> Self {
        let connecting = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .unwrap()
            .ip();

        let Some(RealIpConfig { header, set_from }) = real_ip else {
            return Self(connecting);
        };
        let header_value = request.headers().get(header);

        if connecting != *set_from {
            if header_value.is_some() {
                debug!(%connecting, "ignoring client ip header from untrusted peer");
            }
            return Self(connecting);
        }

        match header_value.map(|value| value.to_str().ok()?.parse().ok()) {
            Some(Some(forwarded)) => Self(forwarded),
            Some(None) => {
                error!(%connecting, "failed to parse client ip header");
                Self(connecting)
            }
            None => {
                warn!(%connecting, "client ip header missing on proxied request");
                Self(connecting)
            }
        }
    }
}
