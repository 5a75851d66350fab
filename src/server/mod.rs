//! HTTP server for the health surface.
//!
//! A small hyper accept loop: every connection is served HTTP/1.1 and every
//! request is routed through the [`HealthEndpoint`]. The server also owns
//! the trusted-proxy policy, resolving the canonical client address before
//! the access gate ever sees it.
//!
//! # Example
//!
//! ```rust,ignore
//! use vitals::server::{HealthEndpoint, Server};
//!
//! let server = Server::bind(addr, endpoint, false).await?;
//! server.run().await?;
//! ```

mod endpoint;

pub use endpoint::HealthEndpoint;

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use hyper::body::Incoming as IncomingBody;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Health endpoint server.
pub struct Server {
    listener: TcpListener,
    endpoint: Arc<HealthEndpoint>,
    trust_forwarded: bool,
}

impl Server {
    /// Bind the listener. Fails fast if the address is unavailable.
    pub async fn bind(
        addr: SocketAddr,
        endpoint: HealthEndpoint,
        trust_forwarded: bool,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, route = endpoint.route_prefix(), "listening");
        Ok(Self {
            listener,
            endpoint: Arc::new(endpoint),
            trust_forwarded,
        })
    }

    /// Address actually bound (useful when binding port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. Runs until the owning task is dropped or cancelled.
    pub async fn run(self) -> std::io::Result<()> {
        loop {
            let (stream, remote_addr) = self.listener.accept().await?;
            let _ = stream.set_nodelay(true);
            let endpoint = Arc::clone(&self.endpoint);
            let trust_forwarded = self.trust_forwarded;

            tokio::spawn(async move {
                let service = service_fn(move |req: Request<IncomingBody>| {
                    let endpoint = Arc::clone(&endpoint);
                    async move {
                        let client = resolve_client_ip(&req, remote_addr, trust_forwarded);
                        let response = endpoint.handle(req.uri().path(), client).await;
                        Ok::<_, Infallible>(response)
                    }
                });

                let io = TokioIo::new(stream);
                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    debug!(error = %e, "connection closed with error");
                }
            });
        }
    }
}

/// Resolve the canonical client address for one request.
///
/// With `trust_forwarded` set, the first `X-Forwarded-For` entry wins: the
/// trusted proxy in front of this service appends the real client there.
/// Otherwise the peer address of the TCP connection is authoritative. An
/// unparseable header falls back to the peer address rather than failing
/// the request.
fn resolve_client_ip<B>(req: &Request<B>, remote_addr: SocketAddr, trust_forwarded: bool) -> IpAddr {
    if trust_forwarded {
        if let Some(forwarded) = req
            .headers()
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|value| value.trim().parse::<IpAddr>().ok())
        {
            return forwarded;
        }
    }
    remote_addr.ip()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(xff: Option<&str>) -> Request<()> {
        let mut builder = Request::builder().uri("/health");
        if let Some(value) = xff {
            builder = builder.header("X-Forwarded-For", value);
        }
        builder.body(()).unwrap()
    }

    fn peer() -> SocketAddr {
        "10.1.1.1:44312".parse().unwrap()
    }

    #[test]
    fn test_untrusted_uses_peer_address() {
        let req = request(Some("203.0.113.9"));
        let ip = resolve_client_ip(&req, peer(), false);
        assert_eq!(ip, "10.1.1.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_trusted_uses_first_forwarded_entry() {
        let req = request(Some("203.0.113.9, 10.1.1.1"));
        let ip = resolve_client_ip(&req, peer(), true);
        assert_eq!(ip, "203.0.113.9".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_trusted_without_header_uses_peer() {
        let req = request(None);
        let ip = resolve_client_ip(&req, peer(), true);
        assert_eq!(ip, "10.1.1.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_garbage_header_falls_back_to_peer() {
        let req = request(Some("not-an-address"));
        let ip = resolve_client_ip(&req, peer(), true);
        assert_eq!(ip, "10.1.1.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_forwarded_v6_entry() {
        let req = request(Some("2001:db8::17"));
        let ip = resolve_client_ip(&req, peer(), true);
        assert_eq!(ip, "2001:db8::17".parse::<IpAddr>().unwrap());
    }
}
