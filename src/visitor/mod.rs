//! Visitor identity resolution
//!
//! Turns an inbound request into a stable pseudonymous digest. The raw client
//! address never leaves this module except through the digest.

pub mod digest;
pub mod ip_extractor;

pub use digest::{init_visitor_salt, VisitorDigest};
pub use ip_extractor::extract_client_address;

use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};

/// Resolve the visitor digest for a request's headers and peer address
pub fn resolve(headers: &HeaderMap, peer_ip: Option<IpAddr>) -> VisitorDigest {
    VisitorDigest::from_address(&extract_client_address(headers, peer_ip))
}

/// Extractor yielding the visitor digest of the current request
///
/// Never rejects: unresolvable requests share the `"unknown"` digest.
#[derive(Debug, Clone)]
pub struct Visitor(pub VisitorDigest);

impl<S> FromRequestParts<S> for Visitor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer_ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        Ok(Visitor(resolve(&parts.headers, peer_ip)))
    }
}
