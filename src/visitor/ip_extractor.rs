//! Client address extraction from HTTP headers
//!
//! Resolution order:
//! - first entry of `X-Forwarded-For` (proxies append, so the original client is leftmost)
//! - `X-Real-IP`
//! - the socket peer address
//! - the literal `"unknown"`
//!
//! Addresses are kept as raw strings. They only feed the visitor digest, so an
//! unparsable value is still a stable identity and is not rejected.

use axum::http::HeaderMap;
use std::net::IpAddr;

pub const UNKNOWN_ADDRESS: &str = "unknown";

/// Extract the best-effort client address for a request
///
/// # Arguments
/// * `headers` - HTTP request headers
/// * `peer_ip` - The socket peer address, when the server recorded one
pub fn extract_client_address(headers: &HeaderMap, peer_ip: Option<IpAddr>) -> String {
    extract_forwarded_for(headers)
        .or_else(|| extract_real_ip(headers))
        .or_else(|| peer_ip.map(|ip| ip.to_string()))
        .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string())
}

fn extract_forwarded_for(headers: &HeaderMap) -> Option<String> {
    let xff = headers.get("x-forwarded-for")?.to_str().ok()?;
    let first = xff.split(',').next()?.trim();
    (!first.is_empty()).then(|| first.to_string())
}

fn extract_real_ip(headers: &HeaderMap) -> Option<String> {
    let real_ip = headers.get("x-real-ip")?.to_str().ok()?.trim();
    (!real_ip.is_empty()).then(|| real_ip.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<IpAddr> {
        Some("192.168.1.1".parse().unwrap())
    }

    #[test]
    fn test_forwarded_for_takes_leftmost_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.5, 10.0.0.1"),
        );
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));

        assert_eq!(extract_client_address(&headers, peer()), "203.0.113.5");
    }

    #[test]
    fn test_forwarded_for_entry_is_trimmed() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("  2001:db8::1 ,10.0.0.1"));

        assert_eq!(extract_client_address(&headers, peer()), "2001:db8::1");
    }

    #[test]
    fn test_real_ip_used_without_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));

        assert_eq!(extract_client_address(&headers, peer()), "198.51.100.7");
    }

    #[test]
    fn test_empty_forwarded_for_falls_through() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" , 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.7"));

        assert_eq!(extract_client_address(&headers, peer()), "198.51.100.7");
    }

    #[test]
    fn test_peer_address_fallback() {
        let headers = HeaderMap::new();
        assert_eq!(extract_client_address(&headers, peer()), "192.168.1.1");
    }

    #[test]
    fn test_unknown_when_nothing_resolves() {
        let headers = HeaderMap::new();
        assert_eq!(extract_client_address(&headers, None), UNKNOWN_ADDRESS);
    }
}
