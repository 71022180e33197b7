use std::sync::atomic::{AtomicUsize, Ordering};

use symbiotic_types::{
    aliases::EvmAddress,
    constants::{DEFAULT_BEACON_API_URL, DEFAULT_ETH_API_URLS},
    error::SourceError,
};
use url::Url;

/// A circular list of endpoint URLs.
///
/// The head advances on `rotate`; rotation state is per-process and
/// never part of replicated state.
pub struct EndpointRing {
    urls: Vec<Url>,
    head: AtomicUsize,
}

impl EndpointRing {
    pub fn new(urls: Vec<Url>) -> Self {
        assert!(!urls.is_empty(), "endpoint ring cannot be empty");
        Self { urls, head: AtomicUsize::new(0) }
    }

    pub fn current(&self) -> Url {
        self.urls[self.head.load(Ordering::Relaxed) % self.urls.len()].clone()
    }

    pub fn rotate(&self) {
        self.head.fetch_add(1, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// The Beacon-API and execution-layer endpoint rings.
pub struct ApiUrls {
    beacon: EndpointRing,
    eth: EndpointRing,
}

impl ApiUrls {
    pub fn new(beacon_urls: Vec<Url>, eth_urls: Vec<Url>) -> Self {
        Self { beacon: EndpointRing::new(beacon_urls), eth: EndpointRing::new(eth_urls) }
    }

    /// Reads `BEACON_API_URL` (single URL) and `ETH_API_URLS`
    /// (comma-separated), falling back to the public Holesky endpoints.
    pub fn from_env() -> Result<Self, SourceError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SourceError> {
        let beacon = match lookup("BEACON_API_URL") {
            Some(raw) if !raw.is_empty() => parse_url(&raw)?,
            _ => parse_url(DEFAULT_BEACON_API_URL)?,
        };

        let eth_urls = match lookup("ETH_API_URLS") {
            Some(raw) if !raw.is_empty() => {
                raw.split(',').map(|u| parse_url(u.trim())).collect::<Result<Vec<_>, _>>()?
            }
            _ => DEFAULT_ETH_API_URLS
                .iter()
                .map(|u| parse_url(u))
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(Self::new(vec![beacon], eth_urls))
    }

    pub fn current_beacon_url(&self) -> Url {
        self.beacon.current()
    }

    pub fn current_eth_url(&self) -> Url {
        self.eth.current()
    }

    pub fn rotate_beacon(&self) {
        self.beacon.rotate();
    }

    pub fn rotate_eth(&self) {
        self.eth.rotate();
    }
}

fn parse_url(raw: &str) -> Result<Url, SourceError> {
    Url::parse(raw).map_err(|e| SourceError::InvalidResponse(format!("invalid URL {raw}: {e}")))
}

/// Configuration of the middleware contract binding.
#[derive(Clone, Debug)]
pub struct MiddlewareConfig {
    /// Address of the middleware contract on the execution layer.
    pub address: EvmAddress,
    /// Development toggles; enabled by any non-empty `DEBUG` value.
    pub debug: bool,
}

impl MiddlewareConfig {
    pub fn new(address: EvmAddress) -> Self {
        Self { address, debug: false }
    }

    /// Reads `MIDDLEWARE_ADDRESS` (required) and `DEBUG`.
    pub fn from_env() -> Result<Self, SourceError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SourceError> {
        let raw = lookup("MIDDLEWARE_ADDRESS").unwrap_or_default();
        if raw.is_empty() {
            return Err(SourceError::MissingMiddlewareAddress);
        }
        let address: EvmAddress = raw
            .parse()
            .map_err(|e| SourceError::InvalidResponse(format!("invalid MIDDLEWARE_ADDRESS: {e}")))?;

        let debug = !lookup("DEBUG").unwrap_or_default().is_empty();

        Ok(Self { address, debug })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(urls: &[&str]) -> EndpointRing {
        EndpointRing::new(urls.iter().map(|u| Url::parse(u).unwrap()).collect())
    }

    #[test]
    fn rotation_is_circular() {
        let ring = ring(&["http://a.example/", "http://b.example/", "http://c.example/"]);
        assert_eq!(ring.current().as_str(), "http://a.example/");
        ring.rotate();
        assert_eq!(ring.current().as_str(), "http://b.example/");
        ring.rotate();
        ring.rotate();
        assert_eq!(ring.current().as_str(), "http://a.example/");
    }

    #[test]
    fn single_url_ring_survives_rotation() {
        let ring = ring(&["http://only.example/"]);
        ring.rotate();
        assert_eq!(ring.current().as_str(), "http://only.example/");
    }

    #[test]
    fn api_urls_fall_back_to_holesky_defaults() {
        let urls = ApiUrls::from_lookup(|_| None).unwrap();
        assert_eq!(urls.current_beacon_url().as_str().trim_end_matches('/'),
            symbiotic_types::constants::DEFAULT_BEACON_API_URL);
        urls.rotate_eth();
        urls.rotate_eth();
        urls.rotate_eth();
        // three defaults wrap back around
        assert_eq!(
            urls.current_eth_url().as_str().trim_end_matches('/'),
            symbiotic_types::constants::DEFAULT_ETH_API_URLS[0]
        );
    }

    #[test]
    fn eth_api_urls_are_comma_separated() {
        let urls = ApiUrls::from_lookup(|name| match name {
            "ETH_API_URLS" => Some("http://a.example, http://b.example".to_owned()),
            _ => None,
        })
        .unwrap();
        assert_eq!(urls.current_eth_url().as_str(), "http://a.example/");
        urls.rotate_eth();
        assert_eq!(urls.current_eth_url().as_str(), "http://b.example/");
    }

    #[test]
    fn middleware_address_is_required() {
        assert!(matches!(
            MiddlewareConfig::from_lookup(|_| None),
            Err(SourceError::MissingMiddlewareAddress)
        ));

        let config = MiddlewareConfig::from_lookup(|name| match name {
            "MIDDLEWARE_ADDRESS" => {
                Some("0x4242424242424242424242424242424242424242".to_owned())
            }
            "DEBUG" => Some("1".to_owned()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.address, EvmAddress::repeat_byte(0x42));
        assert!(config.debug);
    }
}
