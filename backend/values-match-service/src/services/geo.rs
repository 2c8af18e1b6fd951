/// Visitor Geolocation
///
/// Resolves client IPs through ipinfo-style JSON lookups. Successful lookups are
/// kept in a bounded TTL cache owned by the locator; failures are never cached.
use crate::config::GeoConfig;
use crate::models::Location;
use moka::future::Cache;
use std::net::IpAddr;
use tracing::{debug, warn};

pub struct IpLocator {
    client: reqwest::Client,
    base_url: String,
    enabled: bool,
    cache: Cache<String, Location>,
}

impl IpLocator {
    pub fn new(config: &GeoConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            enabled: config.enabled,
            cache,
        })
    }

    /// Never fails: lookup problems come back as a `Location` with `error` set.
    pub async fn locate(&self, raw_ip: &str) -> Location {
        // Only well-formed addresses go into the lookup URL
        let ip = match raw_ip.trim().parse::<IpAddr>() {
            Ok(ip) => ip.to_string(),
            Err(_) => {
                return Location::unknown(raw_ip, Some("invalid ip address".to_string()));
            }
        };

        if !self.enabled {
            return Location::unknown(&ip, None);
        }

        if let Some(hit) = self.cache.get(&ip).await {
            debug!(ip = %ip, "Location cache hit");
            return hit;
        }

        match self.fetch(&ip).await {
            Ok(location) => {
                self.cache.insert(ip, location.clone()).await;
                location
            }
            Err(e) => {
                warn!(ip = %ip, error = %e, "Location lookup failed");
                Location::unknown(&ip, Some(e.to_string()))
            }
        }
    }

    async fn fetch(&self, ip: &str) -> Result<Location, reqwest::Error> {
        let url = format!("{}/{}/json", self.base_url, ip);
        let mut location: Location = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if location.ip.is_empty() {
            location.ip = ip.to_string();
        }
        Ok(location)
    }
}
