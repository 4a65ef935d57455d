//! Caller identification and tier classification

use std::collections::HashSet;
use std::net::IpAddr;

use ipnetwork::IpNetwork;

use ca_shared::config::RateLimitConfig;

/// Ceiling tier a caller is counted against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallerTier {
    /// Known service (API key or allow-listed network)
    Internal,
    /// Everyone else
    External,
}

/// A classified caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Rate limit counter key (`api_key:<key>` or `ip:<address>`)
    pub identifier: String,
    pub tier: CallerTier,
}

impl Caller {
    pub fn is_internal(&self) -> bool {
        self.tier == CallerTier::Internal
    }
}

/// Decides who a request comes from and which tier it belongs to
#[derive(Debug, Clone, Default)]
pub struct CallerClassifier {
    internal_networks: Vec<IpNetwork>,
    internal_api_keys: HashSet<String>,
}

impl CallerClassifier {
    pub fn new(
        internal_networks: Vec<IpNetwork>,
        internal_api_keys: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            internal_networks,
            internal_api_keys: internal_api_keys
                .into_iter()
                .filter(|key| !key.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.internal_networks.clone(),
            config.internal_api_keys.iter().cloned(),
        )
    }

    /// Exact match against the internal key set
    pub fn is_internal_key(&self, api_key: &str) -> bool {
        self.internal_api_keys.contains(api_key)
    }

    /// Whether the address falls inside an allow-listed network
    pub fn is_internal_ip(&self, ip: IpAddr) -> bool {
        let ip = canonical(ip);
        self.internal_networks.iter().any(|network| network.contains(ip))
    }

    /// Classify a request by its service API key and source address
    ///
    /// A matching API key takes priority as the identifier; otherwise the
    /// source address is used. The caller is internal if either the key
    /// matches or the address is allow-listed.
    pub fn classify(&self, api_key: Option<&str>, ip: Option<IpAddr>) -> Caller {
        let known_key = api_key.filter(|key| self.is_internal_key(key));
        let internal_ip = ip.is_some_and(|ip| self.is_internal_ip(ip));

        let identifier = match (known_key, ip) {
            (Some(key), _) => format!("api_key:{}", key),
            (None, Some(ip)) => format!("ip:{}", canonical(ip)),
            (None, None) => "ip:unknown".to_string(),
        };
        let tier = if known_key.is_some() || internal_ip {
            CallerTier::Internal
        } else {
            CallerTier::External
        };

        Caller { identifier, tier }
    }
}

/// IPv4-mapped IPv6 addresses count as their IPv4 form
fn canonical(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
        v4 => v4,
    }
}
