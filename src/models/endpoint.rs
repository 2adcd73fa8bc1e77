//! Region records and probe endpoints

use crate::{
    defaults,
    error::{AppError, Result},
    types::{IpVersion, Provider},
};
use serde::{Deserialize, Serialize};

/// One entry of the region map: a region name and up to three provider addresses
///
/// Keys follow the `map.json` layout (`province`, `联通`, `移动`, `电信`);
/// English aliases are accepted as well. A missing or empty provider address
/// means the provider is not tested in that region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    #[serde(rename = "province", alias = "region")]
    pub region: String,

    #[serde(rename = "联通", alias = "unicom", default)]
    pub unicom: String,

    #[serde(rename = "移动", alias = "mobile", default)]
    pub mobile: String,

    #[serde(rename = "电信", alias = "telecom", default)]
    pub telecom: String,
}

impl RegionRecord {
    pub fn new<S: Into<String>>(region: S) -> Self {
        Self {
            region: region.into(),
            unicom: String::new(),
            mobile: String::new(),
            telecom: String::new(),
        }
    }

    /// Builder-style setter for one provider address
    pub fn with_address<S: Into<String>>(mut self, provider: Provider, address: S) -> Self {
        let address = address.into();
        match provider {
            Provider::Unicom => self.unicom = address,
            Provider::Mobile => self.mobile = address,
            Provider::Telecom => self.telecom = address,
        }
        self
    }

    /// Raw address configured for a provider (possibly empty)
    pub fn address(&self, provider: Provider) -> &str {
        match provider {
            Provider::Unicom => &self.unicom,
            Provider::Mobile => &self.mobile,
            Provider::Telecom => &self.telecom,
        }
    }

    /// Providers with a non-empty address, in fixed provider order
    pub fn configured_providers(&self) -> impl Iterator<Item = (Provider, &str)> + '_ {
        Provider::ALL
            .into_iter()
            .map(move |provider| (provider, self.address(provider)))
            .filter(|(_, address)| !address.is_empty())
    }

    /// Endpoints of this region for one IP version
    pub fn endpoints(&self, ip_version: IpVersion) -> Vec<Endpoint> {
        self.configured_providers()
            .map(|(provider, address)| {
                let address = match ip_version {
                    IpVersion::V4 => address.to_string(),
                    IpVersion::V6 => derive_ipv6_address(address),
                };
                Endpoint::new(self.region.clone(), provider, ip_version, address)
            })
            .collect()
    }
}

/// Derive the IPv6 probe address from an IPv4 one
///
/// Replaces the first `-v4.ip` with `-v6.ip`. Addresses without the marker
/// come back unchanged, so the IPv6 pass then probes the IPv4 host again.
pub fn derive_ipv6_address(address: &str) -> String {
    address.replacen(defaults::IPV4_HOST_MARKER, defaults::IPV6_HOST_MARKER, 1)
}

/// One (region, provider, IP version) probe target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub region: String,
    pub provider: Provider,
    pub ip_version: IpVersion,
    /// Address in `host:port` form, as configured
    pub address: String,
}

impl Endpoint {
    pub fn new<S: Into<String>, A: Into<String>>(
        region: S,
        provider: Provider,
        ip_version: IpVersion,
        address: A,
    ) -> Self {
        Self {
            region: region.into(),
            provider,
            ip_version,
            address: address.into(),
        }
    }

    /// Provider and IP version label, e.g. `联通-IPv4`
    pub fn label(&self) -> String {
        format!("{}-{}", self.provider.label(), self.ip_version.label())
    }

    /// Split the address into host and port
    ///
    /// The address must contain exactly one `:`. Anything else, including
    /// bracketed IPv6 literals, is rejected as malformed.
    pub fn target(&self) -> Result<ProbeTarget> {
        let mut parts = self.address.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(host), Some(port), None) => Ok(ProbeTarget {
                host: host.to_string(),
                port: port.to_string(),
            }),
            _ => Err(AppError::malformed_address(self.address.clone())),
        }
    }
}

/// Host and port of a validated endpoint address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    pub host: String,
    pub port: String,
}

impl ProbeTarget {
    /// Address string handed to the resolver
    pub fn connect_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
