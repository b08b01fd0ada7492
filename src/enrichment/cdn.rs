//! CDN provider classification.

use std::fmt;

use serde::Serialize;

/// Organization name fragments of known CDN operators.
pub const CDN_PROVIDERS: &[&str] = &[
    "Cloudflare",
    "Akamai",
    "Fastly",
    "EdgeCast",
    "Tencent",
    "Alibaba",
    "Baidu",
    "ChinaCache",
    "Huawei",
    "JD",
    "Kingsoft",
    "Wangsu",
    "Sangfor",
];

/// Whether an address belongs to a CDN or to the origin's own infrastructure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProviderType {
    #[serde(rename = "CDN")]
    Cdn,
    Origin,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::Cdn => write!(f, "CDN"),
            ProviderType::Origin => write!(f, "Origin"),
        }
    }
}

/// Classifies an address from its ASN label and the probed domain.
///
/// `Cdn` when either string contains a registered provider fragment, ignoring case.
pub fn classify(asn: &str, domain: &str) -> ProviderType {
    let asn = asn.to_lowercase();
    let domain = domain.to_lowercase();
    let matched = CDN_PROVIDERS.iter().any(|provider| {
        let provider = provider.to_lowercase();
        asn.contains(&provider) || domain.contains(&provider)
    });

    if matched {
        ProviderType::Cdn
    } else {
        ProviderType::Origin
    }
}
