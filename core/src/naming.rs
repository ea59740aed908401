//! Hostname derivation for newly discovered hosts.

use hostdisco_common::config::{DiscoveryConfig, NamingStrategy};
use hostdisco_common::error::ImportError;
use hostdisco_common::facts::NormalizedFacts;
use hostdisco_common::network::mac;
use tracing::warn;

/// Builds the name of a host seen for the first time.
pub fn derive_name(cfg: &DiscoveryConfig, normalized: &NormalizedFacts) -> Result<String, ImportError> {
    let base = match cfg.naming {
        NamingStrategy::Fact => match first_hostname_fact(cfg, normalized) {
            Some(value) => value.to_string(),
            None => {
                warn!(
                    "none of the hostname facts {:?} present, naming by MAC",
                    cfg.hostname_facts
                );
                mac::compact(normalized.primary_mac)
            }
        },
        NamingStrategy::Mac => mac::compact(normalized.primary_mac),
        NamingStrategy::Random => format!("{:08x}", rand::random::<u32>()),
    };

    normalize_hostname(&format!("{}{}", cfg.prefix, base))
}

fn first_hostname_fact<'a>(cfg: &DiscoveryConfig, normalized: &'a NormalizedFacts) -> Option<&'a str> {
    cfg.hostname_facts
        .iter()
        .find_map(|key| normalized.facts.get_non_empty(key))
}

/// Lower-cases, drops everything outside `[a-z0-9-]` and trims dashes at both ends.
pub fn normalize_hostname(candidate: &str) -> Result<String, ImportError> {
    let cleaned: String = candidate
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    let trimmed = cleaned.trim_matches('-');

    if trimmed.is_empty() {
        return Err(ImportError::InvalidHostname(candidate.to_string()));
    }
    Ok(trimmed.to_string())
}
