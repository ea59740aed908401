use std::path::Path;

use anyhow::Context;
use colored::*;
use hostdisco_common::config::DiscoveryConfig;
use hostdisco_common::facts::FactSet;
use hostdisco_core::normalizer::Normalizer;

use crate::terminal::{colors, format, print};

pub fn normalize(path: &Path, cfg: &DiscoveryConfig) -> anyhow::Result<()> {
    let facts = FactSet::from_json_file(path)?;
    let normalized = Normalizer::new(cfg.boot_interface_fact.clone())
        .normalize(&facts)
        .with_context(|| format!("normalizing {}", path.display()))?;

    print::aligned_line("Primary MAC", normalized.primary_mac.to_string().color(colors::MAC_ADDR));
    print::aligned_line("Boot iface", normalized.primary().name.clone());
    print::aligned_line("Facts", facts.len().to_string());

    for (idx, iface) in normalized.interfaces.iter().enumerate() {
        print::tree_head(idx, &iface.name);
        print::as_tree_one_level(format::interface_details(iface));
    }
    Ok(())
}
