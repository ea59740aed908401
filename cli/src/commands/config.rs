use hostdisco_common::config::DiscoveryConfig;

use crate::terminal::print;

pub fn show(cfg: &DiscoveryConfig) -> anyhow::Result<()> {
    let text = toml::to_string(cfg)?;
    print::print(text.trim_end());
    Ok(())
}
