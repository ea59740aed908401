pub mod config;
pub mod import;
pub mod normalize;

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use hostdisco_common::config::{DiscoveryConfig, NamingStrategy};

#[derive(Parser)]
#[command(name = "hostdisco")]
#[command(about = "Register network-booted machines from their facts.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML file with discovery settings
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Naming strategy for new hosts (Fact, MAC, Random)
    #[arg(long, global = true)]
    pub naming: Option<NamingStrategy>,

    /// Prefix prepended to generated host names
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Fact holding the MAC of the boot interface
    #[arg(long, global = true)]
    pub boot_fact: Option<String>,

    /// Organization assigned when the facts carry none
    #[arg(long, global = true)]
    pub organization: Option<String>,

    /// Location assigned when the facts carry none
    #[arg(long, global = true)]
    pub location: Option<String>,

    /// Less output (-q hides headers, -qq hides host details)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import one or more JSON fact files
    #[command(alias = "i")]
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Skip the OUI vendor lookup
        #[arg(long)]
        no_vendor: bool,
    },
    /// Show how a fact file is interpreted
    #[command(alias = "n")]
    Normalize { file: PathBuf },
    /// Print the effective configuration
    Config,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Config file values, overridden by flags.
    pub fn discovery_config(&self) -> anyhow::Result<DiscoveryConfig> {
        let mut cfg = match &self.config {
            Some(path) => DiscoveryConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => DiscoveryConfig::default(),
        };

        if let Some(naming) = self.naming {
            cfg.naming = naming;
        }
        if let Some(prefix) = &self.prefix {
            cfg.prefix = prefix.clone();
        }
        if let Some(boot_fact) = &self.boot_fact {
            cfg.boot_interface_fact = boot_fact.clone();
        }
        if let Some(organization) = &self.organization {
            cfg.default_organization = Some(organization.clone());
        }
        if let Some(location) = &self.location {
            cfg.default_location = Some(location.clone());
        }

        cfg.validate()?;
        Ok(cfg)
    }
}
