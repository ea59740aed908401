//! # Host Import Service
//!
//! Implements the "import discovered host" use case.
//!
//! A submitted fact set flows through three stages:
//! 1. **Normalize**: validate the facts and resolve the primary MAC.
//! 2. **Match**: look the MAC up among known hosts.
//! 3. **Register**: create or refresh the record.
//!
//! Stages 2 and 3 run under a lock keyed by the primary MAC, so retried or
//! duplicated submissions for one machine never create two records while
//! different machines import in parallel.

use std::sync::Arc;

use chrono::Utc;
use hostdisco_common::config::DiscoveryConfig;
use hostdisco_common::error::{ConfigError, ImportError, StoreError};
use hostdisco_common::facts::{FactSet, NormalizedFacts};
use hostdisco_common::host::{DiscoveredHost, DiscoveryFailed};
use pnet::util::MacAddr;
use tracing::{Instrument, info, info_span};

use crate::locks::MacLocks;
use crate::matcher::HostMatcher;
use crate::normalizer::Normalizer;
use crate::ports::events::EventSink;
use crate::ports::extension::Extension;
use crate::ports::repository::HostRepository;
use crate::ports::vendors::VendorRepository;
use crate::registrar::{HostRegistrar, Registration};

/// Application service for importing fact submissions.
pub struct DiscoveryService {
    normalizer: Normalizer,
    matcher: HostMatcher,
    registrar: HostRegistrar,
    repo: Arc<dyn HostRepository>,
    sink: Arc<dyn EventSink>,
    locks: MacLocks,
}

impl DiscoveryService {
    /// Fails when `cfg` does not pass [`DiscoveryConfig::validate`].
    pub fn new(
        cfg: DiscoveryConfig,
        repo: Arc<dyn HostRepository>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let cfg = Arc::new(cfg);
        Ok(Self {
            normalizer: Normalizer::new(cfg.boot_interface_fact.clone()),
            matcher: HostMatcher::new(repo.clone()),
            registrar: HostRegistrar::new(cfg, repo.clone(), sink.clone()),
            repo,
            sink,
            locks: MacLocks::new(),
        })
    }

    pub fn with_vendors(mut self, vendors: Arc<dyn VendorRepository>) -> Self {
        self.registrar = self.registrar.with_vendors(vendors);
        self
    }

    pub fn with_extension(mut self, extension: Arc<dyn Extension>) -> Self {
        self.registrar = self.registrar.with_extension(extension);
        self
    }

    /// Imports one fact submission.
    ///
    /// Failures are reported to the caller and announced as
    /// [`DiscoveryFailed`] events. No record is written for rejected facts.
    pub async fn import_host(&self, facts: &FactSet) -> Result<Registration, ImportError> {
        let normalized = match self.normalizer.normalize(facts) {
            Ok(normalized) => normalized,
            Err(err) => {
                let err = ImportError::from(err);
                self.report_failure(None, &err);
                return Err(err);
            }
        };

        let mac = normalized.primary_mac;
        let span = info_span!("import", %mac);
        let result = self.match_and_register(normalized).instrument(span).await;

        match &result {
            Ok(Registration::Created(host)) => info!("registered {} as {}", host.mac, host.name),
            Ok(Registration::Updated(host)) => info!("refreshed {} ({})", host.name, host.mac),
            Err(err) => self.report_failure(Some(mac), err),
        }
        result
    }

    async fn match_and_register(&self, normalized: NormalizedFacts) -> Result<Registration, ImportError> {
        let _guard = self.locks.acquire(normalized.primary_mac).await;
        let matched = self.matcher.match_mac(normalized.primary_mac).await?;
        self.registrar.register(normalized, matched).await
    }

    pub async fn host(&self, mac: MacAddr) -> Result<Option<DiscoveredHost>, StoreError> {
        self.repo.find_by_mac(mac).await
    }

    pub async fn hosts(&self) -> Result<Vec<DiscoveredHost>, StoreError> {
        self.repo.list().await
    }

    fn report_failure(&self, mac: Option<MacAddr>, err: &ImportError) {
        self.sink.discovery_failed(DiscoveryFailed {
            mac: mac.map(|mac| mac.to_string()),
            reason: err.to_string(),
            timestamp: Utc::now(),
        });
    }
}
