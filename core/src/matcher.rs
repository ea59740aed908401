use std::sync::Arc;

use hostdisco_common::error::StoreError;
use hostdisco_common::host::MatchResult;
use pnet::util::MacAddr;

use crate::ports::repository::HostRepository;

/// Decides whether a primary MAC belongs to a known host. Read only.
#[derive(Clone)]
pub struct HostMatcher {
    repo: Arc<dyn HostRepository>,
}

impl HostMatcher {
    pub fn new(repo: Arc<dyn HostRepository>) -> Self {
        Self { repo }
    }

    /// [`MacAddr`] values are already case and separator independent.
    pub async fn match_mac(&self, primary_mac: MacAddr) -> Result<MatchResult, StoreError> {
        Ok(match self.repo.find_by_mac(primary_mac).await? {
            Some(host) => MatchResult::Existing(Box::new(host)),
            None => MatchResult::New,
        })
    }
}
