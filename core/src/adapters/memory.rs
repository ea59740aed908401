use std::collections::HashMap;

use async_trait::async_trait;
use hostdisco_common::error::StoreError;
use hostdisco_common::host::DiscoveredHost;
use pnet::util::MacAddr;
use tokio::sync::RwLock;

use crate::ports::repository::HostRepository;

#[derive(Default)]
pub struct InMemoryHostRepository {
    hosts: RwLock<HashMap<MacAddr, DiscoveredHost>>,
}

impl InMemoryHostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.hosts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.hosts.read().await.is_empty()
    }
}

#[async_trait]
impl HostRepository for InMemoryHostRepository {
    async fn find_by_mac(&self, mac: MacAddr) -> Result<Option<DiscoveredHost>, StoreError> {
        Ok(self.hosts.read().await.get(&mac).cloned())
    }

    async fn insert(&self, host: DiscoveredHost) -> Result<(), StoreError> {
        let mut hosts = self.hosts.write().await;
        if hosts.contains_key(&host.mac) {
            return Err(StoreError::Conflict { mac: host.mac });
        }
        hosts.insert(host.mac, host);
        Ok(())
    }

    async fn update(&self, host: DiscoveredHost) -> Result<(), StoreError> {
        let mut hosts = self.hosts.write().await;
        match hosts.get_mut(&host.mac) {
            Some(slot) => {
                *slot = host;
                Ok(())
            }
            None => Err(StoreError::Unavailable(format!(
                "no record for {} to update",
                host.mac
            ))),
        }
    }

    async fn list(&self) -> Result<Vec<DiscoveredHost>, StoreError> {
        let mut hosts: Vec<DiscoveredHost> = self.hosts.read().await.values().cloned().collect();
        hosts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        Ok(hosts)
    }
}
