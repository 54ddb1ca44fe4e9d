//! Service-wide settings: the rate-limit allowlist and the standard access
//! blocklist.

use tracing::debug;
use warden_core::{AccessConfig, BindSet, IpPrefix};

use crate::client::BackendClient;
use crate::convert::{access_from_wire, prefix_from_wire, Conversion};
use crate::error::{SyncError, SyncResult};

/// Fetcher of service-wide settings.
#[derive(Debug, Clone)]
pub struct SettingsClient {
    client: BackendClient,
}

impl SettingsClient {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Subnets exempt from the global rate limiter. Invalid subnets are
    /// reported and dropped.
    pub async fn rate_limit_allowlist(&self) -> SyncResult<Vec<IpPrefix>> {
        let resp = self
            .client
            .call(self.client.backend().get_rate_limit_settings())
            .await?;

        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);
        let subnets = cx.collect_valid("allowed_subnets", resp.allowed_subnets, prefix_from_wire);
        self.report_all("rate limit settings", &mut cx);

        debug!(subnets = subnets.len(), "Rate limit allowlist fetched");
        Ok(subnets)
    }

    /// The standard access settings profiles may opt into. Unset settings
    /// restrict nothing.
    pub async fn standard_access(&self) -> SyncResult<AccessConfig> {
        let resp = self
            .client
            .call(self.client.backend().get_global_access_settings())
            .await?;

        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);
        let access = access_from_wire(resp.standard, &mut cx);
        self.report_all("standard access settings", &mut cx);

        debug!(
            blocked_nets = access.blocked_nets.len(),
            blocked_asns = access.blocked_asns.len(),
            "Standard access settings fetched"
        );
        Ok(access)
    }

    fn report_all(&self, context: &str, cx: &mut Conversion<'_>) {
        for err in cx.take_errors() {
            self.client.report(SyncError::conversion(context, err));
        }
    }
}
