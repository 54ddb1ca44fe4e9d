//! Custom-domain certificate fetching.

use tracing::debug;
use warden_core::CertName;

use crate::client::BackendClient;
use crate::error::{SyncError, SyncResult};
use crate::proto::CustomDomainCertificateRequest;

/// PEM certificate chain and private key of a custom domain.
#[derive(Clone, PartialEq, Eq)]
pub struct CertificateData {
    pub certificate_chain: Vec<u8>,
    pub private_key: Vec<u8>,
}

impl std::fmt::Debug for CertificateData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateData")
            .field("certificate_chain_len", &self.certificate_chain.len())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Fetcher of custom-domain certificates.
#[derive(Debug, Clone)]
pub struct CertificateClient {
    client: BackendClient,
}

impl CertificateClient {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Fetches the certificate stored under `cert_name`.
    pub async fn fetch(&self, cert_name: &CertName) -> SyncResult<CertificateData> {
        let req = CustomDomainCertificateRequest {
            cert_name: cert_name.to_string(),
        };
        let resp = self
            .client
            .call(self.client.backend().get_custom_domain_certificate(req))
            .await?;

        if resp.certificate_chain.is_empty() {
            return Err(SyncError::InvalidResponse(format!(
                "certificate {cert_name}: empty certificate chain"
            )));
        }
        if resp.private_key.is_empty() {
            return Err(SyncError::InvalidResponse(format!(
                "certificate {cert_name}: empty private key"
            )));
        }

        debug!(cert_name = %cert_name, "Custom domain certificate fetched");

        Ok(CertificateData {
            certificate_chain: resp.certificate_chain,
            private_key: resp.private_key,
        })
    }
}
