//! # Backend Authentication
//!
//! Every backend call carries the configured API key as a bearer token.
//!
//! ```text
//! ┌──────────────┐  authorization: Bearer <api key>   ┌────────────────────┐
//! │ warden-sync  │ ─────────────────────────────────► │ business backend   │
//! └──────────────┘   (no header when no key is set)   └────────────────────┘
//! ```

use tonic::metadata::{Ascii, MetadataValue};

use crate::error::{SyncError, SyncResult};

const AUTHORIZATION: &str = "authorization";

/// Interceptor adding the bearer header to outgoing requests.
///
/// ## Usage
/// ```rust,ignore
/// let interceptor = AuthInterceptor::new(Some("secret"))?;
/// let client = DnsServiceClient::with_interceptor(channel, interceptor);
/// ```
#[derive(Clone, Default)]
pub struct AuthInterceptor {
    header: Option<MetadataValue<Ascii>>,
}

impl AuthInterceptor {
    /// Creates an interceptor; `None` or an empty key sends no header.
    pub fn new(api_key: Option<&str>) -> SyncResult<Self> {
        let header = match api_key.filter(|k| !k.is_empty()) {
            Some(key) => Some(
                format!("Bearer {key}")
                    .parse::<MetadataValue<Ascii>>()
                    .map_err(|_| {
                        SyncError::InvalidConfig("API key is not a valid header value".into())
                    })?,
            ),
            None => None,
        };

        Ok(Self { header })
    }

    /// Whether calls are authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.header.is_some()
    }
}

impl tonic::service::Interceptor for AuthInterceptor {
    fn call(&mut self, mut request: tonic::Request<()>) -> Result<tonic::Request<()>, tonic::Status> {
        if let Some(header) = &self.header {
            request.metadata_mut().insert(AUTHORIZATION, header.clone());
        }
        Ok(request)
    }
}

impl std::fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInterceptor")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::service::Interceptor;

    #[test]
    fn test_adds_bearer_header() {
        let mut auth = AuthInterceptor::new(Some("secret")).unwrap();
        let req = auth.call(tonic::Request::new(())).unwrap();

        assert_eq!(
            req.metadata().get(AUTHORIZATION).unwrap().to_str().unwrap(),
            "Bearer secret"
        );
    }

    #[test]
    fn test_no_key_no_header() {
        for key in [None, Some("")] {
            let mut auth = AuthInterceptor::new(key).unwrap();
            assert!(!auth.is_authenticated());

            let req = auth.call(tonic::Request::new(())).unwrap();
            assert!(req.metadata().get(AUTHORIZATION).is_none());
        }
    }

    #[test]
    fn test_rejects_bad_key() {
        assert!(AuthInterceptor::new(Some("bad\nkey")).is_err());
    }
}
