//! # TLS Session Tickets
//!
//! Fetches the session-ticket keys shared by every TLS frontend. Each ticket
//! is checked on its own; bad ones are reported and the rest are kept.

use std::collections::BTreeMap;

use tracing::{debug, warn};
use warden_core::validation::validate_chars;
use warden_core::{ValidationError, ValidationResult};

use crate::client::BackendClient;
use crate::error::{SyncError, SyncResult};
use crate::proto::SessionTicket;

/// Minimum length of ticket key material.
pub const MIN_TICKET_LEN: usize = 32;

/// Maximum length of a ticket name.
pub const MAX_TICKET_NAME_LEN: usize = 128;

/// Fetcher of TLS session tickets.
#[derive(Debug, Clone)]
pub struct TicketClient {
    client: BackendClient,
}

impl TicketClient {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Fetches the tickets, keyed by name.
    pub async fn fetch(&self) -> SyncResult<BTreeMap<String, Vec<u8>>> {
        let resp = self
            .client
            .call(self.client.backend().get_session_tickets())
            .await?;

        let mut tickets = BTreeMap::new();
        for (i, t) in resp.tickets.into_iter().enumerate() {
            match check_ticket(&t) {
                Ok(()) => {
                    if tickets.insert(t.name.clone(), t.data).is_some() {
                        warn!(name = %t.name, "Duplicate session ticket name, keeping the last");
                    }
                }
                Err(e) => self.client.report(SyncError::conversion(
                    "session tickets",
                    e.within(&format!("tickets[{i}]")),
                )),
            }
        }

        self.client.metrics().observe_session_tickets(tickets.len());
        debug!(count = tickets.len(), "Session tickets fetched");

        Ok(tickets)
    }
}

fn check_ticket(t: &SessionTicket) -> ValidationResult<()> {
    validate_chars("name", &t.name, MAX_TICKET_NAME_LEN, |c| {
        c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
    })?;

    if t.data.len() < MIN_TICKET_LEN {
        return Err(ValidationError::invalid(
            "data",
            format!("{} bytes, want at least {MIN_TICKET_LEN}", t.data.len()),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::proto::SessionTicketResponse;
    use crate::testutil::{FakeBackend, RecordingErrorCollector, RecordingMetrics};

    fn ticket(name: &str, len: usize) -> SessionTicket {
        SessionTicket {
            name: name.to_string(),
            data: vec![7; len],
        }
    }

    #[tokio::test]
    async fn test_fetch_keeps_valid_tickets() {
        let backend = Arc::new(FakeBackend::default());
        let metrics = Arc::new(RecordingMetrics::default());
        let errors = Arc::new(RecordingErrorCollector::default());
        *backend.tickets.lock().unwrap() = Some(Ok(SessionTicketResponse {
            tickets: vec![
                ticket("ticket_1.key", 48),
                ticket("bad/name", 48),
                ticket("short", 16),
                ticket("ticket-2", MIN_TICKET_LEN),
            ],
        }));

        let client = BackendClient::new(backend, Duration::from_secs(5))
            .with_metrics(metrics.clone())
            .with_error_collector(errors.clone());
        let tickets = TicketClient::new(client).fetch().await.unwrap();

        assert_eq!(
            tickets.keys().cloned().collect::<Vec<_>>(),
            vec!["ticket-2".to_string(), "ticket_1.key".to_string()]
        );
        assert_eq!(tickets["ticket_1.key"].len(), 48);
        assert_eq!(errors.len(), 2);
        assert_eq!(metrics.tickets(), vec![2]);
    }

    #[test]
    fn test_check_ticket() {
        assert!(check_ticket(&ticket("a", MIN_TICKET_LEN)).is_ok());
        assert!(check_ticket(&ticket("", MIN_TICKET_LEN)).is_err());
        assert!(check_ticket(&ticket("a b", MIN_TICKET_LEN)).is_err());
        assert!(check_ticket(&ticket("a", MIN_TICKET_LEN - 1)).is_err());
    }
}
