//! Reload requests and the transport boundary.
//!
//! A reload asks the page's endpoint for a freshly rendered table. The
//! endpoint answers either with an HTML fragment containing the replacement
//! table or with the [`EXPIRED_SENTINEL`] token when the session behind the
//! page is gone.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Response body signalling an expired session.
pub const EXPIRED_SENTINEL: &str = "expired";

/// Parameters of one reload GET request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadRequest {
    /// Table identifier
    pub table_id: String,
    /// Current table configuration as JSON
    pub config_json: String,
}

impl ReloadRequest {
    /// Query parameters in request order. Encoding is left to the transport.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.table_id.as_str()), ("config", self.config_json.as_str())]
    }
}

/// Result of a completed reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReloadOutcome {
    /// A reload for this table is already in flight; nothing was sent
    Busy,
    /// No table with this id has been initialized; nothing was sent
    UnknownTable,
    /// A response arrived for a table with no reload in flight; ignored
    NotInFlight,
    /// The session expired; the caller should offer a full page reload
    Expired,
    /// The table was replaced and its grid rebuilt
    Replaced {
        /// Row count of the rebuilt grid
        rows: usize,
    },
}

/// Fetches replacement markup for a table.
///
/// Implementations perform the HTTP GET; errors should be reported as
/// [`crate::DataGridError::Transport`].
pub trait ReloadTransport {
    /// Fetch the response body for `request`.
    fn fetch(&mut self, request: &ReloadRequest) -> Result<String>;
}

impl<F> ReloadTransport for F
where
    F: FnMut(&ReloadRequest) -> Result<String>,
{
    fn fetch(&mut self, request: &ReloadRequest) -> Result<String> {
        self(request)
    }
}

/// Whether a response body is the expiration sentinel.
pub fn is_expired(body: &str) -> bool {
    body.trim() == EXPIRED_SENTINEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs() {
        let request = ReloadRequest {
            table_id: "sales".to_string(),
            config_json: r#"{"groupby":[]}"#.to_string(),
        };
        assert_eq!(
            request.query_pairs(),
            vec![("id", "sales"), ("config", r#"{"groupby":[]}"#)]
        );
    }

    #[test]
    fn test_is_expired() {
        assert!(is_expired("expired"));
        assert!(is_expired("  expired\n"));
        assert!(!is_expired("<table class='datagrid'></table>"));
        assert!(!is_expired("session expired"));
    }

    #[test]
    fn test_closure_transport() {
        let mut transport = |request: &ReloadRequest| {
            Ok::<_, crate::DataGridError>(format!("echo:{}", request.table_id))
        };
        let request = ReloadRequest {
            table_id: "t".to_string(),
            config_json: "{}".to_string(),
        };
        assert_eq!(transport.fetch(&request).unwrap(), "echo:t");
    }
}
