use thiserror::Error;

/// Errors raised while polling the search backend and rendering hits.
#[derive(Debug, Error)]
pub enum TailError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to encode search request: {0}")]
    EncodeRequest(#[source] serde_json::Error),

    #[error("failed to decode search response: {0}")]
    DecodeResponse(#[source] serde_json::Error),

    #[error("backend reported status {status}: {detail}")]
    BackendStatus { status: u16, detail: String },

    #[error("search response has no hits")]
    MissingHits,

    #[error("hit has no host field but host output is enabled")]
    MissingHost,

    #[error("invalid highlight pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("{field} = {value} puts the poll window outside the representable time range")]
    WindowOutOfRange { field: &'static str, value: String },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl TailError {
    pub fn transport(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TailError::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Transport failures are the only class worth retrying.
    pub fn is_transport(&self) -> bool {
        matches!(self, TailError::Transport { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transport_errors_are_transport() {
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert!(TailError::transport("http://localhost:9200", refused).is_transport());

        assert!(!TailError::MissingHits.is_transport());
        assert!(!TailError::MissingHost.is_transport());
        assert!(
            !TailError::BackendStatus {
                status: 500,
                detail: "boom".to_string()
            }
            .is_transport()
        );
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        assert!(!TailError::Output(io).is_transport());
        assert!(
            !TailError::WindowOutOfRange {
                field: "sync_interval",
                value: u64::MAX.to_string()
            }
            .is_transport()
        );
    }

    #[test]
    fn test_error_messages() {
        let err = TailError::BackendStatus {
            status: 400,
            detail: "parse_exception".to_string(),
        };
        assert_eq!(err.to_string(), "backend reported status 400: parse_exception");

        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TailError::transport("http://localhost:9200/_search?pretty", refused);
        assert_eq!(
            err.to_string(),
            "request to http://localhost:9200/_search?pretty failed: refused"
        );
    }
}
