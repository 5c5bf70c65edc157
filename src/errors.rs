//! Error types for the exporter.

use std::fmt;

/// Classified failure of a single scrape cycle.
///
/// Scrape errors are logged during collection and never propagated to the
/// Prometheus registry; a failed cycle simply emits nothing.
#[derive(Debug)]
pub enum ScrapeError {
    /// The status request could not be constructed.
    RequestBuild(reqwest::Error),

    /// Transport-level failure while talking to Kibana.
    Transport(reqwest::Error),

    /// Kibana answered with a non-2xx status code.
    UpstreamStatus(reqwest::StatusCode),

    /// The response body could not be read.
    BodyRead(reqwest::Error),

    /// The response body was not a valid status document. Carries the raw
    /// body for diagnosis.
    Decode {
        source: serde_json::Error,
        body: String,
    },
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeError::RequestBuild(err) => {
                write!(f, "could not build a request to scrape Kibana status: {}", err)
            }
            ScrapeError::Transport(err) => {
                write!(f, "error while reading Kibana status: {}", err)
            }
            ScrapeError::UpstreamStatus(status) => {
                write!(f, "invalid response from Kibana status: {}", status)
            }
            ScrapeError::BodyRead(err) => {
                write!(f, "error while reading response from Kibana status: {}", err)
            }
            ScrapeError::Decode { source, body } => {
                write!(
                    f,
                    "error while decoding Kibana status: {}\nproblematic content:\n{}",
                    source, body
                )
            }
        }
    }
}

impl std::error::Error for ScrapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScrapeError::RequestBuild(err)
            | ScrapeError::Transport(err)
            | ScrapeError::BodyRead(err) => Some(err),
            ScrapeError::Decode { source, .. } => Some(source),
            ScrapeError::UpstreamStatus(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_message_names_the_code() {
        let err = ScrapeError::UpstreamStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE);
        let msg = err.to_string();
        assert!(msg.contains("503"), "unexpected message: {}", msg);
    }

    #[test]
    fn decode_message_carries_the_raw_body() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ScrapeError::Decode {
            source,
            body: "{oops".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("problematic content"));
        assert!(msg.contains("{oops"));
    }
}
