use std::time::Duration;

use ureq::Agent;

use crate::client::{AnswerPayload, LookupAnswer, LookupClient, LookupRequest};
use crate::error::LookupError;

#[derive(Debug, Clone)]
pub struct HttpLookupConfig {
    /// Service endpoint, queried as `GET {base_url}?transcript=..&chrom=..&pos=..&ref=..&alt=..&mode=..`
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpLookupConfig {
    pub fn new(base_url: &str) -> Self {
        HttpLookupConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

///
/// Blocking client for the sequence lookup service.
///
pub struct HttpLookupClient {
    agent: Agent,
    config: HttpLookupConfig,
}

impl HttpLookupClient {
    pub fn new(config: HttpLookupConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .build()
            .into();
        HttpLookupClient { agent, config }
    }
}

/// Map transport failures onto the transient / permanent split.
fn classify_error(error: ureq::Error, request: &LookupRequest) -> LookupError {
    match error {
        ureq::Error::StatusCode(404) | ureq::Error::StatusCode(422) => LookupError::NoAnswer(format!(
            "{} on {}",
            request.coordinate, request.transcript_id
        )),
        ureq::Error::StatusCode(code) if code == 429 || code >= 500 => {
            LookupError::Unavailable(format!("HTTP status {}", code))
        }
        ureq::Error::StatusCode(code) => LookupError::Invalid(format!("HTTP status {}", code)),
        ureq::Error::Timeout(_) => LookupError::Timeout,
        ureq::Error::Io(e) if e.kind() == std::io::ErrorKind::TimedOut => LookupError::Timeout,
        ureq::Error::Json(e) => LookupError::Invalid(e.to_string()),
        other => LookupError::Unavailable(other.to_string()),
    }
}

impl LookupClient for HttpLookupClient {
    fn lookup(&self, request: &LookupRequest) -> Result<LookupAnswer, LookupError> {
        let coordinate = &request.coordinate;
        let pos = coordinate.pos().to_string();

        tracing::trace!(transcript = %request.transcript_id, coordinate = %coordinate, "lookup request");

        let mut response = self
            .agent
            .get(&self.config.base_url)
            .query("transcript", &request.transcript_id)
            .query("chrom", coordinate.chrom())
            .query("pos", &pos)
            .query("ref", coordinate.ref_allele())
            .query("alt", coordinate.alt_allele())
            .query("mode", request.mode.as_str())
            .call()
            .map_err(|e| classify_error(e, request))?;

        let payload: AnswerPayload = response
            .body_mut()
            .read_json()
            .map_err(|e| classify_error(e, request))?;

        LookupAnswer::try_from(payload)
    }
}
