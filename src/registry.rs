use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::{cli::OrcidId, config::USER_AGENT};

pub const JSON: &str = "application/json";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: ureq::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: ureq::Error,
    },
}

/// Anything that can hand back the text of a registry document.
pub trait Registry {
    fn fetch(&self, url: &str, accept: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP client for the ORCID public API.
pub struct OrcidClient {
    agent: ureq::Agent,
}

impl OrcidClient {
    pub fn new(timeout: Duration) -> Self {
        let cfg = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        OrcidClient {
            agent: ureq::Agent::new_with_config(cfg),
        }
    }
}

impl Registry for OrcidClient {
    fn fetch(&self, url: &str, accept: &str) -> Result<String, FetchError> {
        let res = self
            .agent
            .get(url)
            .header("Accept", accept)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| match e {
                ureq::Error::StatusCode(status) => FetchError::Status {
                    url: url.to_string(),
                    status,
                },
                source => FetchError::Transport {
                    url: url.to_string(),
                    source,
                },
            })?;

        res.into_body()
            .read_to_string()
            .map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })
    }
}

/// Builds the two registry URLs for one researcher.
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
    subject: OrcidId,
}

impl Endpoints {
    pub fn new(mut base: Url, subject: OrcidId) -> Self {
        // `Url::join` replaces the last segment unless the path ends in a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Endpoints { base, subject }
    }

    pub fn subject(&self) -> &OrcidId {
        &self.subject
    }

    /// Summary list of every work on the record.
    pub fn works(&self) -> String {
        self.join(&format!("{}/works", self.subject))
    }

    /// Full detail document of one work.
    pub fn work(&self, put_code: &str) -> String {
        self.join(&format!("{}/work/{}", self.subject, put_code))
    }

    fn join(&self, rel: &str) -> String {
        self.base
            .join(rel)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}", self.base, rel))
    }
}
